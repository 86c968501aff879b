use snafu::ensure;

use crate::config::*;

/// For each candidate, the rank given to this candidate.
///
/// Each rank must be >= 0, and all the ranks between 0 and the highest rank
/// must be used (the ranking must be compact). A smaller rank means a higher
/// preference.
#[derive(Eq, PartialEq, Debug, Clone, Default, Hash)]
pub struct Ranking(pub Vec<i64>);

impl Ranking {
    pub fn num_candidates(&self) -> usize {
        self.0.len()
    }

    pub fn ranks(&self) -> &[i64] {
        &self.0
    }

    pub fn check(&self) -> Result<(), RankingError> {
        self.rank_counts().map(|_| ())
    }

    /// The candidates grouped by rank, most preferred group first.
    /// Inside a group, the candidates are in increasing order.
    pub fn to_rank_groups(&self) -> Result<RankGroups, RankingError> {
        let counts = self.rank_counts()?;
        let mut groups: Vec<Vec<CandidateIndex>> =
            counts.iter().map(|&c| Vec::with_capacity(c)).collect();
        for (candidate, &rank) in self.0.iter().enumerate() {
            groups[rank as usize].push(candidate as CandidateIndex);
        }
        Ok(RankGroups(groups))
    }

    /// The number of candidates for each rank, once the ranking is known to
    /// be compact.
    fn rank_counts(&self) -> Result<Vec<usize>, RankingError> {
        let num_candidates = self.0.len();
        if num_candidates == 0 {
            return Ok(Vec::new());
        }
        let mut counts: Vec<usize> = vec![0; num_candidates];
        let mut high_rank: usize = 0;
        for (candidate, &rank) in self.0.iter().enumerate() {
            ensure!(rank >= 0, RankOutOfRangeSnafu { candidate, rank });
            let rank = rank as usize;
            high_rank = high_rank.max(rank);
            // A rank past the number of candidates always leaves a hole
            // below it, which is caught below.
            if let Some(c) = counts.get_mut(rank) {
                *c += 1;
            }
        }
        let last = high_rank.min(num_candidates - 1);
        if let Some(rank) = counts[..=last].iter().position(|&c| c == 0) {
            return MissingRankSnafu { rank: rank as i64 }.fail();
        }
        counts.truncate(high_rank + 1);
        Ok(counts)
    }
}

/// For each rank, the list of all the candidates of that rank.
///
/// Similar to `Ranking`, the groups must be compact: no group may be empty.
/// All the candidates in `0..num_candidates` must be present exactly once.
#[derive(Eq, PartialEq, Debug, Clone, Default, Hash)]
pub struct RankGroups(pub Vec<Vec<CandidateIndex>>);

impl RankGroups {
    /// Repairs a grouping sent by a voter.
    ///
    /// Candidates out of range and repeated candidates are dropped (the first
    /// occurrence is kept), and so are the groups left empty. The candidates
    /// that were never mentioned are put together in a last group.
    ///
    /// This never fails: the result always passes `check(num_candidates)`.
    pub fn sanitize(raw: &[Vec<CandidateIndex>], num_candidates: usize) -> RankGroups {
        let mut have: Vec<bool> = vec![false; num_candidates];
        let mut groups: Vec<Vec<CandidateIndex>> = Vec::new();
        for raw_group in raw.iter() {
            let mut group: Vec<CandidateIndex> = Vec::new();
            for &candidate in raw_group.iter() {
                if candidate < 0 {
                    continue;
                }
                if let Some(seen) = have.get_mut(candidate as usize) {
                    if !*seen {
                        *seen = true;
                        group.push(candidate);
                    }
                }
            }
            if !group.is_empty() {
                groups.push(group);
            }
        }
        let unranked: Vec<CandidateIndex> = (0..num_candidates)
            .filter(|&candidate| !have[candidate])
            .map(|candidate| candidate as CandidateIndex)
            .collect();
        if !unranked.is_empty() {
            groups.push(unranked);
        }
        RankGroups(groups)
    }

    pub fn groups(&self) -> &[Vec<CandidateIndex>] {
        &self.0
    }

    /// The total number of candidates, over all the groups.
    pub fn num_candidates(&self) -> usize {
        self.0.iter().map(|g| g.len()).sum()
    }

    pub fn check(&self, expected_num_candidates: usize) -> Result<(), RankingError> {
        self.checked_num_candidates(Some(expected_num_candidates))
            .map(|_| ())
    }

    pub fn to_ranking(&self) -> Result<Ranking, RankingError> {
        let num_candidates = self.checked_num_candidates(None)?;
        let mut ranks: Vec<i64> = vec![0; num_candidates];
        for (rank, group) in self.0.iter().enumerate() {
            for &candidate in group.iter() {
                ranks[candidate as usize] = rank as i64;
            }
        }
        Ok(Ranking(ranks))
    }

    fn checked_num_candidates(&self, expected: Option<usize>) -> Result<usize, RankingError> {
        for (group, g) in self.0.iter().enumerate() {
            ensure!(!g.is_empty(), EmptyGroupSnafu { group });
        }
        let found = self.num_candidates();
        if let Some(expected) = expected {
            ensure!(
                expected == found,
                UnexpectedCandidateCountSnafu { expected, found }
            );
        }
        let mut have: Vec<bool> = vec![false; found];
        for &candidate in self.0.iter().flatten() {
            ensure!(candidate >= 0, CandidateOutOfRangeSnafu { candidate });
            // With exactly `found` candidates, an index past the end means
            // that a smaller one was left out.
            let seen = have
                .get_mut(candidate as usize)
                .ok_or(RankingError::CandidateMissing { candidate })?;
            ensure!(!*seen, DuplicateCandidateSnafu { candidate });
            *seen = true;
        }
        Ok(found)
    }
}

impl From<Vec<Vec<CandidateIndex>>> for RankGroups {
    fn from(groups: Vec<Vec<CandidateIndex>>) -> Self {
        RankGroups(groups)
    }
}
