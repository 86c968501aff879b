use log::debug;
use snafu::{ensure, ResultExt};

pub use crate::config::*;
use crate::ranking::{RankGroups, Ranking};

/// A builder for adding votes.
///
/// ```
/// pub use condorcet_voting::builder::Builder;
/// pub use condorcet_voting::TallyRules;
/// # use condorcet_voting::TallyError;
///
/// let mut builder = Builder::new(&TallyRules::DEFAULT_RULES)?
///     .candidates(&["Anna".to_string(), "Bob".to_string(), "Clara".to_string()])?;
///
/// builder.add_vote_text("Anna\nClara, bob");
/// builder.add_vote_raw(&[vec![0], vec![1]]);
///
/// let result = builder.tally()?;
/// assert_eq!(result.winner, Some(0));
///
/// # Ok::<(), TallyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    _rules: TallyRules,
    _candidates: Vec<String>,
    _ballots: Vec<RankGroups>,
}

impl Builder {
    pub fn new(rules: &TallyRules) -> Result<Builder, TallyError> {
        Ok(Builder {
            _rules: rules.clone(),
            _candidates: Vec::new(),
            _ballots: Vec::new(),
        })
    }

    /// Sets the candidates of the election. This drops the votes added so far.
    pub fn candidates(self, cands: &[String]) -> Result<Builder, TallyError> {
        ensure!(!cands.is_empty(), NoCandidatesSnafu {});
        for (idx, name) in cands.iter().enumerate() {
            let first = find_candidate(cands, name);
            ensure!(
                first == Some(idx),
                DuplicateCandidateNameSnafu { name: name.clone() }
            );
        }
        Ok(Builder {
            _rules: self._rules,
            _candidates: cands.to_vec(),
            _ballots: Vec::new(),
        })
    }

    pub fn candidate_names(&self) -> &[String] {
        &self._candidates
    }

    pub fn num_candidates(&self) -> usize {
        self._candidates.len()
    }

    pub fn ballots(&self) -> &[RankGroups] {
        &self._ballots
    }

    /// Adds a vote from an untrusted source. The vote is sanitized and
    /// always accepted.
    pub fn add_vote_raw(&mut self, groups: &[Vec<CandidateIndex>]) -> &RankGroups {
        let sanitized = RankGroups::sanitize(groups, self.num_candidates());
        self.push(sanitized)
    }

    /// Adds a vote that is expected to be valid already. Invalid votes are
    /// rejected.
    pub fn add_vote_groups(&mut self, groups: RankGroups) -> Result<&RankGroups, TallyError> {
        let index = self._ballots.len();
        groups
            .check(self.num_candidates())
            .context(InvalidBallotSnafu { index })?;
        Ok(self.push(groups))
    }

    pub fn add_vote_ranking(&mut self, ranking: &Ranking) -> Result<&RankGroups, TallyError> {
        let index = self._ballots.len();
        let groups = ranking
            .to_rank_groups()
            .context(InvalidBallotSnafu { index })?;
        self.add_vote_groups(groups)
    }

    /// Adds a vote written as text. See `parse_vote`.
    pub fn add_vote_text(&mut self, text: &str) -> &RankGroups {
        let raw = parse_vote(&self._candidates, text);
        self.add_vote_raw(&raw)
    }

    pub fn stringify_vote(&self, vote: &RankGroups) -> String {
        stringify_vote(&self._candidates, vote)
    }

    pub fn tally(&self) -> Result<TallyResult, TallyError> {
        ensure!(!self._candidates.is_empty(), NoCandidatesSnafu {});
        crate::run_tally(self.num_candidates(), &self._ballots, &self._rules)
    }

    fn push(&mut self, groups: RankGroups) -> &RankGroups {
        debug!("add vote: {:?}", groups);
        self._ballots.push(groups);
        &self._ballots[self._ballots.len() - 1]
    }
}

/// The index of the candidate with this name. Names are compared without
/// regard to case or surrounding spaces.
pub fn find_candidate(candidates: &[String], name: &str) -> Option<usize> {
    let name = name.trim().to_lowercase();
    candidates
        .iter()
        .position(|c| c.trim().to_lowercase() == name)
}

/// Reads a vote written with one line per preference group, the candidates
/// of a group separated by commas:
///
/// ```text
/// Anna
/// Clara, Bob
/// ```
///
/// Unknown names and empty lines are ignored. The result still has to go
/// through `RankGroups::sanitize`.
pub fn parse_vote(candidates: &[String], text: &str) -> Vec<Vec<CandidateIndex>> {
    let mut vote: Vec<Vec<CandidateIndex>> = Vec::new();
    for line in text.lines() {
        let group: Vec<CandidateIndex> = line
            .split(',')
            .map(|choice| choice.trim())
            .filter(|choice| !choice.is_empty())
            .filter_map(|choice| find_candidate(candidates, choice))
            .map(|c| c as CandidateIndex)
            .collect();
        if !group.is_empty() {
            vote.push(group);
        }
    }
    vote
}

/// The inverse of `parse_vote`.
pub fn stringify_vote(candidates: &[String], vote: &RankGroups) -> String {
    let mut buf = String::new();
    for group in vote.groups() {
        let names: Vec<String> = group
            .iter()
            .map(|&c| match usize::try_from(c).ok().and_then(|c| candidates.get(c)) {
                Some(name) => name.clone(),
                None => c.to_string(),
            })
            .collect();
        buf.push_str(&names.join(", "));
        buf.push('\n');
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn builder() -> Builder {
        Builder::new(&TallyRules::DEFAULT_RULES)
            .unwrap()
            .candidates(&names(&["Anna", "Bob", "Clara"]))
            .unwrap()
    }

    #[test]
    fn candidates_are_checked() {
        let b = Builder::new(&TallyRules::DEFAULT_RULES).unwrap();
        assert_eq!(
            b.clone().candidates(&[]).unwrap_err(),
            TallyError::NoCandidates {}
        );
        assert_eq!(
            b.candidates(&names(&["Anna", "Bob", "anna "])).unwrap_err(),
            TallyError::DuplicateCandidateName {
                name: "anna ".to_string()
            }
        );
        let b = Builder::new(&TallyRules::DEFAULT_RULES).unwrap();
        assert_eq!(b.tally().unwrap_err(), TallyError::NoCandidates {});
    }

    #[test]
    fn parse_and_stringify() {
        let c = names(&["Anna", "Bob", "Clara"]);
        let raw = parse_vote(&c, "clara\n\n  Anna , nobody,BOB\r\n,\n");
        assert_eq!(raw, vec![vec![2], vec![0, 1]]);
        let groups = RankGroups::sanitize(&raw, 3);
        assert_eq!(stringify_vote(&c, &groups), "Clara\nAnna, Bob\n");
        // And back.
        let again = parse_vote(&c, &stringify_vote(&c, &groups));
        assert_eq!(RankGroups::sanitize(&again, 3), groups);

        assert!(parse_vote(&c, "").is_empty());
        assert!(parse_vote(&c, "Dave\nEve").is_empty());
    }

    #[test]
    fn add_votes() {
        let mut b = builder();
        assert_eq!(
            b.add_vote_text("Bob\nBob, Anna"),
            &RankGroups(vec![vec![1], vec![0], vec![2]])
        );
        assert_eq!(
            b.add_vote_raw(&[vec![7, 2]]),
            &RankGroups(vec![vec![2], vec![0, 1]])
        );
        assert!(b
            .add_vote_groups(RankGroups(vec![vec![0, 1, 2]]))
            .is_ok());
        assert_eq!(
            b.add_vote_groups(RankGroups(vec![vec![0], vec![1]])),
            Err(TallyError::InvalidBallot {
                index: 3,
                source: RankingError::UnexpectedCandidateCount {
                    expected: 3,
                    found: 2
                }
            })
        );
        assert!(b.add_vote_ranking(&Ranking(vec![2, 1, 0])).is_ok());
        assert_eq!(
            b.add_vote_ranking(&Ranking(vec![0, -1, 1])),
            Err(TallyError::InvalidBallot {
                index: 4,
                source: RankingError::RankOutOfRange {
                    candidate: 1,
                    rank: -1
                }
            })
        );
        assert_eq!(b.ballots().len(), 4);
        assert_eq!(b.stringify_vote(&b.ballots()[3]), "Clara\nBob\nAnna\n");
    }

    #[test]
    fn tally_with_builder() {
        let _ = env_logger::try_init();
        let mut b = builder();
        b.add_vote_text("Anna\nBob\nClara");
        b.add_vote_text("Bob\nAnna\nClara");
        b.add_vote_text("Anna\nClara\nBob");
        let res = b.tally().unwrap();
        assert_eq!(res.num_ballots, 3);
        assert_eq!(res.winner, Some(0));
        assert_eq!(res.paths, None);
        assert_eq!(res.ranking, Some(Ranking(vec![0, 1, 2])));
    }

    #[test]
    fn setting_candidates_drops_votes() {
        let mut b = builder();
        b.add_vote_text("Anna");
        let b = b.candidates(&names(&["X", "Y"])).unwrap();
        assert!(b.ballots().is_empty());
        assert_eq!(b.num_candidates(), 2);
    }
}
