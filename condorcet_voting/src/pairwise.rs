use std::cmp::Reverse;
use std::fmt::Write;
use std::ops::Deref;

use log::debug;
use snafu::ResultExt;

use crate::config::*;
use crate::graph::{tarjan_scc, Components};
use crate::ranking::{RankGroups, Ranking};

/// A square table of pairwise contests between candidates.
///
/// Entries are indexed `[runner][opponent]`: one runner is usually shown on
/// one line, so this is `[row][column]`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Pairwise {
    num_candidates: usize,
    // Row-major.
    cells: Vec<u64>,
}

impl Pairwise {
    pub fn new(num_candidates: usize) -> Pairwise {
        Pairwise {
            num_candidates,
            cells: vec![0; num_candidates * num_candidates],
        }
    }

    /// Builds a table from its rows. Returns `None` if the rows do not form a
    /// square.
    pub fn from_rows(rows: &[Vec<u64>]) -> Option<Pairwise> {
        let num_candidates = rows.len();
        if rows.iter().any(|row| row.len() != num_candidates) {
            return None;
        }
        Some(Pairwise {
            num_candidates,
            cells: rows.concat(),
        })
    }

    pub fn num_candidates(&self) -> usize {
        self.num_candidates
    }

    pub fn get(&self, runner: usize, opponent: usize) -> u64 {
        self.cells[runner * self.num_candidates + opponent]
    }

    fn set(&mut self, runner: usize, opponent: usize, value: u64) {
        self.cells[runner * self.num_candidates + opponent] = value;
    }

    pub fn row(&self, runner: usize) -> &[u64] {
        let start = runner * self.num_candidates;
        &self.cells[start..start + self.num_candidates]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u64]> + '_ {
        (0..self.num_candidates).map(move |runner| self.row(runner))
    }

    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        self.rows().map(|row| row.to_vec()).collect()
    }

    /// The candidate that wins all its pairwise contests, if any.
    ///
    /// A tie against any other candidate is not a win.
    pub fn winner(&self) -> Option<usize> {
        let n = self.num_candidates;
        (0..n).find(|&runner| {
            (0..n).all(|opponent| {
                runner == opponent || self.get(runner, opponent) > self.get(opponent, runner)
            })
        })
    }

    /// A full ranking of the candidates.
    ///
    /// There is an edge `runner -> opponent` in the majority graph when the
    /// runner wins or ties against the opponent. For any two distinct
    /// candidates there is an edge one way or the other (or both), so once the
    /// strongly connected components are merged the remaining edges form a
    /// strict total order: sorting the components by their number of
    /// outgoing edges gives the ranking. Candidates inside one component are
    /// tied.
    pub fn ranking(&self) -> Ranking {
        let n = self.num_candidates;
        // Ties and wins get an edge.
        let edges: Vec<Vec<usize>> = (0..n)
            .map(|runner| {
                (0..n)
                    .filter(|&opponent| {
                        runner != opponent
                            && self.get(runner, opponent) >= self.get(opponent, runner)
                    })
                    .collect()
            })
            .collect();

        let Components {
            mapping,
            components,
        } = tarjan_scc(&edges);
        let num_comps = components.len();
        debug!(
            "ranking: {} candidates in {} components: {:?}",
            n, num_comps, components
        );

        // Outgoing edges of each component to the other components, without
        // counting parallel edges twice.
        let mut has_edge: Vec<bool> = vec![false; num_comps * num_comps];
        let mut edge_count: Vec<usize> = vec![0; num_comps];
        for (from, links) in edges.iter().enumerate() {
            let mapped_from = mapping[from];
            for &to in links.iter() {
                let mapped_to = mapping[to];
                let slot = mapped_from * num_comps + mapped_to;
                if mapped_from != mapped_to && !has_edge[slot] {
                    has_edge[slot] = true;
                    edge_count[mapped_from] += 1;
                }
            }
        }

        // The first component has the most outgoing edges.
        let mut order: Vec<usize> = (0..num_comps).collect();
        order.sort_by_key(|&comp| Reverse(edge_count[comp]));
        for pair in order.windows(2) {
            assert!(
                edge_count[pair[0]] > edge_count[pair[1]],
                "The condensed majority graph is not a strict order: edge counts {:?}",
                edge_count
            );
        }

        let mut ranks: Vec<i64> = vec![0; n];
        for (rank, &comp) in order.iter().enumerate() {
            for &candidate in components[comp].iter() {
                ranks[candidate] = rank as i64;
            }
        }
        Ranking(ranks)
    }

    /// Renders the table with fixed-width columns.
    ///
    /// Cells are labelled `name[row,*]` and `name[*,column]`. Missing labels
    /// fall back to the candidate index.
    pub fn ascii_table(&self, table_name: &str, labels: &[String]) -> String {
        let labels: Vec<String> = (0..self.num_candidates)
            .map(|i| labels.get(i).cloned().unwrap_or_else(|| i.to_string()))
            .collect();
        let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0)
            + table_name.chars().count()
            + 5;

        let mut buf = String::new();
        buf.push('|');
        // Writing into a String cannot fail.
        let _ = write!(buf, "{:>width$} |", table_name, width = width);
        for label in labels.iter() {
            let header = format!("{}[*,{}]", table_name, label);
            let _ = write!(buf, "{:>width$} |", header, width = width);
        }
        buf.push('\n');

        for (label, row) in labels.iter().zip(self.rows()) {
            buf.push('|');
            let header = format!("{}[{},*]", table_name, label);
            let _ = write!(buf, "{:>width$} |", header, width = width);
            for wins in row.iter() {
                let _ = write!(buf, "{:>width$} |", wins, width = width);
            }
            buf.push('\n');
        }
        buf
    }
}

/// `[runner][opponent]`: how many ballots rank the runner strictly ahead of
/// the opponent.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PairwisePreferences(Pairwise);

impl PairwisePreferences {
    /// Counts the pairwise preferences of all the ballots.
    ///
    /// Every ballot is checked against the number of candidates first. An
    /// invalid ballot rejects the whole tabulation.
    pub fn tabulate(
        num_candidates: usize,
        ballots: &[RankGroups],
    ) -> Result<PairwisePreferences, TallyError> {
        let mut table = Pairwise::new(num_candidates);
        // The candidates of the groups seen so far in the current ballot.
        let mut preferred: Vec<usize> = Vec::with_capacity(num_candidates);
        for (index, ballot) in ballots.iter().enumerate() {
            ballot
                .check(num_candidates)
                .context(InvalidBallotSnafu { index })?;
            preferred.clear();
            for group in ballot.groups() {
                for &loser in group.iter() {
                    let loser = loser as usize;
                    for &winner in preferred.iter() {
                        table.cells[winner * num_candidates + loser] += 1;
                    }
                }
                preferred.extend(group.iter().map(|&c| c as usize));
            }
        }
        debug!(
            "tabulate: {} ballots, {} candidates",
            ballots.len(),
            num_candidates
        );
        Ok(PairwisePreferences(table))
    }

    /// Same as `tabulate`, for ballots given as rankings.
    pub fn tabulate_rankings(
        num_candidates: usize,
        ballots: &[Ranking],
    ) -> Result<PairwisePreferences, TallyError> {
        let mut all_groups: Vec<RankGroups> = Vec::with_capacity(ballots.len());
        for (index, ranking) in ballots.iter().enumerate() {
            let found = ranking.num_candidates();
            if found != num_candidates {
                return Err(RankingError::UnexpectedCandidateCount {
                    expected: num_candidates,
                    found,
                })
                .context(InvalidBallotSnafu { index });
            }
            let groups = ranking
                .to_rank_groups()
                .context(InvalidBallotSnafu { index })?;
            all_groups.push(groups);
        }
        PairwisePreferences::tabulate(num_candidates, &all_groups)
    }

    pub fn from_pairwise(table: Pairwise) -> PairwisePreferences {
        PairwisePreferences(table)
    }

    /// The Schulze strongest paths.
    ///
    /// A path starts with the strict majority edges, weighted by the number
    /// of ballots in favour. The strength of a path is its weakest edge.
    pub fn strongest_paths(&self) -> StrongestPaths {
        let n = self.num_candidates;
        let mut paths = Pairwise::new(n);
        for i in 0..n {
            for j in 0..n {
                if i != j && self.get(i, j) > self.get(j, i) {
                    paths.set(i, j, self.get(i, j));
                }
            }
        }
        // `i` is the intermediate candidate. It must stay the outer loop.
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                for k in 0..n {
                    if i != k && j != k {
                        // Try the path j -> i -> k instead of j -> k.
                        let strength = paths.get(j, i).min(paths.get(i, k));
                        if strength > paths.get(j, k) {
                            paths.set(j, k, strength);
                        }
                    }
                }
            }
        }
        StrongestPaths(paths)
    }

    pub fn ascii_table(&self, labels: &[String]) -> String {
        self.0.ascii_table("d", labels)
    }
}

impl Deref for PairwisePreferences {
    type Target = Pairwise;
    fn deref(&self) -> &Pairwise {
        &self.0
    }
}

/// `[a][b]`: the strength of the strongest path from `a` to `b`, 0 if there is
/// no path.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct StrongestPaths(Pairwise);

impl StrongestPaths {
    pub fn ascii_table(&self, labels: &[String]) -> String {
        self.0.ascii_table("p", labels)
    }
}

impl Deref for StrongestPaths {
    type Target = Pairwise;
    fn deref(&self) -> &Pairwise {
        &self.0
    }
}
