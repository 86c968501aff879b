/*!
Tabulation of ranked ballots with Condorcet methods.

A ballot orders the candidates in groups of equal preference (`RankGroups`),
or equivalently gives each candidate a rank (`Ranking`). The ballots are
folded into a table of pairwise preferences, which gives:

- the Condorcet winner, when one candidate beats every other one,
- the Schulze winner, from the strongest paths between candidates,
- a full ranking of the candidates, from the strongly connected components of
  the majority graph.

```
use condorcet_voting::*;

let ballots = vec![
    RankGroups::sanitize(&[vec![0], vec![1]], 3),
    RankGroups::sanitize(&[vec![2, 0]], 3),
];
let result = run_tally(3, &ballots, &TallyRules::DEFAULT_RULES)?;
assert_eq!(result.winner, Some(0));
# Ok::<(), TallyError>(())
```

Everything is computed from scratch for each call. Nothing is cached, and
all the types are plain data that can be shared between threads.
*/

mod config;
mod graph;
mod pairwise;
mod ranking;

pub mod builder;
pub mod manual;

use log::{debug, info};

pub use crate::config::*;
pub use crate::graph::{tarjan_scc, Components};
pub use crate::pairwise::*;
pub use crate::ranking::*;

/// Runs the election with the given rules for the given ballots.
///
/// Arguments:
/// * `num_candidates` the number of candidates of the election
/// * `ballots` the ballots, which must all be valid for `num_candidates`
/// * `rules` the rules that govern this tally
pub fn run_tally(
    num_candidates: usize,
    ballots: &[RankGroups],
    rules: &TallyRules,
) -> Result<TallyResult, TallyError> {
    info!(
        "run_tally: Processing {} ballots, {} candidates, rules: {:?}",
        ballots.len(),
        num_candidates,
        rules
    );
    let preferences = PairwisePreferences::tabulate(num_candidates, ballots)?;
    let condorcet_winner = preferences.winner();
    debug!("run_tally: condorcet winner: {:?}", condorcet_winner);

    let paths = match (condorcet_winner, rules.paths_mode) {
        (Some(_), PathsMode::WhenNoCondorcetWinner) => None,
        _ => Some(preferences.strongest_paths()),
    };
    let winner =
        condorcet_winner.or_else(|| paths.as_ref().and_then(|p| p.winner()));

    let ranking = if rules.include_ranking {
        Some(match paths.as_ref() {
            Some(p) => p.ranking(),
            None => preferences.ranking(),
        })
    } else {
        None
    };
    info!("run_tally: winner: {:?} ranking: {:?}", winner, ranking);

    Ok(TallyResult {
        num_ballots: ballots.len(),
        preferences,
        paths,
        winner,
        ranking,
    })
}
