// ********* Input data structures ***********

use snafu::Snafu;

use crate::pairwise::{PairwisePreferences, StrongestPaths};
use crate::ranking::Ranking;

/// The index of a candidate, as found in untrusted ballots.
///
/// Valid candidates are in `0..num_candidates`. The type is signed so that
/// negative indices coming from a client can be reported instead of wrapping.
pub type CandidateIndex = i64;

// ******** Output data structures *********

/// The outcome of a tally.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TallyResult {
    pub num_ballots: usize,
    pub preferences: PairwisePreferences,
    /// Only computed when the rules ask for it, or when there is no
    /// Condorcet winner in the preferences.
    pub paths: Option<StrongestPaths>,
    /// The Condorcet winner of the preferences, or else the Schulze winner.
    pub winner: Option<usize>,
    pub ranking: Option<Ranking>,
}

/// A ballot that breaks one of the invariants of `Ranking` or `RankGroups`.
///
/// These are never repaired: only `RankGroups::sanitize` is allowed to fix
/// a ballot.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum RankingError {
    #[snafu(display("Ranking contains the negative rank {rank} for candidate {candidate}"))]
    RankOutOfRange { candidate: usize, rank: i64 },
    #[snafu(display("Ranking is not compact: rank {rank} is not used"))]
    MissingRank { rank: i64 },
    #[snafu(display("Rank group {group} is empty"))]
    EmptyGroup { group: usize },
    #[snafu(display("Rank groups contain {found} candidates, expected {expected}"))]
    UnexpectedCandidateCount { expected: usize, found: usize },
    #[snafu(display("Rank groups contain the negative candidate {candidate}"))]
    CandidateOutOfRange { candidate: CandidateIndex },
    #[snafu(display("Rank groups contain candidate {candidate} twice"))]
    DuplicateCandidate { candidate: CandidateIndex },
    #[snafu(display("Rank groups miss a candidate (found index {candidate})"))]
    CandidateMissing { candidate: CandidateIndex },
}

/// Errors that prevent a tally from completing.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum TallyError {
    #[snafu(display("Ballot #{index} is invalid"))]
    InvalidBallot { index: usize, source: RankingError },
    #[snafu(display("An election needs at least one candidate"))]
    NoCandidates {},
    #[snafu(display("Candidate {name:?} is declared twice"))]
    DuplicateCandidateName { name: String },
}

// ********* Configuration **********

/// When to compute the strongest paths.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum PathsMode {
    /// Only fall back to the Schulze method when the preferences alone do
    /// not have a Condorcet winner.
    WhenNoCondorcetWinner,
    Always,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TallyRules {
    pub paths_mode: PathsMode,
    /// Also compute a full ranking of all the candidates. It is derived from
    /// the strongest paths when they are computed, and from the preferences
    /// otherwise.
    pub include_ranking: bool,
}

impl TallyRules {
    pub const DEFAULT_RULES: TallyRules = TallyRules {
        paths_mode: PathsMode::WhenNoCondorcetWinner,
        include_ranking: true,
    };
}

impl Default for TallyRules {
    fn default() -> Self {
        TallyRules::DEFAULT_RULES
    }
}
