use clap::Parser;

/// Tabulates ranked ballots with the Condorcet and Schulze methods.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) JSON description of the election: candidates, ballot sources and rules.
    /// The keys are listed in the condorcet_voting::manual module.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) Ballot file to tabulate instead of the sources listed in the configuration.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// Format of the --input file: csv (default), text or json.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (repeatable) Candidate names, in index order. They replace the candidates of the
    /// configuration.
    #[clap(long, value_parser)]
    pub choices: Option<Vec<String>>,

    /// (file path or 'stdout') Where to write the JSON summary. Takes precedence over outputFile
    /// in the configuration. The summary goes to the standard output by default.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) Expected JSON summary. The run fails if the computed summary differs.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// Logs at debug level.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
