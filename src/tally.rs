use log::{debug, info, warn};

use condorcet_voting::builder::Builder;
use condorcet_voting::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::tally::config_reader::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_json;
mod io_text;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TallyCliError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a positive index, found {value}"))]
    ParsingJsonNumber { value: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("CSV line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("CSV line {lineno}: cannot read a count from '{content}'"))]
    CsvCount { lineno: usize, content: String },
    #[snafu(display("Ballot {id}: count {count} is larger than the maximum of {max}"))]
    BallotCountTooLarge { id: String, count: u64, max: u64 },
    #[snafu(display("Provider not implemented: {provider}"))]
    UnknownProvider { provider: String },
    #[snafu(display("No parent directory for {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("Tabulation failed: {source}"))]
    Tally { source: TallyError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TallyCliResult<T> = Result<T, TallyCliError>;

/// A ballot as read from a source, before validation.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: Option<String>,
    pub count: Option<u64>,
    pub groups: Vec<Vec<CandidateIndex>>,
}

fn read_ranking_data(
    root_path: &Path,
    cfs: &FileSource,
    candidates: &[String],
) -> TallyCliResult<Vec<ParsedBallot>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read rank file {:?}", p2);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_ranking(p2, cfs, candidates),
        "text" => io_text::read_text_ranking(p2, candidates),
        "json" => io_json::read_json_ranking(p2),
        x => UnknownProviderSnafu {
            provider: x.to_string(),
        }
        .fail(),
    }
}

/// The largest count accepted for a single ballot. Each unit of count is
/// stored as its own ballot.
pub const MAX_BALLOT_COUNT: u64 = 1_000_000;

/// Adds the ballots to the builder, once per unit of count.
fn add_ballots(builder: &mut Builder, parsed_ballots: &[ParsedBallot]) -> TallyCliResult<()> {
    for pb in parsed_ballots.iter() {
        // Default of 1 if not specified
        let count = pb.count.unwrap_or(1);
        if count == 0 {
            warn!("add_ballots: ballot_id {:?}: skipping ballot with count 0", pb.id);
            continue;
        }
        ensure!(
            count <= MAX_BALLOT_COUNT,
            BallotCountTooLargeSnafu {
                id: pb.id.clone().unwrap_or_default(),
                count,
                max: MAX_BALLOT_COUNT,
            }
        );
        let vote = builder.add_vote_raw(&pb.groups).clone();
        debug!("add_ballots: ballot_id {:?}: {:?} x {}", pb.id, vote, count);
        for _ in 1..count {
            builder.add_vote_raw(vote.groups());
        }
    }
    Ok(())
}

fn build_summary_js(config: &TallyConfig, candidates: &[String], result: &TallyResult) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        date: config.output_settings.contest_date.clone(),
    };
    let mut js: JSMap<String, JSValue> = JSMap::new();
    js.insert("config".to_string(), json!(c));
    js.insert("candidates".to_string(), json!(candidates));
    js.insert("numBallots".to_string(), json!(result.num_ballots));
    js.insert(
        "preferences".to_string(),
        json!(result.preferences.to_rows()),
    );
    if let Some(paths) = &result.paths {
        js.insert("paths".to_string(), json!(paths.to_rows()));
    }
    if let Some(winner) = result.winner {
        js.insert("winner".to_string(), json!(winner));
        if let Some(name) = candidates.get(winner) {
            js.insert("winnerName".to_string(), json!(name));
        }
    }
    if let Some(ranking) = &result.ranking {
        js.insert("ranking".to_string(), json!(ranking.ranks()));
    }
    JSValue::Object(js)
}

/// Runs the election described by the configuration. The file sources are
/// relative to `root_path`.
///
/// If a reference summary is provided, the computed summary must match it.
pub fn run_election(
    config: &TallyConfig,
    root_path: &Path,
    check_summary_path: Option<String>,
) -> TallyCliResult<JSValue> {
    info!("config: {:?}", config);
    let rules = config.rules.tally_rules()?;

    if config.cvr_file_sources.is_empty() {
        whatever!("no file sources detected");
    }

    let candidates: Vec<String> = config.candidates.iter().map(|c| c.name.clone()).collect();
    let mut builder = Builder::new(&rules)
        .context(TallySnafu {})?
        .candidates(&candidates)
        .context(TallySnafu {})?;

    for cfs in config.cvr_file_sources.iter() {
        let parsed_ballots = read_ranking_data(root_path, cfs, &candidates)?;
        add_ballots(&mut builder, &parsed_ballots)?;
    }

    let result = builder.tally().context(TallySnafu {})?;
    info!(
        "Preferences:\n{}",
        result.preferences.ascii_table(&candidates)
    );
    if let Some(paths) = &result.paths {
        info!("Strongest paths:\n{}", paths.ascii_table(&candidates));
    }

    // Assemble the final json
    let result_js = build_summary_js(config, &candidates, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(result_js)
}

fn read_config(config_path: &str) -> TallyCliResult<(TallyConfig, PathBuf)> {
    let config_str = fs::read_to_string(config_path).context(OpeningFileSnafu {
        path: config_path.to_string(),
    })?;
    let config: TallyConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    let root_p = Path::new(config_path)
        .parent()
        .context(MissingParentDirSnafu {
            path: config_path.to_string(),
        })?;
    Ok((config, root_p.to_path_buf()))
}

/// Runs the program with the command line arguments.
///
/// The ballots come from the sources of the configuration file, or from
/// `--input` which replaces them. The candidates from `--choices` replace
/// the candidates of the configuration file.
pub fn run_cli(args: &Args) -> TallyCliResult<()> {
    let (mut config, config_root) = match &args.config {
        Some(config_path) => {
            let (config, root) = read_config(config_path)?;
            (config, Some(root))
        }
        None => {
            if args.input.is_none() {
                whatever!("Either --config or --input must be provided");
            }
            let config = TallyConfig {
                output_settings: OutputSettings {
                    contest_name: "unknown".to_string(),
                    contest_date: None,
                    output_file: None,
                },
                cvr_file_sources: Vec::new(),
                candidates: Vec::new(),
                rules: ConfigRules::default(),
            };
            (config, None)
        }
    };

    if let Some(choices) = &args.choices {
        config.candidates = choices
            .iter()
            .map(|name| ConfigCandidate { name: name.clone() })
            .collect();
    }
    if config.candidates.is_empty() {
        whatever!("No candidates provided: use --choices or the candidates of the configuration");
    }

    // Command line paths are relative to the current directory.
    let sources_root: PathBuf = match &args.input {
        Some(input) => {
            let provider = args.input_type.clone().unwrap_or_else(|| "csv".to_string());
            config.cvr_file_sources = vec![FileSource::new(&provider, input)];
            PathBuf::new()
        }
        None => config_root.clone().unwrap_or_default(),
    };

    let result_js = run_election(&config, &sources_root, args.reference.clone())?;
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    let out_path: Option<PathBuf> = match (&args.out, &config.output_settings.output_file) {
        (Some(out), _) if out == "stdout" => None,
        (Some(out), _) => Some(PathBuf::from(out)),
        (None, Some(out)) => Some(config_root.unwrap_or_default().join(out)),
        (None, None) => None,
    };
    match out_path {
        Some(p) => {
            let path = p.display().to_string();
            info!("Writing summary to {}", path);
            fs::write(&p, pretty_js_stats).context(WritingFileSnafu { path })?;
        }
        None => {
            println!("{}", pretty_js_stats);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snafu::ErrorCompat;

    fn run_election_test(test_name: &str, config_lpath: &str, summary_lpath: &str) {
        let test_dir = format!("{}/tests", env!("CARGO_MANIFEST_DIR"));
        info!("Running test {}", test_name);
        let res = read_config(&format!("{}/{}/{}", test_dir, test_name, config_lpath)).and_then(
            |(config, root)| {
                run_election(
                    &config,
                    &root,
                    Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
                )
            },
        );
        if let Err(e) = res {
            eprintln!("An error occured {}", e);
            if let Some(bt) = ErrorCompat::backtrace(&e) {
                eprintln!("trace: {}", bt);
            }
            panic!("test {} failed: {:?}", test_name, e);
        }
    }

    fn test_wrapper(test_name: &str) {
        run_election_test(
            test_name,
            format!("{}_config.json", test_name).as_str(),
            format!("{}_expected_summary.json", test_name).as_str(),
        )
    }

    fn test_args() -> Args {
        Args {
            config: None,
            reference: None,
            out: None,
            input: None,
            input_type: None,
            choices: None,
            verbose: false,
        }
    }

    #[test]
    fn schulze_wikipedia() {
        let _ = env_logger::try_init();
        test_wrapper("schulze_wikipedia");
    }

    #[test]
    fn cycle_text() {
        test_wrapper("cycle_text");
    }

    #[test]
    fn json_groups() {
        test_wrapper("json_groups");
    }

    #[test]
    fn input_with_choices() {
        let dir = format!("{}/tests/cycle_text", env!("CARGO_MANIFEST_DIR"));
        let args = Args {
            input: Some(format!("{}/ballots.txt", dir)),
            input_type: Some("text".to_string()),
            choices: Some(vec!["A".to_string(), "B".to_string(), "C".to_string()]),
            out: Some("stdout".to_string()),
            ..test_args()
        };
        assert!(run_cli(&args).is_ok());
    }

    #[test]
    fn missing_input() {
        assert!(run_cli(&test_args()).is_err());
        let args = Args {
            input: Some("ballots.csv".to_string()),
            ..test_args()
        };
        // No candidates
        assert!(run_cli(&args).is_err());
    }

    #[test]
    fn unknown_provider() {
        let dir = format!("{}/tests/cycle_text", env!("CARGO_MANIFEST_DIR"));
        let args = Args {
            input: Some(format!("{}/ballots.txt", dir)),
            input_type: Some("xlsx".to_string()),
            choices: Some(vec!["A".to_string()]),
            ..test_args()
        };
        assert!(matches!(
            run_cli(&args),
            Err(TallyCliError::UnknownProvider { .. })
        ));
    }

    #[test]
    fn reference_mismatch() {
        let dir = format!("{}/tests", env!("CARGO_MANIFEST_DIR"));
        let (config, root) =
            read_config(&format!("{}/cycle_text/cycle_text_config.json", dir)).unwrap();
        let res = run_election(
            &config,
            &root,
            Some(format!(
                "{}/json_groups/json_groups_expected_summary.json",
                dir
            )),
        );
        assert!(matches!(res, Err(TallyCliError::Whatever { .. })));
    }

    #[test]
    fn counts_are_expanded() {
        let mut builder = Builder::new(&TallyRules::DEFAULT_RULES)
            .unwrap()
            .candidates(&["A".to_string(), "B".to_string()])
            .unwrap();
        let ballots = vec![
            ParsedBallot {
                id: None,
                count: Some(3),
                groups: vec![vec![1]],
            },
            ParsedBallot {
                id: None,
                count: Some(0),
                groups: vec![vec![0]],
            },
            ParsedBallot {
                id: None,
                count: None,
                groups: vec![vec![0, 1]],
            },
        ];
        add_ballots(&mut builder, &ballots).unwrap();
        assert_eq!(builder.ballots().len(), 4);
        let res = builder.tally().unwrap();
        assert_eq!(res.preferences.to_rows(), vec![vec![0, 0], vec![3, 0]]);
        assert_eq!(res.winner, Some(1));
    }

    #[test]
    fn oversized_count_is_rejected() {
        let mut builder = Builder::new(&TallyRules::DEFAULT_RULES)
            .unwrap()
            .candidates(&["A".to_string(), "B".to_string()])
            .unwrap();
        let ballots = vec![
            ParsedBallot {
                id: Some("ok".to_string()),
                count: Some(3),
                groups: vec![vec![0]],
            },
            ParsedBallot {
                id: Some("typo".to_string()),
                count: Some(4_500_000_000),
                groups: vec![vec![1]],
            },
        ];
        let res = add_ballots(&mut builder, &ballots);
        match res {
            Err(TallyCliError::BallotCountTooLarge { id, count, max }) => {
                assert_eq!(id, "typo");
                assert_eq!(count, 4_500_000_000);
                assert_eq!(max, MAX_BALLOT_COUNT);
            }
            x => panic!("unexpected result: {:?}", x),
        }
        // The ballots before the bad one were added.
        assert_eq!(builder.ballots().len(), 3);
    }
}
