use crate::tally::*;

use condorcet_voting::{PathsMode, TallyRules};
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
}

/// The header of the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstVoteColumnIndex")]
    _first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    _first_vote_row_index: Option<JSValue>,
    #[serde(rename = "countColumnIndex")]
    _count_column_index: Option<JSValue>,
}

impl FileSource {
    /// A source with all the indices left to their defaults.
    pub fn new(provider: &str, file_path: &str) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            _first_vote_column_index: None,
            _first_vote_row_index: None,
            _count_column_index: None,
        }
    }

    /// The first column with a choice, starting at 0.
    pub fn first_vote_column_index(&self) -> TallyCliResult<usize> {
        let x = read_js_int(&self._first_vote_column_index)?.unwrap_or(1);
        Ok(x - 1)
    }

    /// The first row with a ballot, starting at 0.
    pub fn first_vote_row_index(&self) -> TallyCliResult<usize> {
        let x = read_js_int(&self._first_vote_row_index)?.unwrap_or(1);
        Ok(x - 1)
    }

    pub fn count_column_index(&self) -> TallyCliResult<Option<usize>> {
        let x = read_js_int(&self._count_column_index)?;
        Ok(x.map(|x| x - 1))
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCandidate {
    pub name: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigRules {
    #[serde(rename = "pathsMode")]
    pub paths_mode: Option<String>,
    #[serde(rename = "includeRanking")]
    pub include_ranking: Option<bool>,
}

impl ConfigRules {
    pub fn tally_rules(&self) -> TallyCliResult<TallyRules> {
        let paths_mode = match self.paths_mode.as_deref() {
            None | Some("whenNoWinner") => PathsMode::WhenNoCondorcetWinner,
            Some("always") => PathsMode::Always,
            Some(x) => whatever!("unknown paths mode: {}", x),
        };
        Ok(TallyRules {
            paths_mode,
            include_ranking: self
                .include_ranking
                .unwrap_or(TallyRules::DEFAULT_RULES.include_ranking),
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TallyConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "cvrFileSources")]
    pub cvr_file_sources: Vec<FileSource>,
    pub candidates: Vec<ConfigCandidate>,
    #[serde(default)]
    pub rules: ConfigRules,
}

pub fn read_summary(path: String) -> TallyCliResult<JSValue> {
    let contents = fs::read_to_string(path.clone()).context(OpeningFileSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Reads a 1-based index, written as a number, a string with a number, or
/// Excel-style column letters (A = 1, Z = 26, AA = 27).
fn read_js_int(x: &Option<JSValue>) -> TallyCliResult<Option<usize>> {
    let res = match x {
        None | Some(JSValue::Null) => return Ok(None),
        Some(JSValue::Number(n)) => n.as_u64().map(|x| x as usize),
        Some(JSValue::String(s))
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            s.to_ascii_lowercase().chars().try_fold(0_usize, |acc, c| {
                acc.checked_mul(26)?
                    .checked_add((c as usize) - ('a' as usize) + 1)
            })
        }
        Some(JSValue::String(s)) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    match res {
        Some(x) if x >= 1 => Ok(Some(x)),
        _ => ParsingJsonNumberSnafu {
            value: format!("{:?}", x),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn js_int() {
        assert_eq!(read_js_int(&None).unwrap(), None);
        assert_eq!(read_js_int(&Some(json!(3))).unwrap(), Some(3));
        assert_eq!(read_js_int(&Some(json!("12"))).unwrap(), Some(12));
        assert_eq!(read_js_int(&Some(json!("A"))).unwrap(), Some(1));
        assert_eq!(read_js_int(&Some(json!("c"))).unwrap(), Some(3));
        assert_eq!(read_js_int(&Some(json!("AA"))).unwrap(), Some(27));
        assert!(read_js_int(&Some(json!(0))).is_err());
        assert!(read_js_int(&Some(json!(-2))).is_err());
        assert!(read_js_int(&Some(json!("1a"))).is_err());
        assert!(read_js_int(&Some(json!([1]))).is_err());
    }

    #[test]
    fn read_config() {
        let js = json!({
            "outputSettings": {"contestName": "test"},
            "cvrFileSources": [{
                "provider": "csv",
                "filePath": "ballots.csv",
                "firstVoteColumnIndex": "C",
                "countColumnIndex": 2
            }],
            "candidates": [{"name": "A"}, {"name": "B"}]
        });
        let config: TallyConfig = serde_json::from_value(js).unwrap();
        assert_eq!(config.rules, ConfigRules::default());
        assert_eq!(config.rules.tally_rules().unwrap(), TallyRules::DEFAULT_RULES);
        let cfs = &config.cvr_file_sources[0];
        assert_eq!(cfs.first_vote_column_index().unwrap(), 2);
        assert_eq!(cfs.first_vote_row_index().unwrap(), 0);
        assert_eq!(cfs.count_column_index().unwrap(), Some(1));
    }

    #[test]
    fn rules() {
        let r = ConfigRules {
            paths_mode: Some("always".to_string()),
            include_ranking: Some(false),
        };
        assert_eq!(
            r.tally_rules().unwrap(),
            TallyRules {
                paths_mode: PathsMode::Always,
                include_ranking: false
            }
        );
        let r = ConfigRules {
            paths_mode: Some("sometimes".to_string()),
            include_ranking: None,
        };
        assert!(r.tally_rules().is_err());
    }
}
