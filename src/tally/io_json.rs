// Ballots given directly as candidate indices.

use serde::Deserialize;

use crate::tally::io_common::make_default_id;
use crate::tally::*;

#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
#[serde(untagged)]
enum JsonBallot {
    Groups(Vec<Vec<CandidateIndex>>),
    Detailed {
        id: Option<String>,
        count: Option<u64>,
        #[serde(rename = "rankGroups")]
        rank_groups: Vec<Vec<CandidateIndex>>,
    },
}

pub fn read_json_ranking(path: String) -> TallyCliResult<Vec<ParsedBallot>> {
    let contents = fs::read_to_string(&path).context(OpeningFileSnafu { path: path.clone() })?;
    parse_json_ballots(&path, &contents)
}

fn parse_json_ballots(path: &str, contents: &str) -> TallyCliResult<Vec<ParsedBallot>> {
    let default_id = make_default_id(path);
    let ballots: Vec<JsonBallot> = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    let res = ballots
        .into_iter()
        .enumerate()
        .map(|(idx, jb)| match jb {
            JsonBallot::Groups(groups) => ParsedBallot {
                id: Some(default_id(idx + 1)),
                count: None,
                groups,
            },
            JsonBallot::Detailed {
                id,
                count,
                rank_groups,
            } => ParsedBallot {
                id: id.or_else(|| Some(default_id(idx + 1))),
                count,
                groups: rank_groups,
            },
        })
        .collect();
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_shapes() {
        let text = r#"[
            [[0], [2, 1]],
            {"id": "b2", "count": 3, "rankGroups": [[1], [0]]},
            {"rankGroups": []}
        ]"#;
        let res = parse_json_ballots("b.json", text).unwrap();
        assert_eq!(res.len(), 3);
        assert_eq!(res[0].id, Some("b.json-00000001".to_string()));
        assert_eq!(res[0].count, None);
        assert_eq!(res[0].groups, vec![vec![0], vec![2, 1]]);
        assert_eq!(res[1].id, Some("b2".to_string()));
        assert_eq!(res[1].count, Some(3));
        assert_eq!(res[2].id, Some("b.json-00000003".to_string()));
        assert!(res[2].groups.is_empty());
    }

    #[test]
    fn bad_json() {
        assert!(parse_json_ballots("b.json", r#"[{"count": 2}]"#).is_err());
        assert!(parse_json_ballots("b.json", "[[0]]").is_err());
    }
}
