// Ballots written as text, separated by empty lines.

use condorcet_voting::builder::parse_vote;

use crate::tally::io_common::make_default_id;
use crate::tally::*;

pub fn read_text_ranking(path: String, candidates: &[String]) -> TallyCliResult<Vec<ParsedBallot>> {
    let contents = fs::read_to_string(&path).context(OpeningFileSnafu { path: path.clone() })?;
    Ok(parse_text_ballots(&path, &contents, candidates))
}

fn parse_text_ballots(path: &str, contents: &str, candidates: &[String]) -> Vec<ParsedBallot> {
    let default_id = make_default_id(path);
    // (line where the ballot starts, lines of the ballot)
    let mut blocks: Vec<(usize, Vec<&str>)> = Vec::new();
    let mut in_block = false;
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            in_block = false;
            continue;
        }
        if !in_block {
            blocks.push((idx + 1, Vec::new()));
            in_block = true;
        }
        if let Some((_, block)) = blocks.last_mut() {
            block.push(line);
        }
    }

    blocks
        .into_iter()
        .map(|(start, block)| {
            let groups = parse_vote(candidates, &block.join("\n"));
            debug!("read_text_ranking: line {}: groups: {:?}", start, groups);
            ParsedBallot {
                id: Some(default_id(start)),
                count: None,
                groups,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks() {
        let c: Vec<String> = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let text = "\nA\nB, c\n\n\n  \nC\r\nA\n\nnobody\n";
        let res = parse_text_ballots("x.txt", text, &c);
        assert_eq!(res.len(), 3);
        assert_eq!(res[0].groups, vec![vec![0], vec![1, 2]]);
        assert_eq!(res[0].id, Some("x.txt-00000002".to_string()));
        assert_eq!(res[1].groups, vec![vec![2], vec![0]]);
        assert_eq!(res[1].id, Some("x.txt-00000007".to_string()));
        // A ballot with only unknown names is blank.
        assert!(res[2].groups.is_empty());
        assert!(parse_text_ballots("x.txt", "", &c).is_empty());
    }
}
