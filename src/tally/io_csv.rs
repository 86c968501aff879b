// Primitives for reading CSV files.

use std::fs::File;

use crate::tally::io_common::{make_default_id, resolve_group};
use crate::tally::*;

/// Reads one ballot per row. Each choice column holds the candidates of one
/// group, separated by `;`. Empty cells are skipped.
pub fn read_csv_ranking(
    path: String,
    cfs: &FileSource,
    candidates: &[String],
) -> TallyCliResult<Vec<ParsedBallot>> {
    let default_id = make_default_id(&path);

    let choices_start_col = cfs.first_vote_column_index()?;
    let count_idx_o = cfs.count_column_index()?;

    let mut res: Vec<ParsedBallot> = Vec::new();
    let (records, row_offset) = get_records(&path, cfs)?;

    for (idx, line_r) in records.enumerate() {
        let lineno = idx + row_offset + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let id = default_id(lineno);

        let count: Option<u64> = match count_idx_o {
            Some(count_idx) => {
                let content = line
                    .get(count_idx)
                    .context(CsvLineTooShortSnafu { lineno })?
                    .trim();
                let count = content.parse::<u64>().ok().context(CsvCountSnafu {
                    lineno,
                    content: content.to_string(),
                })?;
                Some(count)
            }
            None => None,
        };

        let mut groups: Vec<Vec<CandidateIndex>> = Vec::new();
        for cell in line.iter().skip(choices_start_col) {
            let names: Vec<&str> = cell
                .split(';')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect();
            if names.is_empty() {
                continue;
            }
            let group = resolve_group(candidates, &names, &id);
            if !group.is_empty() {
                groups.push(group);
            }
        }
        debug!("read_csv_ranking: lineno: {:?} groups: {:?}", lineno, &groups);

        res.push(ParsedBallot {
            id: Some(id),
            count,
            groups,
        });
    }
    Ok(res)
}

fn get_records(
    path: &String,
    cfs: &FileSource,
) -> TallyCliResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let first_row = cfs.first_vote_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path: path.clone() })?;
    let mut records = rdr.into_records();
    for _ in 0..first_row {
        _ = records.next();
    }
    Ok((records, first_row))
}
