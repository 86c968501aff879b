use std::path::Path;

use condorcet_voting::builder::find_candidate;
use condorcet_voting::CandidateIndex;
use log::warn;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Ids of the form `<file name>-<line number>` for sources without an id column.
pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Looks up the names of one group of candidates. Unknown names are dropped.
pub fn resolve_group(
    candidates: &[String],
    names: &[&str],
    ballot_id: &str,
) -> Vec<CandidateIndex> {
    let mut group: Vec<CandidateIndex> = Vec::new();
    for name in names.iter() {
        match find_candidate(candidates, name) {
            Some(idx) => group.push(idx as CandidateIndex),
            None => {
                warn!(
                    "resolve_group: ballot_id {}: skipping unknown candidate {:?}",
                    ballot_id, name
                );
            }
        }
    }
    group
}
