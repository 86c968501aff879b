/*!

This is the long-form manual for `condorcet_voting` and the `tally` program.

## Methods

The ballots are first counted in a table of pairwise preferences:
`d[X,Y]` is the number of voters who prefer `X` over `Y`. Candidates in the
same group of a ballot are not preferred over each other.

- **Condorcet winner**: the candidate `X` such that `d[X,Y] > d[Y,X]` for
  every other candidate `Y`. There may be none.
- **Schulze winner**: when there is no Condorcet winner, the strength of a
  path between two candidates is the weakest of its strict majority links.
  `p[X,Y]` is the strength of the strongest path from `X` to `Y`, and the
  Condorcet winner of `p` is the Schulze winner. There may still be none, for
  example with a perfect cycle.
- **Ranking**: the candidates are ordered by the strongly connected components
  of the majority graph (with an edge `X -> Y` whenever `X` wins or ties
  against `Y`). Candidates that cannot be told apart share the same rank.

## Input formats

The following formats are supported by `tally`:
* `csv` Comma Separated Values
* `text` One ballot per paragraph
* `json` Candidate indices

### csv

Each column (in order) is considered to be a choice. The name of the choice
in the header is not significant. Candidates ranked equally can be put in the
same cell, separated with `;`.

```text
id,count,choice 1,choice 2,choice 3
id1,20,A,B,C
id2,20,A;C,B,
```

The `id` and `count` columns are optional. See the [Configuration section](#configuration)
on controling the optional rows and columns. A candidate that does not appear
on a ballot is ranked after all the candidates that do.

### text

Ballots are separated by an empty line. In a ballot, each line is a group of
candidates with the same preference, separated by commas. The first line is
the most preferred group.

```text
Anna
Clara, Bob

Bob
Anna
```

Names are not case sensitive. Unknown names are ignored.

### json

A list of ballots. Each ballot is either a list of groups of candidate
indices (starting at 0), or an object with an optional `id`, an optional
`count` and the groups under `rankGroups`:

```text
[
  [[0], [2, 1]],
  {"id": "b2", "count": 3, "rankGroups": [[1], [0]]}
]
```

## Configuration

`tally` accepts a configuration file in JSON:

```text
{
  "outputSettings": {
    "contestName": "Board election",
    "contestDate": "2024-03-01",
    "outputFile": "summary.json"
  },
  "cvrFileSources": [
    {
      "provider": "csv",
      "filePath": "ballots.csv",
      "firstVoteColumnIndex": 3,
      "firstVoteRowIndex": 2,
      "countColumnIndex": 2
    }
  ],
  "candidates": [{"name": "A"}, {"name": "B"}, {"name": "C"}],
  "rules": {"pathsMode": "whenNoWinner", "includeRanking": true}
}
```

FileSource:
 - `provider` (`csv`, `text` or `json`)
 - `filePath`: relative to the directory of the configuration file.
 - `firstVoteColumnIndex` (string or number, optional, default 1): the first
 column with a choice. Columns start at 1; Excel-style letters are accepted.
 - `firstVoteRowIndex` (string or number, optional, default 1): the first row
 with a ballot.
 - `countColumnIndex` (string or number, optional): the location of the column that
 indicates the counts. If not provided, every ballot will be assigned a count of 1.
 A count of 0 skips the ballot. A count above 1000000 is rejected, for csv and json
 ballots alike.

Rules:
 - `pathsMode`: `whenNoWinner` (default) only computes the strongest paths when
 there is no Condorcet winner, `always` always computes them.
 - `includeRanking` (default `true`): adds the full ranking to the summary.

 */
