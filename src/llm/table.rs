//! Pipe-delimited table parsing and rendering.
//!
//! The completion API is asked for a table like
//!
//! ```text
//! 영어 단어 | 유의어1 | 유의어2 | 유의어3 | 한국어 의미
//! happy | joyful | cheerful | glad | 행복한
//! ```
//!
//! [`parse_table`] keeps every line holding a `|`, drops the first one as the
//! header and splits the rest. No arity check is made: a prose line that
//! happens to contain a pipe becomes a row of its own.

/// One parsed table line, cells already trimmed.
pub type TableRow = Vec<String>;

/// Header line requested in the synonym prompt and printed by the CLI.
pub const TABLE_HEADER: &str = "영어 단어 | 유의어1 | 유의어2 | 유의어3 | 한국어 의미";

/// Width of the underscore rule printed below [`TABLE_HEADER`].
pub const RULE_WIDTH: usize = 60;

const CELL_SEPARATOR: &str = " | ";

/// Extract the data rows of the first pipe-delimited table in `text`.
///
/// Returns an empty vector when fewer than two lines contain a pipe.
///
/// ```rust
/// use passage_quiz::llm::parse_table;
///
/// let rows = parse_table("h1|h2|h3\na|b|c\nd|e|f\nnoise without pipe\n");
/// assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
/// ```
pub fn parse_table(text: &str) -> Vec<TableRow> {
    text.lines()
        .filter(|line| line.contains('|'))
        .skip(1)
        .map(|line| line.split('|').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

/// Join `rows` back into table lines under `header`.
///
/// `parse_table(&render_rows(header, &rows)) == rows` for any rows produced
/// by [`parse_table`].
pub fn render_rows(header: &str, rows: &[TableRow]) -> String {
    let mut out = String::from(header);
    out.push('\n');
    for row in rows {
        out.push_str(&row.join(CELL_SEPARATOR));
        out.push('\n');
    }
    out
}

/// CLI printout: header, an underscore rule, one line per row.
pub fn render_table(rows: &[TableRow]) -> String {
    let mut out = String::with_capacity(64 * (rows.len() + 2));
    out.push_str(TABLE_HEADER);
    out.push('\n');
    out.push_str(&"_".repeat(RULE_WIDTH));
    out.push('\n');
    for row in rows {
        out.push_str(&row.join(CELL_SEPARATOR));
        out.push('\n');
    }
    out
}
