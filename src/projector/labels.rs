//! Embedding point labels and the `metadata.tsv` file

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the projector label file
pub const METADATA_FILE: &str = "metadata.tsv";

/// Label(s) for each embedding point
#[derive(Debug, Clone, PartialEq)]
pub enum Labels {
    /// One label per point, written without a header
    List(Vec<String>),
    /// Several labelled columns per point, written with a header row
    Table(LabelTable),
}

impl Labels {
    /// Number of labelled points
    pub fn len(&self) -> usize {
        match self {
            Labels::List(labels) => labels.len(),
            Labels::Table(table) => table.rows().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the labels can be written one row per point
    ///
    /// List labels are written unquoted, so they must not contain line
    /// breaks. Table fields are quoted and may.
    pub fn validate(&self) -> Result<()> {
        if let Labels::List(labels) = self {
            if let Some(i) = labels.iter().position(|l| l.contains(['\n', '\r'])) {
                return Err(Error::InvalidParameter(format!(
                    "label {i} contains a line break; use a label table to keep it"
                )));
            }
        }
        Ok(())
    }
}

impl From<Vec<String>> for Labels {
    fn from(labels: Vec<String>) -> Self {
        Labels::List(labels)
    }
}

impl From<LabelTable> for Labels {
    fn from(table: LabelTable) -> Self {
        Labels::Table(table)
    }
}

/// Column-oriented labels with a header
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl LabelTable {
    /// Create a table; every row must have one value per column
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::InvalidParameter(
                "label table needs at least one column".to_string(),
            ));
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(Error::InvalidParameter(format!(
                "label row {i} has {} values, expected {}",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// Write `metadata.tsv` into `loc`
///
/// A label list is written one label per line with no header. A table is
/// written as tab-separated values with its header first.
///
/// Fails if a list label contains a line break, since that would shift
/// every following label off its embedding row.
pub fn write_metadata_tsv(loc: impl AsRef<Path>, data: &Labels) -> Result<PathBuf> {
    data.validate()?;
    let metadata_path = loc.as_ref().join(METADATA_FILE);
    debug!("Writing metadata.tsv to: {}", metadata_path.display());

    let mut output = String::new();
    match data {
        Labels::List(labels) => {
            for label in labels {
                output.push_str(label);
                output.push('\n');
            }
        }
        Labels::Table(table) => {
            push_tsv_row(&mut output, table.columns());
            for row in table.rows() {
                push_tsv_row(&mut output, row);
            }
        }
    }

    fs::write(&metadata_path, output)?;
    Ok(metadata_path)
}

/// Read a label file written by [`write_metadata_tsv`] (or by hand)
///
/// With `has_header` the first record names the columns and the result is a
/// table. Quoted fields may then hold tabs, doubled quotes and line breaks.
/// Otherwise every line is one label.
pub fn read_labels(path: impl AsRef<Path>, has_header: bool) -> Result<Labels> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    if !has_header {
        return Ok(Labels::List(content.lines().map(str::to_string).collect()));
    }

    let mut records = parse_tsv_records(&content)
        .map_err(|msg| Error::InvalidParameter(format!("label file {}: {msg}", path.display())))?
        .into_iter();
    let columns = records.next().ok_or_else(|| {
        Error::InvalidParameter(format!(
            "label file {} is empty but a header was expected",
            path.display()
        ))
    })?;
    Ok(Labels::Table(LabelTable::new(columns, records.collect())?))
}

fn push_tsv_row(output: &mut String, fields: &[String]) {
    let quoted: Vec<String> = fields.iter().map(|f| quote_field(f)).collect();
    output.push_str(&quoted.join("\t"));
    output.push('\n');
}

/// Quote a field only if it contains a separator, quote or line break
fn quote_field(field: &str) -> String {
    if field.contains(['\t', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split TSV content into records, honouring quoted fields
fn parse_tsv_records(content: &str) -> std::result::Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                c => field.push(c),
            }
            continue;
        }

        match c {
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            '\t' => {
                record.push(std::mem::take(&mut field));
                at_field_start = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                at_field_start = true;
            }
            c => {
                field.push(c);
                at_field_start = false;
            }
        }
    }

    if in_quotes {
        return Err(format!("unterminated quoted field in record {}", records.len()));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_write_list_one_label_per_line() {
        let dir = tempdir().unwrap();
        let labels = Labels::from(strings(&["a", "b", "c d"]));

        let path = write_metadata_tsv(dir.path(), &labels).unwrap();

        assert_eq!(path, dir.path().join("metadata.tsv"));
        assert_eq!(fs::read_to_string(path).unwrap(), "a\nb\nc d\n");
    }

    #[test]
    fn test_write_table_with_header() {
        let dir = tempdir().unwrap();
        let table = LabelTable::new(
            strings(&["name", "type"]),
            vec![strings(&["alice", "person"]), strings(&["acme", "org"])],
        )
        .unwrap();

        let path = write_metadata_tsv(dir.path(), &Labels::from(table)).unwrap();

        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "name\ttype\nalice\tperson\nacme\torg\n"
        );
    }

    #[test]
    fn test_table_fields_quoted_when_needed() {
        assert_eq!(quote_field("plain"), "plain");
        assert_eq!(quote_field("has\ttab"), "\"has\ttab\"");
        assert_eq!(quote_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_label_table_rejects_ragged_rows() {
        let result = LabelTable::new(
            strings(&["name", "type"]),
            vec![strings(&["alice", "person"]), strings(&["acme"])],
        );
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
        assert!(LabelTable::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_labels_len() {
        assert_eq!(Labels::from(strings(&["x", "y"])).len(), 2);
        let table = LabelTable::new(strings(&["c"]), vec![strings(&["1"])]).unwrap();
        assert_eq!(Labels::from(table).len(), 1);
        assert!(Labels::List(vec![]).is_empty());
    }

    #[test]
    fn test_read_labels_round_trip_table() {
        let dir = tempdir().unwrap();
        let table = LabelTable::new(
            strings(&["name", "note"]),
            vec![
                strings(&["alice", "says \"hi\""]),
                strings(&["bob", ""]),
                strings(&["carol", "x\ty"]),
                strings(&["dave", "two\nlines"]),
            ],
        )
        .unwrap();
        let labels = Labels::from(table);
        let path = write_metadata_tsv(dir.path(), &labels).unwrap();

        assert_eq!(read_labels(&path, true).unwrap(), labels);
    }

    #[test]
    fn test_read_labels_without_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        fs::write(&path, "one\ntwo\n").unwrap();

        assert_eq!(
            read_labels(&path, false).unwrap(),
            Labels::from(strings(&["one", "two"]))
        );
    }

    #[test]
    fn test_read_labels_empty_with_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.tsv");
        fs::write(&path, "").unwrap();

        assert!(read_labels(&path, true).is_err());
    }

    #[test]
    fn test_parse_tsv_records_quoted_fields() {
        let records = parse_tsv_records("a\t\"b\tc\"\r\n\"multi\nline\"\t\"\"\"q\"\"\"\n").unwrap();
        assert_eq!(
            records,
            vec![strings(&["a", "b\tc"]), strings(&["multi\nline", "\"q\""])]
        );
    }

    #[test]
    fn test_parse_tsv_records_unterminated_quote() {
        assert!(parse_tsv_records("a\t\"open\n").is_err());
    }

    #[test]
    fn test_list_label_with_line_break_rejected() {
        let dir = tempdir().unwrap();
        let labels = Labels::from(strings(&["ok", "bad\nlabel"]));

        assert!(matches!(labels.validate(), Err(Error::InvalidParameter(_))));
        assert!(write_metadata_tsv(dir.path(), &labels).is_err());
        assert!(!dir.path().join(METADATA_FILE).exists());
    }
}
