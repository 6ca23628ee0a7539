//! # Text Line Codec
//!
//! One record per line, fields in the order of a [`ColumnOrdering`].
//!
//! ## Stream Protocol
//!
//! ```text
//! #score name          <- optional header: first non-blank line only
//! 3.500 Alice          <- data line: exactly len(input ordering) tokens
//!                      <- blank lines are skipped
//! # a comment          <- later marker lines are skipped
//! 1.250 "Bob Smith"    <- quoted tokens keep their whitespace
//! ```
//!
//! A header replaces the input ordering for the rest of *that* stream only.
//! Names in a header may be separated by commas or whitespace and must cover
//! every mandatory column. The override lives in the [`TextReader`], never in
//! the table definition, so it cannot leak into a later read or race with a
//! concurrent one.
//!
//! Columns absent from the input ordering are `NotAvailable` in every decoded
//! record. A line with the wrong number of tokens or an unparsable token fails
//! the read; errors carry the 1-based line number as context.
//!
//! ## Tokenization
//!
//! With a whitespace delimiter (the default), a line splits on runs of
//! whitespace. A token wrapped in matching `"` or `'` is one token with the
//! quotes removed, and a bare `,` token is ignored. With any other delimiter
//! the line is split on that delimiter and each token is trimmed.
//!
//! ## Output
//!
//! Each output column is rendered through its format specifier and joined with
//! the delimiter. With a whitespace delimiter, rendered text that would not
//! survive tokenization (empty, containing whitespace, a lone comma, or
//! starting with a quote) is quoted. Under any delimiter, text starting with
//! the comment marker is quoted so its line is not taken for a comment.
//!
//! The quote mark is `"` unless some `"` inside the text is followed by
//! whitespace, which would end the token early; `'` is tried next under the
//! same rule. Text that defeats both marks cannot be written.

use std::io::{BufRead, Write};
use std::sync::Arc;

use eyre::{bail, Result, WrapErr};
use hashbrown::HashSet;
use smallvec::smallvec;
use tracing::{debug, trace};

use super::field::FieldCodec;
use crate::config::TextOptions;
use crate::error::RowError;
use crate::record::{FieldValues, Record};
use crate::schema::{ColumnOrdering, TableDef};
use crate::types::{FieldType, FieldValue};

/// Decodes one data line using `ordering`'s input sequence.
pub fn parse_line(
    table: &Arc<TableDef>,
    ordering: &ColumnOrdering,
    options: &TextOptions,
    line: &str,
) -> Result<Record> {
    let tokens = tokenize(line, options);
    let input = ordering.input();
    if tokens.len() != input.len() {
        bail!(RowError::TokenCount {
            expected: input.len(),
            actual: tokens.len(),
        });
    }

    let mut values: FieldValues = smallvec![FieldValue::NotAvailable; table.len()];
    for (token, &idx) in tokens.iter().zip(input) {
        values[idx] = FieldCodec::new(&table.columns()[idx]).parse(token)?;
    }
    Ok(Record::from_decoded(table, values))
}

/// Encodes one record using `ordering`'s output sequence. No line terminator.
///
/// Text that would not read back as a single token is quoted. Fails only for
/// whitespace-delimited text that both quote marks would cut short.
pub fn format_line(
    record: &Record,
    ordering: &ColumnOrdering,
    options: &TextOptions,
) -> Result<String> {
    let table = record.table();
    let mut line = String::new();
    for (n, &idx) in ordering.output().iter().enumerate() {
        if n > 0 {
            line.push_str(options.delimiter());
        }
        let column = &table.columns()[idx];
        let rendered = FieldCodec::new(column).format(&record.values()[idx]);
        if column.field_type() == FieldType::Text && needs_quotes(&rendered, options) {
            let mark = match quote_mark(&rendered) {
                Some(mark) => mark,
                None if !options.splits_on_whitespace() => '"',
                None => bail!(RowError::Unquotable {
                    column: column.name().to_string(),
                    value: rendered,
                }),
            };
            line.push(mark);
            line.push_str(&rendered);
            line.push(mark);
        } else {
            line.push_str(&rendered);
        }
    }
    Ok(line)
}

/// Header line listing the output columns: the comment marker followed by the
/// names joined with the delimiter.
pub fn header_line(table: &TableDef, ordering: &ColumnOrdering, options: &TextOptions) -> String {
    let mut header = String::new();
    header.push(options.comment_marker());
    header.push_str(&ordering.output_names(table.registry()).join(options.delimiter()));
    header
}

/// Writes a header line and one line per record.
pub fn write_records<'a, W: Write>(
    table: &TableDef,
    ordering: &ColumnOrdering,
    options: &TextOptions,
    records: impl IntoIterator<Item = &'a Record>,
    out: &mut W,
) -> Result<usize> {
    writeln!(out, "{}", header_line(table, ordering, options)).map_err(RowError::from)?;
    let mut written = 0;
    for record in records {
        Record::ensure_kind(table, [record])?;
        let line = format_line(record, ordering, options)?;
        writeln!(out, "{}", line).map_err(RowError::from)?;
        written += 1;
    }
    out.flush().map_err(RowError::from)?;
    Ok(written)
}

/// Reads every record of a stream using the table's default ordering.
pub fn read_records<R: BufRead>(table: &Arc<TableDef>, input: R) -> Result<Vec<Record>> {
    TextReader::new(table, input).collect()
}

/// Reads every record of a stream into a set, dropping duplicate rows.
pub fn read_record_set<R: BufRead>(table: &Arc<TableDef>, input: R) -> Result<HashSet<Record>> {
    TextReader::new(table, input).collect()
}

/// Streaming reader over a text source.
pub struct TextReader<R> {
    table: Arc<TableDef>,
    input: R,
    ordering: ColumnOrdering,
    options: TextOptions,
    line: String,
    line_no: usize,
    seen_content: bool,
}

impl<R: BufRead> TextReader<R> {
    /// Creates a reader using a snapshot of the table's default ordering.
    pub fn new(table: &Arc<TableDef>, input: R) -> Self {
        Self {
            table: Arc::clone(table),
            input,
            ordering: table.ordering(),
            options: TextOptions::default(),
            line: String::new(),
            line_no: 0,
            seen_content: false,
        }
    }

    pub fn with_ordering(mut self, ordering: ColumnOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_options(mut self, options: TextOptions) -> Self {
        self.options = options;
        self
    }

    /// Ordering in effect for the next data line.
    pub fn ordering(&self) -> &ColumnOrdering {
        &self.ordering
    }

    pub fn line_number(&self) -> usize {
        self.line_no
    }

    pub fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            self.line.clear();
            let read = self
                .input
                .read_line(&mut self.line)
                .map_err(RowError::from)
                .wrap_err_with(|| format!("reading line {}", self.line_no + 1))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = self.line.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }

            let first = !self.seen_content;
            self.seen_content = true;
            if let Some(rest) = line.trim_start().strip_prefix(self.options.comment_marker()) {
                if first {
                    let header = rest.to_string();
                    self.apply_header(&header)?;
                }
                continue;
            }

            trace!(table = %self.table.name(), line = self.line_no, "decoding text line");
            let record = parse_line(&self.table, &self.ordering, &self.options, line)
                .wrap_err_with(|| format!("line {}", self.line_no))?;
            return Ok(Some(record));
        }
    }

    fn apply_header(&mut self, rest: &str) -> Result<()> {
        let spaced = rest.replace(',', " ");
        let names: Vec<&str> = spaced.split_whitespace().collect();
        if names.is_empty() {
            return Ok(());
        }
        self.ordering = self
            .ordering
            .with_input(self.table.registry(), &names)
            .wrap_err_with(|| format!("header on line {}", self.line_no))?;
        debug!(
            table = %self.table.name(),
            columns = ?names,
            "text header overrides input ordering"
        );
        Ok(())
    }
}

impl<R: BufRead> Iterator for TextReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

impl Record {
    /// Decodes a data line with the table's default ordering and options.
    pub fn from_text_line(table: &Arc<TableDef>, line: &str) -> Result<Record> {
        parse_line(table, &table.ordering(), &TextOptions::default(), line)
    }

    /// Encodes with the table's default output ordering and options.
    pub fn to_text_line(&self) -> Result<String> {
        format_line(self, &self.table().ordering(), &TextOptions::default())
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_text_line() {
            Ok(line) => f.write_str(&line),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

pub(crate) fn tokenize(line: &str, options: &TextOptions) -> Vec<String> {
    if !options.splits_on_whitespace() {
        return line
            .split(options.delimiter())
            .map(|token| unquote(token.trim()).to_string())
            .collect();
    }

    let mut tokens = Vec::new();
    let mut rest = line.trim_start();
    while !rest.is_empty() {
        let (token, quoted, remainder) = next_token(rest);
        if quoted || token != "," {
            tokens.push(token.to_string());
        }
        rest = remainder.trim_start();
    }
    tokens
}

/// Splits the next whitespace-delimited token off `s`, which starts with a
/// non-whitespace character. Returns the token, whether it was quoted, and the
/// unconsumed remainder.
fn next_token(s: &str) -> (&str, bool, &str) {
    let first = s.chars().next().unwrap_or(' ');
    if first == '"' || first == '\'' {
        let body = &s[1..];
        let mut search = 0;
        while let Some(pos) = body[search..].find(first) {
            let end = search + pos;
            let after = &body[end + 1..];
            if after.is_empty() || after.starts_with(char::is_whitespace) {
                return (&body[..end], true, after);
            }
            search = end + 1;
        }
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    (&s[..end], false, &s[end..])
}

fn unquote(token: &str) -> &str {
    for mark in ['"', '\''] {
        if token.len() >= 2 && token.starts_with(mark) && token.ends_with(mark) {
            return &token[1..token.len() - 1];
        }
    }
    token
}

fn needs_quotes(rendered: &str, options: &TextOptions) -> bool {
    let content = rendered.trim();
    if content.starts_with(options.comment_marker()) {
        return true;
    }
    options.splits_on_whitespace()
        && (content.is_empty()
            || content == ","
            || content.contains(char::is_whitespace)
            || content.starts_with(['"', '\'']))
}

/// First quote mark that `next_token` cannot mistake for the closing one:
/// no occurrence inside `rendered` may be followed by whitespace.
fn quote_mark(rendered: &str) -> Option<char> {
    ['"', '\''].into_iter().find(|&mark| {
        rendered
            .match_indices(mark)
            .all(|(i, _)| !rendered[i + 1..].starts_with(char::is_whitespace))
    })
}
