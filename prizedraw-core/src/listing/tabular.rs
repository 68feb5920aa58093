use super::{ListingFormat, LoadReport, ReportBuilder};
use crate::error::{PrizeError, Result};

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Parse a header-led listing. Blank and `#` lines are dropped before rows
/// are numbered, so the header is row 1 and the first data row is row 2.
/// A record whose quoted field spans several lines counts as one row.
pub fn parse(text: &str) -> Result<LoadReport> {
    let mut rows = records(text).into_iter();

    let header = rows.next().ok_or_else(|| {
        PrizeError::format("listing is empty, expected a header with 'name' and 'quantity'")
    })?;
    let (name_col, quantity_col) = header_columns(&header).ok_or_else(|| {
        PrizeError::format(format!(
            "header must contain 'name' and 'quantity' columns, found: {}",
            header.trim()
        ))
    })?;

    let mut builder = ReportBuilder::new(ListingFormat::Tabular);
    for (offset, record) in rows.enumerate() {
        let fields = split_fields(&record);
        builder.push_row(
            offset + 2,
            fields.get(name_col).map(String::as_str),
            fields.get(quantity_col).map(String::as_str),
        );
    }

    Ok(builder.finish())
}

/// Column positions of `name` and `quantity` if `line` is a usable header.
pub(crate) fn header_columns(line: &str) -> Option<(usize, usize)> {
    let columns: Vec<String> = split_fields(line)
        .iter()
        .map(|c| c.trim().to_lowercase())
        .collect();

    let name = columns.iter().position(|c| c == "name")?;
    let quantity = columns.iter().position(|c| c == "quantity")?;
    Some((name, quantity))
}

/// Group physical lines into records. Blank and `#` lines are skipped
/// unless they sit inside an open quoted field.
fn records(text: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut pending: Option<String> = None;

    for line in text.lines() {
        let record = match pending.take() {
            Some(mut open) => {
                open.push('\n');
                open.push_str(line);
                open
            }
            None if line.trim().is_empty() || line.starts_with('#') => continue,
            None => line.to_string(),
        };

        if tokenize(&record).1 {
            pending = Some(record);
        } else {
            records.push(record);
        }
    }

    // An unterminated quote runs to the end of the text.
    records.extend(pending);
    records
}

/// Split one record on commas. A field opened with `"` may contain commas
/// and line breaks, and `""` stands for a literal quote.
pub(crate) fn split_fields(record: &str) -> Vec<String> {
    tokenize(record).0
}

/// Fields of `record`, and whether it ends inside an open quoted field.
fn tokenize(record: &str) -> (Vec<String>, bool) {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = record.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            QUOTE if in_quotes => {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    field.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            }
            QUOTE if field.is_empty() => in_quotes = true,
            DELIMITER if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);

    (fields, in_quotes)
}
