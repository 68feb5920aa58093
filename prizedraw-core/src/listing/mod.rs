//! Prize listing loader.
//!
//! Two listing generations are accepted and mapped onto one [`Inventory`]:
//! the legacy `name,quantity` text file and the tabular file with a header
//! row. Malformed rows are collected as [`RowError`]s and skipped, a listing
//! whose structure is unusable fails the whole load with
//! [`PrizeError::Format`].

pub mod legacy;
pub mod tabular;

use crate::error::{PrizeError, Result, RowError, RowErrorKind};
use crate::inventory::Inventory;
use crate::types::PrizeEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingFormat {
    /// One `name,quantity` pair per line, no header.
    Legacy,
    /// Header row naming `name` and `quantity`, `#` comment lines.
    Tabular,
}

impl ListingFormat {
    /// Pick a format from the file extension, falling back to sniffing the
    /// first meaningful line for a `name`/`quantity` header.
    pub fn detect(path: &Path, text: &str) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => return Self::Tabular,
            Some("txt") => return Self::Legacy,
            _ => {}
        }

        let first = strip_bom(text)
            .lines()
            .find(|line| !line.trim().is_empty() && !line.starts_with('#'));

        match first {
            Some(line) if tabular::header_columns(line).is_some() => Self::Tabular,
            _ => Self::Legacy,
        }
    }
}

impl fmt::Display for ListingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Tabular => write!(f, "tabular"),
        }
    }
}

impl FromStr for ListingFormat {
    type Err = PrizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "legacy" | "txt" => Ok(Self::Legacy),
            "tabular" | "csv" => Ok(Self::Tabular),
            _ => Err(PrizeError::config(format!(
                "Invalid listing format: {}. Supported formats: legacy, tabular",
                s
            ))),
        }
    }
}

/// Outcome of a successful load: the usable inventory plus every
/// recoverable problem found on the way.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub format: ListingFormat,
    pub inventory: Inventory,
    pub errors: Vec<RowError>,
    pub duplicates: Vec<String>,
}

impl LoadReport {
    /// Human readable warning text showing at most `preview` row errors.
    pub fn warning_summary(&self, preview: usize) -> Option<String> {
        summarize_warnings(&self.errors, &self.duplicates, preview)
    }
}

/// Warning text for skipped rows and overwritten names, `None` if both are
/// empty. Only the first `preview` row errors are spelled out.
pub fn summarize_warnings(
    errors: &[RowError],
    duplicates: &[String],
    preview: usize,
) -> Option<String> {
    if errors.is_empty() && duplicates.is_empty() {
        return None;
    }

    let mut lines = Vec::new();
    if !errors.is_empty() {
        lines.push(format!("Found {} problem(s) in the listing:", errors.len()));
        lines.extend(errors.iter().take(preview).map(|e| format!("  {}", e)));
        if errors.len() > preview {
            lines.push(format!("  ... and {} more", errors.len() - preview));
        }
    }
    if !duplicates.is_empty() {
        lines.push(format!(
            "Duplicate prize names (last quantity kept): {}",
            duplicates.join(", ")
        ));
    }

    Some(lines.join("\n"))
}

/// Parse listing text in the given format.
pub fn load(text: &str, format: ListingFormat) -> Result<LoadReport> {
    let text = strip_bom(text);
    let report = match format {
        ListingFormat::Legacy => legacy::parse(text),
        ListingFormat::Tabular => tabular::parse(text)?,
    };

    tracing::info!(
        "Loaded {} prize(s) from {} listing, {} row error(s)",
        report.inventory.len(),
        format,
        report.errors.len()
    );
    Ok(report)
}

/// Read and parse a listing file. The file is never written back.
pub async fn load_file(path: &Path, format: Option<ListingFormat>) -> Result<LoadReport> {
    let text = tokio::fs::read_to_string(path).await?;
    let format = format.unwrap_or_else(|| ListingFormat::detect(path, &text));

    tracing::debug!("Reading {} listing from {}", format, path.display());
    load(&text, format)
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

/// Accumulates rows for either parser.
pub(crate) struct ReportBuilder {
    format: ListingFormat,
    inventory: Inventory,
    errors: Vec<RowError>,
    duplicates: Vec<String>,
}

impl ReportBuilder {
    pub(crate) fn new(format: ListingFormat) -> Self {
        Self {
            format,
            inventory: Inventory::new(),
            errors: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    pub(crate) fn push_row(&mut self, row: usize, name: Option<&str>, quantity: Option<&str>) {
        match validate_row(name, quantity) {
            Ok(entry) => {
                let name = entry.name.clone();
                if self.inventory.upsert(entry) {
                    tracing::warn!(
                        "Row {}: duplicate prize '{}' replaces earlier entry",
                        row,
                        name
                    );
                    if !self.duplicates.contains(&name) {
                        self.duplicates.push(name);
                    }
                }
            }
            Err(kind) => {
                let error = RowError::new(row, kind);
                tracing::warn!("Skipping listing {}", error);
                self.errors.push(error);
            }
        }
    }

    pub(crate) fn finish(self) -> LoadReport {
        LoadReport {
            format: self.format,
            inventory: self.inventory,
            errors: self.errors,
            duplicates: self.duplicates,
        }
    }
}

fn validate_row(
    name: Option<&str>,
    quantity: Option<&str>,
) -> std::result::Result<PrizeEntry, RowErrorKind> {
    let name = name.ok_or(RowErrorKind::MissingField("name"))?.trim();
    if name.is_empty() {
        return Err(RowErrorKind::EmptyName);
    }

    let quantity = quantity
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(RowErrorKind::MissingField("quantity"))?;

    Ok(PrizeEntry::new(name, parse_quantity(quantity)?))
}

fn parse_quantity(raw: &str) -> std::result::Result<u32, RowErrorKind> {
    let digits = raw.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(raw);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(RowErrorKind::NotInteger(raw.to_string()));
    }

    match raw.parse::<i64>() {
        Ok(0) => Ok(0),
        _ if raw.starts_with('-') => Err(RowErrorKind::Negative(raw.to_string())),
        Ok(n) => u32::try_from(n).map_err(|_| RowErrorKind::TooLarge(raw.to_string())),
        Err(_) => Err(RowErrorKind::TooLarge(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("5"), Ok(5));
        assert_eq!(parse_quantity("+3"), Ok(3));
        assert_eq!(parse_quantity("0"), Ok(0));
        assert_eq!(
            parse_quantity("-2"),
            Err(RowErrorKind::Negative("-2".to_string()))
        );
        assert_eq!(parse_quantity("-0"), Ok(0));
        assert_eq!(
            parse_quantity("2.5"),
            Err(RowErrorKind::NotInteger("2.5".to_string()))
        );
        assert_eq!(
            parse_quantity("five"),
            Err(RowErrorKind::NotInteger("five".to_string()))
        );
        assert_eq!(
            parse_quantity("4294967296"),
            Err(RowErrorKind::TooLarge("4294967296".to_string()))
        );
        assert!(matches!(
            parse_quantity("99999999999999999999"),
            Err(RowErrorKind::TooLarge(_))
        ));
    }

    #[test]
    fn test_detect_by_extension() {
        let text = "Gift,5\n";
        assert_eq!(
            ListingFormat::detect(Path::new("prizes.csv"), text),
            ListingFormat::Tabular
        );
        assert_eq!(
            ListingFormat::detect(Path::new("prizes.TXT"), "name,quantity\n"),
            ListingFormat::Legacy
        );
    }

    #[test]
    fn test_detect_by_content() {
        let tabular = "# stock\n\nName, Quantity, note\nGift,5,x\n";
        assert_eq!(
            ListingFormat::detect(Path::new("prizes"), tabular),
            ListingFormat::Tabular
        );
        assert_eq!(
            ListingFormat::detect(Path::new("prizes"), "Gift,5\nPen,3\n"),
            ListingFormat::Legacy
        );
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("csv".parse::<ListingFormat>().unwrap(), ListingFormat::Tabular);
        assert_eq!("Legacy".parse::<ListingFormat>().unwrap(), ListingFormat::Legacy);
        assert!(matches!(
            "xml".parse::<ListingFormat>(),
            Err(PrizeError::Config(_))
        ));
    }

    #[test]
    fn test_bom_is_ignored() {
        let report = load("\u{feff}name,quantity\nGift,5\n", ListingFormat::Tabular).unwrap();
        assert_eq!(report.inventory.list(), &[PrizeEntry::new("Gift", 5)]);
    }

    #[test]
    fn test_warning_summary_preview() {
        let text = "name,quantity\nA,x\nB,-1\n,3\nC\nD,4\nD,6\n";
        let report = load(text, ListingFormat::Tabular).unwrap();

        assert_eq!(report.errors.len(), 4);
        assert_eq!(report.duplicates, vec!["D".to_string()]);

        let summary = report.warning_summary(3).unwrap();
        assert!(summary.starts_with("Found 4 problem(s) in the listing:"));
        assert!(summary.contains("row 2: quantity 'x' is not an integer"));
        assert!(summary.contains("... and 1 more"));
        assert!(!summary.contains("row 5"));
        assert!(summary.contains("Duplicate prize names (last quantity kept): D"));
    }

    #[test]
    fn test_clean_listing_has_no_summary() {
        let report = load("Gift,5\n", ListingFormat::Legacy).unwrap();
        assert!(report.errors.is_empty());
        assert!(report.warning_summary(3).is_none());
    }

    #[tokio::test]
    async fn test_load_file_detects_format() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "name,quantity").unwrap();
        writeln!(file, "Gift,5").unwrap();
        writeln!(file, "Pen,3").unwrap();

        let report = load_file(file.path(), None).await.unwrap();
        assert_eq!(report.format, ListingFormat::Tabular);
        assert_eq!(report.inventory.total_remaining(), 8);
    }

    #[tokio::test]
    async fn test_load_file_with_explicit_format() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Gift,5").unwrap();

        let report = load_file(file.path(), Some(ListingFormat::Legacy))
            .await
            .unwrap();
        assert_eq!(report.inventory.list(), &[PrizeEntry::new("Gift", 5)]);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("prizes.csv"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, PrizeError::Io(_)));
    }
}
