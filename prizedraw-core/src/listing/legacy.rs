use super::{ListingFormat, LoadReport, ReportBuilder};

/// Parse the headerless `name,quantity` format. Rows are physical line
/// numbers, blank lines are skipped and only the first comma splits.
pub fn parse(text: &str) -> LoadReport {
    let mut builder = ReportBuilder::new(ListingFormat::Legacy);

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(',') {
            Some((name, quantity)) => builder.push_row(index + 1, Some(name), Some(quantity)),
            None => builder.push_row(index + 1, Some(line), None),
        }
    }

    builder.finish()
}
