//! Investor table loaded once from CSV at startup and shared read-only.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const NAME_COLUMN: &str = "Investor Name";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestorRecord {
    pub name: String,
    pub fund_focus: String,
    pub fund_stage: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
struct InvestorRow {
    #[serde(rename = "Investor Name", default)]
    name: Option<String>,
    #[serde(rename = "Fund Focus (Sectors)", default)]
    fund_focus: Option<String>,
    #[serde(rename = "Fund Stage", default)]
    fund_stage: Option<String>,
    #[serde(rename = "Location", default)]
    location: Option<String>,
}

/// Investor records in file order. Row order is the tie-break order for ranking.
#[derive(Debug, Clone, Default)]
pub struct InvestorTable {
    records: Vec<InvestorRecord>,
}

impl InvestorTable {
    pub fn new(records: Vec<InvestorRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open investor CSV '{}'", path.display()))?;
        let table = Self::from_reader(file)
            .with_context(|| format!("Failed to read investor CSV '{}'", path.display()))?;
        info!(
            "Loaded {} investors from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parses CSV with a header row. Missing cells read as empty; rows without an
    /// investor name are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers().context("Failed to read CSV headers")?;
        if !headers.iter().any(|h| h == NAME_COLUMN) {
            bail!("Investor CSV is missing the '{NAME_COLUMN}' column");
        }

        let mut records = Vec::new();
        for (idx, row) in reader.deserialize::<InvestorRow>().enumerate() {
            // +2: header is line 1, data starts on line 2.
            let line = idx + 2;
            let row = row.with_context(|| format!("Malformed investor row on line {line}"))?;
            let name = row.name.unwrap_or_default();
            if name.trim().is_empty() {
                warn!("Skipping investor row on line {line}: no investor name");
                continue;
            }
            records.push(InvestorRecord {
                name,
                fund_focus: row.fund_focus.unwrap_or_default(),
                fund_stage: row.fund_stage.unwrap_or_default(),
                location: row.location.unwrap_or_default(),
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[InvestorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Stable id: lowercased name with each run of characters outside `[a-z0-9]` replaced
/// by `_`. The id doubles as a record key, so it stays ASCII.
pub fn investor_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    let mut in_gap = false;
    for c in name.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            id.push(c);
            in_gap = false;
        } else if !in_gap {
            id.push('_');
            in_gap = true;
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Investor Name,Fund Focus (Sectors),Fund Stage,Location
Sequoia Capital,\"AI/ML, Fintech\",\"Seed, Series A\",\"Menlo Park, United States\"
,Health,Seed,London
Northzone, Software ,Series A
";

    #[test]
    fn test_parses_rows_and_skips_nameless() {
        let table = InvestorTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);

        let first = &table.records()[0];
        assert_eq!(first.name, "Sequoia Capital");
        assert_eq!(first.fund_focus, "AI/ML, Fintech");
        assert_eq!(first.fund_stage, "Seed, Series A");
        assert_eq!(first.location, "Menlo Park, United States");
    }

    #[test]
    fn test_short_rows_read_as_empty_cells() {
        let table = InvestorTable::from_reader(SAMPLE.as_bytes()).unwrap();
        let northzone = &table.records()[1];
        assert_eq!(northzone.fund_focus, "Software");
        assert_eq!(northzone.fund_stage, "Series A");
        assert_eq!(northzone.location, "");
    }

    #[test]
    fn test_missing_name_column_is_an_error() {
        let err = InvestorTable::from_reader("Name,Focus\nA,B\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Investor Name"));
    }

    #[test]
    fn test_investor_id() {
        assert_eq!(investor_id("Sequoia Capital"), "sequoia_capital");
        assert_eq!(investor_id("  A16Z / Andreessen  Horowitz "), "a16z_andreessen_horowitz");
        assert_eq!(investor_id("Y Combinator"), "y_combinator");
    }

    #[test]
    fn test_non_ascii_names_give_valid_keys() {
        assert_eq!(investor_id("Zoë Capital"), "zo_capital");
        assert_eq!(investor_id("Ålborg Ventures"), "_lborg_ventures");
        for name in ["Zoë Capital", "Ålborg Ventures", "東京 Partners"] {
            crate::store::validate_key(&investor_id(name)).unwrap();
        }
    }
}
