//! Investor catalog: CSV ingestion and per-field normalization.
//!
//! The catalog is loaded once at startup and immutable afterwards.
//! Normalization is deliberately forgiving: malformed numeric fields are
//! coerced to 0 or the undisclosed sentinel, missing columns get documented
//! defaults, and a single bad row never fails the load. Only a missing
//! asset file is fatal.

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

/// Default for missing name/company/domain/past-company fields
pub const DEFAULT_UNKNOWN: &str = "Unknown";
/// Default for missing contact fields
pub const DEFAULT_NOT_AVAILABLE: &str = "Not Available";

/// Expected CSV columns. Order does not matter; lookup is header-driven.
const COL_NAME: &str = "investor_name";
const COL_COMPANY: &str = "investor_company";
const COL_EXPERIENCE: &str = "investor_experience(years)";
const COL_COMPANIES_INVESTED: &str = "no_of_companies_invested";
const COL_DOMAINS: &str = "domains";
const COL_LINKEDIN: &str = "linkedin_url";
const COL_EMAIL: &str = "email";
const COL_FUNDS: &str = "funds_available";
const COL_PAST_COMPANIES: &str = "past_companies";
const COL_INVESTOR_TYPE: &str = "investor_type";

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("static regex"));

/// Funds a record discloses, or the explicit undisclosed sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Funds {
    Amount(f64),
    Undisclosed,
}

impl Serialize for Funds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Funds::Amount(value) => serializer.serialize_f64(*value),
            Funds::Undisclosed => serializer.serialize_str(DEFAULT_NOT_AVAILABLE),
        }
    }
}

/// One normalized investor record.
#[derive(Debug, Clone, Serialize)]
pub struct Investor {
    #[serde(skip_serializing)]
    pub id: u64,
    #[serde(rename = "investor_name")]
    pub name: String,
    #[serde(rename = "investor_company")]
    pub company: String,
    #[serde(rename = "investor_experience(years)")]
    pub experience_years: f64,
    #[serde(rename = "no_of_companies_invested")]
    pub companies_invested: u32,
    /// Free-form, possibly compound ("FinTech, AI & ML"); matched by
    /// case-insensitive substring during ranking
    pub domains: String,
    pub linkedin_url: String,
    pub email: String,
    pub funds_available: Funds,
    pub past_companies: String,
    #[serde(skip_serializing)]
    pub investor_type: String,
}

/// Immutable catalog of investor records, insertion order preserved.
pub struct InvestorCatalog {
    list: Vec<Investor>,
}

impl InvestorCatalog {
    /// Load and normalize the catalog from a CSV asset.
    /// A missing or unreadable file is a startup configuration error.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("failed to open investor data at {path}"))?;

        let headers = reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h.trim() == name);

        let col_name = column(COL_NAME);
        let col_company = column(COL_COMPANY);
        let col_experience = column(COL_EXPERIENCE);
        let col_companies = column(COL_COMPANIES_INVESTED);
        let col_domains = column(COL_DOMAINS);
        let col_linkedin = column(COL_LINKEDIN);
        let col_email = column(COL_EMAIL);
        let col_funds = column(COL_FUNDS);
        let col_past = column(COL_PAST_COMPANIES);
        let col_type = column(COL_INVESTOR_TYPE);

        let field = |record: &csv::StringRecord, col: Option<usize>, default: &str| {
            col.and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        let mut list = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    log::warn!("skipping malformed row {}: {err}", row + 1);
                    continue;
                }
            };

            list.push(Investor {
                id: row as u64,
                name: field(&record, col_name, DEFAULT_UNKNOWN),
                company: field(&record, col_company, DEFAULT_UNKNOWN),
                experience_years: parse_experience(&field(&record, col_experience, "0")),
                companies_invested: parse_count(&field(&record, col_companies, "0")),
                domains: field(&record, col_domains, DEFAULT_UNKNOWN),
                linkedin_url: field(&record, col_linkedin, DEFAULT_NOT_AVAILABLE),
                email: field(&record, col_email, DEFAULT_NOT_AVAILABLE),
                funds_available: parse_funds(&field(&record, col_funds, "")),
                past_companies: field(&record, col_past, DEFAULT_UNKNOWN),
                investor_type: field(&record, col_type, DEFAULT_UNKNOWN),
            });
        }

        log::info!("investor catalog loaded: {} records from {path}", list.len());
        Ok(Self { list })
    }

    /// Build a catalog directly from records (tests and fixtures).
    pub fn from_records(list: Vec<Investor>) -> Self {
        Self { list }
    }

    pub fn investors(&self) -> &[Investor] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// Extract years of experience from a free-form string.
/// Takes the first digit run ("10+ years" -> 10); unparsable -> 0.
pub fn parse_experience(raw: &str) -> f64 {
    DIGIT_RUN
        .find(raw)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Coerce a companies-invested field to a non-negative count.
pub fn parse_count(raw: &str) -> u32 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| *v >= 0.0)
        .map(|v| v as u32)
        .unwrap_or(0)
}

/// Parse a free-form funds string.
///
/// Accepts an optional `$`, thousands separators, and `M` (x1e6) or
/// `B` (x1e9) suffixes, case-insensitive. Anything unparsable maps to
/// `Funds::Undisclosed`; this function never fails.
pub fn parse_funds(raw: &str) -> Funds {
    let cleaned = raw.trim().replace(['$', ','], "").to_uppercase();
    if cleaned.is_empty() {
        return Funds::Undisclosed;
    }

    let (number, multiplier) = if let Some(stripped) = cleaned.strip_suffix('M') {
        (stripped.trim().to_string(), 1e6)
    } else if let Some(stripped) = cleaned.strip_suffix('B') {
        (stripped.trim().to_string(), 1e9)
    } else {
        (cleaned, 1.0)
    };

    match number.parse::<f64>() {
        Ok(value) if value >= 0.0 => Funds::Amount(value * multiplier),
        _ => Funds::Undisclosed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_funds_millions() {
        assert_eq!(parse_funds("$2.5M"), Funds::Amount(2_500_000.0));
        assert_eq!(parse_funds("2.5m"), Funds::Amount(2_500_000.0));
    }

    #[test]
    fn test_parse_funds_billions() {
        assert_eq!(parse_funds("1B"), Funds::Amount(1_000_000_000.0));
        assert_eq!(parse_funds("$1.2b"), Funds::Amount(1_200_000_000.0));
    }

    #[test]
    fn test_parse_funds_plain_number_with_separators() {
        assert_eq!(parse_funds("1,500,000"), Funds::Amount(1_500_000.0));
        assert_eq!(parse_funds("$750000"), Funds::Amount(750_000.0));
    }

    #[test]
    fn test_parse_funds_unparsable_is_undisclosed() {
        assert_eq!(parse_funds("N/A"), Funds::Undisclosed);
        assert_eq!(parse_funds("Unknown"), Funds::Undisclosed);
        assert_eq!(parse_funds(""), Funds::Undisclosed);
        assert_eq!(parse_funds("-5M"), Funds::Undisclosed);
    }

    #[test]
    fn test_parse_experience_digit_extraction() {
        assert_eq!(parse_experience("10+ years"), 10.0);
        assert_eq!(parse_experience("about 7"), 7.0);
        assert_eq!(parse_experience("12"), 12.0);
        assert_eq!(parse_experience("veteran"), 0.0);
        assert_eq!(parse_experience(""), 0.0);
    }

    #[test]
    fn test_parse_count_coercion() {
        assert_eq!(parse_count("15"), 15);
        assert_eq!(parse_count("15.0"), 15);
        assert_eq!(parse_count("many"), 0);
        assert_eq!(parse_count("-3"), 0);
    }

    #[test]
    fn test_funds_serialization() {
        assert_eq!(
            serde_json::to_string(&Funds::Amount(2_500_000.0)).unwrap(),
            "2500000.0"
        );
        assert_eq!(
            serde_json::to_string(&Funds::Undisclosed).unwrap(),
            "\"Not Available\""
        );
    }
}
