//! Statement ingestion: text extraction and line parsing
//!
//! Uploaded documents go through a `TextExtractor` and then `parse_statement_text`,
//! which recognises bank-SMS-like lines such as:
//!
//! ```text
//! 2024-08-01, UPI to XYZ, -230.50
//! 2024-08-03 Salary August, 85000
//! ```
//!
//! The parser yields `NewTransaction`s, the same type the submission API accepts,
//! so parsed rows can be reviewed by the client and submitted unchanged.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{NewTransaction, DEFAULT_CURRENCY};

/// date, then the shortest gap, then a comma-free description, a comma, and the amount
const LINE_PATTERN: &str =
    r"(?P<date>\d{4}-\d{2}-\d{2}).*?(?P<desc>[^,\n]+),\s*(?P<amount>-?\d+(?:\.\d{1,2})?)";

/// Extensions that need OCR or PDF rasterization before they can be parsed
const BINARY_DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp",
];

fn line_regex() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| Regex::new(LINE_PATTERN).expect("statement line pattern is valid"))
}

/// Parse statement text, recording the default currency on every row
pub fn parse_statement_text(text: &str) -> Vec<NewTransaction> {
    parse_statement_text_with_currency(text, DEFAULT_CURRENCY)
}

/// Parse statement text, recording `currency` on every row
///
/// Matches whose date is not a real calendar date are skipped.
pub fn parse_statement_text_with_currency(text: &str, currency: &str) -> Vec<NewTransaction> {
    let mut out = Vec::new();

    for caps in line_regex().captures_iter(text) {
        let date_str = &caps["date"];
        let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") else {
            debug!(date = date_str, "Skipping line with invalid date");
            continue;
        };
        let Ok(amount) = caps["amount"].parse::<f64>() else {
            debug!(amount = &caps["amount"], "Skipping line with invalid amount");
            continue;
        };

        out.push(
            NewTransaction::new(date, amount, caps["desc"].trim()).with_currency(currency),
        );
    }

    debug!(parsed = out.len(), "Parsed statement text");
    out
}

/// Turns an uploaded document into plain text
///
/// OCR and PDF rasterization live behind this seam; the core only ships a
/// plain-text implementation.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, bytes: &[u8], filename: Option<&str>) -> Result<String>;
}

/// Accepts plain-text statements, rejects documents that need OCR
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, bytes: &[u8], filename: Option<&str>) -> Result<String> {
        let name = filename.unwrap_or("").to_lowercase();
        let extension = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");

        if BINARY_DOCUMENT_EXTENSIONS.contains(&extension) || bytes.starts_with(b"%PDF") {
            return Err(Error::UnsupportedDocument(format!(
                "{} needs an OCR backend; upload a text statement instead",
                if name.is_empty() { "document" } else { name.as_str() }
            )));
        }

        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}
