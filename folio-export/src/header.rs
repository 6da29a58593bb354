//! Decode the extraction service's statement-header response.
//!
//! The `/extract` endpoint wraps its answer as a JSON string:
//!   {"response": "{\"account_number\": \"...\", \"ending_value\": 1234.5, ...}", "status": "success"}
//! Proxies often unwrap it first, so both shapes are accepted.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::statement::StatementHeader;

#[derive(Debug, Deserialize)]
struct ExtractEnvelope {
    response: Option<String>,
    #[serde(default)]
    status: String,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// "$1,234.56" and "(12.00)" style strings; anything else is 0.
    fn value(&self) -> f64 {
        match self {
            Amount::Number(n) => *n,
            Amount::Text(s) => {
                let s = s.trim();
                let negative = (s.starts_with('(') && s.ends_with(')')) || s.starts_with('-');
                let digits: String = s
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.')
                    .collect();
                let n: f64 = digits.parse().unwrap_or(0.0);
                if negative { -n } else { n }
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct HeaderFields {
    account_number: Option<String>,
    statement_period_start: Option<String>,
    statement_period_end: Option<String>,
    ending_value: Option<Amount>,
    total_fees: Option<Amount>,
}

impl From<HeaderFields> for StatementHeader {
    fn from(f: HeaderFields) -> Self {
        let fallback = StatementHeader::default();
        let text = |v: Option<String>, d: String| v.filter(|s| !s.trim().is_empty()).unwrap_or(d);
        StatementHeader {
            account_number: text(f.account_number, fallback.account_number),
            period_start: text(f.statement_period_start, fallback.period_start),
            period_end: text(f.statement_period_end, fallback.period_end),
            ending_value: f.ending_value.map(|a| a.value()).unwrap_or(fallback.ending_value),
            total_fees: f.total_fees.map(|a| a.value()).unwrap_or(fallback.total_fees),
        }
    }
}

/// Parse a header-extract payload, wrapped or already unwrapped.
pub fn decode_header_extract(json: &str) -> Result<StatementHeader> {
    let value: serde_json::Value = serde_json::from_str(json).context("parse header extract")?;

    let is_envelope = value.get("response").is_some() || value.get("status").is_some();
    if !is_envelope {
        let fields: HeaderFields =
            serde_json::from_value(value).context("decode header fields")?;
        return Ok(fields.into());
    }

    let envelope: ExtractEnvelope =
        serde_json::from_value(value).context("decode extract envelope")?;
    let Some(inner) = envelope.response else {
        bail!(
            "extract response missing (status: {}, message: {})",
            envelope.status,
            envelope.message.as_deref().unwrap_or("none")
        );
    };

    let fields: HeaderFields =
        serde_json::from_str(&inner).context("parse inner header response")?;
    Ok(fields.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_wrapped_response() {
        let json = r#"{
            "response": "{\"account_number\":\"****5678\",\"statement_period_start\":\"2024-01-01\",\"statement_period_end\":\"2024-03-31\",\"ending_value\":125000.5,\"total_fees\":42.1}",
            "status": "success"
        }"#;

        let header = decode_header_extract(json).unwrap();
        assert_eq!(header.account_number, "****5678");
        assert_eq!(header.period_start, "2024-01-01");
        assert_eq!(header.period_end, "2024-03-31");
        assert_eq!(header.ending_value, 125000.5);
        assert_eq!(header.total_fees, 42.1);
    }

    #[test]
    fn test_decodes_unwrapped_with_text_amounts() {
        let json = r#"{"account_number":"X-1","ending_value":"$1,234.50","total_fees":"(3.00)"}"#;

        let header = decode_header_extract(json).unwrap();
        assert_eq!(header.account_number, "X-1");
        assert_eq!(header.period_start, "Unknown");
        assert_eq!(header.ending_value, 1234.5);
        assert_eq!(header.total_fees, -3.0);
    }

    #[test]
    fn test_envelope_without_response_is_an_error() {
        let json = r#"{"status":"error","message":"rate limited"}"#;
        let err = decode_header_extract(json).unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(decode_header_extract("not json").is_err());
        let bad_inner = r#"{"response":"{oops","status":"success"}"#;
        assert!(decode_header_extract(bad_inner).is_err());
    }
}
