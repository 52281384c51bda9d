//! Response Parser — strict structured decoding of model output into a
//! match report. Never evaluates or trusts the raw text; malformed input
//! always comes back as a typed `ParseError`, never a panic.
//!
//! Numeric validation is strict (the match percentage drives ranking and
//! must be trustworthy); the informational text fields degrade gracefully
//! when absent.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("invalid response")]
    InvalidResponse,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` has the wrong type")]
    WrongType(&'static str),

    #[error("`JD Match` is not a number: {0:?}")]
    InvalidMatch(String),

    #[error("`JD Match` of {0} is outside 0-100")]
    MatchOutOfRange(f64),
}

/// The three wire-contract fields, decoded and validated. File name and
/// extras are attached by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReport {
    pub jd_match: f64,
    pub missing_keywords: Vec<String>,
    pub profile_summary: String,
}

/// Decodes a raw model completion against the fixed three-field schema.
///
/// - `JD Match`: required; a string with an optional trailing `%`, or a bare
///   number. Must parse to a finite value in [0, 100] — out-of-range values
///   are rejected, not clamped.
/// - `MissingKeywords`: optional; must be a list of strings when present.
/// - `Profile Summary`: optional; must be a string when present.
pub fn parse_match_report(raw: &str) -> Result<ParsedReport, ParseError> {
    let text = strip_json_fences(raw);
    let value: Value = serde_json::from_str(text).map_err(|_| ParseError::InvalidResponse)?;
    let object = value.as_object().ok_or(ParseError::InvalidResponse)?;

    let jd_match = match object.get("JD Match") {
        None | Some(Value::Null) => return Err(ParseError::MissingField("JD Match")),
        Some(Value::String(s)) => parse_percentage(s)?,
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| ParseError::InvalidMatch(n.to_string()))?,
        Some(_) => return Err(ParseError::WrongType("JD Match")),
    };
    if !jd_match.is_finite() || !(0.0..=100.0).contains(&jd_match) {
        return Err(ParseError::MatchOutOfRange(jd_match));
    }

    let missing_keywords = match object.get("MissingKeywords") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or(ParseError::WrongType("MissingKeywords"))
            })
            .collect::<Result<_, _>>()?,
        Some(_) => return Err(ParseError::WrongType("MissingKeywords")),
    };

    let profile_summary = match object.get("Profile Summary") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(ParseError::WrongType("Profile Summary")),
    };

    Ok(ParsedReport {
        jd_match,
        missing_keywords,
        profile_summary,
    })
}

fn parse_percentage(s: &str) -> Result<f64, ParseError> {
    let trimmed = s.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidMatch(s.to_string()))
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_response_parses() {
        let raw = r#"{
            "JD Match": "73%",
            "MissingKeywords": ["Kubernetes", "Kafka"],
            "Profile Summary": "Solid backend engineer."
        }"#;
        let report = parse_match_report(raw).unwrap();
        assert_eq!(report.jd_match, 73.0);
        assert_eq!(report.missing_keywords, vec!["Kubernetes", "Kafka"]);
        assert_eq!(report.profile_summary, "Solid backend engineer.");
    }

    #[test]
    fn test_percentage_without_suffix_and_bare_number_parse() {
        let report = parse_match_report(r#"{"JD Match": "88.5"}"#).unwrap();
        assert_eq!(report.jd_match, 88.5);
        let report = parse_match_report(r#"{"JD Match": 42}"#).unwrap();
        assert_eq!(report.jd_match, 42.0);
    }

    #[test]
    fn test_non_numeric_match_is_rejected() {
        let err = parse_match_report(r#"{"JD Match": "abc%"}"#).unwrap_err();
        assert!(matches!(err, ParseError::InvalidMatch(_)));
    }

    #[test]
    fn test_missing_match_field_is_rejected() {
        let err = parse_match_report(r#"{"MissingKeywords": []}"#).unwrap_err();
        assert_eq!(err, ParseError::MissingField("JD Match"));
    }

    #[test]
    fn test_out_of_range_match_is_rejected_not_clamped() {
        let err = parse_match_report(r#"{"JD Match": "150%"}"#).unwrap_err();
        assert_eq!(err, ParseError::MatchOutOfRange(150.0));
        let err = parse_match_report(r#"{"JD Match": "-3%"}"#).unwrap_err();
        assert_eq!(err, ParseError::MatchOutOfRange(-3.0));
    }

    #[test]
    fn test_absent_keywords_and_summary_are_lenient() {
        let report = parse_match_report(r#"{"JD Match": "50%"}"#).unwrap();
        assert!(report.missing_keywords.is_empty());
        assert_eq!(report.profile_summary, "");
    }

    #[test]
    fn test_wrongly_typed_keywords_are_rejected() {
        let err =
            parse_match_report(r#"{"JD Match": "50%", "MissingKeywords": "Kafka"}"#).unwrap_err();
        assert_eq!(err, ParseError::WrongType("MissingKeywords"));
        let err =
            parse_match_report(r#"{"JD Match": "50%", "MissingKeywords": [1, 2]}"#).unwrap_err();
        assert_eq!(err, ParseError::WrongType("MissingKeywords"));
    }

    #[test]
    fn test_wrongly_typed_summary_is_rejected() {
        let err =
            parse_match_report(r#"{"JD Match": "50%", "Profile Summary": 7}"#).unwrap_err();
        assert_eq!(err, ParseError::WrongType("Profile Summary"));
    }

    #[test]
    fn test_non_json_and_non_object_responses_are_invalid() {
        assert_eq!(
            parse_match_report("I could not evaluate this resume."),
            Err(ParseError::InvalidResponse)
        );
        assert_eq!(
            parse_match_report(r#"["JD Match", "73%"]"#),
            Err(ParseError::InvalidResponse)
        );
    }

    #[test]
    fn test_fenced_json_parses_like_bare_json() {
        let raw = "```json\n{\"JD Match\": \"73%\"}\n```";
        assert_eq!(parse_match_report(raw).unwrap().jd_match, 73.0);
        let raw = "```\n{\"JD Match\": \"73%\"}\n```";
        assert_eq!(parse_match_report(raw).unwrap().jd_match, 73.0);
    }

    #[test]
    fn test_strip_json_fences_leaves_bare_text_alone() {
        assert_eq!(strip_json_fences("{\"key\": 1}"), "{\"key\": 1}");
    }
}
