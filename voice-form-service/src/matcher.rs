use lazy_static::lazy_static;
use regex::Regex;
use crate::schema::KeywordTable;
use crate::value::RawValue;

lazy_static! {
    static ref DECIMAL_REGEX: Regex = Regex::new(r"([0-9]+(?:\.[0-9]+)?)").unwrap();
}

/// Field key and raw value found by keyword scan
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub field_key: &'static str,
    pub raw: RawValue,
    pub keyword: &'static str,
}

/// Scan a lower-cased transcript against a keyword table.
///
/// Field keys are tried in table order. For each key only the first of its
/// keywords that occurs in the transcript is considered; the value is read
/// from the text after that occurrence. A key whose keyword yields no value
/// is skipped and the scan continues with the next key. This is a substring
/// match, so short keywords ("bp", "old") can fire inside longer words.
pub fn find_match(transcript: &str, table: &KeywordTable) -> Option<MatchResult> {
    table.iter().find_map(|entry| {
        let (keyword, position) = entry
            .keywords
            .iter()
            .find_map(|keyword| transcript.find(keyword).map(|pos| (*keyword, pos)))?;

        let after = transcript.get(position + keyword.len()..).unwrap_or("");
        extract_value(entry.key, after, transcript).map(|raw| MatchResult {
            field_key: entry.key,
            raw,
            keyword,
        })
    })
}

/// Read a value from the text following a keyword.
///
/// Priority: first decimal number, then any `y` (yes), then any `n` (no),
/// then for gender fields a male/female term anywhere in the transcript.
/// The yes/no checks are plain substring tests on the trailing text.
pub fn extract_value(field_key: &str, after: &str, transcript: &str) -> Option<RawValue> {
    if let Some(number) = DECIMAL_REGEX
        .captures(after)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
    {
        return Some(RawValue::Number(number));
    }

    if after.contains("yes") || after.contains('y') {
        return Some(RawValue::Number(1.0));
    }

    if after.contains("no") || after.contains('n') {
        return Some(RawValue::Number(0.0));
    }

    if is_gender_key(field_key) && (transcript.contains("male") || transcript.contains("female")) {
        let term = if transcript.contains("male") { "Male" } else { "Female" };
        return Some(RawValue::Term(term.to_string()));
    }

    None
}

pub(crate) fn is_gender_key(field_key: &str) -> bool {
    matches!(field_key, "gender" | "sex")
}
