use regex::Regex;
use lazy_static::lazy_static;
use sha2::{Sha256, Digest};
use base64::{Engine as _, engine::general_purpose};

lazy_static! {
    static ref DIGITS_REGEX: Regex = Regex::new(r"[0-9]+(?:\.[0-9]+)?").unwrap();
    static ref NUMBER_WORDS_REGEX: Regex = Regex::new(
        r"\b(?:zero|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety|hundred)(?:-(?:one|two|three|four|five|six|seven|eight|nine))?\b"
    ).unwrap();
}

/// Transcript redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_digits: bool,
    pub redact_number_words: bool,
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_digits: true,
            redact_number_words: true,
            hash_for_correlation: false,
            custom_patterns: Vec::new(),
        }
    }
}

impl RedactionConfig {
    pub fn with_hash_for_correlation(mut self, enabled: bool) -> Self {
        self.hash_for_correlation = enabled;
        self
    }

    /// Adds an organization-specific pattern applied after the built-in ones.
    pub fn with_custom_pattern(mut self, pattern: Regex, replacement: impl Into<String>) -> Self {
        self.custom_patterns.push((pattern, replacement.into()));
        self
    }
}

/// Masks clinical values spoken in a transcript before it is logged.
///
/// Dictated transcripts carry measurements (age, blood pressure, weight)
/// that identify a patient when combined with a timestamp, so every
/// digit run and spoken number word is replaced. With
/// `hash_for_correlation` enabled the replacement is a short digest,
/// which lets two log lines mentioning the same value be matched up.
#[derive(Debug, Clone, Default)]
pub struct TranscriptRedactor {
    config: RedactionConfig,
}

impl TranscriptRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    /// Redactor that passes text through unchanged
    pub fn disabled() -> Self {
        Self::new(RedactionConfig {
            redact_digits: false,
            redact_number_words: false,
            ..Default::default()
        })
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_digits {
            result = self.redact_digits(&result);
        }

        if self.config.redact_number_words {
            result = self.redact_number_words(&result);
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).to_string();
        }

        result
    }

    fn redact_digits(&self, text: &str) -> String {
        DIGITS_REGEX.replace_all(text, |caps: &regex::Captures| {
            if self.config.hash_for_correlation {
                format!("NUM[{}]", self.hash_value(&caps[0]))
            } else {
                "***".to_string()
            }
        }).to_string()
    }

    fn redact_number_words(&self, text: &str) -> String {
        NUMBER_WORDS_REGEX.replace_all(text, |caps: &regex::Captures| {
            if self.config.hash_for_correlation {
                format!("WORD[{}]", self.hash_value(&caps[0]))
            } else {
                "***".to_string()
            }
        }).to_string()
    }

    fn hash_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        general_purpose::STANDARD.encode(&result[..8]) // Use first 8 bytes for shorter hash
    }
}
