use serde::{Deserialize, Serialize};
use crate::error::{FormError, FormResult};
use crate::schema::SchemaRegistry;

pub const DEFAULT_SCHEMA: &str = "Heart Disease";
pub const DEFAULT_UNRESOLVED_LOG_CAPACITY: usize = 32;

/// Form-filling engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormConfig {
    /// Schema active when the engine starts
    pub default_schema: String,
    /// Assign a bare number to the age/weight/height field when no keyword matches
    pub numeric_fallback: bool,
    /// Set the gender field from a bare "male"/"female"
    pub gender_fallback: bool,
    /// Unresolved transcripts kept per session
    pub unresolved_log_capacity: usize,
    /// Mask numbers in transcripts written to logs
    pub redact_transcripts: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_schema: DEFAULT_SCHEMA.to_string(),
            numeric_fallback: true,
            gender_fallback: true,
            unresolved_log_capacity: DEFAULT_UNRESOLVED_LOG_CAPACITY,
            redact_transcripts: true,
        }
    }
}

impl FormConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> FormResult<Self> {
        let default_schema = std::env::var("FORM_DEFAULT_SCHEMA")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SCHEMA.to_string());

        let numeric_fallback = std::env::var("FORM_NUMERIC_FALLBACK")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);

        let gender_fallback = std::env::var("FORM_GENDER_FALLBACK")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);

        let unresolved_log_capacity = std::env::var("FORM_UNRESOLVED_LOG_CAPACITY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_UNRESOLVED_LOG_CAPACITY);

        let redact_transcripts = std::env::var("FORM_REDACT_TRANSCRIPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);

        let config = Self {
            default_schema,
            numeric_fallback,
            gender_fallback,
            unresolved_log_capacity,
            redact_transcripts,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the default schema name and the log capacity
    pub fn validate(&self) -> FormResult<()> {
        SchemaRegistry::lookup(&self.default_schema)?;

        if self.unresolved_log_capacity == 0 {
            return Err(FormError::Config(
                "FORM_UNRESOLVED_LOG_CAPACITY must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_default_schema(mut self, name: impl Into<String>) -> Self {
        self.default_schema = name.into();
        self
    }

    pub fn with_numeric_fallback(mut self, enabled: bool) -> Self {
        self.numeric_fallback = enabled;
        self
    }

    pub fn with_gender_fallback(mut self, enabled: bool) -> Self {
        self.gender_fallback = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = FormConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.numeric_fallback);
        assert!(config.gender_fallback);
        assert!(config.redact_transcripts);
    }

    #[test]
    fn test_unknown_default_schema_fails() {
        let config = FormConfig::default().with_default_schema("Liver Disease");
        assert!(matches!(config.validate(), Err(FormError::UnknownSchema(_))));
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let config = FormConfig {
            unresolved_log_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(FormError::Config(_))));
    }

    #[test]
    fn test_deserializes_from_json() {
        let json = r#"{
            "default_schema": "Diabetes",
            "numeric_fallback": false,
            "gender_fallback": true,
            "unresolved_log_capacity": 8,
            "redact_transcripts": false
        }"#;
        let config: FormConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_schema, "Diabetes");
        assert!(!config.numeric_fallback);
        assert!(config.validate().is_ok());
    }
}
