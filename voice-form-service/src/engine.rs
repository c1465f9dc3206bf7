use serde::Serialize;
use tracing::{debug, info};
use logger_redacted::TranscriptRedactor;
use crate::config::FormConfig;
use crate::error::FormResult;
use crate::fallback;
use crate::matcher::{self, MatchResult};
use crate::normalizer;
use crate::schema::{KeywordTable, Schema, SchemaRegistry};
use crate::session::{ListeningMode, SessionState};
use crate::value::FieldValue;

/// Phrases that halt capture. "stop" alone matches anywhere in the transcript.
pub const STOP_DIRECTIVES: &[&str] = &["stop listening", "end listening", "stop"];

pub fn is_stop_directive(transcript: &str) -> bool {
    STOP_DIRECTIVES.iter().any(|directive| transcript.contains(directive))
}

/// How a value reached its field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssignmentSource {
    Keyword {
        field_key: &'static str,
        keyword: &'static str,
    },
    NumericFallback,
    GenderFallback,
}

/// Normalized value bound for a canonical field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub field: &'static str,
    pub value: FieldValue,
    pub source: AssignmentSource,
}

/// Outcome of delivering one transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "assignment", rename_all = "snake_case")]
pub enum Resolution {
    /// Engine was idle; transcript dropped
    Ignored,
    /// Stop directive heard; capture should halt
    StopRequested,
    Filled(Assignment),
    Unresolved,
}

impl Resolution {
    /// Human-readable status for display and logs
    pub fn status(&self) -> String {
        match self {
            Resolution::Filled(assignment) => {
                format!("filled {} with {}", assignment.field, assignment.value)
            }
            Resolution::Unresolved => "no field matched".to_string(),
            Resolution::StopRequested => "stopped listening".to_string(),
            Resolution::Ignored => "not listening".to_string(),
        }
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            Resolution::Filled(assignment) => Some(assignment),
            _ => None,
        }
    }
}

/// Transcript Resolution Engine
///
/// Owns the session state for the active schema. Transcripts are resolved
/// one at a time; the host serializes delivery.
#[derive(Debug)]
pub struct ResolutionEngine {
    config: FormConfig,
    schema: &'static Schema,
    table: KeywordTable,
    state: SessionState,
    mode: ListeningMode,
    redactor: TranscriptRedactor,
}

impl ResolutionEngine {
    pub fn new(schema_name: &str, config: FormConfig) -> FormResult<Self> {
        let schema = SchemaRegistry::lookup(schema_name)?;
        let redactor = if config.redact_transcripts {
            TranscriptRedactor::default()
        } else {
            TranscriptRedactor::disabled()
        };

        info!(schema = schema.name, "Resolution engine ready");

        Ok(Self {
            table: schema.keyword_table(),
            state: SessionState::new(schema, config.unresolved_log_capacity),
            schema,
            config,
            mode: ListeningMode::Idle,
            redactor,
        })
    }

    /// Engine on the configured default schema
    pub fn from_config(config: FormConfig) -> FormResult<Self> {
        let name = config.default_schema.clone();
        Self::new(&name, config)
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    pub fn keyword_table(&self) -> &KeywordTable {
        &self.table
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> ListeningMode {
        self.mode
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Activate another schema and discard every assignment.
    ///
    /// An unknown name leaves the engine untouched. The listening mode
    /// carries over.
    pub fn switch_schema(&mut self, name: &str) -> FormResult<()> {
        let schema = SchemaRegistry::lookup(name)?;
        let previous = self.state.session_id();

        self.table = schema.keyword_table();
        self.state = SessionState::new(schema, self.config.unresolved_log_capacity);
        self.schema = schema;

        info!(
            schema = schema.name,
            previous_session = %previous,
            session_id = %self.state.session_id(),
            "Schema switched, session reset"
        );
        Ok(())
    }

    pub fn start_listening(&mut self) {
        if self.mode == ListeningMode::Idle {
            debug!(session_id = %self.state.session_id(), "Listening started");
        }
        self.mode = ListeningMode::Listening;
    }

    /// External end of capture
    pub fn end_listening(&mut self) {
        if self.mode == ListeningMode::Listening {
            debug!(session_id = %self.state.session_id(), "Listening ended");
        }
        self.mode = ListeningMode::Idle;
    }

    /// Route one transcript through stop detection, keyword matching and fallback
    pub fn handle_transcript(&mut self, transcript: &str) -> Resolution {
        if self.mode == ListeningMode::Idle {
            debug!("Transcript ignored while idle");
            return Resolution::Ignored;
        }

        let transcript = transcript.trim().to_lowercase();

        if is_stop_directive(&transcript) {
            self.mode = ListeningMode::Idle;
            info!(session_id = %self.state.session_id(), "Stop directive received");
            return Resolution::StopRequested;
        }

        if transcript.is_empty() {
            return Resolution::Unresolved;
        }

        match self.resolve(&transcript) {
            Some(assignment) => {
                self.state.assign(assignment.field, assignment.value.clone());
                info!(
                    session_id = %self.state.session_id(),
                    source = ?assignment.source,
                    "filled {} with {}",
                    assignment.field,
                    self.redactor.redact(&assignment.value.to_string())
                );
                Resolution::Filled(assignment)
            }
            None => {
                self.state.record_unresolved(&transcript);
                info!(
                    session_id = %self.state.session_id(),
                    transcript = %self.redactor.redact(&transcript),
                    "no field matched"
                );
                Resolution::Unresolved
            }
        }
    }

    /// Resolve a lower-cased transcript without touching state.
    ///
    /// Fallbacks run only when no keyword claims the transcript. A keyword
    /// whose key fills no field of this schema claims it and assigns nothing.
    pub fn resolve(&self, transcript: &str) -> Option<Assignment> {
        match matcher::find_match(transcript, &self.table) {
            Some(found) => self.keyword_assignment(found, transcript),
            None => self
                .numeric_fallback(transcript)
                .or_else(|| self.gender_fallback(transcript)),
        }
    }

    fn keyword_assignment(&self, found: MatchResult, transcript: &str) -> Option<Assignment> {
        let Some(field) = self.schema.field_for(found.field_key) else {
            debug!(
                field_key = found.field_key,
                schema = self.schema.name,
                "Keyword has no field in this schema"
            );
            return None;
        };
        let value = normalizer::normalize(found.field_key, found.raw, transcript, self.schema);

        Some(Assignment {
            field,
            value,
            source: AssignmentSource::Keyword {
                field_key: found.field_key,
                keyword: found.keyword,
            },
        })
    }

    fn numeric_fallback(&self, transcript: &str) -> Option<Assignment> {
        if !self.config.numeric_fallback {
            return None;
        }
        let (field, number) = fallback::assign_number(transcript, self.schema)?;
        Some(Assignment {
            field,
            value: FieldValue::Number(number),
            source: AssignmentSource::NumericFallback,
        })
    }

    fn gender_fallback(&self, transcript: &str) -> Option<Assignment> {
        if !self.config.gender_fallback {
            return None;
        }
        let (field, term) = fallback::assign_gender(transcript, self.schema)?;
        Some(Assignment {
            field,
            value: FieldValue::text(term),
            source: AssignmentSource::GenderFallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listening(schema: &str) -> ResolutionEngine {
        let mut engine = ResolutionEngine::new(schema, FormConfig::default()).unwrap();
        engine.start_listening();
        engine
    }

    #[test]
    fn test_stop_directive_detection() {
        assert!(is_stop_directive("please stop listening now"));
        assert!(is_stop_directive("end listening"));
        assert!(is_stop_directive("nonstop"));
        assert!(!is_stop_directive("end of sentence"));
    }

    #[test]
    fn test_idle_engine_ignores_transcripts() {
        let mut engine = ResolutionEngine::new("Heart Disease", FormConfig::default()).unwrap();
        let resolution = engine.handle_transcript("cholesterol 200");
        assert_eq!(resolution, Resolution::Ignored);
        assert!(engine.state().is_empty());
    }

    #[test]
    fn test_stop_short_circuits_resolution() {
        let mut engine = listening("Heart Disease");
        let resolution = engine.handle_transcript("cholesterol 200 stop");
        assert_eq!(resolution, Resolution::StopRequested);
        assert_eq!(engine.mode(), ListeningMode::Idle);
        assert!(engine.state().is_empty());
    }

    #[test]
    fn test_transcript_is_lowercased() {
        let mut engine = listening("Heart Disease");
        let resolution = engine.handle_transcript("  Cholesterol 200 ");
        assert_eq!(resolution.status(), "filled Cholesterol with 200");
    }

    #[test]
    fn test_keyword_assignment_source() {
        let engine = listening("Heart Disease");
        let assignment = engine.resolve("max hr 150").unwrap();
        assert_eq!(assignment.field, "MaxHR");
        assert_eq!(
            assignment.source,
            AssignmentSource::Keyword { field_key: "maxhr", keyword: "max hr" }
        );
    }

    #[test]
    fn test_unresolved_is_logged_not_assigned() {
        let mut engine = listening("Heart Disease");
        let resolution = engine.handle_transcript("good morning");
        assert_eq!(resolution, Resolution::Unresolved);
        assert_eq!(resolution.status(), "no field matched");
        assert!(engine.state().is_empty());
        assert_eq!(engine.state().unresolved().count(), 1);
    }

    #[test]
    fn test_empty_transcript_is_unresolved() {
        let mut engine = listening("Heart Disease");
        assert_eq!(engine.handle_transcript("   "), Resolution::Unresolved);
        assert_eq!(engine.state().unresolved().count(), 0);
    }

    #[test]
    fn test_fallbacks_can_be_disabled() {
        let config = FormConfig::default()
            .with_numeric_fallback(false)
            .with_gender_fallback(false);
        let mut engine = ResolutionEngine::new("Diabetes", config).unwrap();
        engine.start_listening();

        assert_eq!(engine.handle_transcript("forty two"), Resolution::Unresolved);
        assert_eq!(engine.handle_transcript("i am male"), Resolution::Unresolved);
    }

    #[test]
    fn test_switch_to_unknown_schema_keeps_state() {
        let mut engine = listening("Heart Disease");
        engine.handle_transcript("cholesterol 200");
        let session = engine.state().session_id();

        assert!(engine.switch_schema("Thyroid").is_err());
        assert_eq!(engine.schema().name, "Heart Disease");
        assert_eq!(engine.state().session_id(), session);
        assert_eq!(engine.state().len(), 1);
    }

    #[test]
    fn test_switch_keeps_listening_mode() {
        let mut engine = listening("Heart Disease");
        engine.switch_schema("Diabetes").unwrap();
        assert_eq!(engine.mode(), ListeningMode::Listening);
        assert_eq!(engine.keyword_table(), &engine.schema().keyword_table());
    }

    #[test]
    fn test_end_listening() {
        let mut engine = listening("Heart Disease");
        engine.end_listening();
        assert_eq!(engine.mode(), ListeningMode::Idle);
        assert_eq!(engine.handle_transcript("cholesterol 200"), Resolution::Ignored);
    }

    #[test]
    fn test_unmapped_keyword_blocks_numeric_fallback() {
        let mut engine = listening("Heart Disease");
        engine.handle_transcript("age 54");

        assert_eq!(engine.handle_transcript("my weight is 90 kg"), Resolution::Unresolved);
        assert_eq!(engine.handle_transcript("height 180 cm"), Resolution::Unresolved);
        assert_eq!(engine.state().get("Age"), Some(&FieldValue::Number(54.0)));
        assert_eq!(engine.state().unresolved().count(), 2);
    }

    #[test]
    fn test_large_unresolved_capacity_is_accepted() {
        let config = FormConfig {
            unresolved_log_capacity: usize::MAX / 2,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        let mut engine = ResolutionEngine::new("Heart Disease", config).unwrap();
        engine.start_listening();
        engine.handle_transcript("good morning");
        assert_eq!(engine.state().unresolved().count(), 1);
    }

    #[test]
    fn test_transcript_redaction_follows_config() {
        let engine = listening("Heart Disease");
        assert_eq!(engine.redactor.redact("cholesterol 200"), "cholesterol ***");

        let config = FormConfig {
            redact_transcripts: false,
            ..Default::default()
        };
        let engine = ResolutionEngine::new("Heart Disease", config).unwrap();
        assert_eq!(engine.redactor.redact("cholesterol 200"), "cholesterol 200");
    }

    #[test]
    fn test_resolution_serializes_with_outcome_tag() {
        let engine = listening("Heart Disease");
        let resolution = Resolution::Filled(engine.resolve("cholesterol 200").unwrap());
        let json = serde_json::to_value(&resolution).unwrap();
        assert_eq!(json["outcome"], "filled");
        assert_eq!(json["assignment"]["field"], "Cholesterol");
        assert_eq!(json["assignment"]["source"]["kind"], "keyword");
    }
}
