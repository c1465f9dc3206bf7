use std::collections::{BTreeMap, VecDeque};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::schema::{Schema, SchemaId};
use crate::value::FieldValue;

/// Whether transcripts are being routed into the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListeningMode {
    Idle,
    Listening,
}

/// Transcript that produced no assignment, kept for diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnresolvedTranscript {
    pub transcript: String,
    pub received_at: DateTime<Utc>,
}

/// Field assignments for one active schema.
///
/// Replaced wholesale when the schema changes; never cleared field by field.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    session_id: Uuid,
    schema: SchemaId,
    schema_name: &'static str,
    values: BTreeMap<String, FieldValue>,
    unresolved: VecDeque<UnresolvedTranscript>,
    #[serde(skip)]
    unresolved_capacity: usize,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new(schema: &Schema, unresolved_capacity: usize) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            schema: schema.id,
            schema_name: schema.name,
            values: BTreeMap::new(),
            unresolved: VecDeque::new(),
            unresolved_capacity,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Assigned values keyed by canonical field name
    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Expected fields still unset, in schema order
    pub fn missing_fields(&self, schema: &Schema) -> Vec<&'static str> {
        schema
            .field_names()
            .filter(|name| !self.values.contains_key(*name))
            .collect()
    }

    pub fn is_complete(&self, schema: &Schema) -> bool {
        self.missing_fields(schema).is_empty()
    }

    /// Oldest first
    pub fn unresolved(&self) -> impl Iterator<Item = &UnresolvedTranscript> {
        self.unresolved.iter()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn assign(&mut self, field: &str, value: FieldValue) {
        self.values.insert(field.to_string(), value);
        self.updated_at = Utc::now();
    }

    pub(crate) fn record_unresolved(&mut self, transcript: &str) {
        if self.unresolved_capacity == 0 {
            return;
        }
        while self.unresolved.len() >= self.unresolved_capacity {
            self.unresolved.pop_front();
        }
        self.unresolved.push_back(UnresolvedTranscript {
            transcript: transcript.to_string(),
            received_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRegistry;

    fn heart() -> &'static Schema {
        SchemaRegistry::lookup("Heart Disease").unwrap()
    }

    #[test]
    fn test_new_session_is_empty() {
        let state = SessionState::new(heart(), 4);
        assert!(state.is_empty());
        assert_eq!(state.schema(), SchemaId::HeartDisease);
        assert_eq!(state.schema_name(), "Heart Disease");
        assert_eq!(state.missing_fields(heart()).len(), 11);
        assert!(!state.is_complete(heart()));
    }

    #[test]
    fn test_assign_overwrites() {
        let mut state = SessionState::new(heart(), 4);
        state.assign("Age", FieldValue::Number(40.0));
        state.assign("Age", FieldValue::Number(41.0));
        assert_eq!(state.len(), 1);
        assert_eq!(state.get("Age"), Some(&FieldValue::Number(41.0)));
        assert_eq!(state.missing_fields(heart()).first(), Some(&"Sex"));
    }

    #[test]
    fn test_unresolved_log_is_bounded() {
        let mut state = SessionState::new(heart(), 2);
        state.record_unresolved("one");
        state.record_unresolved("two");
        state.record_unresolved("three");

        let kept: Vec<_> = state.unresolved().map(|u| u.transcript.as_str()).collect();
        assert_eq!(kept, vec!["two", "three"]);
    }

    #[test]
    fn test_capacity_is_not_preallocated() {
        let mut state = SessionState::new(heart(), usize::MAX);
        state.record_unresolved("one");
        state.record_unresolved("two");
        assert_eq!(state.unresolved().count(), 2);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut state = SessionState::new(heart(), 0);
        state.record_unresolved("one");
        assert_eq!(state.unresolved().count(), 0);
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        let first = SessionState::new(heart(), 1);
        let second = SessionState::new(heart(), 1);
        assert_ne!(first.session_id(), second.session_id());
    }
}
