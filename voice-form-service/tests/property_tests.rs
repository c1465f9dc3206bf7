use proptest::prelude::*;
use voice_form_service::{FormConfig, ListeningMode, Resolution, ResolutionEngine, SchemaRegistry};

fn schema_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(SchemaRegistry::names().collect::<Vec<_>>())
}

/// Phrases built from keywords, numbers and filler
fn dictation() -> impl Strategy<Value = String> {
    let words = prop::sample::select(vec![
        "age", "years", "cholesterol", "blood", "pressure", "bp", "gender", "sex",
        "male", "female", "smoking", "yes", "no", "chest", "pain", "asymptomatic",
        "neck", "wrist", "bmi", "forty", "two", "ten", "is", "my", "about",
        "42", "130", "2.5", "72kg", "hip", "activity", "genetic", "risk",
    ]);
    prop::collection::vec(words, 0..8).prop_map(|words| words.join(" "))
}

fn listening(schema: &str) -> ResolutionEngine {
    let mut engine = ResolutionEngine::new(schema, FormConfig::default()).unwrap();
    engine.start_listening();
    engine
}

proptest! {
    #[test]
    fn test_resolution_is_idempotent(schema in schema_name(), transcript in dictation()) {
        let mut first = listening(schema);
        let mut second = listening(schema);

        let a = first.handle_transcript(&transcript);
        let b = second.handle_transcript(&transcript);

        prop_assert_eq!(a, b);
        prop_assert_eq!(first.state().values(), second.state().values());
    }

    #[test]
    fn test_repeating_a_transcript_changes_nothing(schema in schema_name(), transcript in dictation()) {
        let mut engine = listening(schema);
        engine.handle_transcript(&transcript);
        let once = engine.state().values().clone();

        if engine.mode() == ListeningMode::Listening {
            engine.handle_transcript(&transcript);
        }
        prop_assert_eq!(&once, engine.state().values());
    }

    #[test]
    fn test_assignments_only_touch_expected_fields(schema in schema_name(), transcripts in prop::collection::vec(dictation(), 0..10)) {
        let mut engine = listening(schema);
        for transcript in &transcripts {
            engine.handle_transcript(transcript);
            engine.start_listening();
        }
        for field in engine.state().values().keys() {
            prop_assert!(engine.schema().expects(field));
        }
    }

    #[test]
    fn test_schema_switch_leaves_no_previous_keys(
        from in schema_name(),
        to in schema_name(),
        transcripts in prop::collection::vec(dictation(), 1..6),
    ) {
        let mut engine = listening(from);
        for transcript in &transcripts {
            engine.handle_transcript(transcript);
        }

        engine.switch_schema(to).unwrap();
        prop_assert!(engine.state().is_empty());
        prop_assert_eq!(engine.state().unresolved().count(), 0);
        prop_assert_eq!(engine.state().schema_name(), to);
    }

    #[test]
    fn test_arbitrary_transcripts_never_panic(schema in schema_name(), transcript in "\\PC{0,64}") {
        let mut engine = listening(schema);
        let resolution = engine.handle_transcript(&transcript);
        let _ = resolution.status();
    }

    #[test]
    fn test_resolve_does_not_mutate(schema in schema_name(), transcript in dictation()) {
        let engine = listening(schema);
        let _ = engine.resolve(&transcript);
        prop_assert!(engine.state().is_empty());
    }

    #[test]
    fn test_idle_engine_ignores_everything(schema in schema_name(), transcript in dictation()) {
        let mut engine = ResolutionEngine::new(schema, FormConfig::default()).unwrap();
        prop_assert_eq!(engine.handle_transcript(&transcript), Resolution::Ignored);
        prop_assert!(engine.state().is_empty());
    }
}
