use crate::schema::{Schema, SchemaId};
use crate::value::{FieldValue, RawValue};

/// Normalization rule selected by field key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory {
    Gender,
    Smoking,
    BinaryIndicator,
    CancerHistory,
    ChestPainType,
    ExerciseAngina,
    GeneticRisk,
    Passthrough,
}

impl FieldCategory {
    pub fn of(field_key: &str) -> Self {
        match field_key {
            "gender" | "sex" => FieldCategory::Gender,
            "smoking" | "smoking_history" => FieldCategory::Smoking,
            "hypertension" | "heart_disease" => FieldCategory::BinaryIndicator,
            "cancerhistory" => FieldCategory::CancerHistory,
            "chestpaintype" => FieldCategory::ChestPainType,
            "exerciseangina" => FieldCategory::ExerciseAngina,
            "geneticrisk" => FieldCategory::GeneticRisk,
            _ => FieldCategory::Passthrough,
        }
    }
}

/// Chest pain markers, checked in order against the whole transcript.
/// "ta" also occurs inside unrelated words; the order is kept as is.
const CHEST_PAIN_MARKERS: &[(&[&str], &str)] = &[
    (&["typical", "ata"], "ATA"),
    (&["non-anginal", "ta"], "TA"),
    (&["asymptomatic", "asy"], "ASY"),
    (&["atypical", "nap"], "NAP"),
];

/// Convert a raw value into the representation the schema stores.
///
/// Never fails: out-of-range numbers are written as they were spoken.
pub fn normalize(field_key: &str, raw: RawValue, transcript: &str, schema: &Schema) -> FieldValue {
    match FieldCategory::of(field_key) {
        FieldCategory::Gender => gender(&raw, transcript),
        FieldCategory::Smoking => smoking(&raw, schema),
        FieldCategory::BinaryIndicator => FieldValue::Integer(i64::from(raw.is_one())),
        FieldCategory::CancerHistory => yes_no(&raw, "Yes", "No"),
        FieldCategory::ChestPainType => chest_pain_type(raw, transcript),
        FieldCategory::ExerciseAngina => yes_no(&raw, "Y", "N"),
        FieldCategory::GeneticRisk => genetic_risk(raw),
        FieldCategory::Passthrough => raw.into(),
    }
}

fn gender(raw: &RawValue, transcript: &str) -> FieldValue {
    let is_male = matches!(raw, RawValue::Term(term) if term == "Male") || transcript.contains("male");
    FieldValue::text(if is_male { "Male" } else { "Female" })
}

fn smoking(raw: &RawValue, schema: &Schema) -> FieldValue {
    if schema.id == SchemaId::Diabetes {
        yes_no(raw, "current", "never")
    } else {
        yes_no(raw, "Yes", "No")
    }
}

fn yes_no(raw: &RawValue, yes: &str, no: &str) -> FieldValue {
    FieldValue::text(if raw.is_one() { yes } else { no })
}

fn chest_pain_type(raw: RawValue, transcript: &str) -> FieldValue {
    CHEST_PAIN_MARKERS
        .iter()
        .find(|(markers, _)| markers.iter().any(|marker| transcript.contains(marker)))
        .map(|(_, code)| FieldValue::text(*code))
        .unwrap_or_else(|| raw.into())
}

fn genetic_risk(raw: RawValue) -> FieldValue {
    match raw {
        RawValue::Number(n) => FieldValue::Integer(n.round() as i64),
        other => other.into(),
    }
}
