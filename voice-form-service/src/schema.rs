//! Form schemas for voice-driven data entry
//!
//! Each schema describes one prediction form: the fields the scorer
//! expects, the value domain of each field, the spoken trigger phrases
//! that identify a field, and the mapping from the internal field key
//! used for keyword lookup to the canonical name the value is stored under.
//!
//! All tables are static. Lookups never allocate except for
//! [`Schema::keyword_table`], which merges the common table once per
//! schema activation.

use serde::{Deserialize, Serialize};
use crate::error::{FormError, FormResult};

/// Stable identity of a supported schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaId {
    HeartDisease,
    Diabetes,
    CancerDiagnosis,
    BodyFatEstimation,
}

/// Accepted representation of a field value.
///
/// Bounds are advisory for the data-entry surface; the resolution engine
/// never rejects a value for being out of range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueDomain {
    Numeric { min: f64, max: f64 },
    /// Code to human-readable meaning
    Enumerated(&'static [(&'static str, &'static str)]),
    /// 0 or 1
    Boolean01,
    /// "Yes" or "No"
    YesNo,
    CategoricalCode(&'static [&'static str]),
}

impl ValueDomain {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueDomain::Numeric { .. } | ValueDomain::Boolean01)
    }
}

/// Expected field of a schema
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub domain: ValueDomain,
}

/// Trigger phrases for one internal field key, in match priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordEntry {
    pub key: &'static str,
    pub keywords: &'static [&'static str],
}

/// One prediction form
#[derive(Debug)]
pub struct Schema {
    pub id: SchemaId,
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
    pub keywords: &'static [KeywordEntry],
    pub mappings: &'static [(&'static str, &'static str)],
}

impl Schema {
    /// Canonical output name for an internal field key
    pub fn canonical_name(&self, field_key: &str) -> Option<&'static str> {
        self.mappings
            .iter()
            .find(|(key, _)| *key == field_key)
            .map(|(_, name)| *name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn expects(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    /// Canonical name of the gender/sex field, if the schema has one
    pub fn gender_field(&self) -> Option<&'static str> {
        self.field_for("gender").or_else(|| self.field_for("sex"))
    }

    /// Expected field a field key fills, if any
    pub fn field_for(&self, field_key: &str) -> Option<&'static str> {
        self.canonical_name(field_key).filter(|name| self.expects(name))
    }

    /// Common keywords merged with this schema's own.
    ///
    /// Common keys keep their position and take the schema's phrases on
    /// collision; schema-only keys follow in schema order. Keys that do not
    /// fill an expected field stay in the table as unmapped: they still
    /// claim a transcript ("weight 90" in Heart Disease) but assign nothing.
    pub fn keyword_table(&self) -> KeywordTable {
        let mut entries: Vec<KeywordEntry> = COMMON_KEYWORDS
            .iter()
            .map(|common| {
                self.keywords
                    .iter()
                    .find(|own| own.key == common.key)
                    .copied()
                    .unwrap_or(*common)
            })
            .collect();

        entries.extend(
            self.keywords
                .iter()
                .filter(|own| !COMMON_KEYWORDS.iter().any(|common| common.key == own.key))
                .copied(),
        );

        let unmapped = entries
            .iter()
            .map(|entry| entry.key)
            .filter(|key| self.field_for(key).is_none())
            .collect();

        KeywordTable { entries, unmapped }
    }
}

/// Ordered keyword table resolved for one schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    entries: Vec<KeywordEntry>,
    unmapped: Vec<&'static str>,
}

impl KeywordTable {
    /// Entries in match order, unmapped keys included
    pub fn iter(&self) -> impl Iterator<Item = &KeywordEntry> {
        self.entries.iter()
    }

    /// Keys that fill an expected field, in match order
    pub fn field_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries
            .iter()
            .map(|entry| entry.key)
            .filter(|key| !self.is_unmapped(key))
    }

    pub fn is_unmapped(&self, key: &str) -> bool {
        self.unmapped.iter().any(|unmapped| *unmapped == key)
    }

    pub fn get(&self, key: &str) -> Option<&KeywordEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registry of all supported schemas
pub struct SchemaRegistry;

impl SchemaRegistry {
    /// Look up a schema by name, ignoring ASCII case and surrounding whitespace
    pub fn lookup(name: &str) -> FormResult<&'static Schema> {
        let wanted = name.trim();
        SCHEMAS
            .iter()
            .find(|schema| schema.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FormError::UnknownSchema(name.to_string()))
    }

    pub fn all() -> &'static [Schema] {
        SCHEMAS
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        SCHEMAS.iter().map(|schema| schema.name)
    }
}

const fn numeric(name: &'static str, min: f64, max: f64) -> FieldSpec {
    FieldSpec { name, domain: ValueDomain::Numeric { min, max } }
}

const fn field(name: &'static str, domain: ValueDomain) -> FieldSpec {
    FieldSpec { name, domain }
}

const fn keywords(key: &'static str, keywords: &'static [&'static str]) -> KeywordEntry {
    KeywordEntry { key, keywords }
}

/// Shared by every schema, merged in front of the schema-specific table
pub static COMMON_KEYWORDS: &[KeywordEntry] = &[
    keywords("age", &["age", "years", "old", "year"]),
    keywords("bmi", &["bmi", "body mass", "body mass index"]),
    keywords("weight", &["weight", "kg", "pounds"]),
    keywords("height", &["height", "cm", "inches"]),
];

static SCHEMAS: &[Schema] = &[
    Schema {
        id: SchemaId::HeartDisease,
        name: "Heart Disease",
        fields: &[
            numeric("Age", 1.0, 120.0),
            field("Sex", ValueDomain::Enumerated(&[("M", "Male"), ("F", "Female")])),
            field("ChestPainType", ValueDomain::Enumerated(&[
                ("ATA", "Typical Angina"),
                ("NAP", "Non-Atypical Angina"),
                ("ASY", "Asymptomatic"),
                ("TA", "Non-Anginal Pain"),
            ])),
            numeric("RestingBP", 50.0, 250.0),
            numeric("Cholesterol", 0.0, 700.0),
            field("FastingBS", ValueDomain::Boolean01),
            field("RestingECG", ValueDomain::CategoricalCode(&["Normal", "ST", "LVH"])),
            numeric("MaxHR", 50.0, 250.0),
            field("ExerciseAngina", ValueDomain::Enumerated(&[("Y", "Yes"), ("N", "No")])),
            numeric("Oldpeak", 0.0, 10.0),
            field("ST_Slope", ValueDomain::CategoricalCode(&["Up", "Flat", "Down"])),
        ],
        keywords: &[
            keywords("sex", &["sex", "gender"]),
            keywords("chestpaintype", &["chest pain", "pain type", "chest type", "angina"]),
            keywords("restingbp", &["blood pressure", "bp", "resting blood pressure", "resting bp"]),
            keywords("cholesterol", &["cholesterol"]),
            keywords("fastingbs", &["fasting blood sugar", "fasting bs", "sugar level", "fasting sugar"]),
            keywords("restingecg", &["ecg", "resting ecg"]),
            keywords("maxhr", &["heart rate", "max heart rate", "maximum hr", "max hr"]),
            keywords("exerciseangina", &["exercise angina", "angina exercise", "exercise pain"]),
            keywords("oldpeak", &["oldpeak", "st depression", "depression"]),
            keywords("st_slope", &["st slope", "slope"]),
        ],
        mappings: &[
            ("age", "Age"),
            ("sex", "Sex"),
            ("chestpaintype", "ChestPainType"),
            ("restingbp", "RestingBP"),
            ("cholesterol", "Cholesterol"),
            ("fastingbs", "FastingBS"),
            ("restingecg", "RestingECG"),
            ("maxhr", "MaxHR"),
            ("exerciseangina", "ExerciseAngina"),
            ("oldpeak", "Oldpeak"),
            ("st_slope", "ST_Slope"),
        ],
    },
    Schema {
        id: SchemaId::Diabetes,
        name: "Diabetes",
        fields: &[
            field("gender", ValueDomain::CategoricalCode(&["Male", "Female"])),
            numeric("age", 0.0, 120.0),
            field("hypertension", ValueDomain::Boolean01),
            field("heart_disease", ValueDomain::Boolean01),
            field("smoking_history", ValueDomain::CategoricalCode(&[
                "never", "former", "current", "No Info", "ever",
            ])),
            numeric("bmi", 10.0, 70.0),
            numeric("HbA1c_level", 3.0, 20.0),
            numeric("blood_glucose_level", 50.0, 500.0),
        ],
        keywords: &[
            keywords("gender", &["gender", "sex"]),
            keywords("hypertension", &["hypertension", "high blood pressure", "bp high", "high bp"]),
            keywords("heart_disease", &["heart disease", "heart issue", "heart problem"]),
            keywords("smoking_history", &["smoking", "smoke", "smoker", "smoking history"]),
        ],
        mappings: &[
            ("age", "age"),
            ("gender", "gender"),
            ("hypertension", "hypertension"),
            ("heart_disease", "heart_disease"),
            ("smoking_history", "smoking_history"),
            ("bmi", "bmi"),
        ],
    },
    Schema {
        id: SchemaId::CancerDiagnosis,
        name: "Cancer Diagnosis",
        fields: &[
            numeric("Age", 1.0, 120.0),
            field("Gender", ValueDomain::CategoricalCode(&["Female", "Male"])),
            numeric("BMI", 10.0, 60.0),
            field("Smoking", ValueDomain::YesNo),
            field("GeneticRisk", ValueDomain::Enumerated(&[
                ("0", "None"),
                ("1", "Low"),
                ("2", "Medium"),
                ("3", "High"),
            ])),
            numeric("PhysicalActivity", 0.0, 10.0),
            numeric("AlcoholIntake", 0.0, 10.0),
            field("CancerHistory", ValueDomain::YesNo),
        ],
        keywords: &[
            keywords("gender", &["gender", "sex"]),
            keywords("smoking", &["smoking", "smoke", "smoker"]),
            keywords("geneticrisk", &["genetic risk", "genetics", "family history", "genetic"]),
            keywords("physicalactivity", &["physical activity", "exercise", "activity level", "activity"]),
            keywords("alcoholintake", &["alcohol", "drinking", "alcohol intake"]),
            keywords("cancerhistory", &["cancer history", "cancer past", "previous cancer", "cancer before"]),
        ],
        mappings: &[
            ("age", "Age"),
            ("gender", "Gender"),
            ("bmi", "BMI"),
            ("smoking", "Smoking"),
            ("geneticrisk", "GeneticRisk"),
            ("physicalactivity", "PhysicalActivity"),
            ("alcoholintake", "AlcoholIntake"),
            ("cancerhistory", "CancerHistory"),
        ],
    },
    Schema {
        id: SchemaId::BodyFatEstimation,
        name: "Body Fat Estimation",
        fields: &[
            numeric("Density", 1.0, 10.0),
            numeric("Age", 1.0, 120.0),
            numeric("Weight", 1.0, 200.0),
            numeric("Height", 50.0, 250.0),
            numeric("Neck", 10.0, 60.0),
            numeric("Chest", 30.0, 150.0),
            numeric("Abdomen", 30.0, 150.0),
            numeric("Hip", 30.0, 150.0),
            numeric("Thigh", 20.0, 100.0),
            numeric("Knee", 20.0, 70.0),
            numeric("Ankle", 10.0, 40.0),
            numeric("Biceps", 15.0, 60.0),
            numeric("Forearm", 15.0, 60.0),
            numeric("Wrist", 10.0, 30.0),
        ],
        keywords: &[
            keywords("density", &["density", "body density"]),
            keywords("neck", &["neck"]),
            keywords("chest", &["chest"]),
            keywords("abdomen", &["abdomen", "waist"]),
            keywords("hip", &["hip"]),
            keywords("thigh", &["thigh"]),
            keywords("knee", &["knee"]),
            keywords("ankle", &["ankle"]),
            keywords("biceps", &["biceps", "bicep"]),
            keywords("forearm", &["forearm"]),
            keywords("wrist", &["wrist"]),
        ],
        mappings: &[
            ("age", "Age"),
            ("density", "Density"),
            ("weight", "Weight"),
            ("height", "Height"),
            ("neck", "Neck"),
            ("chest", "Chest"),
            ("abdomen", "Abdomen"),
            ("hip", "Hip"),
            ("thigh", "Thigh"),
            ("knee", "Knee"),
            ("ankle", "Ankle"),
            ("biceps", "Biceps"),
            ("forearm", "Forearm"),
            ("wrist", "Wrist"),
        ],
    },
];
