use lazy_static::lazy_static;
use regex::Regex;
use crate::schema::Schema;

lazy_static! {
    static ref LEADING_DECIMAL_REGEX: Regex =
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?").unwrap();
}

const UNIT_WORDS: &[(&str, u32)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

const TENS_WORDS: &[(&str, u32)] = &[
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

/// Canonical names assumed non-numeric when no priority field exists
const NON_NUMERIC_FIELDS: &[&str] = &["gender", "sex", "smoking_history"];

const PRIORITY_MARKERS: &[&str] = &["age", "weight", "height"];

fn unit_value(word: &str) -> Option<u32> {
    UNIT_WORDS.iter().find(|(w, _)| *w == word).map(|(_, n)| *n)
}

fn tens_value(word: &str) -> Option<u32> {
    TENS_WORDS.iter().find(|(w, _)| *w == word).map(|(_, n)| *n)
}

/// Parse the leading decimal of a token ("72kg" is 72, "2.5e2kg" is 250).
///
/// Values that overflow to infinity are not numbers.
fn leading_decimal(token: &str) -> Option<f64> {
    LEADING_DECIMAL_REGEX
        .find(token)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn number_word(word: &str) -> Option<u32> {
    if let Some((tens, unit)) = word.split_once('-') {
        let tens = tens_value(tens)?;
        return unit_value(unit).filter(|u| (1..=9).contains(u)).map(|u| tens + u);
    }
    unit_value(word).or_else(|| tens_value(word))
}

/// First number in a transcript, digits or spoken words.
///
/// Tokens are whitespace-separated. A tens word directly followed by a
/// unit word from one to nine is read as one number ("forty two" is 42).
pub fn find_number(transcript: &str) -> Option<f64> {
    let tokens: Vec<&str> = transcript.split_whitespace().collect();

    tokens.iter().enumerate().find_map(|(index, token)| {
        if let Some(number) = leading_decimal(token) {
            return Some(number);
        }

        let value = number_word(token)?;
        let unit = tokens
            .get(index + 1)
            .filter(|_| tens_value(token).is_some())
            .and_then(|next| unit_value(next))
            .filter(|u| (1..=9).contains(u))
            .unwrap_or(0);

        Some(f64::from(value + unit))
    })
}

/// Field that receives an unclaimed number.
///
/// The first expected field whose name mentions age, weight or height;
/// failing that, the first field not known to be categorical.
pub fn target_field(schema: &Schema) -> Option<&'static str> {
    schema
        .field_names()
        .find(|name| {
            let lower = name.to_lowercase();
            PRIORITY_MARKERS.iter().any(|marker| lower.contains(marker))
        })
        .or_else(|| {
            schema
                .field_names()
                .find(|name| !NON_NUMERIC_FIELDS.contains(&name.to_lowercase().as_str()))
        })
}

/// Number and destination field for a transcript no keyword claimed
pub fn assign_number(transcript: &str, schema: &Schema) -> Option<(&'static str, f64)> {
    let number = find_number(transcript)?;
    target_field(schema).map(|field| (field, number))
}

/// Gender field and term for a transcript that only mentions male/female.
///
/// "male" is tested first and is a substring of "female".
pub fn assign_gender(transcript: &str, schema: &Schema) -> Option<(&'static str, &'static str)> {
    let field = schema.gender_field()?;
    if transcript.contains("male") {
        Some((field, "Male"))
    } else if transcript.contains("female") {
        Some((field, "Female"))
    } else {
        None
    }
}
