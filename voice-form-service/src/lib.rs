//! Voice Form Service for Healthcare EMR
//!
//! Turns free-form dictated transcripts into structured clinical form
//! fields. Each finalized transcript is matched against the keyword table
//! of the active schema, the spoken value is normalized into the form the
//! schema stores, and the result is written into the session.
//!
//! # Schemas
//!
//! - **Heart Disease** - 11 fields, chest pain and ECG codes
//! - **Diabetes** - 8 fields, smoking history and lab levels
//! - **Cancer Diagnosis** - 8 fields, recoded to numbers on submission
//! - **Body Fat Estimation** - 14 body measurements
//!
//! # Features
//!
//! - Substring keyword matching with first-match-wins field order
//! - Yes/no, gender and chest pain normalization
//! - Spoken number fallback ("forty two") for age, weight or height
//! - Stop directives ("stop listening") halt capture
//! - Async dictation driver over any [`TranscriptSource`]
//! - Number redaction for transcripts written to logs
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use voice_form_service::{ChannelTranscriptSource, DictationService, FormConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (sender, source) = ChannelTranscriptSource::channel(16);
//! let mut service = DictationService::from_config(FormConfig::from_env()?, source)?;
//!
//! sender.send("my resting blood pressure is 130".to_string()).await?;
//! sender.send("stop listening".to_string()).await?;
//!
//! let summary = service.listen().await?;
//! println!("Filled {} fields", summary.filled);
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod config;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod matcher;
pub mod normalizer;
pub mod payload;
pub mod schema;
pub mod service;
pub mod session;
pub mod value;

pub use capture::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use payload::build_payload;
pub use schema::{FieldSpec, KeywordEntry, KeywordTable, Schema, SchemaId, SchemaRegistry, ValueDomain};
pub use service::*;
pub use session::*;
pub use value::{FieldValue, RawValue};
