//! Speaker identification by closest DTW template.
//!
//! Scores a candidate feature sequence against a bank of enrolled templates
//! with one of the `speakerid-dtw` variants and picks the closest template,
//! or none when every template exceeds the rejection threshold.

mod config;
mod error;
mod result;
mod search;
mod template;

pub use config::{MatchConfig, SearchStrategy, Variant};
pub use error::MatchError;
pub use result::{Identification, Match, TemplateScore};
pub use template::{SpeakerId, Template, TemplateBank};
