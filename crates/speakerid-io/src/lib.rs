//! File I/O, validation, and serialization for the speakerid pipeline.

mod domain;
mod error;
mod loader;
mod reader;
mod writer;

pub use domain::RunName;
pub use error::IoError;
pub use loader::TemplateLoader;
pub use reader::SequenceReader;
pub use writer::{ComparisonRecord, ResultWriter};
