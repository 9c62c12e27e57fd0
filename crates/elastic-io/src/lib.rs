//! UCR dataset reading, label mapping and JSON result writing.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{ExperimentName, LabelMap, UcrSplit};
pub use error::IoError;
pub use reader::{MISSING_NOISE, UcrReader};
pub use writer::ResultWriter;
