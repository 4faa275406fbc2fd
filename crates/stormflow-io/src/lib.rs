//! File I/O, validation, and serialization for the stormflow pipeline.

mod domain;
mod error;
mod project;
mod reader;
mod writer;

pub use domain::RunName;
pub use error::IoError;
pub use project::{PROGRAM_NAME, ProjectDescriptor};
pub use reader::{AnnualMaximaReader, InflowReader, RainfallReader, RatingTableReader};
pub use writer::{HydrographSummary, ResultWriter, RoutingSummary};
