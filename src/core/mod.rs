// Public modules
pub mod config;
pub mod error;
pub mod generator;
pub mod git;
pub mod output;
pub mod paths;
pub mod refactor;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use generator::{GenerateRequest, ProjectGenerator, WorkingTree};
pub use output::{EntryKind, EntryOutcome, GenerateOutput, RenameReport, RenameSummary};
