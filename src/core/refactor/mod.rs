//! Renaming engine: turn every occurrence of the template name into the
//! project name, in file contents and in the tree itself.
//!
//! Occurrences followed by the protected suffix (`TemplateApp.Core`) are left
//! alone everywhere, and nothing on disk is ever overwritten.

mod filter;
mod rewrite;
mod tree;

pub use filter::{to_slash, PathFilter};
pub use rewrite::{has_extension, RenameContext, Rewrite, TextRewriter};
pub use tree::{FaultPolicy, TreeRenamer};
