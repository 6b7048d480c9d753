//! Built-in generators and the assembler that orders them.

mod assembler;
pub mod steps;
mod templates;

pub use assembler::assemble;
pub use steps::{CreateRoot, DependencyVendoring, FileSet, ValidateName, VcsInit};
