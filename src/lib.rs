// Crate root: declare modules and control visibility
pub mod annotate;
pub mod annotation;
pub mod config;
pub mod error;
pub mod instruction;
pub mod listing;
pub mod loops;
pub mod recursion;
pub mod render;
pub mod serializer;
pub mod source;

// Re-export commonly used API from the library for binaries/tests
pub use annotate::{annotate, Annotation, Detect};
pub use annotation::{Color, Markup, Palette};
pub use config::AnnotateOptions;
pub use error::AnnotateError;
pub use listing::InstructionTable;
