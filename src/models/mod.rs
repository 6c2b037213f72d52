pub mod document;
pub mod file_type;
pub mod section;

pub use document::{DocumentHistory, DocumentMetadata, ParsedDocument};
pub use file_type::FileType;
pub use section::DocumentSection;
