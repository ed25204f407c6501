pub mod builder;
pub mod controller;
pub mod error;
pub mod ids;
pub mod json;
pub mod markdown;
pub mod model;
pub mod pipeline;
pub mod raw;

// Re-export key types for easier usage
pub use builder::StreamContentBuilder;
pub use controller::StreamController;
pub use error::{EngineError, IdentifiableError};
pub use ids::{IdGenerator, IncrementalIdGenerator};
pub use markdown::{Block, BlockKind, Card, CellContent, MarkdownEntry, MarkdownTable, Row};
pub use model::*;
pub use raw::xml::XmlElement;
