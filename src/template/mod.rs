pub mod cache;
pub mod registry;
pub mod render;
pub mod scanner;
pub mod structure;

pub use cache::TemplateCache;
pub use registry::{Rendered, TemplateRegistry};
pub use scanner::{DirectiveKind, ScannedLine};
pub use structure::{Branch, ConditionalBlock, Segment, Structure};
