pub mod catalog;
pub mod episode;
pub mod metadata;

pub use catalog::Catalog;
pub use episode::{Episode, Violation};
pub use metadata::VideoMetadata;
