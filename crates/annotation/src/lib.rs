//! Phrase annotation workflow
//!
//! Loads article datasets, segments them into phrases, presents the phrases
//! in a seeded random order for binary judgments and persists progress.

pub mod artifacts;
pub mod dataset;
pub mod error;
pub mod schema;
pub mod session;
pub mod store;
pub mod workbench;

pub use artifacts::*;
pub use dataset::*;
pub use error::*;
pub use schema::*;
pub use session::*;
pub use store::*;
pub use workbench::*;

pub use segmenter::{ArticleMetadata, Phrase};
