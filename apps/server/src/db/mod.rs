//! Document store layer
//!
//! The [`DocumentStore`] trait is the only way services touch persistence.
//! [`layout`] fixes where each entity lives in the hierarchy.

pub mod layout;
pub mod memory;
pub mod path;
pub mod store;
pub mod traits;

pub use memory::InMemoryDocumentStore;
pub use path::{CollectionPath, DocumentPath};
pub use store::PostgresDocumentStore;
pub use traits::{Document, DocumentStore, Fields, OrderBy};
