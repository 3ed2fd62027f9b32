//! Service documents and the protocol's entry extensions.

pub mod accept_packaging;
pub mod collection;
pub mod entry;
pub mod error_document;
pub mod service;
pub mod workspace;

pub use accept_packaging::QualityValue;
pub use collection::Collection;
pub use entry::SwordEntry;
pub use error_document::ErrorDocument;
pub use service::{Service, ServiceLevel};
pub use workspace::Workspace;
