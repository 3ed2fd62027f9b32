//! Atom syndication elements.

pub mod entry;
pub mod generator;
pub mod link;
pub mod person;
pub mod text;

pub use entry::{Entry, EntryRules};
pub use generator::Generator;
pub use link::Link;
pub use person::{Author, Contributor, Person, PersonRole};
pub use text::{ContentType, Rights, Summary, TextConstruct, TextRole, Title};
