//! Core domain entities.
//!
//! - [`ForwardedDatabase`] - A configured logical database
//! - [`Record`] - One upstream row with its typed properties

pub mod forwarded_database;
pub mod record;

pub use forwarded_database::ForwardedDatabase;
pub use record::{FieldValue, Record, RichTextRun, concat_plain_text};
