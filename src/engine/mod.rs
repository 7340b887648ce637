//! Extraction engine
//!
//! Entry points that run the walker over a document for a target structure.
//! Each call works on its own copy of the document, so one parsed document
//! can back any number of independent extractions.

mod binder;
mod collector;
mod walker;

pub use binder::*;
pub use walker::Walker;

use tracing::debug;

use crate::document::Document;
use crate::error::Result;
use crate::schema::{MetaSchema, Schema};

/// Populate `target` from `document` using an explicit schema.
pub fn populate_with<T>(schema: &Schema<T>, document: &Document, target: &mut T) -> Result<()> {
    debug!(fields = schema.len(), "populating target");
    Walker::new(document).walk(schema, target)
}

/// Populate `target` from `document` using the type's own schema.
pub fn populate<T: MetaSchema>(document: &Document, target: &mut T) -> Result<()> {
    populate_with(&T::schema(), document, target)
}

/// Build a fresh `T` from `document`.
pub fn extract<T: MetaSchema>(document: &Document) -> Result<T> {
    let mut target = T::default();
    populate(document, &mut target)?;
    Ok(target)
}

pub fn extract_from_html<T: MetaSchema>(html: &str) -> Result<T> {
    extract(&Document::parse(html))
}

pub fn extract_from_bytes<T: MetaSchema>(html: &[u8]) -> Result<T> {
    extract(&Document::from_bytes(html))
}
