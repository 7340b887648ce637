//! Schema-driven meta tag extraction
//!
//! Populates nested Rust structures from the `<meta>` annotations of an HTML
//! document:
//! - Scalar fields (text, integer) from prioritized annotation keys
//! - Nested and embedded sub-structures
//! - Repeated elements such as multiple `og:image` entries
//! - Runtime JSON schemas and a C ABI for non-Rust hosts
//!
//! ```rust,ignore
//! let info: OgpPageInfo = ogp_parser::extract_from_html(html)?;
//! ```

pub mod document;
pub mod dynamic;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod fetch;
pub mod ogp;
pub mod schema;

pub use document::{Document, MetaSelector};
pub use dynamic::{FieldSpec, FieldType, Record, SchemaSpec};
pub use engine::{extract, extract_from_bytes, extract_from_html, populate, populate_with, Walker};
pub use error::{ExtractError, Result};
pub use ffi::*;
pub use fetch::{fetch_into, fetch_page_info, page_info_from_response, FetchConfig};
pub use ogp::{page_info_from_html, OgpAudio, OgpImage, OgpPageInfo, OgpVideo};
pub use schema::{Field, FieldKind, MetaSchema, Scalar, ScalarKind, Schema, Slot};
