//! Depth-first schema walker

use tracing::{debug, trace};

use crate::document::{Document, MetaSelector};
use crate::error::Result;
use crate::schema::{FieldKind, Schema, Slot};

use super::binder::{self, ConversionSkip};
use super::collector;

/// Walks a [`Schema`] over its own copy of a document.
///
/// A walker created with [`Walker::new`] only reads. The walkers the
/// collector creates for a collection scan detach every `meta` element they
/// read a value from, so repeated candidates advance through the matches.
pub struct Walker {
    document: Document,
    consume: bool,
    matched: usize,
}

impl Walker {
    pub fn new(document: &Document) -> Self {
        Self {
            document: document.clone(),
            consume: false,
            matched: 0,
        }
    }

    pub(crate) fn scanning(document: Document) -> Self {
        Self {
            document,
            consume: true,
            matched: 0,
        }
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    /// Number of annotation values found so far, including ones that later
    /// failed conversion.
    pub(crate) fn matched(&self) -> usize {
        self.matched
    }

    /// Populate `target` field by field in declaration order.
    ///
    /// Missing or malformed values leave fields at their current value.
    /// Errors from nested structures and collections abort the walk.
    pub fn walk<T>(&mut self, schema: &Schema<T>, target: &mut T) -> Result<()> {
        for field in schema.fields() {
            match field.kind() {
                FieldKind::Nested(descend) => descend(target, self)?,
                FieldKind::Collection(descend) => descend(target, self)?,
                FieldKind::Scalar { keys, slot } => {
                    let Some(raw) = self.lookup(keys)? else {
                        trace!(field = field.name(), "no annotation matched");
                        continue;
                    };
                    if let Err(skip) = bind_into(slot, target, &raw) {
                        debug!(field = field.name(), error = %skip, "skipping malformed value");
                    }
                }
                FieldKind::List { keys, slot } => {
                    for raw in self.lookup_all(keys)? {
                        if let Err(skip) = bind_into(slot, target, &raw) {
                            debug!(field = field.name(), error = %skip, "skipping malformed list value");
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Collect a repeated sub-structure against this walker's document.
    ///
    /// `zero` builds each fresh candidate and is the value a first candidate
    /// is compared against.
    pub(crate) fn collect<U, Z>(&mut self, schema: &Schema<U>, zero: Z) -> Result<Vec<U>>
    where
        U: PartialEq,
        Z: Fn() -> U,
    {
        collector::collect(self, schema, zero)
    }

    pub(crate) fn record_matches(&mut self, count: usize) {
        self.matched += count;
    }

    /// First value for the first key that has one. For each key the
    /// `property` form is tried before the `name` form.
    ///
    /// When consuming, the first match of every lower-priority selector that
    /// carries the same value is detached too, so an alias repeating the
    /// winning value does not become a candidate of its own.
    fn lookup(&mut self, keys: &[String]) -> Result<Option<String>> {
        let selectors: Vec<MetaSelector> = keys
            .iter()
            .flat_map(|key| [MetaSelector::property(key.as_str()), MetaSelector::name(key.as_str())])
            .collect();

        for (at, selector) in selectors.iter().enumerate() {
            let Some(content) = self.document.first_content(selector, self.consume)? else {
                continue;
            };
            trace!(selector = %selector, "annotation matched");
            self.matched += 1;

            if self.consume {
                for alias in &selectors[at + 1..] {
                    if self.document.consume_first_if(alias, &content)? {
                        trace!(selector = %alias, "alias consumed");
                    }
                }
            }
            return Ok(Some(content));
        }
        Ok(None)
    }

    /// Every value for every key, `property` matches before `name` matches.
    fn lookup_all(&mut self, keys: &[String]) -> Result<Vec<String>> {
        let mut values = Vec::new();
        for key in keys {
            for selector in [MetaSelector::property(key.as_str()), MetaSelector::name(key.as_str())] {
                values.extend(self.document.all_contents(&selector, self.consume)?);
            }
        }
        self.matched += values.len();
        Ok(values)
    }
}

fn bind_into<T>(slot: &Slot<T>, target: &mut T, raw: &str) -> std::result::Result<(), ConversionSkip> {
    let value = binder::bind(raw, slot.kind())?;
    slot.assign(target, value);
    Ok(())
}
