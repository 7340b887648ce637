//! Schema description consumed by the walker
//!
//! A [`Schema`] is an ordered table of field descriptors for a target type
//! `T`. Each descriptor carries its kind, its annotation keys (scalar fields
//! only) and the accessor used to write into `T`, so the walker never needs
//! to inspect `T` itself.
//!
//! ```rust,ignore
//! impl MetaSchema for Article {
//!     fn schema() -> Schema<Self> {
//!         Schema::<Self>::new()
//!             .text("title", ["og:title", "twitter:title"], |a, v| a.title = v)
//!             .integer("width", ["og:image:width"], |a, v| a.width = v)
//!             .collection("images", |a| &mut a.images)
//!     }
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::Walker;
use crate::error::Result;

/// Types that can be populated from document annotations.
///
/// `Default` supplies the zero value every field starts from and `PartialEq`
/// drives the collection termination rule.
pub trait MetaSchema: Default + PartialEq + 'static {
    fn schema() -> Schema<Self>;
}

/// Primitive type of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    Text,
    Integer,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Text => f.write_str("text"),
            ScalarKind::Integer => f.write_str("integer"),
        }
    }
}

/// A converted scalar value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
}

/// Typed writer for one scalar slot of `T`.
pub enum Slot<T> {
    Text(Box<dyn Fn(&mut T, String)>),
    Integer(Box<dyn Fn(&mut T, i64)>),
}

impl<T> Slot<T> {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Slot::Text(_) => ScalarKind::Text,
            Slot::Integer(_) => ScalarKind::Integer,
        }
    }

    /// Write `value` into `target`. A value of the wrong kind is ignored.
    pub fn assign(&self, target: &mut T, value: Scalar) {
        match (self, value) {
            (Slot::Text(set), Scalar::Text(v)) => set(target, v),
            (Slot::Integer(set), Scalar::Integer(v)) => set(target, v),
            _ => {}
        }
    }
}

/// Callback that descends into a nested or collection field.
pub type Descend<T> = Box<dyn Fn(&mut T, &mut Walker) -> Result<()>>;

/// What a field is and how it is filled.
pub enum FieldKind<T> {
    /// Single value, first matching key wins
    Scalar { keys: Vec<String>, slot: Slot<T> },
    /// Every matching value for every key, appended in order
    List { keys: Vec<String>, slot: Slot<T> },
    /// Sub-structure walked against the same document
    Nested(Descend<T>),
    /// Repeated sub-structure built by the collector
    Collection(Descend<T>),
}

pub struct Field<T> {
    name: String,
    kind: FieldKind<T>,
}

impl<T> Field<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind<T> {
        &self.kind
    }

    /// Annotation keys in priority order; empty for nested and collection fields.
    pub fn keys(&self) -> &[String] {
        match &self.kind {
            FieldKind::Scalar { keys, .. } | FieldKind::List { keys, .. } => keys,
            FieldKind::Nested(_) | FieldKind::Collection(_) => &[],
        }
    }

    fn label(&self) -> &'static str {
        match &self.kind {
            FieldKind::Scalar { slot, .. } => match slot.kind() {
                ScalarKind::Text => "text",
                ScalarKind::Integer => "integer",
            },
            FieldKind::List { slot, .. } => match slot.kind() {
                ScalarKind::Text => "text_list",
                ScalarKind::Integer => "integer_list",
            },
            FieldKind::Nested(_) => "nested",
            FieldKind::Collection(_) => "collection",
        }
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.label())
            .field("keys", &self.keys())
            .finish()
    }
}

/// Ordered field table for `T`, built with the chained methods below.
pub struct Schema<T> {
    fields: Vec<Field<T>>,
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.fields).finish()
    }
}

fn collect_keys<I>(keys: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    keys.into_iter().map(Into::into).collect()
}

impl<T> Schema<T> {
    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T: 'static> Schema<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, name: impl Into<String>, kind: FieldKind<T>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            kind,
        });
        self
    }

    /// String field filled from the first key with a match.
    pub fn text<I, F>(self, name: impl Into<String>, keys: I, set: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        F: Fn(&mut T, String) + 'static,
    {
        let keys = collect_keys(keys);
        self.push(name, FieldKind::Scalar { keys, slot: Slot::Text(Box::new(set)) })
    }

    /// Integer field; non-numeric content leaves it untouched.
    pub fn integer<I, F>(self, name: impl Into<String>, keys: I, set: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        F: Fn(&mut T, i64) + 'static,
    {
        let keys = collect_keys(keys);
        self.push(name, FieldKind::Scalar { keys, slot: Slot::Integer(Box::new(set)) })
    }

    /// Every matching string value, `push` is called once per value.
    pub fn text_list<I, F>(self, name: impl Into<String>, keys: I, push: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        F: Fn(&mut T, String) + 'static,
    {
        let keys = collect_keys(keys);
        self.push(name, FieldKind::List { keys, slot: Slot::Text(Box::new(push)) })
    }

    /// Every matching integer value; unparsable ones are dropped.
    pub fn integer_list<I, F>(self, name: impl Into<String>, keys: I, push: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        F: Fn(&mut T, i64) + 'static,
    {
        let keys = collect_keys(keys);
        self.push(name, FieldKind::List { keys, slot: Slot::Integer(Box::new(push)) })
    }

    /// Optional sub-structure. It is allocated before the walk descends into
    /// it, so it is always `Some` after a successful populate.
    pub fn nested<U: MetaSchema>(self, name: impl Into<String>, access: fn(&mut T) -> &mut Option<U>) -> Self {
        self.nested_with(name, move |target: &mut T, walker: &mut Walker| {
            let inner = access(target).get_or_insert_with(U::default);
            walker.walk(&U::schema(), inner)
        })
    }

    /// Sub-structure held by value.
    pub fn embedded<U: MetaSchema>(self, name: impl Into<String>, access: fn(&mut T) -> &mut U) -> Self {
        self.nested_with(name, move |target: &mut T, walker: &mut Walker| {
            walker.walk(&U::schema(), access(target))
        })
    }

    /// Repeated sub-structure; collected elements are appended to the vector.
    pub fn collection<U: MetaSchema>(self, name: impl Into<String>, access: fn(&mut T) -> &mut Vec<U>) -> Self {
        self.collection_with(name, move |target: &mut T, walker: &mut Walker| {
            let items = walker.collect(&U::schema(), U::default)?;
            access(target).extend(items);
            Ok(())
        })
    }

    pub(crate) fn nested_with<F>(self, name: impl Into<String>, descend: F) -> Self
    where
        F: Fn(&mut T, &mut Walker) -> Result<()> + 'static,
    {
        self.push(name, FieldKind::Nested(Box::new(descend)))
    }

    pub(crate) fn collection_with<F>(self, name: impl Into<String>, descend: F) -> Self
    where
        F: Fn(&mut T, &mut Walker) -> Result<()> + 'static,
    {
        self.push(name, FieldKind::Collection(Box::new(descend)))
    }
}
