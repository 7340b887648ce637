//! Document adapter over a parsed HTML tree
//!
//! Exposes the two queries the walker needs: find the `meta` elements
//! carrying an annotation key, and read an attribute from one of them.

use std::fmt;

use scraper::{ElementRef, Html, Selector};

use crate::error::{ExtractError, Result};

/// Attribute holding the annotation value on a `meta` element.
pub const CONTENT_ATTR: &str = "content";

/// Which `meta` attribute an annotation key is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaAttr {
    /// `<meta property="og:title">`, the Open Graph form
    Property,
    /// `<meta name="description">`, the classic HTML form
    Name,
}

impl MetaAttr {
    pub fn as_str(self) -> &'static str {
        match self {
            MetaAttr::Property => "property",
            MetaAttr::Name => "name",
        }
    }
}

/// `meta` element whose `property` or `name` attribute equals a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaSelector {
    attr: MetaAttr,
    key: String,
}

impl MetaSelector {
    pub fn property(key: impl Into<String>) -> Self {
        Self {
            attr: MetaAttr::Property,
            key: key.into(),
        }
    }

    pub fn name(key: impl Into<String>) -> Self {
        Self {
            attr: MetaAttr::Name,
            key: key.into(),
        }
    }

    pub fn attr(&self) -> MetaAttr {
        self.attr
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn compile(&self) -> Result<Selector> {
        let css = self.to_string();
        Selector::parse(&css).map_err(|e| ExtractError::DocumentQueryFailure {
            reason: e.to_string(),
            selector: css.clone(),
        })
    }
}

impl fmt::Display for MetaSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#"meta[{}="{}"]"#, self.attr.as_str(), self.key)
    }
}

/// Parsed document. Cloning is cheap enough to give every extraction call
/// its own copy; nothing here is shared between copies.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Parse raw bytes, replacing invalid UTF-8 sequences.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(bytes))
    }

    pub fn from_html(html: Html) -> Self {
        Self { html }
    }

    /// All elements matching `selector`, in document order.
    pub fn find(&self, selector: &MetaSelector) -> Result<Vec<ElementRef<'_>>> {
        let css = selector.compile()?;
        Ok(self.html.select(&css).collect())
    }

    /// Read a named attribute from an element.
    pub fn attribute(element: &ElementRef<'_>, name: &str) -> Option<String> {
        element.value().attr(name).map(String::from)
    }

    /// `content` of the first element matching `selector`.
    ///
    /// Only the first match is inspected: if it has no `content` attribute the
    /// result is `None` even when later matches carry one. With `consume` set,
    /// the element that produced the value is detached from this document so
    /// the next query for the same selector sees the following match.
    pub fn first_content(&mut self, selector: &MetaSelector, consume: bool) -> Result<Option<String>> {
        let css = selector.compile()?;
        let hit = self.html.select(&css).next().and_then(|el| {
            el.value()
                .attr(CONTENT_ATTR)
                .map(|content| (el.id(), content.to_string()))
        });

        match hit {
            Some((id, content)) => {
                if consume {
                    if let Some(mut node) = self.html.tree.get_mut(id) {
                        node.detach();
                    }
                }
                Ok(Some(content))
            }
            None => Ok(None),
        }
    }

    /// Detach the first match of `selector` if its content equals `content`.
    ///
    /// Returns whether an element was detached.
    pub fn consume_first_if(&mut self, selector: &MetaSelector, content: &str) -> Result<bool> {
        let css = selector.compile()?;
        let id = self
            .html
            .select(&css)
            .next()
            .filter(|el| el.value().attr(CONTENT_ATTR) == Some(content))
            .map(|el| el.id());

        match id.and_then(|id| self.html.tree.get_mut(id)) {
            Some(mut node) => {
                node.detach();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// `content` of every element matching `selector` that has one.
    pub fn all_contents(&mut self, selector: &MetaSelector, consume: bool) -> Result<Vec<String>> {
        let css = selector.compile()?;
        let hits: Vec<_> = self
            .html
            .select(&css)
            .filter_map(|el| {
                el.value()
                    .attr(CONTENT_ATTR)
                    .map(|content| (el.id(), content.to_string()))
            })
            .collect();

        let mut contents = Vec::with_capacity(hits.len());
        for (id, content) in hits {
            if consume {
                if let Some(mut node) = self.html.tree.get_mut(id) {
                    node.detach();
                }
            }
            contents.push(content);
        }
        Ok(contents)
    }
}
