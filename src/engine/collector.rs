//! Repeated-element collection
//!
//! The document query only ever yields the first match for a key, so the
//! collector runs the walker on a private copy of the document in consuming
//! mode: every value read detaches its `meta` element and the next candidate
//! sees the following match. Scanning stops on the first candidate that
//! matched nothing or that equals the element accepted before it (the zero
//! value, for the first candidate).

use tracing::debug;

use crate::error::Result;
use crate::schema::Schema;

use super::walker::Walker;

pub(crate) fn collect<U, Z>(parent: &mut Walker, schema: &Schema<U>, zero: Z) -> Result<Vec<U>>
where
    U: PartialEq,
    Z: Fn() -> U,
{
    let mut scan = Walker::scanning(parent.document().clone());
    let mut items: Vec<U> = Vec::new();

    loop {
        let mut candidate = zero();
        let before = scan.matched();
        scan.walk(schema, &mut candidate)?;

        if scan.matched() == before {
            break;
        }

        let repeated = match items.last() {
            Some(previous) => *previous == candidate,
            None => candidate == zero(),
        };
        if repeated {
            break;
        }

        items.push(candidate);
    }

    // matches inside the scan count for the enclosing candidate
    parent.record_matches(scan.matched());

    debug!(accepted = items.len(), fields = schema.len(), "collection scan finished");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::error::ExtractError;
    use crate::schema::MetaSchema;

    #[derive(Debug, Default, PartialEq)]
    struct Image {
        url: String,
        width: i64,
    }

    impl MetaSchema for Image {
        fn schema() -> Schema<Self> {
            Schema::<Self>::new()
                .text("url", ["og:image", "og:image:url"], |i, v| i.url = v)
                .integer("width", ["og:image:width"], |i, v| i.width = v)
        }
    }

    fn collect_images(html: &str) -> Result<Vec<Image>> {
        let document = Document::parse(html);
        let mut walker = Walker::new(&document);
        walker.collect(&Image::schema(), Image::default)
    }

    #[test]
    fn test_empty_document_yields_nothing() {
        assert!(collect_images("<html></html>").unwrap().is_empty());
    }

    #[test]
    fn test_distinct_elements_are_collected_in_order() {
        let images = collect_images(
            r#"
            <meta property="og:image" content="https://example.com/1.png">
            <meta property="og:image:width" content="100">
            <meta property="og:image" content="https://example.com/2.png">
            <meta property="og:image:width" content="200">
            <meta property="og:image" content="https://example.com/3.png">
            "#,
        )
        .unwrap();

        assert_eq!(
            images,
            vec![
                Image { url: "https://example.com/1.png".into(), width: 100 },
                Image { url: "https://example.com/2.png".into(), width: 200 },
                Image { url: "https://example.com/3.png".into(), width: 0 },
            ]
        );
    }

    #[test]
    fn test_repeated_element_collected_once() {
        let images = collect_images(
            r#"
            <meta property="og:image" content="https://example.com/same.png">
            <meta property="og:image" content="https://example.com/same.png">
            <meta property="og:image" content="https://example.com/same.png">
            "#,
        )
        .unwrap();

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].url, "https://example.com/same.png");
    }

    #[test]
    fn test_alternate_keys_feed_later_candidates() {
        let images = collect_images(
            r#"
            <meta property="og:image" content="https://example.com/a.png">
            <meta property="og:image:url" content="https://example.com/b.png">
            "#,
        )
        .unwrap();

        let urls: Vec<&str> = images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["https://example.com/a.png", "https://example.com/b.png"]);
    }

    #[test]
    fn test_alias_repeating_a_value_is_not_a_new_element() {
        let images = collect_images(
            r#"
            <meta property="og:image" content="https://example.com/a.png">
            <meta property="og:image:url" content="https://example.com/a.png">
            <meta property="og:image" content="https://example.com/b.png">
            <meta property="og:image:url" content="https://example.com/b.png">
            "#,
        )
        .unwrap();

        let urls: Vec<&str> = images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["https://example.com/a.png", "https://example.com/b.png"]);
    }

    #[test]
    fn test_empty_first_candidate_ends_the_scan() {
        let images = collect_images(
            r#"
            <meta property="og:image" content="">
            <meta property="og:image" content="https://example.com/b.png">
            "#,
        )
        .unwrap();
        assert!(images.is_empty());
    }

    #[test]
    fn test_elements_filled_only_by_inner_collections() {
        #[derive(Debug, Default, PartialEq)]
        struct Gallery {
            pics: Vec<Image>,
        }

        impl MetaSchema for Gallery {
            fn schema() -> Schema<Self> {
                Schema::<Self>::new().collection("pics", |g| &mut g.pics)
            }
        }

        let document = Document::parse(r#"<meta property="og:image" content="https://example.com/a.png">"#);
        let mut walker = Walker::new(&document);
        let galleries = walker.collect(&Gallery::schema(), Gallery::default).unwrap();

        assert_eq!(galleries.len(), 1);
        assert_eq!(galleries[0].pics.len(), 1);
        assert_eq!(galleries[0].pics[0].url, "https://example.com/a.png");
        assert!(walker.matched() > 0);
    }

    #[test]
    fn test_scan_leaves_parent_document_untouched() {
        let document = Document::parse(
            r#"
            <meta property="og:image" content="https://example.com/1.png">
            <meta property="og:image" content="https://example.com/2.png">
            "#,
        );
        let mut walker = Walker::new(&document);

        let first = walker.collect(&Image::schema(), Image::default).unwrap();
        let second = walker.collect(&Image::schema(), Image::default).unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_error_discards_partial_collection() {
        #[derive(Debug, Default, PartialEq)]
        struct Flaky {
            url: String,
            bad: String,
        }

        impl MetaSchema for Flaky {
            fn schema() -> Schema<Self> {
                Schema::<Self>::new()
                    .text("url", ["og:image"], |f, v| f.url = v)
                    .text("bad", [r#"og:"image"#], |f, v| f.bad = v)
            }
        }

        let document = Document::parse(r#"<meta property="og:image" content="x.png">"#);
        let err = Walker::new(&document).collect(&Flaky::schema(), Flaky::default).unwrap_err();
        assert!(matches!(err, ExtractError::DocumentQueryFailure { .. }));
    }
}
