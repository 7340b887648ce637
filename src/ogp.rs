//! Open Graph page metadata
//!
//! Stock schema for the `og:` protocol: page-level fields plus repeated
//! images, videos and audio clips.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::engine;
use crate::error::Result;
use crate::schema::{MetaSchema, Schema};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OgpImage {
    pub url: String,
    pub secure_url: String,
    pub mime_type: String,
    pub width: i64,
    pub height: i64,
    pub alt: String,
}

impl MetaSchema for OgpImage {
    fn schema() -> Schema<Self> {
        Schema::<Self>::new()
            .text("url", ["og:image", "og:image:url"], |i, v| i.url = v)
            .text("secure_url", ["og:image:secure_url"], |i, v| i.secure_url = v)
            .text("mime_type", ["og:image:type"], |i, v| i.mime_type = v)
            .integer("width", ["og:image:width"], |i, v| i.width = v)
            .integer("height", ["og:image:height"], |i, v| i.height = v)
            .text("alt", ["og:image:alt"], |i, v| i.alt = v)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OgpVideo {
    pub url: String,
    pub secure_url: String,
    pub mime_type: String,
    pub width: i64,
    pub height: i64,
}

impl MetaSchema for OgpVideo {
    fn schema() -> Schema<Self> {
        Schema::<Self>::new()
            .text("url", ["og:video", "og:video:url"], |v, s| v.url = s)
            .text("secure_url", ["og:video:secure_url"], |v, s| v.secure_url = s)
            .text("mime_type", ["og:video:type"], |v, s| v.mime_type = s)
            .integer("width", ["og:video:width"], |v, n| v.width = n)
            .integer("height", ["og:video:height"], |v, n| v.height = n)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OgpAudio {
    pub url: String,
    pub secure_url: String,
    pub mime_type: String,
}

impl MetaSchema for OgpAudio {
    fn schema() -> Schema<Self> {
        Schema::<Self>::new()
            .text("url", ["og:audio", "og:audio:url"], |a, v| a.url = v)
            .text("secure_url", ["og:audio:secure_url"], |a, v| a.secure_url = v)
            .text("mime_type", ["og:audio:type"], |a, v| a.mime_type = v)
    }
}

/// Page-level Open Graph data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OgpPageInfo {
    pub title: String,
    #[serde(rename = "type")]
    pub og_type: String,
    pub url: String,
    pub site_name: String,
    pub site: String,
    /// Falls back to the classic `<meta name="description">`
    pub description: String,
    pub locale: String,
    pub images: Vec<OgpImage>,
    pub videos: Vec<OgpVideo>,
    pub audios: Vec<OgpAudio>,
}

impl MetaSchema for OgpPageInfo {
    fn schema() -> Schema<Self> {
        Schema::<Self>::new()
            .text("title", ["og:title"], |p, v| p.title = v)
            .text("type", ["og:type"], |p, v| p.og_type = v)
            .text("url", ["og:url"], |p, v| p.url = v)
            .text("site_name", ["og:site_name"], |p, v| p.site_name = v)
            .text("site", ["og:site"], |p, v| p.site = v)
            .text("description", ["og:description", "description"], |p, v| p.description = v)
            .text("locale", ["og:locale"], |p, v| p.locale = v)
            .collection("images", |p| &mut p.images)
            .collection("videos", |p| &mut p.videos)
            .collection("audios", |p| &mut p.audios)
    }
}

/// Extract Open Graph data from raw HTML bytes
pub fn page_info_from_html(html: &[u8]) -> Result<OgpPageInfo> {
    engine::extract_from_bytes(html)
}

pub fn page_info_from_document(document: &Document) -> Result<OgpPageInfo> {
    engine::extract(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_single_image() {
        let html = r#"
        <html>
        <head>
            <meta property="og:title" content="Example">
            <meta property="og:image" content="http://x/im.png">
        </head>
        </html>
        "#;

        let info = page_info_from_html(html.as_bytes()).unwrap();

        assert_eq!(info.title, "Example");
        assert_eq!(info.images.len(), 1);
        assert_eq!(info.images[0].url, "http://x/im.png");
        assert_eq!(info.images[0].width, 0);
        assert_eq!(info.images[0].height, 0);
    }

    #[test]
    fn test_empty_document() {
        let info = page_info_from_html(b"").unwrap();
        assert_eq!(info, OgpPageInfo::default());
    }

    #[test]
    fn test_full_page() {
        let html = r#"
        <html>
        <head>
            <meta property="og:title" content="The Rock">
            <meta property="og:type" content="video.movie">
            <meta property="og:url" content="https://www.imdb.com/title/tt0117500/">
            <meta property="og:site_name" content="IMDb">
            <meta property="og:site" content="imdb.com">
            <meta name="description" content="Classic action movie">
            <meta property="og:locale" content="en_US">
            <meta property="og:image" content="https://example.com/rock.jpg">
            <meta property="og:image:secure_url" content="https://secure.example.com/rock.jpg">
            <meta property="og:image:type" content="image/jpeg">
            <meta property="og:image:width" content="400">
            <meta property="og:image:height" content="300">
            <meta property="og:image:alt" content="A shiny red apple with a bite taken out">
            <meta property="og:image" content="https://example.com/rock2.jpg">
            <meta property="og:image:width" content="1000">
            <meta property="og:image:height" content="800px">
            <meta property="og:video" content="https://example.com/movie.swf">
            <meta property="og:video:width" content="400">
            <meta property="og:audio" content="https://example.com/sound.mp3">
            <meta property="og:audio:type" content="audio/mpeg">
        </head>
        </html>
        "#;

        let info = page_info_from_html(html.as_bytes()).unwrap();

        assert_eq!(info.title, "The Rock");
        assert_eq!(info.og_type, "video.movie");
        assert_eq!(info.url, "https://www.imdb.com/title/tt0117500/");
        assert_eq!(info.site_name, "IMDb");
        assert_eq!(info.site, "imdb.com");
        assert_eq!(info.description, "Classic action movie");
        assert_eq!(info.locale, "en_US");

        assert_eq!(info.images.len(), 2);
        assert_eq!(
            info.images[0],
            OgpImage {
                url: "https://example.com/rock.jpg".into(),
                secure_url: "https://secure.example.com/rock.jpg".into(),
                mime_type: "image/jpeg".into(),
                width: 400,
                height: 300,
                alt: "A shiny red apple with a bite taken out".into(),
            }
        );
        // "800px" is not an integer
        assert_eq!(info.images[1].width, 1000);
        assert_eq!(info.images[1].height, 0);

        assert_eq!(info.videos.len(), 1);
        assert_eq!(info.videos[0].width, 400);
        assert_eq!(info.audios.len(), 1);
        assert_eq!(info.audios[0].mime_type, "audio/mpeg");
    }

    #[test]
    fn test_og_description_preferred() {
        let html = r#"
            <meta name="description" content="Classic">
            <meta property="og:description" content="Open Graph">
        "#;
        let info = page_info_from_html(html.as_bytes()).unwrap();
        assert_eq!(info.description, "Open Graph");
    }

    #[test]
    fn test_serializes_type_field() {
        let info = OgpPageInfo {
            og_type: "website".into(),
            ..OgpPageInfo::default()
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"].as_str().unwrap(), "website");
        assert!(json["images"].as_array().unwrap().is_empty());
    }
}
