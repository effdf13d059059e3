//! Structural tag extraction
//!
//! Recognizes the self-closing tag forms of the widget segments in a text
//! span and splits the span around them:
//!
//! ```text
//! <P5Sketch sketchPath="..." width={800} height={600} className="..." />
//! <Video src="..." controls={true} ... className="..." />
//! <PDF src="..." className="..." />
//! <GallerySlideshow images={["/a.png"]} className="..." />
//! ```
//!
//! Extractors run as a chain: each one scans the text pieces the previous
//! ones left over. Tags never nest, so chain order does not change results.

use crate::content_model::{ContentWarning, Pdf, Segment, Sketch, Slideshow, Video};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static SKETCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<P5Sketch\s+sketchPath="([^"]+)"\s+width=\{(\d+)\}\s+height=\{(\d+)\}([^>]*?)className="([^"]*)"\s*/>"#,
    )
    .expect("valid sketch tag regex")
});

static VIDEO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<Video\s+src="([^"]+)"([^>]*?)className="([^"]*)"\s*/>"#)
        .expect("valid video tag regex")
});

static PDF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<PDF\s+src="([^"]+)"([^>]*?)className="([^"]*)"\s*/>"#)
        .expect("valid pdf tag regex")
});

static SLIDESHOW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<GallerySlideshow\s+images=\{(.*?)\}\s+className="([^"]*)"\s*/>"#)
        .expect("valid slideshow tag regex")
});

/// `name="value"` or `name={value}`
static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)=(?:"([^"]*)"|\{([^}]*)\})"#).expect("valid attribute regex")
});

/// A piece of a text span after extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece<'a> {
    /// Text left for the markdown renderer (never blank)
    Text(&'a str),

    /// A widget parsed from its tag form
    Segment(Segment),

    /// A tag whose content could not be used
    Notice(ContentWarning),
}

type BuildFn = fn(&Captures<'_>) -> Option<Result<Segment, ContentWarning>>;

/// One link of the extractor chain
struct TagExtractor {
    name: &'static str,
    pattern: &'static LazyLock<Regex>,
    build: BuildFn,
}

impl TagExtractor {
    /// Split `text` around every tag this extractor recognizes
    ///
    /// A match whose attributes cannot be converted stays in the text.
    fn split<'a>(&self, text: &'a str) -> Vec<Piece<'a>> {
        let mut pieces = Vec::new();
        let mut last = 0;

        for caps in self.pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let piece = match (self.build)(&caps) {
                Some(Ok(segment)) => Piece::Segment(segment),
                Some(Err(warning)) => Piece::Notice(warning),
                None => continue,
            };

            if whole.start() > last {
                pieces.push(Piece::Text(&text[last..whole.start()]));
            }
            log::debug!("Extracted {} tag", self.name);
            pieces.push(piece);
            last = whole.end();
        }

        if last < text.len() {
            pieces.push(Piece::Text(&text[last..]));
        }
        pieces
    }
}

fn chain() -> [TagExtractor; 4] {
    [
        TagExtractor {
            name: "sketch",
            pattern: &SKETCH_RE,
            build: build_sketch,
        },
        TagExtractor {
            name: "video",
            pattern: &VIDEO_RE,
            build: build_video,
        },
        TagExtractor {
            name: "pdf",
            pattern: &PDF_RE,
            build: build_pdf,
        },
        TagExtractor {
            name: "slideshow",
            pattern: &SLIDESHOW_RE,
            build: build_slideshow,
        },
    ]
}

/// Run the extractor chain over a text span
///
/// Pieces come back in source order; blank text between tags is dropped.
pub fn extract_tags(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = vec![Piece::Text(text)];

    for extractor in chain() {
        pieces = pieces
            .into_iter()
            .flat_map(|piece| match piece {
                Piece::Text(text) => extractor.split(text),
                other => vec![other],
            })
            .collect();
    }

    pieces.retain(|piece| !matches!(piece, Piece::Text(text) if text.trim().is_empty()));
    pieces
}

fn build_sketch(caps: &Captures<'_>) -> Option<Result<Segment, ContentWarning>> {
    let width = caps[2].parse().ok()?;
    let height = caps[3].parse().ok()?;
    let attrs = attributes(caps.get(4).map_or("", |m| m.as_str()));

    let sketch = Sketch::new(&caps[1], width, height, &caps[5]).with_sketch_size(
        attr(&attrs, "sketchWidth").and_then(|v| v.parse().ok()),
        attr(&attrs, "sketchHeight").and_then(|v| v.parse().ok()),
    );
    Some(Ok(Segment::Sketch(sketch)))
}

fn build_video(caps: &Captures<'_>) -> Option<Result<Segment, ContentWarning>> {
    let attrs = attributes(caps.get(2).map_or("", |m| m.as_str()));

    let mut video = Video::new(&caps[1], &caps[3]);
    video.width = attr(&attrs, "width").map(str::to_string);
    video.height = attr(&attrs, "height").map(str::to_string);
    video.controls = attr(&attrs, "controls") != Some("false");
    video.auto_play = attr(&attrs, "autoPlay") == Some("true");
    video.muted = attr(&attrs, "muted") == Some("true");
    video.looping = attr(&attrs, "loop") == Some("true");
    video.poster = attr(&attrs, "poster").map(str::to_string);
    Some(Ok(Segment::Video(video)))
}

fn build_pdf(caps: &Captures<'_>) -> Option<Result<Segment, ContentWarning>> {
    let attrs = attributes(caps.get(2).map_or("", |m| m.as_str()));

    let mut pdf = Pdf::new(&caps[1], &caps[3]);
    pdf.width = attr(&attrs, "width").map(str::to_string);
    pdf.height = attr(&attrs, "height").map(str::to_string);
    Some(Ok(Segment::Pdf(pdf)))
}

fn build_slideshow(caps: &Captures<'_>) -> Option<Result<Segment, ContentWarning>> {
    let images: Vec<String> = match serde_json::from_str(&caps[1]) {
        Ok(images) => images,
        Err(e) => {
            log::warn!("Failed to parse slideshow images: {}", e);
            return Some(Err(ContentWarning::SlideshowImagesMalformed {
                reason: e.to_string(),
            }));
        }
    };

    if images.is_empty() {
        log::warn!("Slideshow tag has an empty image list");
        return Some(Err(ContentWarning::SlideshowImagesMalformed {
            reason: "image list is empty".to_string(),
        }));
    }

    Some(Ok(Segment::Slideshow(Slideshow {
        images,
        style_class: caps[2].to_string(),
    })))
}

fn attributes(text: &str) -> Vec<(&str, &str)> {
    ATTRIBUTE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            Some((name, value))
        })
        .collect()
}

fn attr<'a>(attrs: &[(&'a str, &'a str)], name: &str) -> Option<&'a str> {
    attrs.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_without_tags_is_one_piece() {
        assert_eq!(extract_tags("Just *text*"), vec![Piece::Text("Just *text*")]);
        assert!(extract_tags("  \n ").is_empty());
    }

    #[test]
    fn test_pieces_keep_source_order() {
        // Arrange: Text interleaved with every tag kind
        let text = concat!(
            "Intro\n",
            "<Video src=\"/v.mp4\" controls={false} loop={true} className=\"c\" />\n",
            "Middle\n",
            "<P5Sketch sketchPath=\"/s.js\" width={400} height={300} className=\"c\" />",
            "<PDF src=\"/d.pdf\" width=\"100%\" className=\"c\" />\n",
            "<GallerySlideshow images={[\"/a.png\",\"/b.png\"]} className=\"c\" />\n",
            "Outro"
        );

        // Act: Run the chain
        let pieces = extract_tags(text);

        // Assert: Order matches the source, blank gaps dropped
        let kinds: Vec<&str> = pieces
            .iter()
            .map(|piece| match piece {
                Piece::Text(_) => "text",
                Piece::Segment(segment) => segment.kind(),
                Piece::Notice(_) => "notice",
            })
            .collect();
        assert_eq!(kinds, vec!["text", "video", "text", "sketch", "pdf", "slideshow", "text"]);
    }

    #[test]
    fn test_video_tag_attributes() {
        let pieces = extract_tags(
            "<Video src=\"/v.mp4\" width=\"640\" controls={false} autoPlay={true} muted={true} loop={false} poster=\"/p.png\" className=\"c\" />",
        );

        let [Piece::Segment(Segment::Video(video))] = pieces.as_slice() else {
            panic!("expected a single video");
        };
        assert_eq!(video.src, "/v.mp4");
        assert_eq!(video.width.as_deref(), Some("640"));
        assert_eq!(video.height, None);
        assert!(!video.controls);
        assert!(video.auto_play);
        assert!(video.muted);
        assert!(!video.looping);
        assert_eq!(video.poster.as_deref(), Some("/p.png"));
    }

    #[test]
    fn test_sketch_tag_with_sketch_size() {
        let pieces = extract_tags(
            "<P5Sketch sketchPath=\"/s.js\" width={800} height={600} sketchWidth={1200} sketchHeight={900} className=\"c\" />",
        );

        let [Piece::Segment(Segment::Sketch(sketch))] = pieces.as_slice() else {
            panic!("expected a single sketch");
        };
        assert_eq!(sketch.sketch_width(), Some(1200));
        assert_eq!(sketch.sketch_height(), Some(900));
    }

    #[test]
    fn test_tag_forms_parse_back_to_segments() {
        // Arrange: Segments rendered to their tag form
        let mut video = Video::new("/assets/video/a.mp4", "my-8");
        video.poster = Some("/p.png".to_string());
        let segments = vec![
            Segment::Sketch(Sketch::new("/assets/sketches/a.js", 800, 600, "my-8").with_sketch_size(Some(10), Some(20))),
            Segment::Video(video),
            Segment::Pdf(Pdf::new("/assets/pdf/a.pdf", "my-8")),
            Segment::Slideshow(Slideshow {
                images: vec!["/a/1.png".to_string()],
                style_class: "my-8".to_string(),
            }),
        ];
        let text: String = segments.iter().map(Segment::to_source).collect::<Vec<_>>().join("\n");

        // Act: Extract
        let pieces = extract_tags(&text);

        // Assert: The same segments come back
        let parsed: Vec<Segment> = pieces
            .into_iter()
            .filter_map(|piece| match piece {
                Piece::Segment(segment) => Some(segment),
                _ => None,
            })
            .collect();
        assert_eq!(parsed, segments);
    }

    #[test]
    fn test_malformed_slideshow_images_become_notice() {
        let pieces = extract_tags("Before <GallerySlideshow images={[not json]} className=\"c\" /> after");

        assert_eq!(pieces.len(), 3);
        assert!(matches!(
            pieces[1],
            Piece::Notice(ContentWarning::SlideshowImagesMalformed { .. })
        ));
    }

    #[test]
    fn test_oversized_sketch_dimensions_stay_text() {
        let text = "<P5Sketch sketchPath=\"/s.js\" width={99999999999} height={1} className=\"c\" />";

        assert_eq!(extract_tags(text), vec![Piece::Text(text)]);
    }
}
