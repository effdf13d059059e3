//! Render segments
//!
//! A segment is either render-ready HTML or a typed reference to a widget
//! that the presentation layer draws itself. Widget segments also have an
//! intermediate tag form (`<Video ... />`, `<P5Sketch ... />`, ...) which is
//! what content authored before the placeholder syntax existed contains, and
//! what `pipeline::extract` recognizes.

use serde::Serialize;

/// One unit of renderable output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// Final HTML fragment
    Html {
        /// Render-ready markup (inline HTML from the source is passed through)
        markup: String,
    },

    /// Fenced code block
    CodeBlock(CodeBlock),

    /// Embedded generative-art sketch, rendered externally
    Sketch(Sketch),

    /// Video player
    Video(Video),

    /// PDF viewer
    Pdf(Pdf),

    /// Image gallery
    Slideshow(Slideshow),
}

impl Segment {
    /// Create an HTML segment
    pub fn html(markup: impl Into<String>) -> Self {
        Segment::Html {
            markup: markup.into(),
        }
    }

    /// Whether this is a plain HTML segment
    pub fn is_html(&self) -> bool {
        matches!(self, Segment::Html { .. })
    }

    /// The markup of an HTML segment
    pub fn markup(&self) -> Option<&str> {
        match self {
            Segment::Html { markup } => Some(markup),
            _ => None,
        }
    }

    /// Short name of the segment kind, used in logs and summaries
    pub fn kind(&self) -> &'static str {
        match self {
            Segment::Html { .. } => "html",
            Segment::CodeBlock(_) => "code_block",
            Segment::Sketch(_) => "sketch",
            Segment::Video(_) => "video",
            Segment::Pdf(_) => "pdf",
            Segment::Slideshow(_) => "slideshow",
        }
    }

    /// Text form of the segment as it appears in an expanded body
    ///
    /// HTML segments yield their markup, widgets their tag form and code
    /// blocks a fenced block.
    pub fn to_source(&self) -> String {
        match self {
            Segment::Html { markup } => markup.clone(),
            Segment::CodeBlock(block) => format!("```{}\n{}\n```", block.language, block.code),
            Segment::Sketch(sketch) => sketch.to_tag(),
            Segment::Video(video) => video.to_tag(),
            Segment::Pdf(pdf) => pdf.to_tag(),
            Segment::Slideshow(slideshow) => slideshow.to_tag(),
        }
    }
}

/// A fenced code block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    /// Language tag from the opening fence, `text` when omitted
    pub language: String,
    /// Code with leading and trailing blank lines removed
    pub code: String,
    /// Display filename derived from the language (`example.<ext>`)
    pub filename: String,
}

impl CodeBlock {
    /// Create a code block, defaulting the language to `text`
    pub fn new(language: Option<&str>, code: impl Into<String>) -> Self {
        let language = match language.map(str::trim) {
            Some(lang) if !lang.is_empty() => lang.to_string(),
            _ => "text".to_string(),
        };
        let filename = format!("example.{}", file_extension(&language));

        Self {
            language,
            code: code.into(),
            filename,
        }
    }
}

/// File extension used for a code block's display filename
///
/// Unmapped languages use the language name itself.
pub fn file_extension(language: &str) -> &str {
    match language {
        "js" | "javascript" => "js",
        "ts" | "typescript" => "ts",
        "jsx" => "jsx",
        "tsx" => "tsx",
        "html" => "html",
        "css" => "css",
        "python" => "py",
        other => other,
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Reference to an externally rendered interactive canvas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sketch {
    /// Public path of the sketch script
    pub path: String,
    /// Container width in pixels
    pub width: u32,
    /// Container height in pixels
    pub height: u32,
    /// Size the sketch believes its canvas has, when it differs from the container
    pub sketch_size: Option<Dimensions>,
    /// CSS classes applied to the container
    pub style_class: String,
}

impl Sketch {
    /// Create a sketch with no separate sketch size
    pub fn new(path: impl Into<String>, width: u32, height: u32, style_class: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            sketch_size: None,
            style_class: style_class.into(),
        }
    }

    /// Set the sketch size from an optional width/height pair
    ///
    /// The pair only takes effect when both halves are present; a lone
    /// width or height leaves the sketch size unset.
    pub fn with_sketch_size(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.sketch_size = match (width, height) {
            (Some(width), Some(height)) => Some(Dimensions { width, height }),
            _ => None,
        };
        self
    }

    /// Canvas width the sketch draws at, if set
    pub fn sketch_width(&self) -> Option<u32> {
        self.sketch_size.map(|size| size.width)
    }

    /// Canvas height the sketch draws at, if set
    pub fn sketch_height(&self) -> Option<u32> {
        self.sketch_size.map(|size| size.height)
    }

    /// Intermediate tag form
    pub fn to_tag(&self) -> String {
        let mut props = format!(
            "sketchPath=\"{}\" width={{{}}} height={{{}}}",
            attr_value(&self.path),
            self.width,
            self.height
        );
        if let Some(size) = self.sketch_size {
            props.push_str(&format!(
                " sketchWidth={{{}}} sketchHeight={{{}}}",
                size.width, size.height
            ));
        }
        format!(
            "<P5Sketch {} className=\"{}\" />",
            props,
            attr_value(&self.style_class)
        )
    }
}

/// Video player reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Public path or URL of the video
    pub src: String,
    /// Width as written (`800`, `100%`, `auto`)
    pub width: Option<String>,
    /// Height as written
    pub height: Option<String>,
    /// Show player controls (on unless turned off)
    pub controls: bool,
    /// Start playing on load
    pub auto_play: bool,
    /// Start muted
    pub muted: bool,
    /// Restart when playback ends
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Thumbnail shown before playback
    pub poster: Option<String>,
    /// CSS classes applied to the player
    pub style_class: String,
}

impl Video {
    /// Create a video with default playback flags (controls on, everything else off)
    pub fn new(src: impl Into<String>, style_class: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            width: None,
            height: None,
            controls: true,
            auto_play: false,
            muted: false,
            looping: false,
            poster: None,
            style_class: style_class.into(),
        }
    }

    /// Intermediate tag form
    pub fn to_tag(&self) -> String {
        let mut props = vec![format!("src=\"{}\"", attr_value(&self.src))];
        if let Some(ref width) = self.width {
            props.push(format!("width=\"{}\"", attr_value(width)));
        }
        if let Some(ref height) = self.height {
            props.push(format!("height=\"{}\"", attr_value(height)));
        }
        props.push(format!("controls={{{}}}", self.controls));
        props.push(format!("autoPlay={{{}}}", self.auto_play));
        props.push(format!("muted={{{}}}", self.muted));
        props.push(format!("loop={{{}}}", self.looping));
        if let Some(ref poster) = self.poster {
            props.push(format!("poster=\"{}\"", attr_value(poster)));
        }
        props.push(format!("className=\"{}\"", attr_value(&self.style_class)));

        format!("<Video {} />", props.join(" "))
    }
}

/// PDF viewer reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pdf {
    /// Public path or URL of the document
    pub src: String,
    /// Width as written, `100%` when absent
    pub width: Option<String>,
    /// Height as written
    pub height: Option<String>,
    /// CSS classes applied to the viewer
    pub style_class: String,
}

impl Pdf {
    /// Create a PDF reference without explicit sizing
    pub fn new(src: impl Into<String>, style_class: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            width: None,
            height: None,
            style_class: style_class.into(),
        }
    }

    /// Intermediate tag form
    pub fn to_tag(&self) -> String {
        let mut props = vec![format!("src=\"{}\"", attr_value(&self.src))];
        if let Some(ref width) = self.width {
            props.push(format!("width=\"{}\"", attr_value(width)));
        }
        if let Some(ref height) = self.height {
            props.push(format!("height=\"{}\"", attr_value(height)));
        }
        props.push(format!("className=\"{}\"", attr_value(&self.style_class)));

        format!("<PDF {} />", props.join(" "))
    }
}

/// Image gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slideshow {
    /// Public image paths in display order (never empty)
    pub images: Vec<String>,
    /// CSS classes applied to the gallery
    pub style_class: String,
}

impl Slideshow {
    /// Intermediate tag form, images serialized as a JSON array
    pub fn to_tag(&self) -> String {
        let images = serde_json::to_string(&self.images).unwrap_or_else(|_| "[]".to_string());
        format!(
            "<GallerySlideshow images={{{}}} className=\"{}\" />",
            images,
            attr_value(&self.style_class)
        )
    }
}

/// Attribute values in tag form are delimited by double quotes, which
/// therefore cannot appear inside them.
fn attr_value(value: &str) -> String {
    value.replace('"', "%22")
}
