//! Per-family placeholder expansion
//!
//! Each placeholder family turns into one of three things: inline markup that
//! stays part of the surrounding text, a widget segment, or a notice standing
//! in for a widget whose resource is missing. Footnotes carry document-wide
//! numbering and are handled in `pipeline::footnotes`.

use super::lexer::{self, Placeholder, Token};
use super::params::Params;
use super::RenderContext;
use crate::content_model::{ContentWarning, Pdf, Segment, Sketch, Slideshow, Video};
use crate::site_config::ContentConfig;

/// Image extensions a slideshow folder is scanned for
const SLIDESHOW_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

const IMAGE_BASE_STYLE: &str = "max-width: 100%; border-radius: 0.5rem; margin: 1.5rem 0;";

/// Placeholder families, in the order their rewrite stages run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    /// `![[newline]]`, a line break
    Newline,
    /// Inline `<img>`
    Image,
    /// Video player widget
    Video,
    /// PDF viewer widget
    Pdf,
    /// Gallery of the images in a folder
    Slideshow,
    /// p5.js sketch widget
    Sketch,
    /// Numbered footnote
    Footnote,
    /// Not a recognized family; left as written
    Unknown,
}

impl PlaceholderKind {
    /// Rewrite stages in application order
    pub const STAGES: [PlaceholderKind; 6] = [
        PlaceholderKind::Newline,
        PlaceholderKind::Image,
        PlaceholderKind::Video,
        PlaceholderKind::Pdf,
        PlaceholderKind::Slideshow,
        PlaceholderKind::Sketch,
    ];

    /// Classify a placeholder by its label
    ///
    /// The first word names a media family. Any other label containing
    /// "footnote" (in any case) is a footnote, so `![[Footnote 3]]` and
    /// `![[my-footnote]]` both qualify.
    pub fn classify(label: &str) -> Self {
        let label = label.trim();
        match label.split_whitespace().next().unwrap_or_default() {
            "image" => PlaceholderKind::Image,
            "video" => PlaceholderKind::Video,
            "pdf" => PlaceholderKind::Pdf,
            "slideshow" => PlaceholderKind::Slideshow,
            "p5js" => PlaceholderKind::Sketch,
            _ if label == "newline" => PlaceholderKind::Newline,
            _ if label.to_lowercase().contains("footnote") => PlaceholderKind::Footnote,
            _ => PlaceholderKind::Unknown,
        }
    }

    /// Name used on the command line and in logs
    pub fn name(&self) -> &'static str {
        match self {
            PlaceholderKind::Newline => "newline",
            PlaceholderKind::Image => "image",
            PlaceholderKind::Video => "video",
            PlaceholderKind::Pdf => "pdf",
            PlaceholderKind::Slideshow => "slideshow",
            PlaceholderKind::Sketch => "p5js",
            PlaceholderKind::Footnote => "footnote",
            PlaceholderKind::Unknown => "unknown",
        }
    }
}

/// What a placeholder expands to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// Markup that stays inside the surrounding text span
    Inline(String),

    /// A widget that becomes its own segment
    Widget(Segment),

    /// A recovered problem, shown as a notice in place of the widget
    Notice(ContentWarning),
}

impl Expansion {
    /// Text form used by the string-stage API
    pub fn to_source(&self) -> String {
        match self {
            Expansion::Inline(markup) => markup.clone(),
            Expansion::Widget(segment) => segment.to_source(),
            Expansion::Notice(warning) => warning.to_notice_html(),
        }
    }
}

/// Expand a media or newline placeholder
///
/// Returns `None` for footnotes and unknown labels, and for media
/// placeholders written without a `[[target]]`; those stay literal.
pub fn expand(placeholder: &Placeholder<'_>, ctx: &RenderContext<'_>) -> Option<Expansion> {
    let kind = PlaceholderKind::classify(placeholder.label);
    if kind == PlaceholderKind::Newline {
        return Some(Expansion::Inline("<br>".to_string()));
    }

    let target = placeholder.target?.trim();
    let params = Params::parse(family_params(placeholder.label));
    let config = ctx.config;

    let expansion = match kind {
        PlaceholderKind::Image => Expansion::Inline(image_tag(target, &params, config)),
        PlaceholderKind::Video => Expansion::Widget(Segment::Video(video(target, &params, config))),
        PlaceholderKind::Pdf => Expansion::Widget(Segment::Pdf(pdf(target, &params, config))),
        PlaceholderKind::Slideshow => slideshow(target, ctx),
        PlaceholderKind::Sketch => sketch(target, &params, ctx),
        PlaceholderKind::Newline | PlaceholderKind::Footnote | PlaceholderKind::Unknown => {
            return None;
        }
    };

    log::debug!("Expanded {} placeholder [[{}]]", kind.name(), target);
    Some(expansion)
}

/// Rewrite every placeholder of one family in `body` into its tag form
///
/// Fenced code and placeholders of other families are left untouched, so
/// running a stage over its own output changes nothing.
pub fn rewrite_text(body: &str, kind: PlaceholderKind, ctx: &RenderContext<'_>) -> String {
    let mut out = String::with_capacity(body.len());
    for token in lexer::tokenize(body) {
        match token {
            Token::Text(text) | Token::Fence(text) => out.push_str(text),
            Token::Placeholder(placeholder) => {
                let expansion = if PlaceholderKind::classify(placeholder.label) == kind {
                    expand(&placeholder, ctx)
                } else {
                    None
                };
                match expansion {
                    Some(expansion) => out.push_str(&expansion.to_source()),
                    None => out.push_str(placeholder.raw),
                }
            }
        }
    }
    out
}

/// The label with its family word removed
fn family_params(label: &str) -> &str {
    let label = label.trim_start();
    let word_len = label.find(char::is_whitespace).unwrap_or(label.len());
    &label[word_len..]
}

/// Prefix relative paths with the family's base directory
fn public_path(target: &str, base_dir: &str) -> String {
    if target.starts_with('/') {
        target.to_string()
    } else {
        format!("{}/{}", base_dir.trim_end_matches('/'), target)
    }
}

/// `<img>` tag with sizing computed from width/height
///
/// Both absent or `auto` leaves the intrinsic size alone; width alone keeps
/// the aspect ratio with `height:auto`.
fn image_tag(target: &str, params: &Params<'_>, config: &ContentConfig) -> String {
    let src = public_path(target, &config.image_dir);
    let width = params.get("width").filter(|v| !is_auto(v));
    let height = params.get("height").filter(|v| !is_auto(v));

    let sizing = match (width, height) {
        (None, None) => "height: auto;".to_string(),
        (Some(w), None) => format!("width:{};height:auto", css_length(w)),
        (None, Some(h)) => format!("height:{}", css_length(h)),
        (Some(w), Some(h)) => format!("width:{};height:{}", css_length(w), css_length(h)),
    };

    format!(
        "<img src=\"{}\" alt=\"\" loading=\"lazy\" style=\"{} {}\"/>",
        src, IMAGE_BASE_STYLE, sizing
    )
}

fn is_auto(value: &str) -> bool {
    value.eq_ignore_ascii_case("auto")
}

/// Bare numbers are pixels; anything carrying a unit passes through
fn css_length(value: &str) -> String {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit() || c == '.') {
        format!("{}px", value)
    } else {
        value.to_string()
    }
}

fn video(target: &str, params: &Params<'_>, config: &ContentConfig) -> Video {
    let mut video = Video::new(public_path(target, &config.video_dir), &config.style_class);
    video.width = params.get("width").map(str::to_string);
    video.height = params.get("height").map(str::to_string);
    video.controls = params.flag("controls", true);
    video.auto_play = params.flag("autoPlay", false);
    video.muted = params.flag("muted", false);
    video.looping = params.flag("loop", false);
    video.poster = params.get("poster").map(str::to_string);
    video
}

fn pdf(target: &str, params: &Params<'_>, config: &ContentConfig) -> Pdf {
    let mut pdf = Pdf::new(public_path(target, &config.pdf_dir), &config.style_class);
    pdf.width = params.get("width").map(str::to_string);
    pdf.height = params.get("height").map(str::to_string);
    pdf
}

/// Gallery from the image files directly inside a folder, sorted by name
fn slideshow(target: &str, ctx: &RenderContext<'_>) -> Expansion {
    let folder = public_path(target, &ctx.config.image_dir);

    if !ctx.assets.exists(&folder) {
        log::warn!("Slideshow folder not found: {}", folder);
        return Expansion::Notice(ContentWarning::SlideshowFolderNotFound { folder });
    }

    let names = match ctx.assets.list(&folder) {
        Ok(names) => names,
        Err(e) => {
            log::warn!("Failed to read slideshow folder {}: {}", folder, e);
            return Expansion::Notice(ContentWarning::SlideshowFolderUnreadable {
                folder,
                reason: e.to_string(),
            });
        }
    };

    let mut images: Vec<String> = names.into_iter().filter(|name| is_slideshow_image(name)).collect();
    if images.is_empty() {
        log::warn!("No image files found in slideshow folder {}", folder);
        return Expansion::Notice(ContentWarning::SlideshowEmpty { folder });
    }
    images.sort();

    let prefix = folder.trim_end_matches('/');
    Expansion::Widget(Segment::Slideshow(Slideshow {
        images: images
            .iter()
            .map(|name| format!("{}/{}", prefix, name))
            .collect(),
        style_class: ctx.config.style_class.clone(),
    }))
}

fn is_slideshow_image(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(stem, ext)| {
        !stem.is_empty()
            && SLIDESHOW_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
    })
}

/// Sketch reference, after checking the script exists
fn sketch(filename: &str, params: &Params<'_>, ctx: &RenderContext<'_>) -> Expansion {
    let path = public_path(filename, &ctx.config.sketch_dir);

    if !ctx.assets.exists(&path) {
        log::warn!("P5.js sketch file not found: {}", path);
        return Expansion::Notice(ContentWarning::SketchNotFound {
            filename: filename.to_string(),
        });
    }

    let sketch = Sketch::new(
        path,
        params.pixels("width").unwrap_or(ctx.config.sketch_width),
        params.pixels("height").unwrap_or(ctx.config.sketch_height),
        &ctx.config.style_class,
    )
    .with_sketch_size(params.pixels("sketchWidth"), params.pixels("sketchHeight"));

    Expansion::Widget(Segment::Sketch(sketch))
}
