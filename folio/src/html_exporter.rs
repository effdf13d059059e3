//! HTML preview exporter
//!
//! This module writes a parsed document to a single standalone HTML file:
//! - Metadata header (title, date, author, description)
//! - Table of contents from the anchored headings
//! - Each widget segment mapped to a plain HTML element
//! - Footnote list at the end, linked from the reference markers

use crate::content_model::{
    escape_html, CodeBlock, ParsedDocument, Pdf, Segment, Sketch, Slideshow, Video,
};
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during HTML export
#[derive(Error, Debug)]
pub enum HtmlExportError {
    /// Failed to create or write the output file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Export a parsed document to an HTML file
///
/// # Parameters
/// * `doc` - The parsed document to export
/// * `output_path` - Path where the HTML file will be written
///
/// # Returns
/// * `Ok(())` - Successfully exported to HTML
/// * `Err(HtmlExportError)` - Error writing the file
pub fn to_html(doc: &ParsedDocument, output_path: &Path) -> Result<(), HtmlExportError> {
    let output = render_page(doc);

    // Create parent directories if they don't exist
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(output_path)?;
    file.write_all(output.as_bytes())?;

    log::info!("Wrote HTML preview to {}", output_path.display());
    Ok(())
}

/// Render a parsed document as a complete HTML page
pub fn render_page(doc: &ParsedDocument) -> String {
    let mut output = String::new();
    let title = doc.metadata.title().unwrap_or("Untitled");

    write_html_header(&mut output, title);

    output.push_str("<body>\n");
    output.push_str("<article class=\"container\">\n");
    output.push_str(&format!(
        "<h1 class=\"post-title\">{}</h1>\n",
        escape_html(title)
    ));

    write_metadata(&mut output, doc);
    write_toc(&mut output, doc);

    output.push_str("<div class=\"post-body\">\n");
    for segment in &doc.segments {
        write_segment(&mut output, segment);
        output.push('\n');
    }
    output.push_str("</div>\n");

    write_footnotes(&mut output, doc);

    output.push_str("</article>\n");
    output.push_str(FOOTNOTE_SCRIPT);
    output.push_str("</body>\n");
    output.push_str("</html>\n");

    output
}

/// Write HTML header with CSS styling
fn write_html_header(output: &mut String, title: &str) {
    output.push_str("<!DOCTYPE html>\n");
    output.push_str("<html lang=\"en\">\n");
    output.push_str("<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    output.push_str("<style>\n");
    output.push_str(CSS_STYLES);
    output.push_str("</style>\n");
    output.push_str("</head>\n");
}

/// Write the post metadata block
fn write_metadata(output: &mut String, doc: &ParsedDocument) {
    let metadata = &doc.metadata;
    if metadata.date().is_none()
        && metadata.author().is_none()
        && metadata.description().is_none()
        && metadata.image().is_none()
    {
        return;
    }

    output.push_str("<div class=\"metadata\">\n");

    if let Some(image) = metadata.image() {
        output.push_str(&format!(
            "<img class=\"cover\" src=\"{}\" alt=\"\"/>\n",
            escape_html(image)
        ));
    }

    if let Some(description) = metadata.description() {
        output.push_str(&format!(
            "<p class=\"description\">{}</p>\n",
            escape_html(description)
        ));
    }

    let byline: Vec<String> = [metadata.author(), metadata.date()]
        .into_iter()
        .flatten()
        .map(escape_html)
        .collect();
    if !byline.is_empty() {
        output.push_str(&format!(
            "<p class=\"byline\">{}</p>\n",
            byline.join(" &middot; ")
        ));
    }

    output.push_str("</div>\n");
}

/// Write the table of contents (skipped when there are no anchored headings)
fn write_toc(output: &mut String, doc: &ParsedDocument) {
    let headings = doc.headings();
    if headings.is_empty() {
        return;
    }

    output.push_str("<nav class=\"toc\">\n<p class=\"toc-title\">Contents</p>\n<ul>\n");
    for heading in &headings {
        output.push_str(&format!(
            "<li class=\"toc-level-{}\"><a href=\"#{}\">{}</a></li>\n",
            heading.level,
            escape_html(&heading.id),
            escape_html(&heading.text)
        ));
    }
    output.push_str("</ul>\n</nav>\n");
}

/// Write a single segment
fn write_segment(output: &mut String, segment: &Segment) {
    match segment {
        Segment::Html { markup } => output.push_str(markup),
        Segment::CodeBlock(block) => write_code_block(output, block),
        Segment::Sketch(sketch) => write_sketch(output, sketch),
        Segment::Video(video) => write_video(output, video),
        Segment::Pdf(pdf) => write_pdf(output, pdf),
        Segment::Slideshow(slideshow) => write_slideshow(output, slideshow),
    }
}

fn write_code_block(output: &mut String, block: &CodeBlock) {
    output.push_str(&format!(
        "<figure class=\"code-block\"><figcaption>{}</figcaption><pre><code class=\"language-{}\">{}</code></pre></figure>",
        escape_html(&block.filename),
        escape_html(&block.language),
        escape_html(&block.code)
    ));
}

/// Sketches run in an external runtime; the preview shows a sized frame
fn write_sketch(output: &mut String, sketch: &Sketch) {
    let mut data = format!("data-sketch-path=\"{}\"", escape_html(&sketch.path));
    if let Some(size) = sketch.sketch_size {
        data.push_str(&format!(
            " data-sketch-width=\"{}\" data-sketch-height=\"{}\"",
            size.width, size.height
        ));
    }

    output.push_str(&format!(
        "<figure class=\"sketch {}\" {} style=\"width:{}px;height:{}px\"><figcaption>Sketch: <code>{}</code></figcaption></figure>",
        escape_html(&sketch.style_class),
        data,
        sketch.width,
        sketch.height,
        escape_html(&sketch.path)
    ));
}

fn write_video(output: &mut String, video: &Video) {
    let mut attrs = vec![format!("src=\"{}\"", escape_html(&video.src))];
    if let Some(ref width) = video.width {
        attrs.push(format!("width=\"{}\"", escape_html(width)));
    }
    if let Some(ref height) = video.height {
        attrs.push(format!("height=\"{}\"", escape_html(height)));
    }
    let flags = [
        (video.controls, "controls"),
        (video.auto_play, "autoplay"),
        (video.muted, "muted"),
        (video.looping, "loop"),
    ];
    attrs.extend(
        flags
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| name.to_string()),
    );
    if let Some(ref poster) = video.poster {
        attrs.push(format!("poster=\"{}\"", escape_html(poster)));
    }
    attrs.push(format!("class=\"{}\"", escape_html(&video.style_class)));

    output.push_str(&format!("<video {}></video>", attrs.join(" ")));
}

fn write_pdf(output: &mut String, pdf: &Pdf) {
    let src = escape_html(&pdf.src);
    output.push_str(&format!(
        "<object data=\"{src}\" type=\"application/pdf\" width=\"{}\" height=\"{}\" class=\"{}\"><a href=\"{src}\">Open PDF</a></object>",
        escape_html(pdf.width.as_deref().unwrap_or("100%")),
        escape_html(pdf.height.as_deref().unwrap_or("600")),
        escape_html(&pdf.style_class),
        src = src
    ));
}

fn write_slideshow(output: &mut String, slideshow: &Slideshow) {
    output.push_str(&format!(
        "<div class=\"slideshow {}\">",
        escape_html(&slideshow.style_class)
    ));
    for image in &slideshow.images {
        output.push_str(&format!(
            "<img src=\"{}\" alt=\"\" loading=\"lazy\"/>",
            escape_html(image)
        ));
    }
    output.push_str("</div>");
}

/// Write the footnote list
fn write_footnotes(output: &mut String, doc: &ParsedDocument) {
    if doc.footnotes.is_empty() {
        return;
    }

    output.push_str("<section class=\"footnotes\">\n<h2>Notes</h2>\n<ol>\n");
    for footnote in &doc.footnotes {
        output.push_str(&format!(
            "<li id=\"footnote-{id}\" value=\"{id}\">{}</li>\n",
            footnote.rendered_content,
            id = escape_html(&footnote.id)
        ));
    }
    output.push_str("</ol>\n</section>\n");
}

/// Scrolls to the footnote for a clicked reference marker
const FOOTNOTE_SCRIPT: &str = r#"<script>
document.querySelectorAll('.footnote-button').forEach(function (button) {
    button.addEventListener('click', function () {
        var note = document.getElementById('footnote-' + button.dataset.footnoteId);
        if (note) { note.scrollIntoView({ behavior: 'smooth', block: 'center' }); }
    });
});
</script>
"#;

const CSS_STYLES: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', 'Oxygen',
                 'Ubuntu', 'Cantarell', 'Fira Sans', 'Droid Sans', 'Helvetica Neue',
                 sans-serif;
    line-height: 1.6;
    color: #333;
    background-color: #f5f5f5;
    padding: 20px;
}

.container {
    max-width: 860px;
    margin: 0 auto;
    background: white;
    padding: 60px;
    box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
    border-radius: 4px;
}

.post-title {
    font-size: 2.5em;
    font-weight: 700;
    margin-bottom: 20px;
    color: #1a1a1a;
}

.metadata {
    margin-bottom: 32px;
    color: #666;
}

.description {
    font-size: 1.1em;
    margin-bottom: 8px;
}

.byline {
    font-size: 0.9em;
}

.toc {
    margin-bottom: 40px;
    padding: 16px 20px;
    background-color: #f9f9f9;
    border-left: 4px solid #0066cc;
    border-radius: 4px;
}

.toc-title {
    font-weight: 600;
    margin-bottom: 8px;
}

.toc ul {
    list-style: none;
}

.toc-level-3 {
    padding-left: 20px;
}

.toc a {
    color: #0066cc;
    text-decoration: none;
}

h2, h3 {
    margin-top: 32px;
    margin-bottom: 16px;
    color: #1a1a1a;
    font-weight: 600;
}

p {
    margin-bottom: 16px;
}

ul, ol {
    margin: 0 0 16px 24px;
}

a {
    color: #0066cc;
}

code.inline-code {
    font-family: 'Monaco', 'Menlo', 'Ubuntu Mono', 'Consolas', monospace;
    background-color: #f4f4f4;
    padding: 2px 6px;
    border-radius: 3px;
    font-size: 0.9em;
    color: #d73a49;
}

.code-block {
    margin: 24px 0;
    border: 1px solid #e0e0e0;
    border-radius: 6px;
    overflow: hidden;
}

.code-block figcaption {
    font-size: 0.85em;
    padding: 6px 12px;
    background-color: #f0f0f0;
    border-bottom: 1px solid #e0e0e0;
    color: #555;
}

.code-block pre {
    padding: 16px;
    overflow-x: auto;
    font-family: 'Monaco', 'Menlo', 'Ubuntu Mono', 'Consolas', monospace;
    font-size: 0.9em;
}

.sketch {
    display: flex;
    align-items: center;
    justify-content: center;
    max-width: 100%;
    margin: 32px 0;
    background-color: #fafafa;
    border: 1px dashed #ccc;
}

video, object {
    display: block;
    max-width: 100%;
    margin: 32px 0;
}

.slideshow {
    display: flex;
    gap: 8px;
    overflow-x: auto;
    margin: 32px 0;
}

.slideshow img {
    height: 240px;
    border-radius: 4px;
}

.footnote-button {
    font-size: 0.75em;
    vertical-align: super;
    border: none;
    background: none;
    color: #0066cc;
    cursor: pointer;
}

.footnotes {
    margin-top: 48px;
    padding-top: 16px;
    border-top: 1px solid #e0e0e0;
    font-size: 0.9em;
}

.footnotes h2 {
    margin-top: 0;
    font-size: 1.2em;
}
"#;
