//! Output minification for generated HTML and XML.

use std::borrow::Cow;

/// Content type for minification.
pub enum MinifyType<'a> {
    Html(&'a [u8]),
    Xml(&'a [u8]),
}

/// Minify `content` when `enabled` (`[build] minify`).
///
/// Returns `Cow::Borrowed` if minify disabled, `Cow::Owned` if minified.
pub fn minify(content: MinifyType<'_>, enabled: bool) -> Cow<'_, [u8]> {
    match (content, enabled) {
        (MinifyType::Html(bytes) | MinifyType::Xml(bytes), false) => Cow::Borrowed(bytes),
        (MinifyType::Html(html), true) => Cow::Owned(minify_html_inner(html)),
        (MinifyType::Xml(xml), true) => Cow::Owned(minify_xml_inner(xml)),
    }
}

/// Pick the minifier from a generated file's extension.
pub fn minify_path<'a>(path: &std::path::Path, content: &'a [u8], enabled: bool) -> Cow<'a, [u8]> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => minify(MinifyType::Html(content), enabled),
        Some("xml") => minify(MinifyType::Xml(content), enabled),
        _ => Cow::Borrowed(content),
    }
}

fn minify_html_inner(html: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    minify_html::minify(html, &cfg)
}

/// Trim every line and join. Generated XML never relies on line breaks.
fn minify_xml_inner(xml: &[u8]) -> Vec<u8> {
    String::from_utf8_lossy(xml)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<String>()
        .into_bytes()
}
