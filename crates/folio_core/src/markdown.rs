//! Markdown string helpers for embedded images and card previews.
//!
//! # Responsibility
//! - Extract the first embedded image reference from a body.
//! - Append and strip the editor's featured-image block.
//! - Derive a plain-text snippet for list cards.
//!
//! # Invariants
//! - Every function is pure: no network or file access, no allocation of
//!   shared state, same output for same input.

use once_cell::sync::Lazy;
use regex::Regex;

/// Alt text the editor uses for the image appended on submit.
pub const FEATURED_IMAGE_ALT: &str = "Featured Image";

const PREVIEW_TEXT_MAX_CHARS: usize = 100;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]\n]*]\(([^)\n]*)\)").expect("valid image regex"));
static FEATURED_IMAGE_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\r?\n){2}!\[Featured Image]\(([^)]*)\)\s*\z").expect("valid featured regex")
});
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Returns the URL of the first `![alt](url)` reference in `content`.
///
/// References never span lines. Blank URLs (`![x]()`) are skipped in favor
/// of later references. Remote addresses and inline `data:` payloads are
/// returned verbatim.
pub fn extract_image_url(content: &str) -> Option<&str> {
    MARKDOWN_IMAGE_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|url| url.as_str().trim())
        .find(|url| !url.is_empty())
}

/// Appends a featured-image block to `body`.
///
/// A blank `url` leaves the body unchanged.
pub fn embed_featured_image(body: &str, url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return body.to_string();
    }
    format!("{body}\n\n![{FEATURED_IMAGE_ALT}]({url})")
}

/// Splits a trailing featured-image block off `content`.
///
/// Returns `(body, Some(url))` when `content` ends with the block written by
/// [`embed_featured_image`], otherwise `(content, None)`.
pub fn split_featured_image(content: &str) -> (&str, Option<&str>) {
    match FEATURED_IMAGE_SUFFIX_RE.captures(content) {
        Some(caps) => {
            let (Some(block), Some(url)) = (caps.get(0), caps.get(1)) else {
                return (content, None);
            };
            let url = url.as_str().trim();
            if url.is_empty() {
                (content, None)
            } else {
                (&content[..block.start()], Some(url))
            }
        }
        None => (content, None),
    }
}

/// Derives a plain-text snippet from markdown.
///
/// Images are dropped, links keep their label, markdown symbols are removed,
/// whitespace is collapsed and the first 100 characters are kept.
pub fn derive_preview_text(content: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(content, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_TEXT_MAX_CHARS).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{derive_preview_text, embed_featured_image, extract_image_url, split_featured_image};

    #[test]
    fn extracts_first_image_url() {
        assert_eq!(
            extract_image_url("![alt](http://x/y.png) body"),
            Some("http://x/y.png")
        );
        assert_eq!(
            extract_image_url("x ![a](one.png) y ![b](two.png)"),
            Some("one.png")
        );
    }

    #[test]
    fn no_image_reports_none() {
        assert_eq!(extract_image_url("plain [link](https://a.b) text"), None);
        assert_eq!(extract_image_url("![empty]()"), None);
        assert_eq!(extract_image_url("![broken](\nhttps://a/b.png)"), None);
    }

    #[test]
    fn blank_first_reference_does_not_hide_later_image() {
        assert_eq!(extract_image_url("![a]() text ![b](y.png)"), Some("y.png"));
        assert_eq!(extract_image_url("![a](\n) text ![b](y.png)"), Some("y.png"));
    }

    #[test]
    fn extracts_data_payloads_verbatim() {
        let content = "intro\n\n![Featured Image](data:image/png;base64,iVBORw0KGgo=)";
        assert_eq!(
            extract_image_url(content),
            Some("data:image/png;base64,iVBORw0KGgo=")
        );
    }

    #[test]
    fn embed_then_split_restores_body_and_url() {
        let content = embed_featured_image("# Hello", "https://cdn/img.jpg");
        assert_eq!(content, "# Hello\n\n![Featured Image](https://cdn/img.jpg)");

        let (body, url) = split_featured_image(&content);
        assert_eq!(body, "# Hello");
        assert_eq!(url, Some("https://cdn/img.jpg"));
    }

    #[test]
    fn split_ignores_inline_images() {
        let content = "![inline](a.png) then text";
        assert_eq!(split_featured_image(content), (content, None));
    }

    #[test]
    fn embed_with_blank_url_is_identity() {
        assert_eq!(embed_featured_image("body", "  "), "body");
    }

    #[test]
    fn preview_strips_markdown_symbols_and_limits_length() {
        let source = "# title\n\n- [link](https://example.com)\n**bold** `code` ![i](x.png)";
        let text = derive_preview_text(source).expect("preview text should exist");
        assert!(!text.contains('#'));
        assert!(!text.contains('*'));
        assert!(!text.contains("x.png"));
        assert!(text.contains("link"));
        assert!(text.chars().count() <= 100);
    }
}
