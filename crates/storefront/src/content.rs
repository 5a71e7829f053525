//! Blog article HTML processing.
//!
//! Article bodies are authored in the admin as raw HTML. Before rendering we
//! strip active content, mark internal links, and demote `<h1>` headings
//! because the article title is the page's only `<h1>`.

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Sanitizing
// =============================================================================

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("Invalid regex")
});

static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("Invalid regex")
});

static IFRAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<iframe\b[^>]*>.*?</iframe\s*>").expect("Invalid regex")
});

/// Unpaired opening or closing tags left after the element passes.
static STRAY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*/?\s*(script|style|iframe)\b[^>]*>").expect("Invalid regex")
});

/// Opening tag, attributes included.
static OPEN_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z][^>]*>").expect("Invalid regex"));

static EVENT_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).expect("Invalid regex")
});

static QUOTED_JS_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(href|src|action)\s*=\s*(["'])\s*javascript:[^"']*["']"#)
        .expect("Invalid regex")
});

static BARE_JS_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(href|src|action)\s*=\s*javascript:[^\s>]*").expect("Invalid regex")
});

/// Drop event handlers and `javascript:` URLs from one opening tag.
fn sanitize_tag(tag: &str) -> String {
    let tag = EVENT_ATTR_RE.replace_all(tag, "");
    let tag = QUOTED_JS_URL_RE.replace_all(&tag, r##"${1}="#""##);
    BARE_JS_URL_RE
        .replace_all(&tag, r##"${1}="#""##)
        .into_owned()
}

/// Remove `<script>`, `<style>` and `<iframe>` elements, inline event
/// handlers and `javascript:` URLs.
///
/// Attribute rules only apply inside tags; body text is left alone.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let html = SCRIPT_RE.replace_all(html, "");
    let html = STYLE_RE.replace_all(&html, "");
    let html = IFRAME_RE.replace_all(&html, "");
    let html = STRAY_TAG_RE.replace_all(&html, "");
    OPEN_TAG_RE
        .replace_all(&html, |caps: &regex::Captures| sanitize_tag(&caps[0]))
        .into_owned()
}

// =============================================================================
// Internal Links
// =============================================================================

/// Class added to links that stay on the storefront.
pub const INTERNAL_LINK_CLASS: &str = "internal-link";

static PRODUCT_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href=["']/products/([^"']+)["']"#).expect("Invalid regex"));

static BLOG_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href=["']/blog/([^"']+)["']"#).expect("Invalid regex"));

static PAGE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"href=["']/(about|contact|delivery|shipping|returns|faq|support|stores|privacy|terms)["']"#,
    )
    .expect("Invalid regex")
});

/// Rewrite product, blog and static page links to double-quoted hrefs
/// carrying [`INTERNAL_LINK_CLASS`].
#[must_use]
pub fn mark_internal_links(html: &str) -> String {
    let html = PRODUCT_LINK_RE.replace_all(html, |caps: &regex::Captures| {
        format!(r#"href="/products/{}" class="{INTERNAL_LINK_CLASS}""#, &caps[1])
    });
    let html = BLOG_LINK_RE.replace_all(&html, |caps: &regex::Captures| {
        format!(r#"href="/blog/{}" class="{INTERNAL_LINK_CLASS}""#, &caps[1])
    });
    let html = PAGE_LINK_RE.replace_all(&html, |caps: &regex::Captures| {
        format!(r#"href="/{}" class="{INTERNAL_LINK_CLASS}""#, &caps[1])
    });
    html.into_owned()
}

// =============================================================================
// Headings
// =============================================================================

static H1_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<h1([^>]*)>").expect("Invalid regex"));

static H1_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</h1>").expect("Invalid regex"));

/// Turn every `<h1>` into `<h2>`, keeping attributes.
#[must_use]
pub fn demote_headings(html: &str) -> String {
    let html = H1_OPEN_RE.replace_all(html, "<h2${1}>");
    H1_CLOSE_RE.replace_all(&html, "</h2>").into_owned()
}

// =============================================================================
// Pipeline
// =============================================================================

/// Full processing applied to an article body before rendering.
#[must_use]
pub fn process_article_html(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    demote_headings(&mark_internal_links(&sanitize_html(html)))
}

/// Normalize an image reference from the database.
///
/// Absolute, protocol-relative, `data:` and rooted URLs are kept; bare paths
/// are made rooted.
#[must_use]
pub fn image_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty()
        || raw.starts_with("http://")
        || raw.starts_with("https://")
        || raw.starts_with("//")
        || raw.starts_with("data:")
        || raw.starts_with('/')
    {
        raw.to_owned()
    } else {
        format!("/{raw}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_script_style_and_iframe() {
        let html = r#"<p>a</p><script src="x.js">alert(1)</script><style>p{}</style><IFRAME src="y"></IFRAME><p>b</p>"#;
        assert_eq!(sanitize_html(html), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_strips_unclosed_script_tag() {
        assert_eq!(sanitize_html("<p>a</p><script src=x.js>"), "<p>a</p>");
    }

    #[test]
    fn test_strips_event_handlers() {
        let html = r#"<img src="/a.png" onerror="alert(1)"><a href="/x" onClick='go()'>x</a>"#;
        assert_eq!(
            sanitize_html(html),
            r#"<img src="/a.png"><a href="/x">x</a>"#
        );
    }

    #[test]
    fn test_neutralizes_javascript_urls() {
        assert_eq!(
            sanitize_html(r#"<a href="javascript:alert(1)">x</a>"#),
            r##"<a href="#">x</a>"##
        );
        assert_eq!(
            sanitize_html("<a href=JavaScript:alert(1)>x</a>"),
            r##"<a href="#">x</a>"##
        );
    }

    #[test]
    fn test_keeps_body_text_that_looks_like_attributes() {
        let html = "<p>Buy one = get one free</p>";
        assert_eq!(process_article_html(html), html);

        let text = r#"<p>Set onsale = "yes" and href=javascript:void in the editor</p>"#;
        assert_eq!(sanitize_html(text), text);
    }

    #[test]
    fn test_strips_handlers_but_keeps_neighbouring_text() {
        assert_eq!(
            sanitize_html(r#"<p onclick="x()">one = two</p>"#),
            "<p>one = two</p>"
        );
    }

    #[test]
    fn test_marks_product_and_blog_links() {
        let html = r#"<a href='/products/red-shirt'>shirt</a> <a href="/blog/care-guide">guide</a>"#;
        assert_eq!(
            mark_internal_links(html),
            r#"<a href="/products/red-shirt" class="internal-link">shirt</a> <a href="/blog/care-guide" class="internal-link">guide</a>"#
        );
    }

    #[test]
    fn test_marks_known_pages_only() {
        assert_eq!(
            mark_internal_links(r#"<a href="/delivery">d</a>"#),
            r#"<a href="/delivery" class="internal-link">d</a>"#
        );
        let other = r#"<a href="/careers">c</a>"#;
        assert_eq!(mark_internal_links(other), other);
    }

    #[test]
    fn test_external_links_untouched() {
        let html = r#"<a href="https://example.com/products/x">x</a>"#;
        assert_eq!(mark_internal_links(html), html);
    }

    #[test]
    fn test_demotes_h1_case_insensitive() {
        assert_eq!(
            demote_headings(r#"<H1 class="big">Title</H1><h2>Sub</h2>"#),
            r#"<h2 class="big">Title</h2><h2>Sub</h2>"#
        );
    }

    #[test]
    fn test_pipeline() {
        let html = r#"<h1>Care</h1><script>x()</script><p>See <a href="/products/wool">wool</a>.</p>"#;
        assert_eq!(
            process_article_html(html),
            r#"<h2>Care</h2><p>See <a href="/products/wool" class="internal-link">wool</a>.</p>"#
        );
        assert_eq!(process_article_html("   "), "");
    }

    #[test]
    fn test_image_url() {
        assert_eq!(image_url("https://cdn.shop.am/a.jpg"), "https://cdn.shop.am/a.jpg");
        assert_eq!(image_url("//cdn.shop.am/a.jpg"), "//cdn.shop.am/a.jpg");
        assert_eq!(image_url("data:image/png;base64,AAA"), "data:image/png;base64,AAA");
        assert_eq!(image_url("/uploads/a.jpg"), "/uploads/a.jpg");
        assert_eq!(image_url("uploads/a.jpg"), "/uploads/a.jpg");
        assert_eq!(image_url("  "), "");
    }
}
