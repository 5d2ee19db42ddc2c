//! HTML transforms for the proxy path
//!
//! Three composable pure transforms over an HTML document string.
//! Each is idempotent when applied twice with the same arguments: no
//! double-injection and no re-rewriting of already-absolute URLs.
//!
//! The transforms are textual on purpose. Parsing and reserializing
//! the document would normalize markup the page may depend on, while
//! attribute-level rewriting leaves everything else byte-identical.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

/// `<meta http-equiv=...>` tags that block embedding, any attribute
/// order, case, or quote style.
static EMBED_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta\b[^>]*\bhttp-equiv\s*=\s*["']?\s*(?:content-security-policy|x-frame-options)\s*["']?[^>]*>"#,
    )
    .expect("valid meta regex")
});

/// Quoted `href`/`src` attribute values.
static URL_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(href|src)=(?:"([^"]*)"|'([^']*)')"#).expect("valid url attribute regex")
});

/// Remove any `<meta>` tag whose `http-equiv` is
/// Content-Security-Policy or X-Frame-Options.
pub fn strip_embedding_headers(html: &str) -> String {
    EMBED_META_RE.replace_all(html, "").into_owned()
}

/// Rewrite relative `href`/`src` values to absolute URLs against the
/// origin of `base_url`.
///
/// Already-absolute values (`http...`, `//`), fragment hrefs and
/// `data:` srcs are left alone, as is any attribute whose value fails
/// to resolve. A malformed `base_url` leaves the whole document
/// unmodified.
pub fn rewrite_relative_urls(html: &str, base_url: &str) -> String {
    let origin = match Url::parse(base_url) {
        Ok(base) => base.origin().ascii_serialization(),
        Err(_) => return html.to_string(),
    };
    let origin_url = match Url::parse(&origin) {
        Ok(u) => u,
        Err(_) => return html.to_string(),
    };

    URL_ATTR_RE
        .replace_all(html, |caps: &Captures| {
            let attr = &caps[1];
            let (value, quote) = match (caps.get(2), caps.get(3)) {
                (Some(v), _) => (v.as_str(), '"'),
                (_, Some(v)) => (v.as_str(), '\''),
                _ => return caps[0].to_string(),
            };

            if keep_as_is(attr, value) {
                return caps[0].to_string();
            }
            match origin_url.join(value) {
                Ok(resolved) => format!("{attr}={quote}{resolved}{quote}"),
                Err(_) => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn keep_as_is(attr: &str, value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    if lower.starts_with("http") || lower.starts_with("//") {
        return true;
    }
    if attr.eq_ignore_ascii_case("href") {
        lower.starts_with('#')
    } else {
        lower.starts_with("data:")
    }
}

/// Append a `<script src=...>` reference, immediately before the
/// closing body tag when present, at the end of the document
/// otherwise. A document already carrying the exact tag is returned
/// unchanged.
pub fn inject_script_reference(html: &str, script_path: &str) -> String {
    let tag = format!("<script src=\"{script_path}\"></script>");
    if html.contains(&tag) {
        return html.to_string();
    }
    if html.contains("</body>") {
        html.replacen("</body>", &format!("{tag}\n</body>"), 1)
    } else {
        format!("{html}{tag}")
    }
}

/// Fixed proxy composition: strip headers, then rewrite URLs, then
/// inject the selector script. The order is a contract; injecting
/// before rewriting would rewrite the injected script path itself.
pub fn proxy_pipeline(html: &str, base_url: &str, script_path: &str) -> String {
    let html = strip_embedding_headers(html);
    let html = rewrite_relative_urls(&html, base_url);
    inject_script_reference(&html, script_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://shop.example.com/products/1";

    #[test]
    fn test_strip_removes_csp_and_frame_metas() {
        let html = concat!(
            "<head>",
            "<meta charset=\"utf-8\">",
            "<meta http-equiv=\"Content-Security-Policy\" content=\"default-src 'self'\">",
            "<meta content=\"DENY\" http-equiv='x-frame-options'>",
            "<meta name=\"viewport\" content=\"width=device-width\">",
            "</head>"
        );
        let out = strip_embedding_headers(html);
        assert!(!out.to_lowercase().contains("http-equiv"));
        assert!(out.contains("charset=\"utf-8\""));
        assert!(out.contains("viewport"));
    }

    #[test]
    fn test_strip_handles_unquoted_values() {
        let html = "<meta http-equiv=X-Frame-Options content=DENY><p>body</p>";
        let out = strip_embedding_headers(html);
        assert_eq!(out, "<p>body</p>");
    }

    #[test]
    fn test_rewrite_resolves_relative_against_origin() {
        let html = r#"<a href="/about">About</a><img src='logo.png'>"#;
        let out = rewrite_relative_urls(html, BASE);
        assert!(out.contains(r#"href="https://shop.example.com/about""#));
        assert!(out.contains("src='https://shop.example.com/logo.png'"));
    }

    #[test]
    fn test_rewrite_skips_absolute_fragment_and_data() {
        let html = concat!(
            r#"<a href="https://other.test/x">x</a>"#,
            r#"<a href="//cdn.test/y">y</a>"#,
            r##"<a href="#section">z</a>"##,
            r#"<img src="data:image/png;base64,AAAA">"#,
        );
        assert_eq!(rewrite_relative_urls(html, BASE), html);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let html = r##"<a href="/a">a</a><img src="b.png"><a href="#top">t</a>"##;
        let once = rewrite_relative_urls(html, BASE);
        let twice = rewrite_relative_urls(&once, BASE);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rewrite_malformed_base_is_a_noop() {
        let html = r#"<a href="/a">a</a>"#;
        assert_eq!(rewrite_relative_urls(html, "not a url"), html);
    }

    #[test]
    fn test_inject_before_closing_body() {
        let html = "<html><body><p>hi</p></body></html>";
        let out = inject_script_reference(html, "/selector.js");
        assert_eq!(
            out,
            "<html><body><p>hi</p><script src=\"/selector.js\"></script>\n</body></html>"
        );
    }

    #[test]
    fn test_inject_appends_without_body_tag() {
        let out = inject_script_reference("<p>bare</p>", "/selector.js");
        assert_eq!(out, "<p>bare</p><script src=\"/selector.js\"></script>");
    }

    #[test]
    fn test_inject_is_idempotent() {
        let once = inject_script_reference("<body></body>", "/selector.js");
        let twice = inject_script_reference(&once, "/selector.js");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_pipeline_order_protects_injected_script() {
        let html = "<body><a href=\"/x\">x</a></body>";
        let out = proxy_pipeline(html, BASE, "/selector.js");
        assert!(out.contains("href=\"https://shop.example.com/x\""));
        // The injected tag keeps its relative path.
        assert!(out.contains("<script src=\"/selector.js\"></script>"));
    }
}
