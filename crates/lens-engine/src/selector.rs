//! Selector synthesis
//!
//! Derives a minimal, stable CSS selector for a DOM node. The same
//! algorithm ships to the browser in the selector client script; this
//! server-side version runs over a parsed document and backs
//! [`describe_element`], which builds the payload the client emits on
//! click.
//!
//! Priority order: page-unique `#id`, then a document-unique
//! `tag.class...` compound, then an ancestor path anchored at the
//! nearest id (or body), with `:nth-of-type` disambiguation.

use scraper::{ElementRef, Html, Selector};

use lens_core::SelectedElement;

use crate::error::{EngineError, Result};

/// Compute a stable CSS selector for `element` within `document`.
///
/// Deterministic: a pure function of the node and its ancestor chain.
pub fn compute_selector(document: &Html, element: ElementRef) -> String {
    if let Some(id) = element.value().id() {
        if !id.is_empty() {
            return format!("#{id}");
        }
    }

    let classes: Vec<&str> = element.value().classes().collect();
    if !classes.is_empty() {
        let compound = format!("{}.{}", element.value().name(), classes.join("."));
        if let Some(parsed) = Selector::parse(&compound).ok() {
            if document.select(&parsed).count() == 1 {
                return compound;
            }
        }
    }

    ancestor_path(element)
}

/// Root-to-leaf path of segments joined with `" > "`, walking up to
/// (excluding) body. An ancestor with an id anchors the path.
fn ancestor_path(element: ElementRef) -> String {
    let mut path: Vec<String> = Vec::new();
    let mut current = Some(element);

    while let Some(node) = current {
        if node.value().name() == "body" {
            break;
        }

        if let Some(id) = node.value().id() {
            if !id.is_empty() {
                path.push(format!("#{id}"));
                break;
            }
        }

        let mut segment = node.value().name().to_string();
        if let Some(position) = nth_of_type(node) {
            segment.push_str(&format!(":nth-of-type({position})"));
        }
        path.push(segment);

        current = node.parent().and_then(ElementRef::wrap);
    }

    if path.is_empty() {
        // The node is the body root itself.
        return element.value().name().to_string();
    }

    path.reverse();
    path.join(" > ")
}

/// 1-based position among same-tag siblings, or `None` when the node
/// is the only child with its tag.
fn nth_of_type(node: ElementRef) -> Option<usize> {
    let parent = node.parent().and_then(ElementRef::wrap)?;
    let same_tag: Vec<ElementRef> = parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|sibling| sibling.value().name() == node.value().name())
        .collect();

    if same_tag.len() > 1 {
        same_tag
            .iter()
            .position(|sibling| sibling.id() == node.id())
            .map(|i| i + 1)
    } else {
        None
    }
}

/// Resolve `selector` in `html` and describe the first match the way
/// the client script describes a clicked element: canonical selector,
/// trimmed text, outer HTML, lowercase tag name.
pub fn describe_element(html: &str, selector: &str) -> Result<Option<SelectedElement>> {
    let parsed = Selector::parse(selector)
        .map_err(|e| EngineError::InvalidSelector(format!("{selector}: {e}")))?;
    let document = Html::parse_document(html);

    Ok(document.select(&parsed).next().map(|element| SelectedElement {
        selector: compute_selector(&document, element),
        text: element.text().collect::<String>().trim().to_string(),
        html: element.html(),
        tag_name: element.value().name().to_lowercase(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first<'a>(document: &'a Html, css: &str) -> ElementRef<'a> {
        let sel = Selector::parse(css).unwrap();
        document.select(&sel).next().unwrap()
    }

    #[test]
    fn test_id_wins() {
        let document = Html::parse_document(r#"<body><div id="x" class="c">hi</div></body>"#);
        assert_eq!(compute_selector(&document, first(&document, "#x")), "#x");
    }

    #[test]
    fn test_unique_class_compound() {
        let document = Html::parse_document(
            r#"<body><span class="price sale">$1</span><span class="name">n</span></body>"#,
        );
        assert_eq!(
            compute_selector(&document, first(&document, ".price")),
            "span.price.sale"
        );
    }

    #[test]
    fn test_non_unique_class_falls_through_to_path() {
        let document = Html::parse_document(
            r#"<body><div><p class="row">a</p><p class="row">b</p></div></body>"#,
        );
        let selector = compute_selector(&document, first(&document, "div > p:nth-of-type(2)"));
        assert_eq!(selector, "div > p:nth-of-type(2)");
    }

    #[test]
    fn test_nth_of_type_counts_same_tag_siblings() {
        let document = Html::parse_document(
            "<body><ul><li>one</li><li>two</li><li>three</li></ul></body>",
        );
        let items = Selector::parse("li").unwrap();
        let second = document.select(&items).nth(1).unwrap();
        assert_eq!(
            compute_selector(&document, second),
            "ul > li:nth-of-type(2)"
        );
    }

    #[test]
    fn test_ancestor_id_anchors_path() {
        let document = Html::parse_document(
            r#"<body><section id="main"><div><em>t</em></div></section></body>"#,
        );
        assert_eq!(
            compute_selector(&document, first(&document, "em")),
            "#main > div > em"
        );
    }

    #[test]
    fn test_body_degenerates_to_single_segment() {
        let document = Html::parse_document("<body><p>x</p></body>");
        assert_eq!(compute_selector(&document, first(&document, "body")), "body");
    }

    #[test]
    fn test_describe_element_round_trip() {
        let html = r#"<body><div><span id="price"> $19.99 </span></div></body>"#;
        let described = describe_element(html, "span").unwrap().unwrap();
        assert_eq!(described.selector, "#price");
        assert_eq!(described.text, "$19.99");
        assert_eq!(described.tag_name, "span");
        assert!(described.html.contains("id=\"price\""));
    }

    #[test]
    fn test_describe_element_no_match() {
        assert_eq!(describe_element("<body></body>", ".nope").unwrap(), None);
        assert!(describe_element("<body></body>", "p..q").is_err());
    }
}
