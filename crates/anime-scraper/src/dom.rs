//! DOM helpers shared by every extractor.
//!
//! Scrape targets rename classes between theme versions, so most lookups go
//! through [`first_match`] with an ordered list of selectors.

use scraper::node::Node;
use scraper::{ElementRef, Selector};

/// Compile a CSS selector literal once and hand out a `&'static Selector`.
macro_rules! css {
    ($selector:literal) => {{
        static SELECTOR: ::once_cell::sync::Lazy<::scraper::Selector> =
            ::once_cell::sync::Lazy::new(|| {
                ::scraper::Selector::parse($selector)
                    .expect(concat!("invalid selector literal: ", $selector))
            });
        &*SELECTOR
    }};
}
pub(crate) use css;

/// Collapse whitespace runs into single spaces and trim
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized text content of an element
pub fn text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<String>())
}

/// `Some(text)` unless it is empty
pub fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// First element matched by the first selector that matches anything
pub fn first_match<'a>(scope: ElementRef<'a>, selectors: &[&Selector]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .find_map(|selector| scope.select(selector).next())
}

/// All elements of the first selector in the chain that matches anything
pub fn all_matches<'a>(scope: ElementRef<'a>, selectors: &[&Selector]) -> Vec<ElementRef<'a>> {
    for selector in selectors {
        let found: Vec<_> = scope.select(selector).collect();
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

/// Non-empty normalized text of the first match
pub fn text_of(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(text).and_then(non_empty)
}

/// Trimmed, non-empty attribute value
pub fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Attribute of the first match
pub fn attr_of(scope: ElementRef<'_>, selector: &Selector, name: &str) -> Option<String> {
    scope
        .select(selector)
        .find_map(|element| attr(element, name))
}

/// Image URL of an `<img>`, looking through lazy-loading attributes
pub fn image_src(element: ElementRef<'_>) -> Option<String> {
    ["src", "data-src", "data-lazy-src"]
        .iter()
        .filter_map(|name| attr(element, name))
        .find(|value| !value.starts_with("data:"))
}

/// Image URL of the first `<img>` under `scope`
pub fn first_image(scope: ElementRef<'_>) -> Option<String> {
    scope.select(css!("img")).find_map(image_src)
}

/// Split `"Label: value"` on the first colon
pub fn split_label(raw: &str) -> Option<(String, String)> {
    let (label, value) = raw.split_once(':')?;
    let label = normalize_text(label);
    if label.is_empty() {
        return None;
    }
    Some((label, normalize_text(value)))
}

/// Map key for an info label: `"Total Episode"` → `"total_episode"`
pub fn info_key(label: &str) -> String {
    normalize_text(label)
        .to_lowercase()
        .replace(' ', "_")
}

/// Walk `<b>Label</b>: value<br>` runs inside a single element.
///
/// A pair ends at the next `<b>` or `<br>`; anchors inside a value contribute
/// their text.
pub fn bold_label_pairs(element: ElementRef<'_>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut current: Option<(String, String)> = None;

    for child in element.children() {
        match child.value() {
            Node::Element(el) if el.name() == "b" || el.name() == "strong" => {
                if let Some(pair) = current.take() {
                    pairs.push(pair);
                }
                let label = ElementRef::wrap(child).map(text).unwrap_or_default();
                current = Some((label, String::new()));
            }
            Node::Element(el) if el.name() == "br" => {
                if let Some(pair) = current.take() {
                    pairs.push(pair);
                }
            }
            Node::Element(_) => {
                if let (Some((_, value)), Some(el)) = (current.as_mut(), ElementRef::wrap(child)) {
                    value.push(' ');
                    value.push_str(&text(el));
                }
            }
            Node::Text(t) => {
                if let Some((_, value)) = current.as_mut() {
                    value.push_str(t);
                }
            }
            _ => {}
        }
    }
    if let Some(pair) = current.take() {
        pairs.push(pair);
    }

    pairs
        .into_iter()
        .filter_map(|(label, value)| {
            let label = normalize_text(label.trim_end_matches(':'));
            let value = normalize_text(value.trim_start().trim_start_matches(':'));
            if label.is_empty() {
                None
            } else {
                Some((label, value))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Episode \n\t 7  "), "Episode 7");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_fallback_chain_prefers_first_matching_selector() {
        let html = Html::parse_fragment(
            r#"<div><h1 class="new-title">New</h1><h2 class="old-title">Old</h2></div>"#,
        );
        let root = html.root_element();

        let found = first_match(root, &[css!(".missing"), css!(".old-title"), css!(".new-title")]);
        assert_eq!(found.map(text).as_deref(), Some("Old"));

        assert!(first_match(root, &[css!(".missing")]).is_none());
    }

    #[test]
    fn test_image_src_lazy_attributes() {
        let html = Html::parse_fragment(
            r#"<div><img src="data:image/gif;base64,R0lGOD" data-src="https://cdn/x.jpg"></div>"#,
        );
        assert_eq!(
            first_image(html.root_element()).as_deref(),
            Some("https://cdn/x.jpg")
        );
    }

    #[test]
    fn test_split_label_and_key() {
        assert_eq!(
            split_label("Tanggal Rilis: Okt 04, 2024"),
            Some(("Tanggal Rilis".to_string(), "Okt 04, 2024".to_string()))
        );
        assert_eq!(split_label("no colon"), None);
        assert_eq!(split_label(": value"), None);
        assert_eq!(info_key(" Total  Episode "), "total_episode");
    }

    #[test]
    fn test_bold_label_pairs() {
        let html = Html::parse_fragment(
            r#"<div class="infos"><b>Judul</b>: Dandadan<br>
               <b>Genres</b>: <a href="/g/action/">Action</a>, <a href="/g/comedy/">Comedy</a><br>
               <b>Durasi</b>: 23 min</div>"#,
        );
        let infos = html.root_element().select(css!(".infos")).next().unwrap();
        let pairs = bold_label_pairs(infos);

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], ("Judul".to_string(), "Dandadan".to_string()));
        assert_eq!(pairs[1].1, "Action, Comedy");
        assert_eq!(pairs[2], ("Durasi".to_string(), "23 min".to_string()));
    }
}
