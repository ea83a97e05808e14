use scraper::{ElementRef, Html};
use std::collections::HashMap;

/// A hyperlink found in a page: its target, collapsed text and raw attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
    pub attrs: HashMap<String, String>,
}

impl Anchor {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Collects every `<a>` element with a non-empty `href`, in document order.
pub fn parse_anchors(html: &str) -> Vec<Anchor> {
    let document = Html::parse_document(html);

    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "a")
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            if href.is_empty() {
                return None;
            }

            let raw_text: String = element.text().collect();
            let text = raw_text.split_whitespace().collect::<Vec<_>>().join(" ");
            let attrs = element
                .value()
                .attrs()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect();

            Some(Anchor {
                href: href.to_string(),
                text,
                attrs,
            })
        })
        .collect()
}
