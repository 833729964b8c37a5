use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

/// Block-level and heading tags walked on the primary schedule page.
pub const PRIMARY_TAGS: &[&str] = &["h2", "h3", "h4", "h5", "strong", "b", "p", "div"];

static PRIMARY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(&PRIMARY_TAGS.join(", ")).unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub tag: String,
    pub text: String,
}

/// Text fragments of the primary tags in document order. Nested matches each
/// yield their own fragment, so a container's text repeats its children's.
pub fn fragments(html: &str) -> Vec<Fragment> {
    let doc = Html::parse_document(html);
    doc.select(&PRIMARY_SELECTOR)
        .map(|el| Fragment {
            tag: el.value().name().to_string(),
            text: element_text(el).trim().to_string(),
        })
        .filter(|f| !f.text.is_empty())
        .collect()
}

/// Concatenated descendant text, untrimmed.
pub fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>()
}

pub fn first_descendant<'a>(el: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    el.select(selector).next()
}
