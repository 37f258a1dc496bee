//! Builds a headless page from HTML markup.
//!
//! Layout is a single vertical flow in document order:
//! - every `<img>` is a block whose height comes from its `height`
//!   attribute, an inline `height: Npx`, or [`DEFAULT_IMAGE_HEIGHT`]
//! - a `<div>` with an inline pixel height and no images inside is a spacer;
//!   spacers nested in a spacer add nothing
//! - elements with inline `display: none` keep their box but take no room

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::domain::entities::{Display, ElementId, LayoutBox};

use super::element::{IMG_TAG, PageElement};
use super::HeadlessPage;

/// Height of an image with no declared size.
pub const DEFAULT_IMAGE_HEIGHT: f64 = 150.0;

static FLOW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img, div").expect("Failed to parse flow selector - this is a bug")
});

static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(IMG_TAG).expect("Failed to parse img selector - this is a bug")
});

static STYLE_HEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|;)\s*height\s*:\s*([0-9]+(?:\.[0-9]+)?)px")
        .expect("Failed to compile height regex - this is a bug")
});

static STYLE_DISPLAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|;)\s*display\s*:\s*([a-z-]+)")
        .expect("Failed to compile display regex - this is a bug")
});

/// Attributes carried by dedicated `PageElement` fields.
const RESERVED_ATTRIBUTES: [&str; 4] = ["id", "class", "src", "style"];

/// Parses `html` into a page with the given viewport height.
///
/// Never fails; malformed markup and sizes fall back to defaults.
#[must_use]
pub fn parse_html(html: &str, viewport_height: f64) -> HeadlessPage {
    let document = Html::parse_document(html);
    let page = HeadlessPage::new(viewport_height);
    let mut cursor = 0.0;
    let mut image_count = 0usize;
    let mut spacers = Vec::new();

    for node in document.select(&FLOW_SELECTOR) {
        let style = node.value().attr("style").unwrap_or_default();
        let display = style_display(style);

        if node.value().name() != IMG_TAG {
            let Some(height) = style_height(style) else {
                continue;
            };
            let is_spacer = display.is_displayed()
                && node.select(&IMG_SELECTOR).next().is_none()
                && !node.ancestors().any(|a| spacers.contains(&a.id()));
            if is_spacer {
                spacers.push(node.id());
                cursor += height;
            }
            continue;
        }

        image_count += 1;
        let height = node
            .value()
            .attr("height")
            .and_then(parse_pixels)
            .or_else(|| style_height(style))
            .unwrap_or(DEFAULT_IMAGE_HEIGHT);

        let mut element = image_element(node, LayoutBox::new(cursor, height), display);
        if display.is_displayed() {
            cursor += height;
        }

        if element.id.as_str().is_empty() {
            element.id = generated_id(image_count);
        }
        let declared = element.id.clone();
        let mut suffix = image_count;
        while !page.insert(element.clone()) {
            element.id = generated_id(suffix);
            suffix += 1;
        }
        if element.id != declared {
            warn!(id = %declared, fallback = %element.id, "Duplicate element id in markup");
        }
    }

    debug!(images = image_count, height = cursor, "Parsed page markup");
    page
}

fn image_element(node: ElementRef<'_>, layout: LayoutBox, display: Display) -> PageElement {
    let value = node.value();
    let id = value.id().map_or_else(String::new, str::to_string);

    let mut element = PageElement::image(id, layout);
    for class in value.classes() {
        element = element.with_class(class);
    }
    for (name, attr) in value.attrs() {
        if !RESERVED_ATTRIBUTES.contains(&name) {
            element = element.with_attribute(name, attr);
        }
    }
    element.src = value.attr("src").map(str::to_string);
    element.with_display(display)
}

fn generated_id(index: usize) -> ElementId {
    ElementId::new(format!("img-{index}"))
}

fn style_height(style: &str) -> Option<f64> {
    STYLE_HEIGHT_RE
        .captures(style)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn style_display(style: &str) -> Display {
    STYLE_DISPLAY_RE
        .captures(style)
        .and_then(|caps| caps.get(1))
        .map_or_else(Display::default, |m| Display::parse(m.as_str()))
}

fn parse_pixels(value: &str) -> Option<f64> {
    value
        .trim()
        .trim_end_matches("px")
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite() && *h >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::DocumentPort;

    const GALLERY: &str = r#"
        <html><body>
          <img id="hero" class="lazyload" data-src="/hero.jpg" height="400" alt="Hero">
          <div style="height: 2000px"></div>
          <img class="lazyload rounded" data-src="/second.jpg" style="height: 300px">
          <img id="hidden" class="lazyload" data-src="/hidden.jpg" style="display: none">
          <img src="/logo.png">
        </body></html>
    "#;

    #[test]
    fn test_images_are_stacked_in_document_order() {
        let page = parse_html(GALLERY, 800.0);
        let elements = page.snapshot();
        let ids: Vec<&str> = elements.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["hero", "img-2", "hidden", "img-4"]);

        assert_eq!(elements[0].layout, LayoutBox::new(0.0, 400.0));
        assert_eq!(elements[1].layout, LayoutBox::new(2400.0, 300.0));
        assert_eq!(elements[2].layout, LayoutBox::new(2700.0, DEFAULT_IMAGE_HEIGHT));
        assert_eq!(elements[3].layout, LayoutBox::new(2700.0, DEFAULT_IMAGE_HEIGHT));
    }

    #[test]
    fn test_attributes_and_classes() {
        let page = parse_html(GALLERY, 800.0);
        let second = page.element(&ElementId::from("img-2")).unwrap();
        assert_eq!(second.classes, vec!["lazyload", "rounded"]);
        assert_eq!(
            second.attributes.get("data-src").map(String::as_str),
            Some("/second.jpg")
        );
        assert!(!second.attributes.contains_key("style"));
        assert_eq!(second.src, None);

        let logo = page.element(&ElementId::from("img-4")).unwrap();
        assert_eq!(logo.src.as_deref(), Some("/logo.png"));
    }

    #[test]
    fn test_inline_display_none() {
        let page = parse_html(GALLERY, 800.0);
        let id = ElementId::from("hidden");
        assert_eq!(page.computed_display(&id), Ok(Display::None));
    }

    #[test]
    fn test_only_lazy_images_are_candidates() {
        let page = parse_html(GALLERY, 800.0);
        assert_eq!(page.query_images("lazyload").len(), 3);
    }

    #[test]
    fn test_duplicate_ids_fall_back_to_generated() {
        let page = parse_html(
            r#"<img id="a" class="lazyload"><img id="a" class="lazyload">"#,
            800.0,
        );
        let ids: Vec<String> = page.snapshot().into_iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec!["a", "img-2"]);
    }

    #[test]
    fn test_generated_id_skips_taken_ids() {
        let page = parse_html(
            r#"<img id="img-2" class="lazyload" data-src="/a.jpg">
               <img id="img-2" class="lazyload" data-src="/b.jpg">"#,
            800.0,
        );

        let ids = page.query_images("lazyload");
        assert_eq!(ids, vec![ElementId::from("img-2"), ElementId::from("img-3")]);
        assert_eq!(
            page.attribute(&ids[1], "data-src"),
            Ok(Some("/b.jpg".to_string()))
        );
    }

    #[test]
    fn test_nested_spacers_count_once() {
        let page = parse_html(
            r#"<div style="height: 100px"><div style="height: 100px"></div></div>
               <div><div style="height: 50px"></div></div>
               <img id="a">"#,
            800.0,
        );

        let a = page.element(&ElementId::from("a")).unwrap();
        assert_eq!(a.layout, LayoutBox::new(150.0, DEFAULT_IMAGE_HEIGHT));
    }

    #[test]
    fn test_malformed_sizes_use_default() {
        let page = parse_html(r#"<img height="tall"><p>unclosed"#, 800.0);
        let elements = page.snapshot();
        assert_eq!(elements.len(), 1);
        assert!((elements[0].layout.height - DEFAULT_IMAGE_HEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_style_helpers() {
        assert_eq!(style_height("width: 10px; height: 42.5px"), Some(42.5));
        assert_eq!(style_height("line-height: 3px"), None);
        assert_eq!(style_display("color: red; display:none"), Display::None);
        assert_eq!(style_display(""), Display::Inline);
        assert_eq!(parse_pixels("120px"), Some(120.0));
        assert_eq!(parse_pixels("-1"), None);
    }
}
