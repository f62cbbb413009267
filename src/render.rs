use crate::types::{PredictResponse, ResultKind};
use comrak::{ComrakOptions, markdown_to_html};
use once_cell::sync::Lazy;
use std::rc::Rc;
use url::Url;

const MAP_SEARCH_BASE: &str = "https://www.google.com/maps/search/";

static MARKDOWN_OPTIONS: Lazy<ComrakOptions> = Lazy::new(|| {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    // Backend text is untrusted; raw HTML is dropped, not passed through.
    options.render.unsafe_ = false;
    options
});

/// Markdown-to-markup capability. The page works without one and falls
/// back to escaped text.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

pub struct ComrakRenderer;

impl MarkdownRenderer for ComrakRenderer {
    fn render(&self, markdown: &str) -> String {
        markdown_to_html(markdown, &MARKDOWN_OPTIONS)
    }
}

/// Literal text display: escaped, with line breaks kept.
pub struct PlainTextRenderer;

impl MarkdownRenderer for PlainTextRenderer {
    fn render(&self, markdown: &str) -> String {
        escape_html(markdown).replace('\n', "<br>")
    }
}

/// Renderer handed around the UI; `None` means no markdown support.
pub type SharedRenderer = Option<Rc<dyn MarkdownRenderer>>;

pub fn render_markdown(renderer: Option<&dyn MarkdownRenderer>, markdown: &str) -> String {
    match renderer {
        Some(renderer) => renderer.render(markdown),
        None => PlainTextRenderer.render(markdown),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapLink {
    pub url: String,
    pub label: String,
}

impl MapLink {
    pub fn caption(&self) -> String {
        format!("Directions to {}", self.label)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedResult {
    pub body_html: String,
    pub map_link: Option<MapLink>,
    pub label: String,
    pub confidence_text: String,
}

impl RenderedResult {
    pub fn footer(&self) -> String {
        format!(
            "Detected: {} • Confidence: {}",
            self.label, self.confidence_text
        )
    }
}

pub fn render_result(
    response: &PredictResponse,
    renderer: Option<&dyn MarkdownRenderer>,
    map_threshold: f64,
) -> RenderedResult {
    let label = response
        .class_name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "Unknown".to_string());
    let confidence = response.confidence.unwrap_or(0.0);

    let map_link = if shows_map_link(response.kind.as_ref(), confidence, map_threshold) {
        map_search_url(&label).map(|url| MapLink {
            url,
            label: label.clone(),
        })
    } else {
        None
    };

    RenderedResult {
        body_html: render_markdown(renderer, &response.message),
        map_link,
        label,
        confidence_text: format_confidence(confidence),
    }
}

/// Map links are only offered for confidently recognised places.
pub fn shows_map_link(kind: Option<&ResultKind>, confidence: f64, threshold: f64) -> bool {
    matches!(kind, Some(ResultKind::Place)) && confidence > threshold
}

pub fn map_search_url(query: &str) -> Option<String> {
    Url::parse_with_params(MAP_SEARCH_BASE, &[("api", "1"), ("query", query)])
        .ok()
        .map(String::from)
}

/// Percentage with one decimal, halves rounded up.
pub fn format_confidence(confidence: f64) -> String {
    let tenths = (confidence * 1000.0).round() / 10.0;
    format!("{tenths:.1}%")
}
