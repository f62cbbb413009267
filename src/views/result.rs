use crate::render::RenderedResult;
use crate::types::StatusLine;
use dioxus::prelude::*;

#[component]
pub fn ResultPanel(status: StatusLine, result: Option<RenderedResult>) -> Element {
    rsx! {
        div { class: "result-panel",
            if !status.text.is_empty() {
                p { id: "status", class: format_args!("status {}", status.tone.css_class()), "{status.text}" }
            }
            if let Some(result) = result {
                div { id: "result-text",
                    div { class: "story-content md", dangerous_inner_html: "{result.body_html}" }
                    if let Some(link) = result.map_link.as_ref() {
                        div { class: "map-btn-container",
                            a {
                                class: "btn btn-map",
                                href: "{link.url}",
                                target: "_blank",
                                rel: "noopener",
                                "{link.caption()}"
                            }
                        }
                    }
                    p { class: "meta", "{result.footer()}" }
                }
            }
        }
    }
}
