use crate::api::{HttpBackend, LensBackend};
use crate::chat::ChatWidget;
use crate::config::CONFIG;
use crate::render::{ComrakRenderer, MarkdownRenderer, SharedRenderer};
use crate::views::{ChatLauncher, ChatPanel, UploadView};
use dioxus::prelude::*;
use std::rc::Rc;

const LENS_CSS: Asset = asset!("/assets/lens.css");

/// Backend shared through context.
#[derive(Clone)]
pub struct Backend(pub Rc<dyn LensBackend>);

/// Markdown capability shared through context; `None` shows plain text.
#[derive(Clone)]
pub struct Markdown(pub SharedRenderer);

fn markdown_capability(enabled: bool) -> SharedRenderer {
    if enabled {
        let renderer: Rc<dyn MarkdownRenderer> = Rc::new(ComrakRenderer);
        Some(renderer)
    } else {
        None
    }
}

#[component]
pub fn App() -> Element {
    use_context_provider(|| Backend(Rc::new(HttpBackend::from_config(&CONFIG))));
    use_context_provider(|| Markdown(markdown_capability(CONFIG.markdown)));
    let chat = use_signal(ChatWidget::new);

    rsx! {
        document::Link { rel: "stylesheet", href: LENS_CSS }
        AppHeader { chat }
        main { class: "main-container",
            section { class: "intro",
                h1 { "What are you looking at?" }
                p { class: "text-muted",
                    "Snap or upload a photo of a dish or a landmark and get the story behind it."
                }
            }
            UploadView {}
        }
        ChatLauncher { chat }
        ChatPanel { chat }
    }
}

#[component]
fn AppHeader(chat: Signal<ChatWidget>) -> Element {
    let mut chat = chat;
    rsx! {
        div { class: "header",
            div { class: "header-content",
                span { class: "header-wordmark", "Lens" }
                nav { class: "tabs",
                    a { class: "tab active", href: "#upload", "Identify" }
                    a {
                        id: "chat-nav",
                        class: "tab",
                        href: "#",
                        onclick: move |evt| {
                            evt.prevent_default();
                            chat.write().toggle();
                        },
                        "Travel chat"
                    }
                }
            }
        }
    }
}
