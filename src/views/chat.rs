use crate::chat::ChatWidget;
use crate::types::{ChatRole, TurnBody};
use crate::ui::{Backend, Markdown};
use crate::web::scroll_to_bottom;
use dioxus::prelude::*;
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};

const CHAT_LIST_ID: &str = "chat-messages";

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

fn format_message_timestamp(timestamp: Option<OffsetDateTime>) -> Option<String> {
    let mut datetime = timestamp?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

#[component]
pub fn ChatLauncher(chat: Signal<ChatWidget>) -> Element {
    let mut chat = chat;
    rsx! {
        button {
            id: "chat-launcher-btn",
            class: "chat-launcher",
            r#type: "button",
            title: "Travel chat",
            onclick: move |_| chat.write().toggle(),
            "?"
        }
    }
}

#[component]
pub fn ChatPanel(chat: Signal<ChatWidget>) -> Element {
    let backend = use_context::<Backend>();
    let markdown = use_context::<Markdown>();
    let mut chat = chat;
    let mut input = use_signal(String::new);

    use_effect(move || {
        let _epoch = chat.read().scroll_epoch();
        scroll_to_bottom(CHAT_LIST_ID);
    });

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let text = input();
        let Some(ticket) = chat
            .write()
            .begin_send(&text, Some(OffsetDateTime::now_utc()))
        else {
            return;
        };
        input.set(String::new());

        let backend = backend.clone();
        let markdown = markdown.clone();
        spawn(async move {
            let outcome = backend.0.chat(&ticket.message).await;
            chat.write().resolve(&ticket, outcome, markdown.0.as_deref());
        });
    };

    let widget = chat.read();
    let awaiting = widget.is_awaiting();

    rsx! {
        div { id: "chat-popup", class: if widget.is_open() { "chat-popup" } else { "chat-popup hidden" },
            div { class: "chat-header",
                span { "Travel assistant" }
                button {
                    id: "chat-close-btn",
                    class: "action-btn",
                    r#type: "button",
                    onclick: move |_| chat.write().toggle(),
                    "×"
                }
            }
            div { id: CHAT_LIST_ID, class: "chat-list",
                for turn in widget.transcript().iter() {
                    div { class: format_args!("chat-message {}", turn.role.css_class()),
                        {match &turn.body {
                            TurnBody::Text(text) => rsx! {
                                div { class: if turn.pending { "bubble shimmer-text" } else { "bubble" }, "{text}" }
                            },
                            TurnBody::Markup(html) => rsx! {
                                div { class: "bubble md", dangerous_inner_html: "{html}" }
                            },
                        }}
                        if let Some(ts) = format_message_timestamp(turn.created_at) {
                            div {
                                class: format_args!(
                                    "message-meta {}",
                                    match turn.role { ChatRole::User => "align-end", ChatRole::Bot => "align-start" }
                                ),
                                span { class: "message-timestamp", "{ts}" }
                            }
                        }
                    }
                }
            }
            form { id: "chat-form", class: "composer", onsubmit: on_submit,
                div { class: "hstack",
                    input {
                        id: "chat-input",
                        r#type: "text",
                        placeholder: "Ask about food or places…",
                        value: "{input}",
                        oninput: move |ev| input.set(ev.value()),
                        disabled: awaiting,
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "submit",
                        disabled: awaiting || input().trim().is_empty(),
                        "Send"
                    }
                }
            }
        }
    }
}
