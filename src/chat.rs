use crate::error::ApiError;
use crate::render::{MarkdownRenderer, escape_html, render_markdown};
use crate::types::{ChatResponse, ChatRole, ChatSource, ChatTurn, TurnBody};
use time::OffsetDateTime;
use tracing::{debug, warn};

pub const SEARCHING_TEXT: &str = "Searching for information…";
pub const CHAT_ERROR_TEXT: &str = "Sorry, I couldn't get an answer. Please try again.";

/// Request issued for one user message; `index` is the placeholder turn the
/// answer belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatTicket {
    pub index: usize,
    pub message: String,
}

/// Chat panel state: visibility and an append-only transcript.
#[derive(Debug, Default)]
pub struct ChatWidget {
    open: bool,
    transcript: Vec<ChatTurn>,
    awaiting: bool,
    appended: u64,
}

impl ChatWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    /// Bumped on every append; the view scrolls to the newest turn when it
    /// changes.
    pub fn scroll_epoch(&self) -> u64 {
        self.appended
    }

    /// Append the user's turn and a pending bot turn. Blank input, or input
    /// while an answer is outstanding, is ignored.
    pub fn begin_send(&mut self, text: &str, now: Option<OffsetDateTime>) -> Option<ChatTicket> {
        let trimmed = text.trim();
        if trimmed.is_empty() || self.awaiting {
            return None;
        }

        self.push(ChatTurn {
            role: ChatRole::User,
            body: TurnBody::Text(trimmed.to_string()),
            pending: false,
            created_at: now,
        });
        let index = self.transcript.len();
        self.push(ChatTurn {
            role: ChatRole::Bot,
            body: TurnBody::Text(SEARCHING_TEXT.to_string()),
            pending: true,
            created_at: now,
        });
        self.awaiting = true;

        Some(ChatTicket {
            index,
            message: trimmed.to_string(),
        })
    }

    /// Replace the ticket's placeholder with the answer or the error text.
    pub fn resolve(
        &mut self,
        ticket: &ChatTicket,
        outcome: Result<ChatResponse, ApiError>,
        renderer: Option<&dyn MarkdownRenderer>,
    ) {
        let body = match outcome {
            Ok(response) if response.success => {
                let answer = response.answer.unwrap_or_default();
                let mut html = render_markdown(renderer, &answer);
                html.push_str(&render_sources(&response.sources));
                TurnBody::Markup(html)
            }
            Ok(response) => {
                warn!(error = ?response.error, "chat backend reported failure");
                TurnBody::Text(CHAT_ERROR_TEXT.to_string())
            }
            Err(err) => {
                warn!(%err, "chat request failed");
                TurnBody::Text(CHAT_ERROR_TEXT.to_string())
            }
        };

        match self.transcript.get_mut(ticket.index) {
            Some(turn) if turn.pending && turn.role == ChatRole::Bot => {
                turn.body = body;
                turn.pending = false;
                self.awaiting = false;
            }
            _ => debug!(index = ticket.index, "no pending turn for chat answer"),
        }
    }

    fn push(&mut self, turn: ChatTurn) {
        self.transcript.push(turn);
        self.appended += 1;
    }
}

fn render_sources(sources: &[ChatSource]) -> String {
    let linkable: Vec<&ChatSource> = sources
        .iter()
        .filter(|s| s.url.starts_with("https://") || s.url.starts_with("http://"))
        .collect();
    if linkable.is_empty() {
        return String::new();
    }
    let mut html = String::from(r#"<ul class="chat-sources">"#);
    for source in linkable {
        let title = source
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&source.url);
        html.push_str(&format!(
            r#"<li><a href="{}" target="_blank" rel="noopener">{}</a></li>"#,
            escape_html(&source.url),
            escape_html(title)
        ));
    }
    html.push_str("</ul>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut chat = ChatWidget::new();
        assert!(!chat.is_open());
        chat.toggle();
        assert!(chat.is_open());
        chat.toggle();
        assert!(!chat.is_open());
    }

    #[test]
    fn test_blank_input_ignored() {
        let mut chat = ChatWidget::new();
        assert!(chat.begin_send("  ", None).is_none());
        assert!(chat.begin_send("\n\t", None).is_none());
        assert!(chat.transcript().is_empty());
        assert_eq!(chat.scroll_epoch(), 0);
    }

    #[test]
    fn test_sources_are_escaped() {
        let html = render_sources(&[
            ChatSource {
                title: Some("<b>Wiki</b>".into()),
                url: "https://vi.wikipedia.org/?a=1&b=2".into(),
            },
            ChatSource {
                title: None,
                url: "https://vnexpress.net".into(),
            },
        ]);
        assert!(html.contains("&lt;b&gt;Wiki&lt;/b&gt;"));
        assert!(html.contains("a=1&amp;b=2"));
        assert!(html.contains(">https://vnexpress.net</a>"));

        let scripted = render_sources(&[ChatSource {
            title: Some("x".into()),
            url: "javascript:alert(1)".into(),
        }]);
        assert!(scripted.is_empty());
    }

    #[test]
    fn test_late_answer_only_touches_its_placeholder() {
        let mut chat = ChatWidget::new();
        let ticket = chat.begin_send("Hi", None).unwrap();
        let bogus = ChatTicket {
            index: 0,
            message: "Hi".into(),
        };
        chat.resolve(&bogus, Err(ApiError::Transport("offline".into())), None);
        assert_eq!(
            chat.transcript()[0].body,
            TurnBody::Text("Hi".to_string())
        );
        assert!(chat.transcript()[ticket.index].pending);
        assert!(chat.is_awaiting());
    }
}
