//! Chat widget state: expansion, transcript, input and streaming replies.
//!
//! A submit appends the user turn and an empty model placeholder, then
//! streams the reply on a worker thread. Chunks come back over a channel
//! and are applied in order by [`ChatWidget::poll`] on the UI thread, so the
//! transcript only ever has one writer.

use std::sync::mpsc;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use eframe::egui;

use crate::net::advisor::Advisor;

pub const GREETING: &str =
    "Hello! I am your stellar guide. Ask me anything about neutron stars, gravity, or the universe.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Messages from the streaming worker.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    Chunk(String),
    Finished,
}

/// Collapsed (icon only) or expanded (full panel). Changed only by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatView {
    Collapsed,
    Expanded,
}

pub struct ChatWidget {
    view: ChatView,
    messages: Vec<ChatMessage>,
    input: String,
    is_typing: bool,
    /// Index of the placeholder being filled by the active stream.
    streaming: Option<usize>,
    rx: Option<mpsc::Receiver<ChatEvent>>,
    scroll_to_latest: bool,
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatWidget {
    pub fn new() -> Self {
        Self {
            view: ChatView::Collapsed,
            messages: vec![ChatMessage::new(Role::Model, GREETING)],
            input: String::new(),
            is_typing: false,
            streaming: None,
            rx: None,
            scroll_to_latest: false,
        }
    }

    pub fn view(&self) -> ChatView {
        self.view
    }

    pub fn is_expanded(&self) -> bool {
        self.view == ChatView::Expanded
    }

    pub fn open(&mut self) {
        self.view = ChatView::Expanded;
        self.scroll_to_latest = true;
    }

    pub fn close(&mut self) {
        self.view = ChatView::Collapsed;
    }

    pub fn toggle(&mut self) {
        match self.view {
            ChatView::Collapsed => self.open(),
            ChatView::Expanded => self.close(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Draft text, bound to the input field.
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    /// Whether the send button should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.input.trim().is_empty() && !self.is_typing
    }

    /// Returns `true` once after the transcript grew or changed.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_latest)
    }

    /// Send the current input. No-op (returns `false`) when the input is
    /// blank or a reply is still streaming.
    pub fn submit(&mut self, advisor: &Arc<dyn Advisor>, ctx: &egui::Context) -> bool {
        if !self.can_submit() {
            return false;
        }

        let history = self.messages.clone();
        let text = self.input.trim().to_string();
        self.input.clear();
        self.messages.push(ChatMessage::new(Role::User, text.clone()));
        self.messages.push(ChatMessage::new(Role::Model, String::new()));
        self.streaming = Some(self.messages.len() - 1);
        self.is_typing = true;
        self.scroll_to_latest = true;

        let (tx, rx) = mpsc::channel();
        self.rx = Some(rx);

        let advisor = Arc::clone(advisor);
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            advisor.stream_chat(&history, &text, &mut |chunk| {
                let _ = tx.send(ChatEvent::Chunk(chunk.to_string()));
                ctx.request_repaint();
            });
            let _ = tx.send(ChatEvent::Finished);
            ctx.request_repaint();
        });
        true
    }

    /// Apply one event from the stream.
    pub fn apply(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Chunk(chunk) => {
                if let Some(msg) = self.streaming.and_then(|i| self.messages.get_mut(i)) {
                    msg.text.push_str(&chunk);
                    self.scroll_to_latest = true;
                }
            }
            ChatEvent::Finished => self.finish(),
        }
    }

    /// Drain pending stream events. Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let event = match self.rx.as_ref().map(|rx| rx.try_recv()) {
                Some(Ok(event)) => event,
                Some(Err(mpsc::TryRecvError::Disconnected)) => {
                    log::warn!("Chat stream ended without completion");
                    self.finish();
                    break;
                }
                Some(Err(mpsc::TryRecvError::Empty)) | None => break,
            };
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn finish(&mut self) {
        self.is_typing = false;
        self.streaming = None;
        self.rx = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Stage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    struct ScriptedAdvisor {
        chunks: Vec<&'static str>,
        calls: AtomicUsize,
        gate: Option<Mutex<mpsc::Receiver<()>>>,
        seen_history: Mutex<Vec<usize>>,
    }

    impl ScriptedAdvisor {
        fn new(chunks: Vec<&'static str>) -> Self {
            Self {
                chunks,
                calls: AtomicUsize::new(0),
                gate: None,
                seen_history: Mutex::new(Vec::new()),
            }
        }
    }

    impl Advisor for ScriptedAdvisor {
        fn stage_fact(&self, _: Stage) -> String {
            String::new()
        }

        fn stage_answer(&self, _: Stage, _: &str) -> String {
            String::new()
        }

        fn stream_chat(&self, history: &[ChatMessage], _: &str, on_chunk: &mut dyn FnMut(&str)) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_history.lock().unwrap().push(history.len());
            if let Some(gate) = &self.gate {
                let _ = gate.lock().unwrap().recv_timeout(Duration::from_secs(5));
            }
            for chunk in &self.chunks {
                on_chunk(chunk);
            }
        }
    }

    fn drain(chat: &mut ChatWidget) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while chat.is_typing() {
            chat.poll();
            assert!(Instant::now() < deadline, "stream did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn starts_collapsed_with_greeting() {
        let chat = ChatWidget::new();
        assert_eq!(chat.view(), ChatView::Collapsed);
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].role, Role::Model);
        assert_eq!(chat.messages()[0].text, GREETING);
    }

    #[test]
    fn toggle_switches_view() {
        let mut chat = ChatWidget::new();
        chat.toggle();
        assert!(chat.is_expanded());
        chat.toggle();
        assert_eq!(chat.view(), ChatView::Collapsed);
    }

    #[test]
    fn chunks_concatenate_in_order() {
        let scripted = Arc::new(ScriptedAdvisor::new(vec!["Neu", "tron ", "stars are dense."]));
        let advisor: Arc<dyn Advisor> = scripted.clone();
        let ctx = egui::Context::default();
        let mut chat = ChatWidget::new();
        *chat.input_mut() = "What is a neutron star?".into();

        assert!(chat.submit(&advisor, &ctx));
        assert!(chat.input().is_empty());
        assert!(chat.is_typing());
        assert_eq!(chat.messages().len(), 3);
        assert_eq!(chat.messages()[1].role, Role::User);
        assert_eq!(chat.messages()[1].text, "What is a neutron star?");

        drain(&mut chat);
        let last = chat.messages().last().unwrap();
        assert_eq!(last.role, Role::Model);
        assert_eq!(last.text, "Neutron stars are dense.");
        assert_eq!(scripted.calls.load(Ordering::SeqCst), 1);
        // History excludes the new turn and its placeholder.
        assert_eq!(*scripted.seen_history.lock().unwrap(), vec![1]);
    }

    #[test]
    fn blank_input_is_noop() {
        let scripted = Arc::new(ScriptedAdvisor::new(vec!["x"]));
        let advisor: Arc<dyn Advisor> = scripted.clone();
        let ctx = egui::Context::default();
        let mut chat = ChatWidget::new();
        for input in ["", "   ", "\n\t"] {
            *chat.input_mut() = input.into();
            assert!(!chat.submit(&advisor, &ctx));
        }
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(scripted.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn submit_while_typing_is_ignored() {
        let (release, gate) = mpsc::channel();
        let mut scripted = ScriptedAdvisor::new(vec!["done"]);
        scripted.gate = Some(Mutex::new(gate));
        let scripted = Arc::new(scripted);
        let advisor: Arc<dyn Advisor> = scripted.clone();
        let ctx = egui::Context::default();
        let mut chat = ChatWidget::new();

        *chat.input_mut() = "first".into();
        assert!(chat.submit(&advisor, &ctx));
        *chat.input_mut() = "second".into();
        assert!(!chat.can_submit());
        assert!(!chat.submit(&advisor, &ctx));
        assert_eq!(chat.messages().len(), 3);
        assert_eq!(chat.input(), "second");

        release.send(()).unwrap();
        drain(&mut chat);
        assert_eq!(chat.messages().len(), 3);
        assert_eq!(scripted.calls.load(Ordering::SeqCst), 1);
        assert!(chat.can_submit());
    }

    #[test]
    fn apply_fills_only_the_placeholder() {
        let mut chat = ChatWidget::new();
        chat.apply(ChatEvent::Chunk("ignored".into()));
        assert_eq!(chat.messages()[0].text, GREETING);

        chat.messages.push(ChatMessage::new(Role::User, "hi"));
        chat.messages.push(ChatMessage::new(Role::Model, ""));
        chat.streaming = Some(2);
        chat.is_typing = true;
        chat.apply(ChatEvent::Chunk("a".into()));
        chat.apply(ChatEvent::Chunk("b".into()));
        chat.apply(ChatEvent::Finished);
        assert_eq!(chat.messages()[2].text, "ab");
        assert!(!chat.is_typing());
        assert!(chat.take_scroll_request());
        assert!(!chat.take_scroll_request());
    }

    #[test]
    fn dropped_worker_ends_typing() {
        let mut chat = ChatWidget::new();
        let (tx, rx) = mpsc::channel();
        chat.rx = Some(rx);
        chat.is_typing = true;
        tx.send(ChatEvent::Chunk("x".into())).unwrap();
        drop(tx);
        assert_eq!(chat.poll(), 1);
        assert!(!chat.is_typing());
    }
}
