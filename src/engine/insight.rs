//! Advisory fact for the info panel, fetched off the UI thread.
//!
//! Every request bumps a generation counter and tags its worker with it.
//! Replies from older generations are dropped on arrival, so a slow answer
//! for a previous stage can never overwrite the fact for the current one.
//! The network call itself is not aborted.

use std::sync::mpsc;
use std::sync::Arc;

use eframe::egui;

use crate::net::advisor::Advisor;
use crate::stage::Stage;

/// Shown while the current generation is pending.
pub const LOADING_TEXT: &str = "Analyzing stellar data...";

/// What a worker was asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightQuery {
    Fact,
    Question(String),
}

/// A finished lookup, tagged with the generation that issued it.
#[derive(Debug, Clone)]
pub struct InsightReply {
    pub generation: u64,
    pub stage: Stage,
    pub text: String,
}

/// Latest advisory text for the displayed stage.
pub struct InsightSlot {
    generation: u64,
    stage: Option<Stage>,
    query: Option<InsightQuery>,
    text: String,
    loading: bool,
    tx: mpsc::Sender<InsightReply>,
    rx: mpsc::Receiver<InsightReply>,
}

impl Default for InsightSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightSlot {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            generation: 0,
            stage: None,
            query: None,
            text: String::new(),
            loading: false,
            tx,
            rx,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Stage the current generation was requested for.
    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    /// The question being answered, if the current generation is one.
    pub fn question(&self) -> Option<&str> {
        match &self.query {
            Some(InsightQuery::Question(q)) => Some(q),
            _ => None,
        }
    }

    /// Text for display: the loading line while pending, else the last fact.
    pub fn display_text(&self) -> &str {
        if self.loading {
            LOADING_TEXT
        } else {
            &self.text
        }
    }

    /// Invalidate outstanding requests and start a new generation.
    pub fn begin(&mut self, stage: Stage, query: InsightQuery) -> u64 {
        self.generation += 1;
        self.stage = Some(stage);
        self.query = Some(query);
        self.loading = true;
        self.generation
    }

    /// Request a fun fact for `stage` on a worker thread.
    pub fn request_fact(&mut self, stage: Stage, advisor: &Arc<dyn Advisor>, ctx: &egui::Context) {
        self.spawn(stage, InsightQuery::Fact, advisor, ctx);
    }

    /// Ask a free-text question about `stage` on a worker thread.
    /// Blank questions are ignored.
    pub fn ask(
        &mut self,
        stage: Stage,
        question: &str,
        advisor: &Arc<dyn Advisor>,
        ctx: &egui::Context,
    ) -> bool {
        let question = question.trim();
        if question.is_empty() {
            return false;
        }
        self.spawn(stage, InsightQuery::Question(question.to_string()), advisor, ctx);
        true
    }

    fn spawn(
        &mut self,
        stage: Stage,
        query: InsightQuery,
        advisor: &Arc<dyn Advisor>,
        ctx: &egui::Context,
    ) {
        let generation = self.begin(stage, query.clone());
        log::debug!("Insight request #{} for {}", generation, stage);

        let tx = self.tx.clone();
        let advisor = Arc::clone(advisor);
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let text = match query {
                InsightQuery::Fact => advisor.stage_fact(stage),
                InsightQuery::Question(q) => advisor.stage_answer(stage, &q),
            };
            let _ = tx.send(InsightReply {
                generation,
                stage,
                text,
            });
            ctx.request_repaint();
        });
    }

    /// Apply a reply. Returns `false` if it belongs to a stale generation.
    pub fn accept(&mut self, reply: InsightReply) -> bool {
        if reply.generation != self.generation {
            log::debug!(
                "Dropping stale insight #{} for {} (current #{})",
                reply.generation,
                reply.stage,
                self.generation
            );
            return false;
        }
        self.text = reply.text;
        self.loading = false;
        true
    }

    /// Drain finished workers. Returns `true` if the displayed text changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(reply) = self.rx.try_recv() {
            changed |= self.accept(reply);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::chat::ChatMessage;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// Answers immediately, except for `slow` which waits for a release signal.
    struct GatedAdvisor {
        slow: Stage,
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl Advisor for GatedAdvisor {
        fn stage_fact(&self, stage: Stage) -> String {
            if stage == self.slow {
                let gate = self.gate.lock().unwrap();
                let _ = gate.recv_timeout(Duration::from_secs(5));
            }
            format!("fact about {}", stage.id())
        }

        fn stage_answer(&self, stage: Stage, question: &str) -> String {
            format!("{} / {}", stage.id(), question)
        }

        fn stream_chat(&self, _: &[ChatMessage], _: &str, _: &mut dyn FnMut(&str)) {}
    }

    fn wait_for<F: FnMut() -> bool>(mut done: F) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done() {
            assert!(Instant::now() < deadline, "timed out");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn shows_loading_until_reply() {
        let mut slot = InsightSlot::new();
        let gen = slot.begin(Stage::Supernova, InsightQuery::Fact);
        assert!(slot.is_loading());
        assert_eq!(slot.display_text(), LOADING_TEXT);
        assert!(slot.accept(InsightReply {
            generation: gen,
            stage: Stage::Supernova,
            text: "boom".into(),
        }));
        assert!(!slot.is_loading());
        assert_eq!(slot.display_text(), "boom");
    }

    #[test]
    fn stale_reply_is_discarded() {
        let mut slot = InsightSlot::new();
        let a = slot.begin(Stage::MainSequence, InsightQuery::Fact);
        let b = slot.begin(Stage::NeutronStar, InsightQuery::Fact);
        assert!(!slot.accept(InsightReply {
            generation: a,
            stage: Stage::MainSequence,
            text: "old".into(),
        }));
        assert!(slot.is_loading());
        assert!(slot.accept(InsightReply {
            generation: b,
            stage: Stage::NeutronStar,
            text: "new".into(),
        }));
        assert_eq!(slot.display_text(), "new");
    }

    #[test]
    fn slow_reply_for_previous_stage_never_wins() {
        let (release, gate) = mpsc::channel();
        let advisor: Arc<dyn Advisor> = Arc::new(GatedAdvisor {
            slow: Stage::MainSequence,
            gate: Mutex::new(gate),
        });
        let ctx = egui::Context::default();
        let mut slot = InsightSlot::new();

        slot.request_fact(Stage::MainSequence, &advisor, &ctx);
        slot.request_fact(Stage::RedSupergiant, &advisor, &ctx);
        wait_for(|| {
            slot.poll();
            !slot.is_loading()
        });
        assert_eq!(slot.display_text(), "fact about RED_SUPERGIANT");

        release.send(()).unwrap();
        wait_for(|| {
            slot.poll();
            Arc::strong_count(&advisor) == 1
        });
        slot.poll();
        assert_eq!(slot.display_text(), "fact about RED_SUPERGIANT");
        assert_eq!(slot.stage(), Some(Stage::RedSupergiant));
    }

    #[test]
    fn ask_ignores_blank_questions() {
        let advisor: Arc<dyn Advisor> = Arc::new(GatedAdvisor {
            slow: Stage::Supernova,
            gate: Mutex::new(mpsc::channel().1),
        });
        let ctx = egui::Context::default();
        let mut slot = InsightSlot::new();
        assert!(!slot.ask(Stage::NeutronStar, "   ", &advisor, &ctx));
        assert_eq!(slot.generation(), 0);

        assert!(slot.ask(Stage::NeutronStar, " How fast? ", &advisor, &ctx));
        assert_eq!(slot.question(), Some("How fast?"));
        wait_for(|| {
            slot.poll();
            !slot.is_loading()
        });
        assert_eq!(slot.display_text(), "NEUTRON_STAR / How fast?");
    }
}
