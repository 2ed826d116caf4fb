//! `PulsarApp`: the top-level egui application state.
//!
//! This module declares the `PulsarApp` struct and the per-frame update.
//! Drawing is split across the sibling sub-modules:
//!
//! - `controls`: header, info card, timeline and HUD
//! - `chat`: the collapsible guide panel
//! - `viewport`: the 3D scene and its orbit controls

pub mod chat;
pub mod controls;
pub mod viewport;

use std::sync::Arc;
use std::time::Instant;

use eframe::egui;

use pulsar_genesis::engine::{ChatWidget, EvolutionController, InsightSlot};
use pulsar_genesis::net::Advisor;
use pulsar_genesis::render::{PaintScratch, SceneRenderer};
use pulsar_genesis::stage::Stage;

// ─── Application state ───────────────────────────────────────────────────────

pub struct PulsarApp {
    pub controller: EvolutionController,
    pub insight: InsightSlot,
    pub chat: ChatWidget,
    pub scene: SceneRenderer,
    pub scratch: PaintScratch,
    pub advisor: Arc<dyn Advisor>,
    /// Draft question for the info card.
    pub question: String,
    pub app_start: Instant,
}

impl PulsarApp {
    pub fn new(advisor: Arc<dyn Advisor>) -> Self {
        let controller = EvolutionController::new();
        let scene = SceneRenderer::new(controller.stage());
        Self {
            controller,
            insight: InsightSlot::new(),
            chat: ChatWidget::new(),
            scene,
            scratch: PaintScratch::new(),
            advisor,
            question: String::new(),
            app_start: Instant::now(),
        }
    }

    /// Drain workers and advance the timeline. Runs before any drawing.
    pub fn step(&mut self, ctx: &egui::Context, now: Instant) {
        self.chat.poll();
        self.insight.poll();
        self.controller.tick(now);
        self.apply_stage_change(ctx);
        self.scene.update(now.saturating_duration_since(self.app_start).as_secs_f32());
    }

    /// Remount the scene and fetch a new fact when the stage moved.
    pub fn apply_stage_change(&mut self, ctx: &egui::Context) {
        if let Some(stage) = self.controller.take_stage_change() {
            log::debug!("Stage changed to {}", stage);
            self.scene.sync_stage(stage);
            self.question.clear();
            self.insight.request_fact(stage, &self.advisor, ctx);
        }
    }

    pub fn select_stage(&mut self, stage: Stage, ctx: &egui::Context) {
        self.controller.select_stage(stage);
        self.apply_stage_change(ctx);
    }

    pub fn toggle_play(&mut self, ctx: &egui::Context) {
        self.controller.toggle_play(Instant::now());
        self.apply_stage_change(ctx);
    }

    /// Ask the info-card question about the current stage.
    pub fn ask_question(&mut self, ctx: &egui::Context) {
        let stage = self.controller.stage();
        if self.insight.ask(stage, &self.question, &self.advisor, ctx) {
            self.question.clear();
        }
    }

    pub fn send_chat(&mut self, ctx: &egui::Context) {
        self.chat.submit(&self.advisor, ctx);
    }
}

/// Accent color for a stage.
pub fn stage_color(stage: Stage) -> egui::Color32 {
    let [r, g, b] = stage.info().color;
    egui::Color32::from_rgb(r, g, b)
}

impl eframe::App for PulsarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.step(ctx, Instant::now());

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.draw_viewport(ui);
            });

        self.draw_header(ctx);
        self.draw_info_card(ctx);
        self.draw_hud(ctx);
        self.draw_timeline(ctx);
        self.draw_chat(ctx);

        // The scene animates continuously.
        ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_genesis::engine::ChatMessage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingAdvisor {
        facts: AtomicUsize,
    }

    impl Advisor for CountingAdvisor {
        fn stage_fact(&self, stage: Stage) -> String {
            self.facts.fetch_add(1, Ordering::SeqCst);
            format!("fact {}", stage.id())
        }

        fn stage_answer(&self, _: Stage, q: &str) -> String {
            q.to_string()
        }

        fn stream_chat(&self, _: &[ChatMessage], _: &str, on_chunk: &mut dyn FnMut(&str)) {
            on_chunk("ok");
        }
    }

    fn settle(app: &mut PulsarApp, ctx: &egui::Context) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.insight.is_loading() {
            app.step(ctx, Instant::now());
            assert!(Instant::now() < deadline, "fact never arrived");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn first_frame_requests_initial_fact() {
        let advisor = Arc::new(CountingAdvisor::default());
        let ctx = egui::Context::default();
        let mut app = PulsarApp::new(advisor.clone());
        app.step(&ctx, Instant::now());
        assert_eq!(app.insight.stage(), Some(Stage::MainSequence));
        settle(&mut app, &ctx);
        assert_eq!(app.insight.display_text(), "fact MAIN_SEQUENCE");
        assert_eq!(advisor.facts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn selecting_a_stage_remounts_scene_and_refetches() {
        let advisor = Arc::new(CountingAdvisor::default());
        let ctx = egui::Context::default();
        let mut app = PulsarApp::new(advisor.clone());
        app.step(&ctx, Instant::now());
        settle(&mut app, &ctx);

        app.select_stage(Stage::Supernova, &ctx);
        assert_eq!(app.scene.stage(), Stage::Supernova);
        settle(&mut app, &ctx);
        assert_eq!(app.insight.display_text(), "fact SUPERNOVA");

        // Same stage again: no new request.
        app.select_stage(Stage::Supernova, &ctx);
        assert!(!app.insight.is_loading());
        assert_eq!(advisor.facts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn blank_question_keeps_fact() {
        let ctx = egui::Context::default();
        let mut app = PulsarApp::new(Arc::new(CountingAdvisor::default()));
        app.step(&ctx, Instant::now());
        settle(&mut app, &ctx);
        let generation = app.insight.generation();
        app.question = "   ".into();
        app.ask_question(&ctx);
        assert_eq!(app.insight.generation(), generation);
    }
}
