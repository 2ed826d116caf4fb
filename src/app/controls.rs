//! Overlay controls for `PulsarApp`.
//!
//! Draws the title header, the stage info card with its AI insight box, the
//! timeline (play button and stage selector) and the HUD readouts.

use eframe::egui;
use egui::{Align2, Color32, RichText};

use pulsar_genesis::stage::STAGE_ORDER;

use super::{stage_color, PulsarApp};

const PANEL_FILL: Color32 = Color32::from_rgba_premultiplied(8, 10, 20, 210);
const ACCENT: Color32 = Color32::from_rgb(0, 243, 255);
const INFO_CARD_WIDTH: f32 = 340.0;

fn panel_frame() -> egui::Frame {
    egui::Frame::none()
        .fill(PANEL_FILL)
        .rounding(10.0)
        .inner_margin(egui::Margin::same(14.0))
        .stroke(egui::Stroke::new(1.0, Color32::from_white_alpha(24)))
}

impl PulsarApp {
    pub fn draw_header(&mut self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("header"))
            .anchor(Align2::LEFT_TOP, [20.0, 16.0])
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(RichText::new("PULSAR.GENESIS").size(28.0).strong().color(ACCENT));
                ui.label(
                    RichText::new("Interactive Stellar Evolution Model")
                        .size(13.0)
                        .color(Color32::from_gray(150)),
                );
            });
    }

    /// Stage title, narrative and the AI insight box.
    pub fn draw_info_card(&mut self, ctx: &egui::Context) {
        let stage = self.controller.stage();
        let info = stage.info();

        egui::Area::new(egui::Id::new("info_card"))
            .anchor(Align2::LEFT_TOP, [20.0, 90.0])
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    ui.set_width(INFO_CARD_WIDTH);

                    ui.horizontal(|ui| {
                        let (dot, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                        ui.painter().circle_filled(dot.center(), 6.0, stage_color(stage));
                        ui.label(RichText::new(info.title).size(20.0).strong().color(Color32::WHITE));
                    });
                    ui.label(RichText::new(info.description).italics().color(Color32::from_gray(170)));
                    ui.add_space(6.0);
                    ui.label(RichText::new(info.details).color(Color32::from_gray(210)));
                    ui.add_space(10.0);

                    egui::Frame::none()
                        .fill(Color32::from_rgba_premultiplied(0, 40, 48, 120))
                        .rounding(6.0)
                        .inner_margin(egui::Margin::same(10.0))
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                ui.label(RichText::new("AI Insight").strong().color(ACCENT));
                                if self.insight.is_loading() {
                                    ui.spinner();
                                }
                            });
                            if let Some(q) = self.insight.question() {
                                ui.label(RichText::new(format!("Q: {}", q)).small().color(Color32::from_gray(140)));
                            }
                            ui.label(RichText::new(self.insight.display_text()).color(Color32::from_gray(230)));
                        });

                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        let response = ui.add_sized(
                            [INFO_CARD_WIDTH - 110.0, 22.0],
                            egui::TextEdit::singleline(&mut self.question)
                                .hint_text("Ask about this stage..."),
                        );
                        let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        let can_ask = !self.question.trim().is_empty();
                        if ui.add_enabled(can_ask, egui::Button::new("Ask")).clicked() || (enter && can_ask) {
                            self.ask_question(ctx);
                        }
                        if ui
                            .button("\u{2316}")
                            .on_hover_text("Frame stage")
                            .clicked()
                        {
                            self.scene.frame_stage();
                        }
                    });
                });
            });
    }

    /// Play/pause and the four stage buttons.
    pub fn draw_timeline(&mut self, ctx: &egui::Context) {
        let current = self.controller.stage();
        egui::Area::new(egui::Id::new("timeline"))
            .anchor(Align2::CENTER_BOTTOM, [0.0, -24.0])
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let label = if self.controller.is_playing() {
                            "\u{275A}\u{275A} PAUSE EVOLUTION"
                        } else {
                            "\u{25B6} WATCH FORMATION"
                        };
                        let play = egui::Button::new(RichText::new(label).strong().color(Color32::BLACK))
                            .fill(ACCENT)
                            .min_size(egui::vec2(180.0, 30.0));
                        if ui.add(play).clicked() {
                            self.toggle_play(ctx);
                        }

                        ui.separator();

                        for stage in STAGE_ORDER {
                            let active = stage == current;
                            let text = RichText::new(stage.label()).color(if active {
                                stage_color(stage)
                            } else {
                                Color32::from_gray(150)
                            });
                            if ui.selectable_label(active, text).clicked() {
                                self.select_stage(stage, ctx);
                            }
                        }
                    });
                });
            });
    }

    /// Core temperature and radius readouts.
    pub fn draw_hud(&mut self, ctx: &egui::Context) {
        let stage = self.controller.stage();
        let info = stage.info();
        egui::Area::new(egui::Id::new("hud"))
            .anchor(Align2::RIGHT_BOTTOM, [-20.0, -96.0])
            .interactable(false)
            .show(ctx, |ui| {
                panel_frame().show(ui, |ui| {
                    egui::Grid::new("hud_grid").num_columns(2).spacing([16.0, 4.0]).show(ui, |ui| {
                        ui.label(RichText::new("Core Temp").small().color(Color32::from_gray(140)));
                        ui.label(RichText::new(info.core_temperature).monospace().color(stage_color(stage)));
                        ui.end_row();
                        ui.label(RichText::new("Radius").small().color(Color32::from_gray(140)));
                        ui.label(RichText::new(info.radius).monospace().color(stage_color(stage)));
                        ui.end_row();
                    });
                });
            });
    }
}
