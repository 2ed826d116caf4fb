//! Chat panel for `PulsarApp`: a corner button that expands into the
//! "Cosmic AI Guide" transcript with an input row.

use eframe::egui;
use egui::{Align2, Color32, RichText};

use pulsar_genesis::engine::Role;

use super::PulsarApp;

const PANEL_WIDTH: f32 = 360.0;
const TRANSCRIPT_HEIGHT: f32 = 340.0;
const USER_BUBBLE: Color32 = Color32::from_rgb(0, 90, 110);
const MODEL_BUBBLE: Color32 = Color32::from_rgb(28, 30, 44);

impl PulsarApp {
    pub fn draw_chat(&mut self, ctx: &egui::Context) {
        if !self.chat.is_expanded() {
            egui::Area::new(egui::Id::new("chat_button"))
                .anchor(Align2::RIGHT_TOP, [-20.0, 20.0])
                .show(ctx, |ui| {
                    let button = egui::Button::new(RichText::new("\u{1F4AC}").size(22.0))
                        .min_size(egui::vec2(48.0, 48.0))
                        .rounding(24.0);
                    if ui.add(button).on_hover_text("Cosmic AI Guide").clicked() {
                        self.chat.open();
                    }
                });
            return;
        }

        egui::Area::new(egui::Id::new("chat_panel"))
            .anchor(Align2::RIGHT_TOP, [-20.0, 20.0])
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(Color32::from_rgba_premultiplied(8, 10, 20, 230))
                    .rounding(10.0)
                    .inner_margin(egui::Margin::same(12.0))
                    .stroke(egui::Stroke::new(1.0, Color32::from_white_alpha(30)))
                    .show(ui, |ui| {
                        ui.set_width(PANEL_WIDTH);

                        ui.horizontal(|ui| {
                            ui.label(RichText::new("Cosmic AI Guide").strong().size(16.0));
                            if self.chat.is_typing() {
                                ui.spinner();
                            }
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.small_button("\u{2715}").clicked() {
                                    self.chat.close();
                                }
                            });
                        });
                        ui.separator();

                        let scroll_to_latest = self.chat.take_scroll_request();
                        egui::ScrollArea::vertical()
                            .max_height(TRANSCRIPT_HEIGHT)
                            .stick_to_bottom(true)
                            .auto_shrink([false, false])
                            .show(ui, |ui| {
                                for msg in self.chat.messages() {
                                    draw_message(ui, msg.role, &msg.text, &msg.timestamp.format("%H:%M").to_string());
                                }
                                if scroll_to_latest {
                                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                                }
                            });

                        ui.separator();
                        ui.horizontal(|ui| {
                            let response = ui.add_sized(
                                [PANEL_WIDTH - 60.0, 24.0],
                                egui::TextEdit::singleline(self.chat.input_mut())
                                    .hint_text("Ask about neutron stars..."),
                            );
                            let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                            let send = ui
                                .add_enabled(self.chat.can_submit(), egui::Button::new("Send"))
                                .clicked();
                            if send || (enter && self.chat.can_submit()) {
                                self.send_chat(ctx);
                                response.request_focus();
                            }
                        });
                    });
            });
    }
}

fn draw_message(ui: &mut egui::Ui, role: Role, text: &str, time: &str) {
    let (align, fill, who) = match role {
        Role::User => (egui::Align::Max, USER_BUBBLE, "You"),
        Role::Model => (egui::Align::Min, MODEL_BUBBLE, "Pulsar"),
    };
    ui.with_layout(egui::Layout::top_down(align), |ui| {
        egui::Frame::none()
            .fill(fill)
            .rounding(8.0)
            .inner_margin(egui::Margin::symmetric(10.0, 6.0))
            .show(ui, |ui| {
                ui.set_max_width(PANEL_WIDTH * 0.8);
                if text.is_empty() {
                    ui.label(RichText::new("\u{2026}").color(Color32::from_gray(160)));
                } else {
                    ui.label(RichText::new(text).color(Color32::from_gray(235)));
                }
                ui.label(
                    RichText::new(format!("{} \u{00B7} {}", who, time))
                        .small()
                        .color(Color32::from_gray(120)),
                );
            });
    });
    ui.add_space(4.0);
}
