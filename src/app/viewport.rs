//! Scene viewport for `PulsarApp`: drag to orbit, scroll to zoom.

use eframe::egui;

use pulsar_genesis::render::paint_scene;

use super::PulsarApp;

impl PulsarApp {
    pub fn draw_viewport(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());

        if response.dragged() {
            let delta = response.drag_delta();
            self.scene.camera_mut().orbit(delta.x, delta.y);
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.scene.camera_mut().zoom(scroll);
            }
        }

        let painter = ui.painter_at(rect);
        let frame = self.scene.frame();
        paint_scene(
            &painter,
            rect,
            &frame,
            self.scene.camera(),
            self.scene.starfield(),
            &mut self.scratch,
        );
    }
}
