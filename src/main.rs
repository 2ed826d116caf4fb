mod app;

use std::sync::Arc;

use eframe::egui;
use pulsar_genesis::net::{Advisor, AdvisorConfig, GeminiAdvisor};

use crate::app::PulsarApp;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AdvisorConfig::from_env();
    let advisor: Arc<dyn Advisor> = match GeminiAdvisor::new(config) {
        Ok(advisor) => Arc::new(advisor),
        Err(e) => {
            log::error!("Failed to set up advisor: {}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 560.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Pulsar Genesis",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(PulsarApp::new(advisor)))
        }),
    );
    if let Err(e) = result {
        log::error!("Failed to start Pulsar Genesis: {}", e);
        std::process::exit(1);
    }
}
