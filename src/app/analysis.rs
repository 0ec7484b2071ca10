//! Analysis request logic

use super::image_input::to_data_url;
use super::App;
use crate::api;
use crate::types::AnalysisStatus;
use eframe::egui;
use tracing::{error, info};

impl App {
    /// Kick off one analysis of the selected image. A single request at a
    /// time: the button is disabled while one is in flight, and this is a
    /// no-op if called anyway.
    pub fn start_analysis(&mut self, ctx: &egui::Context) {
        let Some(config) = self.config.clone() else {
            return;
        };
        let Some(image) = &self.image else {
            return;
        };

        {
            let mut state = self.analysis_state.lock().unwrap();
            if state.is_running() {
                return;
            }
            state.status = AnalysisStatus::Running;
        }

        info!(file = %image.file_name, "Starting analysis");

        let data_url = to_data_url(image);
        let client = self.client.clone();
        let state = self.analysis_state.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = api::generate_report(&client, &config, data_url).await;
            let mut s = state.lock().unwrap();
            s.status = match result {
                Ok(report) => AnalysisStatus::Complete(report),
                Err(e) => {
                    error!(error = %e, "Analysis failed");
                    AnalysisStatus::Failed(e.to_string())
                }
            };
            ctx.request_repaint();
        });
    }

    /// Drop the current report and any error, back to the idle screen.
    pub fn clear_analysis(&mut self) {
        let mut state = self.analysis_state.lock().unwrap();
        if !state.is_running() {
            state.status = AnalysisStatus::Idle;
        }
    }
}
