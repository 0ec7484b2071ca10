//! App module - contains the main application state and logic

mod analysis;
mod export;
mod image_input;

use crate::config::ApiConfig;
use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) config: Option<ApiConfig>,
    pub(crate) config_error: Option<String>,
    pub(crate) client: reqwest::Client,
    pub(crate) runtime: tokio::runtime::Runtime,
    // Analysis
    pub(crate) analysis_state: Arc<Mutex<AnalysisState>>,
    // Image intake
    pub(crate) image: Option<LoadedImage>,
    pub(crate) intake_error: Option<String>,
    // Chrome
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<std::time::Instant>,
    pub(crate) central_panel_rect: Option<egui::Rect>,
    // Settings
    pub(crate) export_dir: PathBuf,
    pub(crate) open_after_export: bool,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: Result<ApiConfig, crate::config::ConfigError>,
        settings: Settings,
        data_dir: PathBuf,
    ) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let (config, config_error) = match config {
            Ok(c) => (Some(c), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            config,
            config_error,
            client: reqwest::Client::new(),
            runtime: tokio::runtime::Runtime::new().unwrap(),
            analysis_state: Arc::new(Mutex::new(AnalysisState::default())),
            image: None,
            intake_error: None,
            logo_texture: None,
            toast_message: None,
            toast_start: None,
            central_panel_rect: None,
            export_dir: settings.export_dir_or_default(),
            open_after_export: settings.open_after_export,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            export_dir: Some(self.export_dir.to_string_lossy().to_string()),
            open_after_export: self.open_after_export,
        };
        settings.save(&self.data_dir);
    }

    /// The report currently held, if the last analysis finished successfully.
    pub fn current_report(&self) -> Option<String> {
        match &self.analysis_state.lock().unwrap().status {
            AnalysisStatus::Complete(text) => Some(text.clone()),
            _ => None,
        }
    }

    pub fn is_analyzing(&self) -> bool {
        self.analysis_state.lock().unwrap().is_running()
    }

    pub(crate) fn show_toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_start = Some(std::time::Instant::now());
    }
}
