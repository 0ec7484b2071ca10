#![windows_subsystem = "windows"]
//! Radiology Analyzer - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod api;
mod app;
mod config;
mod constants;
mod report;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use std::path::PathBuf;
use tracing::{error, info};
use types::AnalysisStatus;
use ui::components::{fixed_button, format_image_caption, section_label, wide_button};

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "radiology-analyzer.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,radiology_analyzer=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Radiology Analyzer");

    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Radiology Analyzer starting");

    // Startup halts at the configuration screen if the key is missing; the
    // error is carried into the app so it is visible, not just logged.
    let config = config::ApiConfig::from_env();
    if let Err(e) = &config {
        error!(error = %e, "API configuration missing");
    }

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(1100.0, 760.0)))
        .with_min_inner_size([900.0, 620.0])
        .with_title("Radiology Analyzer");

    // Window/taskbar icon rasterized from the embedded logo
    if let Some((rgba, w, h)) = utils::rasterize_logo_square(256) {
        let icon = egui::IconData { rgba, width: w, height: h };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Radiology Analyzer",
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, config, settings, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        // Without an API key the workspace is unusable; show only the
        // configuration screen.
        if self.config_error.is_some() {
            self.render_config_error(ctx);
            return;
        }

        self.render_sidebar(ctx);
        self.render_central(ctx);
        self.render_toast(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.save_settings();
    }
}

impl App {
    /// Left panel: branding, capabilities blurb, image intake, analyze action.
    fn render_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("intake_panel")
            .exact_width(theme::SIDEBAR_WIDTH)
            .resizable(false)
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin { left: 16, right: 16, top: 0, bottom: 8 }),
            )
            .show(ctx, |ui| {
                let avail_w = ui.available_width();

                ui.add_space(21.0);
                ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                    let texture = self.logo_texture.get_or_insert_with(|| {
                        let (pixels, w, h) = utils::load_logo(&self.data_dir, avail_w as u32 * 2);
                        ctx.load_texture(
                            "logo",
                            egui::ColorImage::from_rgba_unmultiplied(
                                [w as usize, h as usize],
                                &pixels,
                            ),
                            egui::TextureOptions::LINEAR,
                        )
                    });

                    let aspect = texture.size()[1] as f32 / texture.size()[0] as f32;
                    let logo_w = avail_w * 0.35;
                    let logo_size = egui::vec2(logo_w, logo_w * aspect);
                    ui.image(egui::load::SizedTexture::new(texture.id(), logo_size));

                    ui.add_space(4.0);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("RADIOLOGY ANALYZER")
                                .size(11.0)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                });
                ui.add_space(11.0);

                theme::section_frame().show(ui, |ui| {
                    section_label(ui, "DIAGNOSTIC CAPABILITIES");
                    ui.add_space(theme::SPACING_MD);
                    for (title, detail) in [
                        ("Multi-Modality Analysis", "X-ray, MRI, CT, Ultrasound"),
                        ("Pathology Detection", "Fractures, tumors, infections"),
                        ("Comparative Analysis", "Track disease progression"),
                        ("Structured Reporting", "Standardized output format"),
                        ("Clinical Correlation", "Suggested next steps"),
                    ] {
                        ui.horizontal_wrapped(|ui| {
                            ui.spacing_mut().item_spacing.x = 4.0;
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(title)
                                        .size(12.0)
                                        .color(theme::TEXT_SECONDARY)
                                        .strong(),
                                )
                                .selectable(false),
                            );
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(detail).size(12.0).color(theme::TEXT_DIM),
                                )
                                .selectable(false),
                            );
                        });
                    }
                });

                ui.add_space(theme::SPACING_MD);

                theme::section_frame().show(ui, |ui| {
                    section_label(ui, "IMAGE UPLOAD");
                    ui.add_space(theme::SPACING_MD);

                    let select_text =
                        format!("{} Select Medical Image", egui_phosphor::regular::UPLOAD_SIMPLE);
                    if wide_button(
                        ui,
                        &select_text,
                        theme::BTN_DEFAULT,
                        theme::TEXT_PRIMARY,
                        theme::BUTTON_HEIGHT,
                        !self.is_analyzing(),
                    ) {
                        self.pick_image(ctx);
                    }
                    ui.add_space(4.0);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("Supported formats: PNG, JPG, JPEG")
                                .size(10.0)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );

                    if let Some(err) = &self.intake_error {
                        ui.add_space(4.0);
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(err).size(11.0).color(theme::STATUS_ERROR),
                            )
                            .selectable(false),
                        );
                    }

                    if let Some(image) = &self.image {
                        ui.add_space(theme::SPACING_MD);
                        if let Some(texture) = &image.texture {
                            let tex_size = texture.size();
                            let aspect = tex_size[1] as f32 / tex_size[0] as f32;
                            let w = ui.available_width();
                            let h = (w * aspect).min(theme::PREVIEW_MAX_HEIGHT);
                            ui.image(egui::load::SizedTexture::new(
                                texture.id(),
                                egui::vec2(h / aspect, h),
                            ));
                        }
                        ui.add_space(4.0);
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(format_image_caption(
                                    &image.file_name,
                                    image.width,
                                    image.height,
                                ))
                                .size(10.0)
                                .color(theme::TEXT_MUTED),
                            )
                            .selectable(false),
                        );
                    }

                    ui.add_space(theme::SPACING_MD);

                    let analyzing = self.is_analyzing();
                    let analyze_text =
                        format!("{} Initiate Analysis", egui_phosphor::regular::MAGNIFYING_GLASS);
                    if wide_button(
                        ui,
                        &analyze_text,
                        theme::BTN_ACCENT,
                        theme::BTN_ACCENT_TEXT,
                        theme::BUTTON_HEIGHT_LARGE,
                        self.image.is_some() && !analyzing,
                    ) {
                        self.start_analysis(ctx);
                    }

                    if analyzing {
                        ui.add_space(theme::SPACING_MD);
                        ui.horizontal(|ui| {
                            ui.add(egui::Spinner::new().size(14.0).color(theme::ACCENT));
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(
                                        "Analyzing image. This may take 20-30 seconds...",
                                    )
                                    .size(11.0)
                                    .color(theme::TEXT_MUTED),
                                )
                                .selectable(false),
                            );
                        });
                    }
                });

                // Version at the very bottom
                ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(format!("v{}", APP_VERSION))
                                .size(10.0)
                                .color(egui::Color32::from_rgb(0x45, 0x45, 0x4c)),
                        )
                        .selectable(false),
                    );
                });
            });
    }

    /// Central panel: header plus the report in one of its four states.
    fn render_central(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::same(24)),
            )
            .show(ctx, |ui| {
                self.central_panel_rect = Some(ui.max_rect());

                ui.vertical_centered(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("Radiology Analyzer")
                                .size(30.0)
                                .color(theme::ACCENT)
                                .strong(),
                        )
                        .selectable(false),
                    );
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("Advanced Medical Imaging Analysis")
                                .size(14.0)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                });
                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_LG);

                let status = self.analysis_state.lock().unwrap().status.clone();
                match status {
                    AnalysisStatus::Complete(text) => self.render_report(ui, &text),
                    AnalysisStatus::Running => {
                        ui.add_space(60.0);
                        ui.vertical_centered(|ui| {
                            ui.add(egui::Spinner::new().size(32.0).color(theme::ACCENT));
                            ui.add_space(theme::SPACING_MD);
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(
                                        "Analyzing image. This may take 20-30 seconds...",
                                    )
                                    .color(theme::TEXT_MUTED),
                                )
                                .selectable(false),
                            );
                        });
                    }
                    AnalysisStatus::Failed(msg) => {
                        ui.vertical_centered(|ui| {
                            ui.add_space(40.0);
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(egui_phosphor::regular::WARNING)
                                        .size(32.0)
                                        .color(theme::STATUS_ERROR),
                                )
                                .selectable(false),
                            );
                            ui.add_space(theme::SPACING_MD);
                            ui.label(egui::RichText::new(&msg).color(theme::STATUS_ERROR));
                            ui.add_space(theme::SPACING_MD);
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(
                                        "Check your connection and run the analysis again.",
                                    )
                                    .color(theme::TEXT_DIM),
                                )
                                .selectable(false),
                            );
                        });
                    }
                    AnalysisStatus::Idle => {
                        ui.add_space(80.0);
                        ui.vertical_centered(|ui| {
                            ui.add(
                                egui::Label::new(
                                    egui::RichText::new(
                                        "Select a medical image and initiate analysis \
                                         to generate a findings report.",
                                    )
                                    .color(theme::TEXT_DIM),
                                )
                                .selectable(false),
                            );
                        });
                    }
                }
            });
    }

    fn render_report(&mut self, ui: &mut egui::Ui, text: &str) {
        ui.horizontal(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new("Radiological Findings Report")
                        .size(16.0)
                        .color(theme::TEXT_PRIMARY)
                        .strong(),
                )
                .selectable(false),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let clear_text = format!("{} Clear", egui_phosphor::regular::TRASH);
                if fixed_button(
                    ui,
                    &clear_text,
                    theme::BTN_DANGER,
                    theme::TEXT_PRIMARY,
                    egui::vec2(90.0, theme::BUTTON_HEIGHT),
                    true,
                ) {
                    self.clear_analysis();
                }

                let export_text = format!("{} Export PDF", egui_phosphor::regular::FILE_PDF);
                if fixed_button(
                    ui,
                    &export_text,
                    theme::BTN_ACCENT,
                    theme::BTN_ACCENT_TEXT,
                    egui::vec2(130.0, theme::BUTTON_HEIGHT),
                    true,
                ) {
                    self.export_pdf();
                }
            });
        });

        if theme::settings_checkbox(ui, self.open_after_export, "Open report after export", true) {
            self.open_after_export = !self.open_after_export;
            self.save_settings();
        }

        ui.add_space(theme::SPACING_MD);

        theme::report_frame().show(ui, |ui| {
            // Accent bar down the left edge, like a chart annotation
            let bar = egui::Rect::from_min_size(
                ui.max_rect().min - egui::vec2(theme::SPACING_XL, 0.0),
                egui::vec2(3.0, ui.max_rect().height()),
            );
            ui.painter().rect_filled(bar, 0.0, theme::ACCENT);

            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(text)
                            .monospace()
                            .size(13.0)
                            .color(theme::TEXT_SECONDARY),
                    )
                    .selectable(true)
                    .wrap(),
                );
            });
        });
    }

    /// Full-window configuration error screen shown when no API key is set.
    fn render_config_error(&mut self, ctx: &egui::Context) {
        let message = self.config_error.clone().unwrap_or_default();
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme::BG_BASE))
            .show(ctx, |ui| {
                ui.add_space(ui.available_height() * 0.3);
                ui.vertical_centered(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(egui_phosphor::regular::WARNING)
                                .size(40.0)
                                .color(theme::STATUS_WARNING),
                        )
                        .selectable(false),
                    );
                    ui.add_space(theme::SPACING_MD);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("Configuration required")
                                .size(20.0)
                                .color(theme::TEXT_PRIMARY)
                                .strong(),
                        )
                        .selectable(false),
                    );
                    ui.add_space(theme::SPACING_SM);
                    ui.label(egui::RichText::new(&message).color(theme::STATUS_ERROR));
                    ui.add_space(theme::SPACING_SM);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(
                                "Add the key to a .env file next to the executable, \
                                 then restart the application.",
                            )
                            .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                });
            });
    }

    /// Toast notification (bottom-right of central panel, 3s visible then fade)
    fn render_toast(&mut self, ctx: &egui::Context) {
        if let (Some(msg), Some(panel_rect)) = (&self.toast_message.clone(), self.central_panel_rect)
        {
            let visible_duration = 3.0;
            let fade_duration = 0.5;
            let total_duration = visible_duration + fade_duration;
            let margin = 12.0;

            let toast_pos = egui::pos2(panel_rect.right() - margin, panel_rect.bottom() - margin);

            let response = egui::Area::new(egui::Id::new("status_toast"))
                .fixed_pos(toast_pos)
                .pivot(egui::Align2::RIGHT_BOTTOM)
                .show(ctx, |ui| {
                    let elapsed =
                        self.toast_start.map(|t| t.elapsed().as_secs_f32()).unwrap_or(0.0);
                    let alpha = if elapsed > visible_duration {
                        (total_duration - elapsed) / fade_duration
                    } else {
                        1.0
                    };

                    egui::Frame::new()
                        .fill(egui::Color32::from_rgba_unmultiplied(
                            0x1a,
                            0x1a,
                            0x1e,
                            (230.0 * alpha) as u8,
                        ))
                        .stroke(egui::Stroke::new(
                            1.0,
                            egui::Color32::from_rgba_unmultiplied(
                                theme::ACCENT.r(),
                                theme::ACCENT.g(),
                                theme::ACCENT.b(),
                                (100.0 * alpha) as u8,
                            ),
                        ))
                        .corner_radius(6.0)
                        .inner_margin(egui::Margin::symmetric(16, 10))
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new(msg).color(
                                egui::Color32::from_rgba_unmultiplied(
                                    255,
                                    255,
                                    255,
                                    (255.0 * alpha) as u8,
                                ),
                            ));
                        });
                });

            // Pause timer while hovering
            if response.response.hovered() {
                self.toast_start = Some(std::time::Instant::now());
            }

            let elapsed = self.toast_start.map(|t| t.elapsed().as_secs_f32()).unwrap_or(0.0);
            if elapsed >= total_duration {
                self.toast_message = None;
                self.toast_start = None;
            } else {
                ctx.request_repaint();
            }
        }
    }
}
