//! PDF export of the current report

use super::App;
use crate::report;
use tracing::{error, info};

impl App {
    /// Generate the PDF and ask the user where to save it. The document body
    /// is exactly the text on screen.
    pub fn export_pdf(&mut self) {
        let Some(text) = self.current_report() else {
            return;
        };

        let bytes = match report::generate_pdf(&text) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "PDF generation failed");
                self.show_toast(e.to_string());
                return;
            }
        };

        std::fs::create_dir_all(&self.export_dir).ok();
        let Some(path) = rfd::FileDialog::new()
            .set_directory(&self.export_dir)
            .set_file_name(report::default_file_name())
            .add_filter("PDF", &["pdf"])
            .save_file()
        else {
            return;
        };

        match std::fs::write(&path, &bytes) {
            Ok(()) => {
                info!(path = %path.display(), "Report exported");
                if let Some(dir) = path.parent() {
                    self.export_dir = dir.to_path_buf();
                    self.save_settings();
                }
                self.show_toast(format!("Report saved to {}", path.display()));
                if self.open_after_export {
                    let _ = open::that(&path);
                }
            }
            Err(e) => {
                error!(error = %e, path = %path.display(), "Failed to write PDF");
                self.show_toast(format!("Failed to save report: {}", e));
            }
        }
    }
}
