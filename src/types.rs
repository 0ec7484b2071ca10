//! Common types and data structures

/// Status of the single in-flight analysis request
#[derive(Clone, PartialEq, Default)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Running,
    Complete(String),
    Failed(String),
}

/// Shared state between the UI thread and the analysis task
#[derive(Default)]
pub struct AnalysisState {
    pub status: AnalysisStatus,
}

impl AnalysisState {
    pub fn is_running(&self) -> bool {
        matches!(self.status, AnalysisStatus::Running)
    }
}

/// An image accepted by the intake step, ready to be previewed and sent
pub struct LoadedImage {
    pub file_name: String,
    /// Lowercase format tag used in the data URL mime type ("png" or "jpeg")
    pub format: String,
    /// Re-encoded bytes in the source format
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub texture: Option<egui::TextureHandle>,
}
