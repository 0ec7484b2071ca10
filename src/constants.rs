//! Application constants and configuration

pub const CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const VISION_MODEL: &str = "llama-3.2-11b-vision-preview";
pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File extensions accepted by the image picker, lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Fixed analysis prompt sent alongside every image.
pub const ANALYSIS_PROMPT: &str =
    "As an AI radiologist, provide a detailed structured report including: \
     1. Imaging modality identification\n2. Anatomical structures visualized\n\
     3. Abnormal findings description\n4. Differential diagnoses\n\
     5. Clinical correlation recommendations";

// Sampling parameters for the vision model
pub const MODEL_TEMPERATURE: f32 = 0.2;
pub const MODEL_MAX_TOKENS: u32 = 400;
pub const MODEL_TOP_P: f32 = 0.5;
