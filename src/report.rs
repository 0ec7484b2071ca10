//! PDF export of the on-screen report text

use printpdf::{BuiltinFont, Mm, PdfDocument};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("PDF generation failed: {0}")]
    Generation(String),
}

// Letter page, portrait
const PAGE_W_MM: f32 = 215.9;
const PAGE_H_MM: f32 = 279.4;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 5.5;
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 11.0;
/// Helvetica at 11pt fits roughly this many characters between the margins.
const WRAP_WIDTH: usize = 92;

/// Word-wrap `text` to at most `width` characters per line. Every word of the
/// input appears in the output in order; words longer than `width` are split.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in text.lines() {
        if raw_line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let mut word = word;
            // Hard-split words that can never fit on one line
            while word.chars().count() > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let split_at = word
                    .char_indices()
                    .nth(width)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                lines.push(word[..split_at].to_string());
                word = &word[split_at..];
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Render the report text into a Letter-size PDF. The body is the exact text
/// shown on screen, word-wrapped and paginated.
pub fn generate_pdf(report_text: &str) -> Result<Vec<u8>, PdfError> {
    let (doc, page1, layer1) =
        PdfDocument::new("Radiology Report", Mm(PAGE_W_MM), Mm(PAGE_H_MM), "Layer 1");
    let body_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PdfError::Generation(e.to_string()))?;
    let bold_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PdfError::Generation(e.to_string()))?;

    let mut layer = doc.get_page(page1).get_layer(layer1);
    let mut y = PAGE_H_MM - MARGIN_MM;

    layer.use_text("Radiology Report", TITLE_SIZE, Mm(MARGIN_MM), Mm(y), &bold_font);
    y -= LINE_HEIGHT_MM;
    let generated = format!("Generated {}", chrono::Local::now().format("%Y-%m-%d %H:%M"));
    layer.use_text(&generated, 9.0, Mm(MARGIN_MM), Mm(y), &body_font);
    y -= LINE_HEIGHT_MM * 2.0;

    for line in wrap_lines(report_text, WRAP_WIDTH) {
        if y < MARGIN_MM {
            let (page, new_layer) = doc.add_page(Mm(PAGE_W_MM), Mm(PAGE_H_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(new_layer);
            y = PAGE_H_MM - MARGIN_MM;
        }
        if !line.is_empty() {
            layer.use_text(&line, BODY_SIZE, Mm(MARGIN_MM), Mm(y), &body_font);
        }
        y -= LINE_HEIGHT_MM;
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| PdfError::Generation(e.to_string()))?;
    info!(bytes = bytes.len(), "PDF report generated");
    Ok(bytes)
}

/// Default export file name, dated so repeated exports do not collide.
pub fn default_file_name() -> String {
    format!("radiology_report_{}.pdf", chrono::Local::now().format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_preserves_every_word_in_order() {
        let text = "Imaging modality: chest radiograph.\n\nFindings: no acute \
                    cardiopulmonary abnormality identified on this examination.";
        let lines = wrap_lines(text, 20);
        let rejoined: Vec<&str> = lines
            .iter()
            .flat_map(|l| l.split_whitespace())
            .collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn wrapping_respects_width() {
        let lines = wrap_lines("one two three four five six seven eight", 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn blank_lines_survive_wrapping() {
        let lines = wrap_lines("first paragraph\n\nsecond paragraph", 80);
        assert_eq!(lines, vec!["first paragraph", "", "second paragraph"]);
    }

    #[test]
    fn oversized_words_are_split() {
        let lines = wrap_lines("pneumonoultramicroscopicsilicovolcanoconiosis", 10);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(
            lines.concat(),
            "pneumonoultramicroscopicsilicovolcanoconiosis"
        );
    }

    #[test]
    fn empty_report_yields_no_lines() {
        assert!(wrap_lines("", 80).is_empty());
    }

    #[test]
    fn generated_document_is_a_pdf() {
        let bytes = generate_pdf("Findings: normal chest radiograph.").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_reports_paginate_without_error() {
        let body = "Line of findings text repeated for pagination.\n".repeat(200);
        let bytes = generate_pdf(&body).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn default_file_name_is_dated_pdf() {
        let name = default_file_name();
        assert!(name.starts_with("radiology_report_"));
        assert!(name.ends_with(".pdf"));
    }
}
