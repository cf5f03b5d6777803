//! Staffdesk Document Extraction
//!
//! Turns uploaded documents into plain data the prompt library can use:
//!
//! - slide decks (`.pptx`) become corrected plain text, one completion call
//!   per text-carrying shape
//! - tabular PDFs become a sequence of [`Table`] values
//!
//! Extraction is all-or-nothing for slide decks: a failure on any slide or
//! shape aborts the whole operation with no partial result. Table
//! extraction may legitimately find nothing.

pub mod error;
pub mod slides;
pub mod tables;

use async_trait::async_trait;
use staffdesk_domain::traits::{CompletionBackend, DocumentSource};
use staffdesk_domain::Table;
use staffdesk_llm::prompt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub use error::ExtractError;

/// Document-to-text pipeline over a completion backend.
///
/// The backend is used for the spelling/grammar pass applied to every
/// text-carrying shape during slide extraction.
pub struct Extractor<L> {
    backend: Arc<L>,
}

impl<L> Extractor<L>
where
    L: CompletionBackend + Send + Sync,
    L::Error: std::fmt::Display + Send,
{
    /// Create a new extractor over the given backend.
    pub fn new(backend: Arc<L>) -> Self {
        Self { backend }
    }

    /// Extract the corrected plain text of a slide deck.
    ///
    /// Slides are visited in order, shapes within a slide in document
    /// order. Every non-empty shape text is passed through a correction
    /// completion. Corrected shape texts join with `\n` per slide; slides
    /// join with a blank line.
    pub async fn extract_slide_text(&self, path: &Path) -> Result<String, ExtractError> {
        info!("Extracting text from {}", path.display());

        let slide_shapes = slides::read_slide_shape_texts(path)?;

        let mut all_text = Vec::new();
        for (index, shapes) in slide_shapes.iter().enumerate() {
            debug!("Processing slide {}", index + 1);

            let mut slide_text = Vec::new();
            for text in shapes {
                let corrected = self
                    .backend
                    .complete(&prompt::correction_prompt(text))
                    .await
                    .map_err(|e| ExtractError::Correction(e.to_string()))?;
                slide_text.push(corrected);
            }

            if !slide_text.is_empty() {
                all_text.push(slide_text.join("\n"));
            }
        }

        Ok(all_text.join("\n\n"))
    }

    /// Extract zero or more tables from a tabular (PDF) document.
    pub fn extract_tables(&self, path: &Path) -> Result<Vec<Table>, ExtractError> {
        tables::extract_tables(path)
    }
}

#[async_trait]
impl<L> DocumentSource for Extractor<L>
where
    L: CompletionBackend + Send + Sync,
    L::Error: std::fmt::Display + Send,
{
    type Error = ExtractError;

    async fn extract_text(&self, path: &Path) -> Result<String, Self::Error> {
        self.extract_slide_text(path).await
    }

    fn extract_tables(&self, path: &Path) -> Result<Vec<Table>, Self::Error> {
        Extractor::extract_tables(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffdesk_llm::MockCompletion;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use zip::write::SimpleFileOptions;

    fn slide_xml(texts: &[&str]) -> String {
        let shapes: String = texts
            .iter()
            .map(|t| {
                format!(
                    "<p:sp><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>",
                    t
                )
            })
            .collect();
        format!("<p:sld><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>", shapes)
    }

    fn write_deck(dir: &Path, name: &str, slides: &[&[&str]]) -> PathBuf {
        let path = dir.join(name);
        let mut writer = zip::ZipWriter::new(File::create(&path).unwrap());
        let options = SimpleFileOptions::default();

        // Archive order is deliberately shuffled; extraction must sort on
        // the slide number, not on entry order.
        for (i, texts) in slides.iter().enumerate().rev() {
            writer
                .start_file(format!("ppt/slides/slide{}.xml", i + 1), options)
                .unwrap();
            writer.write_all(slide_xml(texts).as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    fn corrected(text: &str) -> String {
        prompt::correction_prompt(text)
    }

    #[tokio::test]
    async fn test_extract_joins_shapes_and_slides() {
        let dir = tempfile::tempdir().unwrap();
        let deck = write_deck(dir.path(), "cv.pptx", &[&["Name", "Role"], &["Skills"]]);

        let mut backend = MockCompletion::default();
        backend.add_response(corrected("Name"), "Name!");
        backend.add_response(corrected("Role"), "Role!");
        backend.add_response(corrected("Skills"), "Skills!");

        let extractor = Extractor::new(Arc::new(backend));
        let text = extractor.extract_slide_text(&deck).await.unwrap();

        assert_eq!(text, "Name!\nRole!\n\nSkills!");
    }

    #[tokio::test]
    async fn test_slides_visit_in_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        // 10 slides so that lexicographic entry order (slide10 < slide2)
        // would scramble the output.
        let texts: Vec<String> = (1..=10).map(|i| format!("slide text {}", i)).collect();
        let refs: Vec<Vec<&str>> = texts.iter().map(|t| vec![t.as_str()]).collect();
        let slide_refs: Vec<&[&str]> = refs.iter().map(|v| v.as_slice()).collect();
        let deck = write_deck(dir.path(), "deck.pptx", &slide_refs);

        let mut backend = MockCompletion::default();
        for text in &texts {
            backend.add_response(corrected(text), text.clone());
        }

        let extractor = Extractor::new(Arc::new(backend));
        let extracted = extractor.extract_slide_text(&deck).await.unwrap();

        let expected: Vec<String> = (1..=10).map(|i| format!("slide text {}", i)).collect();
        assert_eq!(extracted, expected.join("\n\n"));
    }

    #[tokio::test]
    async fn test_correction_failure_aborts_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let deck = write_deck(dir.path(), "cv.pptx", &[&["Fine", "Broken"]]);

        let mut backend = MockCompletion::new("ok");
        backend.add_error(corrected("Broken"));

        let extractor = Extractor::new(Arc::new(backend));
        let result = extractor.extract_slide_text(&deck).await;

        assert!(matches!(result, Err(ExtractError::Correction(_))));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let extractor = Extractor::new(Arc::new(MockCompletion::default()));
        let result = extractor
            .extract_slide_text(Path::new("/nonexistent/deck.pptx"))
            .await;
        assert!(matches!(result, Err(ExtractError::Io(_))));
    }

    #[tokio::test]
    async fn test_non_archive_file_is_archive_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-deck.pptx");
        std::fs::write(&path, "plain text, not a zip").unwrap();

        let extractor = Extractor::new(Arc::new(MockCompletion::default()));
        let result = extractor.extract_slide_text(&path).await;
        assert!(matches!(result, Err(ExtractError::Archive(_))));
    }
}
