//! Intent handlers over injected infrastructure.
//!
//! Every handler converts remote and extraction faults into user-visible
//! plain text. The conversational surface has no separate error rendering,
//! so the returned string is always displayed exactly like a normal agent
//! response. Guidance results ("please upload a file first") are ordinary
//! results, not errors, and short-circuit before any completion call.

use crate::intent::{classify, Intent};
use staffdesk_batch::BatchReviewer;
use staffdesk_domain::traits::{CompletionBackend, DocumentSource};
use staffdesk_domain::UploadSlot;
use staffdesk_llm::prompt::{self, ListingKind};
use staffdesk_store::FileStore;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, warn};

const UPLOAD_CV_GUIDANCE: &str = "Please upload a CV file first.";
const UPLOAD_BATCH_GUIDANCE: &str = "Please upload at least one CV file first.";
const UPLOAD_PDF_GUIDANCE: &str = "Please upload a PDF file containing tables first.";

/// Classifies messages and dispatches them to the matching handler.
///
/// Upload-slot policy differs per handler and intentionally mirrors the
/// observed product behavior rather than a unified rule: review and
/// correction consume the upload once extraction succeeds (even if the
/// completion afterwards fails), batch and table analysis only peek and
/// never clear, listing creation never touches the slot.
pub struct IntentRouter<L, D> {
    backend: Arc<L>,
    documents: Arc<D>,
    slot: Arc<UploadSlot>,
    files: Arc<FileStore>,
}

impl<L, D> IntentRouter<L, D>
where
    L: CompletionBackend + Send + Sync,
    L::Error: std::fmt::Display + Send,
    D: DocumentSource + Send + Sync,
    D::Error: std::fmt::Display + Send,
{
    /// Create a router over the given infrastructure.
    pub fn new(
        backend: Arc<L>,
        documents: Arc<D>,
        slot: Arc<UploadSlot>,
        files: Arc<FileStore>,
    ) -> Self {
        Self {
            backend,
            documents,
            slot,
            files,
        }
    }

    /// The upload slot handlers consume from.
    pub fn slot(&self) -> &Arc<UploadSlot> {
        &self.slot
    }

    /// Route a free-text message to its handler and produce the reply text.
    ///
    /// Infallible by policy: every handler recovers faults into content.
    pub async fn route(&self, message: &str) -> String {
        match classify(message) {
            Some(Intent::ListingCreation) => self.handle_listing_creation(message).await,
            Some(Intent::CvReview) => self.handle_cv_review().await,
            Some(Intent::BatchReview) => self.handle_batch_review().await,
            Some(Intent::TextCorrection) => self.handle_text_correction().await,
            Some(Intent::TableAnalysis) => self.handle_table_analysis().await,
            None => self.handle_general(message).await,
        }
    }

    async fn handle_listing_creation(&self, message: &str) -> String {
        let lowered = message.to_lowercase();
        let kind = if lowered.contains("senior") || lowered.contains("experienced") {
            ListingKind::Senior
        } else {
            ListingKind::Generic
        };

        match self.backend.complete(&prompt::listing_prompt(kind)).await {
            Ok(listing) => listing,
            Err(e) => {
                error!("Error creating listing: {}", e);
                format!("Error creating listing: {}", e)
            }
        }
    }

    async fn handle_cv_review(&self) -> String {
        let Some(token) = self.slot.take() else {
            return UPLOAD_CV_GUIDANCE.to_string();
        };

        let cv_text = match self.documents.extract_text(token.path()).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error processing CV: {}", e);
                // Extraction never consumed the upload; hand it back.
                self.slot.restore(token);
                return format!("Error processing the CV: {}", e);
            }
        };
        drop(token);

        let verdict = async {
            let listing = self
                .backend
                .complete(&prompt::listing_prompt(ListingKind::Generic))
                .await
                .map_err(|e| e.to_string())?;
            self.backend
                .complete(&prompt::review_prompt(&cv_text, &listing))
                .await
                .map_err(|e| e.to_string())
        }
        .await;

        match verdict {
            Ok(verdict) => verdict,
            Err(e) => {
                error!("Error processing CV: {}", e);
                format!("Error processing the CV: {}", e)
            }
        }
    }

    async fn handle_text_correction(&self) -> String {
        let Some(token) = self.slot.take() else {
            return UPLOAD_CV_GUIDANCE.to_string();
        };

        let cv_text = match self.documents.extract_text(token.path()).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error processing CV: {}", e);
                self.slot.restore(token);
                return format!("Error processing the CV: {}", e);
            }
        };
        let source_path = token.into_path();

        match self
            .backend
            .complete(&prompt::correction_prompt(&cv_text))
            .await
        {
            Ok(corrected) => {
                // Best-effort artifact; the corrected text is returned even
                // if it could not be persisted.
                if let Err(e) = self.files.save_correction(&source_path, &corrected) {
                    warn!("Failed to save corrected artifact: {}", e);
                }
                corrected
            }
            Err(e) => {
                error!("Error processing CV: {}", e);
                format!("Error processing the CV: {}", e)
            }
        }
    }

    async fn handle_batch_review(&self) -> String {
        let Some(uploaded) = self.slot.current() else {
            return UPLOAD_BATCH_GUIDANCE.to_string();
        };

        let directory = uploaded
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let reviewer = BatchReviewer::new(Arc::clone(&self.backend), Arc::clone(&self.documents));
        let outcome = match reviewer.process_batch(directory, None).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error in batch processing: {}", e);
                return format!("Error in batch processing: {}", e);
            }
        };

        match self.files.save_batch_report(&outcome.render_report()) {
            Ok(path) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                format!("Batch processing completed. Results saved to {}", file_name)
            }
            Err(e) => {
                error!("Error in batch processing: {}", e);
                format!("Error in batch processing: {}", e)
            }
        }
    }

    async fn handle_table_analysis(&self) -> String {
        let Some(uploaded) = self.slot.current() else {
            return UPLOAD_PDF_GUIDANCE.to_string();
        };

        let tables = match self.documents.extract_tables(&uploaded) {
            Ok(tables) => tables,
            Err(e) => {
                error!("Error analyzing tables: {}", e);
                return format!("Error analyzing tables: {}", e);
            }
        };

        if tables.is_empty() {
            return "No tables found in the uploaded PDF.".to_string();
        }

        match self
            .backend
            .complete(&prompt::table_analysis_prompt(&tables))
            .await
        {
            Ok(analysis) => analysis,
            Err(e) => {
                error!("Error analyzing tables: {}", e);
                format!("Error analyzing tables: {}", e)
            }
        }
    }

    async fn handle_general(&self, message: &str) -> String {
        match self.backend.complete(message).await {
            Ok(response) => response,
            Err(e) => {
                error!("Error generating response: {}", e);
                format!("Error generating response: {}", e)
            }
        }
    }
}
