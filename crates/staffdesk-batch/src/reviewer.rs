//! Batch review of every document against every listing.

use crate::error::BatchError;
use staffdesk_domain::traits::{CompletionBackend, DocumentSource};
use staffdesk_llm::prompt::{self, ListingKind};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A named hiring-requirements listing used as a review baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Key this listing is reported under.
    pub name: String,
    /// The listing text itself.
    pub text: String,
}

impl Listing {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Result of a batch run: per-document verdicts plus the listings used.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// `document_id -> listing_name -> verdict`.
    pub results: BTreeMap<String, BTreeMap<String, String>>,
    /// The listings every document was reviewed against, in review order.
    pub listings: Vec<Listing>,
}

impl BatchOutcome {
    /// Render the human-readable report persisted after a batch run.
    ///
    /// One `## <document_id>` section per document with one
    /// `- <listing_name>: <verdict>` bullet per listing, in listing order.
    pub fn render_report(&self) -> String {
        let mut text = String::from("Batch Processing Results:\n\n");
        for (document_id, verdicts) in &self.results {
            text.push_str(&format!("## {}\n", document_id));
            for listing in &self.listings {
                if let Some(verdict) = verdicts.get(&listing.name) {
                    text.push_str(&format!("- {}: {}\n", listing.name, verdict));
                }
            }
            text.push('\n');
        }
        text
    }
}

/// Reviews a directory of slide-deck CVs against a set of listings.
pub struct BatchReviewer<L, D> {
    backend: Arc<L>,
    documents: Arc<D>,
}

impl<L, D> BatchReviewer<L, D>
where
    L: CompletionBackend + Send + Sync,
    L::Error: std::fmt::Display + Send,
    D: DocumentSource + Send + Sync,
    D::Error: std::fmt::Display + Send,
{
    /// Create a reviewer over the given backend and document source.
    pub fn new(backend: Arc<L>, documents: Arc<D>) -> Self {
        Self { backend, documents }
    }

    /// Review every eligible document in `directory` against every listing.
    ///
    /// When no listings are supplied a default set is synthesized: one
    /// generic, one senior, and (best-effort) one derived from the first
    /// tabular document found in the directory.
    ///
    /// Each document's text is extracted exactly once and reused across all
    /// of its listing comparisons.
    pub async fn process_batch(
        &self,
        directory: &Path,
        listings: Option<Vec<Listing>>,
    ) -> Result<BatchOutcome, BatchError> {
        info!("Processing CV batch from {}", directory.display());

        let documents = eligible_documents(directory)?;
        if documents.is_empty() {
            warn!("No valid CV files found in directory");
            return Err(BatchError::NoDocuments);
        }

        let listings = match listings {
            Some(listings) => listings,
            None => self.default_listings(directory).await?,
        };

        let mut results = BTreeMap::new();
        for (document_id, path) in &documents {
            debug!("Processing CV file: {}", document_id);
            let cv_text = self
                .documents
                .extract_text(path)
                .await
                .map_err(|e| BatchError::Extraction(e.to_string()))?;

            let mut verdicts = BTreeMap::new();
            for listing in &listings {
                debug!("Reviewing {} against {} listing", document_id, listing.name);
                let verdict = self
                    .backend
                    .complete(&prompt::review_prompt(&cv_text, &listing.text))
                    .await
                    .map_err(|e| BatchError::Completion(e.to_string()))?;
                verdicts.insert(listing.name.clone(), verdict);
            }
            results.insert(document_id.clone(), verdicts);
        }

        Ok(BatchOutcome { results, listings })
    }

    /// Synthesize the default listing set.
    async fn default_listings(&self, directory: &Path) -> Result<Vec<Listing>, BatchError> {
        info!("Creating default listings");

        let mut listings = Vec::new();
        for kind in [ListingKind::Generic, ListingKind::Senior] {
            let text = self
                .backend
                .complete(&prompt::listing_prompt(kind))
                .await
                .map_err(|e| BatchError::Completion(e.to_string()))?;
            listings.push(Listing::new(kind.listing_name(), text));
        }

        // Opportunistic third listing from the first tabular document; a
        // failure here is logged and never aborts batch creation.
        if let Some(pdf) = first_pdf(directory)? {
            match self.pdf_listing(&pdf).await {
                Ok(Some(text)) => listings.push(Listing::new("pdf_based", text)),
                Ok(None) => debug!("No tables in {}", pdf.display()),
                Err(e) => warn!("Error processing PDF {}: {}", pdf.display(), e),
            }
        }

        Ok(listings)
    }

    /// Derive a listing from a tabular document, if it has tables.
    async fn pdf_listing(&self, pdf: &Path) -> Result<Option<String>, String> {
        let tables = self
            .documents
            .extract_tables(pdf)
            .map_err(|e| e.to_string())?;
        if tables.is_empty() {
            return Ok(None);
        }

        self.backend
            .complete(&prompt::table_analysis_prompt(&tables))
            .await
            .map(Some)
            .map_err(|e| e.to_string())
    }
}

/// Enumerate reviewable documents: `.pptx` files that are not themselves
/// correction artifacts, filename-sorted.
fn eligible_documents(directory: &Path) -> Result<Vec<(String, PathBuf)>, BatchError> {
    let mut documents = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(".pptx") && !name.starts_with("corrected_") {
            documents.push((name, entry.path()));
        }
    }
    documents.sort();
    Ok(documents)
}

/// The first tabular document in the directory, filename-sorted.
fn first_pdf(directory: &Path) -> Result<Option<PathBuf>, BatchError> {
    let mut pdfs: Vec<PathBuf> = fs::read_dir(directory)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .to_lowercase()
                .ends_with(".pdf")
        })
        .map(|entry| entry.path())
        .collect();
    pdfs.sort();
    Ok(pdfs.into_iter().next())
}
