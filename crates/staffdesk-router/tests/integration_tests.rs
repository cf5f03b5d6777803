//! Integration tests for intent routing and handler slot semantics.

use async_trait::async_trait;
use staffdesk_domain::traits::DocumentSource;
use staffdesk_domain::{Table, UploadSlot};
use staffdesk_llm::prompt::{self, ListingKind};
use staffdesk_llm::MockCompletion;
use staffdesk_router::IntentRouter;
use staffdesk_store::FileStore;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Canned document source; `text: None` simulates an unreadable document.
struct MockDocuments {
    text: Option<String>,
    tables: Vec<Table>,
}

impl MockDocuments {
    fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            tables: Vec::new(),
        }
    }

    fn unreadable() -> Self {
        Self {
            text: None,
            tables: Vec::new(),
        }
    }

    fn with_tables(tables: Vec<Table>) -> Self {
        Self {
            text: Some(String::new()),
            tables,
        }
    }
}

#[async_trait]
impl DocumentSource for MockDocuments {
    type Error = String;

    async fn extract_text(&self, _path: &Path) -> Result<String, Self::Error> {
        self.text
            .clone()
            .ok_or_else(|| "unreadable document".to_string())
    }

    fn extract_tables(&self, _path: &Path) -> Result<Vec<Table>, Self::Error> {
        Ok(self.tables.clone())
    }
}

struct Fixture {
    router: IntentRouter<MockCompletion, MockDocuments>,
    backend: MockCompletion,
    slot: Arc<UploadSlot>,
    _dir: tempfile::TempDir,
    storage: std::path::PathBuf,
}

fn fixture(backend: MockCompletion, documents: MockDocuments) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("files");
    let slot = Arc::new(UploadSlot::new());
    let router = IntentRouter::new(
        Arc::new(backend.clone()),
        Arc::new(documents),
        Arc::clone(&slot),
        Arc::new(FileStore::new(&storage).unwrap()),
    );
    Fixture {
        router,
        backend,
        slot,
        _dir: dir,
        storage,
    }
}

fn sample_table() -> Table {
    Table {
        headers: vec!["Skill".to_string(), "Level".to_string()],
        rows: vec![vec!["SQL".to_string(), "Expert".to_string()]],
    }
}

#[tokio::test]
async fn test_review_without_upload_returns_guidance_and_no_completion() {
    let f = fixture(MockCompletion::new("SHOULD NOT APPEAR"), MockDocuments::with_text("CV"));

    let reply = f.router.route("please review my resume").await;

    // The guidance string comes back verbatim, proving CV review was
    // selected over the generic fallback, which would have answered.
    assert_eq!(reply, "Please upload a CV file first.");
    assert_eq!(f.backend.call_count(), 0);
}

#[tokio::test]
async fn test_batch_and_table_guidance_strings() {
    let f = fixture(MockCompletion::new("x"), MockDocuments::with_text("CV"));

    assert_eq!(
        f.router.route("batch process all my cvs").await,
        "Please upload at least one CV file first."
    );
    assert_eq!(
        f.router.route("run a table analysis").await,
        "Please upload a PDF file containing tables first."
    );
    assert_eq!(f.backend.call_count(), 0);
}

#[tokio::test]
async fn test_cv_review_happy_path_clears_slot() {
    let mut backend = MockCompletion::new("unexpected");
    backend.add_response(prompt::listing_prompt(ListingKind::Generic), "LISTING");
    backend.add_response(prompt::review_prompt("CV TEXT", "LISTING"), "Accept: good fit");

    let f = fixture(backend, MockDocuments::with_text("CV TEXT"));
    f.slot.deposit("/tmp/cv.pptx");

    let reply = f.router.route("review this CV").await;

    assert_eq!(reply, "Accept: good fit");
    assert!(f.slot.is_empty());
}

#[tokio::test]
async fn test_cv_review_extraction_failure_keeps_upload() {
    let f = fixture(MockCompletion::new("x"), MockDocuments::unreadable());
    f.slot.deposit("/tmp/cv.pptx");

    let reply = f.router.route("review this CV").await;

    assert_eq!(reply, "Error processing the CV: unreadable document");
    // Extraction failed before the upload was consumed.
    assert!(!f.slot.is_empty());
    assert_eq!(f.backend.call_count(), 0);
}

#[tokio::test]
async fn test_cv_review_completion_failure_after_extraction_clears_slot() {
    let mut backend = MockCompletion::new("x");
    backend.add_error(prompt::listing_prompt(ListingKind::Generic));

    let f = fixture(backend, MockDocuments::with_text("CV TEXT"));
    f.slot.deposit("/tmp/cv.pptx");

    let reply = f.router.route("review this CV").await;

    assert!(reply.starts_with("Error processing the CV:"));
    // Extraction succeeded, so the upload is consumed even though the
    // downstream completion failed.
    assert!(f.slot.is_empty());
}

#[tokio::test]
async fn test_correction_returns_text_and_saves_artifact() {
    let mut backend = MockCompletion::new("x");
    backend.add_response(prompt::correction_prompt("CV TEXT"), "Corrected CV text");

    let f = fixture(backend, MockDocuments::with_text("CV TEXT"));
    f.slot.deposit("/tmp/cv.pptx");

    let reply = f.router.route("fix my spelling").await;

    assert_eq!(reply, "Corrected CV text");
    assert!(f.slot.is_empty());

    let artifact = f.storage.join("corrected_cv.txt");
    assert_eq!(fs::read_to_string(artifact).unwrap(), "Corrected CV text");
}

#[tokio::test]
async fn test_table_analysis_no_tables() {
    let f = fixture(MockCompletion::new("x"), MockDocuments::with_tables(Vec::new()));
    f.slot.deposit("/tmp/tables.pdf");

    let reply = f.router.route("analyze table data").await;

    assert_eq!(reply, "No tables found in the uploaded PDF.");
    // Table analysis only peeks at the slot.
    assert!(!f.slot.is_empty());
    assert_eq!(f.backend.call_count(), 0);
}

#[tokio::test]
async fn test_table_analysis_success_preserves_slot() {
    let table = sample_table();
    let mut backend = MockCompletion::new("x");
    backend.add_response(
        prompt::table_analysis_prompt(std::slice::from_ref(&table)),
        "Derived listing",
    );

    let f = fixture(backend, MockDocuments::with_tables(vec![table]));
    f.slot.deposit("/tmp/tables.pdf");

    let reply = f.router.route("table analysis please").await;

    assert_eq!(reply, "Derived listing");
    assert!(!f.slot.is_empty());
}

#[tokio::test]
async fn test_listing_creation_detects_seniority() {
    let mut backend = MockCompletion::new("x");
    backend.add_response(prompt::listing_prompt(ListingKind::Senior), "SENIOR LISTING");
    backend.add_response(prompt::listing_prompt(ListingKind::Generic), "GENERIC LISTING");

    let f = fixture(backend, MockDocuments::with_text(""));

    assert_eq!(
        f.router.route("create listing for a senior engineer").await,
        "SENIOR LISTING"
    );
    assert_eq!(f.router.route("create listing").await, "GENERIC LISTING");
    // Listing creation never touches the slot.
    assert!(f.slot.is_empty());
}

#[tokio::test]
async fn test_generic_fallback_answers_and_recovers_errors() {
    let mut backend = MockCompletion::new("General answer");
    backend.add_error("trigger failure");

    let f = fixture(backend, MockDocuments::with_text(""));

    assert_eq!(f.router.route("hello there").await, "General answer");

    let reply = f.router.route("trigger failure").await;
    assert!(reply.starts_with("Error generating response:"));
}

#[tokio::test]
async fn test_batch_reviews_directory_of_uploaded_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.pptx"), b"").unwrap();
    fs::write(dir.path().join("b.pptx"), b"").unwrap();

    let mut backend = MockCompletion::new("Accept");
    backend.add_response(prompt::listing_prompt(ListingKind::Generic), "G");
    backend.add_response(prompt::listing_prompt(ListingKind::Senior), "S");

    let f = fixture(backend, MockDocuments::with_text("CV TEXT"));
    f.slot.deposit(dir.path().join("a.pptx"));

    let reply = f.router.route("batch process my files").await;

    assert!(
        reply.starts_with("Batch processing completed. Results saved to batch_results_"),
        "unexpected reply: {}",
        reply
    );
    // Batch never clears the upload slot.
    assert!(!f.slot.is_empty());

    let downloads = f.storage.join("downloads");
    let report = fs::read_dir(&downloads).unwrap().next().unwrap().unwrap();
    let contents = fs::read_to_string(report.path()).unwrap();
    assert!(contents.starts_with("Batch Processing Results:"));
    assert!(contents.contains("## a.pptx"));
    assert!(contents.contains("## b.pptx"));
    assert!(contents.contains("- generic: Accept"));
}

#[tokio::test]
async fn test_batch_with_empty_directory_reports_error_text() {
    let dir = tempfile::tempdir().unwrap();

    let f = fixture(MockCompletion::new("x"), MockDocuments::with_text(""));
    f.slot.deposit(dir.path().join("only.pdf"));

    let reply = f.router.route("batch process").await;
    assert!(reply.starts_with("Error in batch processing:"));
}
