//! Prompt builders for the document-processing tasks.
//!
//! Pure, deterministic string assembly: no I/O, identical input produces
//! byte-identical output. The structural requirements embedded in each
//! template (criteria sections, verdict format, length caps) are contracts
//! the model is expected to honor; nothing here validates compliance.

use staffdesk_domain::Table;
use tabled::builder::Builder;

/// The flavor of hiring listing to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    /// Baseline requirements.
    Generic,
    /// Senior-level requirements.
    Senior,
}

impl ListingKind {
    /// The phrase interpolated into the listing prompt.
    pub fn as_phrase(&self) -> &'static str {
        match self {
            ListingKind::Generic => "generic",
            ListingKind::Senior => "highly experienced (senior)",
        }
    }

    /// The key this listing is reported under in batch results.
    pub fn listing_name(&self) -> &'static str {
        match self {
            ListingKind::Generic => "generic",
            ListingKind::Senior => "highly_experienced",
        }
    }
}

const LISTING_FORMAT: &str =
    "The list must have 'must' and 'should' criteria. Make the listing 500 characters or less.";

/// Prompt for generating a hiring-requirements listing.
pub fn listing_prompt(kind: ListingKind) -> String {
    format!(
        "Create a request listing for a {} data engineer. {}",
        kind.as_phrase(),
        LISTING_FORMAT
    )
}

/// Prompt for reviewing a CV against a requirements listing.
pub fn review_prompt(cv_text: &str, listing: &str) -> String {
    format!(
        "Given the following CV:\n\
         ---{}---\n\
         and the following requirements listing:\n\
         ---{}---\n\
         determine if the CV owner would be accepted to the listing or not. \
         The output follows the following structure:\n\
         1. Name the candidate and the title of the listing role\n\
         2. Use 'Accept' or 'Deny' as your answer\n\
         3. Explain your decision with less than 100 characters.",
        cv_text, listing
    )
}

/// Prompt for spelling/grammar correction of extracted CV text.
pub fn correction_prompt(text: &str) -> String {
    format!(
        "Correct the spelling and grammar of the following text from a CV. \
         Return ONLY the corrected text, no explanation is needed.\n\
         If the original text is already correct or empty, return the same content. \
         Do not add any additional text including explanation.\n\
         Text: \"{}\"\n\
         Example:\n\
         Original Text: \"Kandidat One\"\n\
         Return: 'Kandidat One'",
        text
    )
}

/// Prompt for deriving a requirements listing from extracted tables.
///
/// Each table is rendered to text under a `Table N:` label, in input order.
pub fn table_analysis_prompt(tables: &[Table]) -> String {
    let rendered: Vec<String> = tables
        .iter()
        .enumerate()
        .map(|(i, table)| format!("Table {}:\n{}", i + 1, render_table(table)))
        .collect();

    format!(
        "Given the following tables:\n\
         {}\n\
         Analyze the tables and determine the 'must' and 'should' criteria for the requirements listing. {}",
        rendered.join("\n\n"),
        LISTING_FORMAT
    )
}

/// Render one table to its textual form.
fn render_table(table: &Table) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.headers.iter().cloned());
    for row in &table.rows {
        builder.push_record(row.iter().cloned());
    }
    builder.build().to_string()
}
