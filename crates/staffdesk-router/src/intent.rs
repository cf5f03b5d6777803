//! Intent classification by keyword matching.

/// A classified user goal, selected from a fixed closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Generate a hiring-requirements listing.
    ListingCreation,
    /// Review the uploaded CV against a generic listing.
    CvReview,
    /// Review every CV in the uploaded file's directory.
    BatchReview,
    /// Spelling/grammar correction of the uploaded CV.
    TextCorrection,
    /// Derive a listing from tables in the uploaded PDF.
    TableAnalysis,
}

/// Keyword table scanned in declaration order.
///
/// The first entry whose keyword is a substring of the lower-cased message
/// wins: first match, not longest match or most specific match. The order
/// is a behavioral contract; reordering entries changes which intent a
/// message resolves to.
pub const INTENT_KEYWORDS: &[(&str, Intent)] = &[
    ("create listing", Intent::ListingCreation),
    ("job listing", Intent::ListingCreation),
    ("review", Intent::CvReview),
    ("resume", Intent::CvReview),
    ("process cv batch", Intent::BatchReview),
    ("batch process", Intent::BatchReview),
    ("spell", Intent::TextCorrection),
    ("grammar", Intent::TextCorrection),
    ("correct", Intent::TextCorrection),
    ("table analysis", Intent::TableAnalysis),
    ("analyze table", Intent::TableAnalysis),
];

/// Classify a message, or `None` for the generic-completion fallback.
pub fn classify(message: &str) -> Option<Intent> {
    let lowered = message.to_lowercase();
    INTENT_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, intent)| *intent)
}
