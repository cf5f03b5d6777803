//! Staffdesk Intent Routing
//!
//! Classifies a free-text user message against a fixed, ordered keyword
//! table (first substring match wins) and dispatches to the matching
//! document-processing handler, falling back to a generic completion when
//! nothing matches. Handlers convert every remote or extraction fault into
//! user-visible text, so routing itself never fails.

pub mod handlers;
pub mod intent;

pub use handlers::IntentRouter;
pub use intent::{classify, Intent, INTENT_KEYWORDS};
