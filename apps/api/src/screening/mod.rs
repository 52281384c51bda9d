//! Resume screening — the batch document-intake-and-orchestration pipeline.
//!
//! Flow: uploads → [`discover`] → per-document extract → prompt → inference →
//! parse → [`rank`]. One outcome per accepted document, always; a single
//! document's failure never aborts its siblings.

pub mod discover;
pub mod document;
pub mod extract;
pub mod handlers;
pub mod orchestrator;
pub mod parser;
pub mod prompts;
pub mod rank;
pub mod report;

pub use discover::discover;
pub use orchestrator::ScreeningPipeline;
pub use rank::rank;
