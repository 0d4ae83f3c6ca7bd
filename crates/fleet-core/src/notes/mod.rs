//! Inventory note event extraction module.

mod extractor;
mod normalize;
pub mod rules;

pub use extractor::{NoteExtractor, Occurrence};
pub use normalize::Normalizer;

use crate::models::record::EventMatch;

/// Trait for note event extractors.
pub trait EventExtractor {
    /// Extract at most one match per event kind from a note.
    ///
    /// Blank notes produce no matches.
    fn extract(&self, note: &str) -> Vec<EventMatch>;
}
