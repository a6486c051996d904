//! What a rewrite did.

use core::fmt;
use core::ops::AddAssign;

use serde::Serialize;

/// Counters collected while rewriting a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    /// Style sources parsed, rewritten and written back.
    pub sources_rewritten: usize,
    /// Style sources left untouched because they failed to parse.
    pub sources_skipped: usize,
    /// Style rules removed from stylesheets.
    pub rules_removed: usize,
    /// Elements removed from the document.
    pub elements_removed: usize,
    /// Color values replaced.
    pub colors_rewritten: usize,
}

impl AddAssign for RewriteReport {
    fn add_assign(&mut self, other: Self) {
        self.sources_rewritten += other.sources_rewritten;
        self.sources_skipped += other.sources_skipped;
        self.rules_removed += other.rules_removed;
        self.elements_removed += other.elements_removed;
        self.colors_rewritten += other.colors_rewritten;
    }
}

impl fmt::Display for RewriteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sources rewritten, {} skipped, {} rules removed, {} elements removed, {} colors rewritten",
            self.sources_rewritten,
            self.sources_skipped,
            self.rules_removed,
            self.elements_removed,
            self.colors_rewritten
        )
    }
}
