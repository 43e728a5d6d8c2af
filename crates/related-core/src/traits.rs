use crate::error::Result;
use crate::types::RawDocument;

/// Produces the `(id, bytes, language, metadata)` stream the engine consumes.
///
/// Implementations own all I/O and apply their [`crate::policy::ErrorPolicy`];
/// the engine never sees a read failure.
pub trait DocumentFeed: Send + Sync {
    fn documents(&self) -> Result<Vec<RawDocument>>;
}

impl DocumentFeed for Vec<RawDocument> {
    fn documents(&self) -> Result<Vec<RawDocument>> {
        Ok(self.clone())
    }
}
