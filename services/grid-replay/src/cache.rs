//! Shared merged-sequence cache
//!
//! Optional. When enabled, the first session to need the merged sequence
//! loads and merges it; later sessions share the same immutable copy. The
//! source files are static, so there is no invalidation. A failed load is
//! not cached: the next session tries again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;
use types::errors::ReplayError;
use types::merged::MergedItem;

use crate::loader::DatasetLoader;
use crate::session::load_sequence;

/// A merged sequence shared read-only between sessions.
pub type SharedSequence = Arc<Vec<MergedItem>>;

#[derive(Debug)]
pub struct MergedCache {
    loader: DatasetLoader,
    cell: OnceCell<SharedSequence>,
}

impl MergedCache {
    pub fn new(loader: DatasetLoader) -> Self {
        Self {
            loader,
            cell: OnceCell::new(),
        }
    }

    /// Whether a sequence is already cached.
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Cached sequence, loading it on first use. The flag is `true` unless
    /// this call did the load; a caller that waited on another session's
    /// load counts as a hit.
    pub async fn get(&self) -> Result<(SharedSequence, bool), ReplayError> {
        let loaded_here = AtomicBool::new(false);
        let flag = &loaded_here;

        let sequence = self
            .cell
            .get_or_try_init(|| async move {
                flag.store(true, Ordering::Relaxed);
                let sequence = load_sequence(&self.loader).await?;
                info!(records = sequence.len(), "Merged sequence cached");
                Ok::<_, ReplayError>(Arc::new(sequence))
            })
            .await?;

        Ok((Arc::clone(sequence), !loaded_here.load(Ordering::Relaxed)))
    }
}
