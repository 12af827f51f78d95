//! Load-once artifact cache
//!
//! The artifact is read at most once per cache. Concurrent first callers
//! block on the single in-flight load and all observe the same result,
//! success or failure. Failures are cached too: a missing or corrupt artifact
//! is fatal to startup and is never retried.

use crate::artifact::{ArtifactLoader, ModelArtifact};
use crate::error::ArtifactError;
use crate::predictor::Predictor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::warn;

/// Process-wide cache used by [`process_artifact`]
static PROCESS_ARTIFACT: OnceLock<ArtifactCache> = OnceLock::new();

pub struct ArtifactCache {
    path: PathBuf,
    slot: OnceLock<Result<Arc<ModelArtifact>, ArtifactError>>,
    loads: AtomicUsize,
}

impl ArtifactCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            slot: OnceLock::new(),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cached artifact, loading it on first access
    pub fn get(&self) -> Result<Arc<ModelArtifact>, ArtifactError> {
        self.slot
            .get_or_init(|| {
                self.loads.fetch_add(1, Ordering::SeqCst);
                ArtifactLoader::load(&self.path).map(Arc::new)
            })
            .clone()
    }

    pub fn predictor(&self) -> Result<Predictor, ArtifactError> {
        self.get().map(Predictor::new)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.slot.get(), Some(Ok(_)))
    }

    /// Number of load attempts made; never exceeds one
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

/// Process-scoped artifact. The first caller fixes the path; later calls
/// with a different path get the already cached artifact.
pub fn process_artifact(path: impl AsRef<Path>) -> Result<Arc<ModelArtifact>, ArtifactError> {
    let path = path.as_ref();
    let cache = PROCESS_ARTIFACT.get_or_init(|| ArtifactCache::new(path));
    if cache.path() != path {
        warn!(
            requested = %path.display(),
            cached = %cache.path().display(),
            "Process artifact already bound to a different path"
        );
    }
    cache.get()
}
