//! In-memory route table for one project root.
//!
//! The table is loaded lazily on first use and replaced only by an explicit
//! refresh. Readers always get a whole snapshot: the record set and its
//! search index are swapped together under one write lock.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, info, instrument, warn};

use crate::core::error::{RouteError, RouteResult};
use crate::core::parser;
use crate::core::route::RouteRecord;
use crate::core::search::SearchIndex;
use crate::infra::command::RouteSource;

#[derive(Debug, Clone, Default)]
struct Snapshot {
    records: Arc<[RouteRecord]>,
    index: Arc<SearchIndex>,
    loaded: bool,
}

pub struct RouteRegistry {
    root: Option<PathBuf>,
    source: Arc<dyn RouteSource>,
    snapshot: RwLock<Snapshot>,

    /// Held for the whole duration of a load, so loads never interleave
    load_lock: Mutex<()>,
}

impl RouteRegistry {
    pub fn new(root: Option<PathBuf>, source: Arc<dyn RouteSource>) -> Self {
        Self {
            root,
            source,
            snapshot: RwLock::new(Snapshot::default()),
            load_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Load the route table.
    ///
    /// Without `force_refresh` this is a no-op once a load has succeeded.
    /// A failed load leaves the previous table in place.
    #[instrument(skip(self), fields(root = ?self.root))]
    pub fn load(&self, force_refresh: bool) -> RouteResult<()> {
        let root = self.root.as_deref().ok_or(RouteError::NoWorkspace)?;

        // Concurrent callers queue here
        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if !force_refresh && self.is_loaded() {
            debug!("reusing cached route table");
            return Ok(());
        }

        let raw = self.source.list_routes(root).inspect_err(|e| {
            warn!(error = %e, "route command failed; keeping previous table");
        })?;

        let records: Arc<[RouteRecord]> = parser::parse(&raw).into();
        let index = Arc::new(SearchIndex::build(&records));
        info!(routes = records.len(), "route table loaded");

        let mut snapshot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *snapshot = Snapshot { records, index, loaded: true };
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.read().loaded
    }

    /// Current records; empty before the first successful load.
    pub fn current_records(&self) -> Arc<[RouteRecord]> {
        Arc::clone(&self.read().records)
    }

    /// Records of the current snapshot matching `query`.
    pub fn search(&self, query: &str) -> Vec<RouteRecord> {
        let Snapshot { records, index, .. } = self.read();
        index.filter(&records, query)
    }

    fn read(&self) -> Snapshot {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl std::fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("root", &self.root)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}
