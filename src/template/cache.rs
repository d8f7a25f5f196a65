use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ParseError;
use crate::template::structure::{self, Structure};

/// Name → parsed structure, filled on first use and never invalidated:
/// templates are static configuration, not hot-reloadable content.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: RwLock<HashMap<String, Arc<Structure>>>,
    parses: AtomicUsize,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached structure for `name`, parsing `raw` at most once.
    /// Two callers racing on an uncached name may both parse; parsing has
    /// no side effect, and the map keeps whichever entry landed first.
    pub fn get_or_parse(&self, name: &str, raw: &str) -> Result<Arc<Structure>, ParseError> {
        if let Some(hit) = self.entries.read().get(name) {
            return Ok(Arc::clone(hit));
        }

        let parsed = Arc::new(structure::build(raw)?);
        self.parses.fetch_add(1, Ordering::Relaxed);
        log::debug!("parsed template `{name}`");

        let mut entries = self.entries.write();
        Ok(Arc::clone(
            entries.entry(name.to_owned()).or_insert(parsed),
        ))
    }

    /// Number of parses performed so far. Instrumentation for tests and
    /// operational sanity checks.
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::Relaxed)
    }
}
