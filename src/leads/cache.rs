use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::LeadRecord;

const DEFAULT_TTL_SECS: u64 = 8 * 60 * 60;

struct Entry {
    leads: Arc<Vec<LeadRecord>>,
    stored_at: Instant,
}

/// Last fetched lead batch per admin session, kept server-side so the chart
/// filter and CSV export work without another webhook round trip.
///
/// Sessions that end without a logout never come back for their batch, so
/// entries older than the TTL are dropped lazily on every `put` and `get`.
#[derive(Clone)]
pub struct LeadCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl Default for LeadCache {
    fn default() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_TTL_SECS))
    }
}

impl LeadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Replace the batch for `id` wholesale.
    pub fn put(&self, id: &str, leads: Vec<LeadRecord>) -> Arc<Vec<LeadRecord>> {
        let batch = Arc::new(leads);
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let before = map.len();
        map.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        if map.len() < before {
            log::debug!("evicted {} stale lead batch(es)", before - map.len());
        }
        map.insert(
            id.to_string(),
            Entry {
                leads: Arc::clone(&batch),
                stored_at: Instant::now(),
            },
        );
        batch
    }

    /// The batch for `id`; empty if nothing has been fetched yet or it went stale.
    pub fn get(&self, id: &str) -> Arc<Vec<LeadRecord>> {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let fresh = map
            .get(id)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.leads));
        if fresh.is_none() {
            map.remove(id);
        }
        fresh.unwrap_or_default()
    }

    pub fn remove(&self, id: &str) {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(id);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
