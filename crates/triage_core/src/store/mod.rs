use std::collections::HashMap;
use std::sync::RwLock;

use crate::clock;
use crate::domain::Incident;
use crate::error::AppError;

/// Authoritative owner of all live incident records.
///
/// Every read hands out a cloned snapshot and every write goes through a
/// method below; no caller can reach into the map. The ID counter lives
/// under the same lock as the map, so two concurrent inserts can never mint
/// the same ID. No method performs I/O while holding the lock.
pub struct IncidentStore {
    inner: RwLock<StoreInner>,
}

struct StoreInner {
    incidents: HashMap<String, Incident>,
    counter: u64,
}

impl IncidentStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                incidents: HashMap::new(),
                counter: 0,
            }),
        }
    }

    /// Store a fully-formed incident under a freshly minted ID and return
    /// the stored record. IDs combine the coarse unix time with a counter
    /// that never repeats within the process lifetime.
    pub fn insert(&self, mut incident: Incident) -> Incident {
        let mut inner = self.inner.write().unwrap();
        inner.counter += 1;
        incident.id = format!("INC-{}-{}", clock::unix_seconds(), inner.counter);
        inner
            .incidents
            .insert(incident.id.clone(), incident.clone());
        incident
    }

    /// Snapshot of a single incident.
    pub fn get(&self, id: &str) -> Option<Incident> {
        let inner = self.inner.read().unwrap();
        inner.incidents.get(id).cloned()
    }

    /// Apply `mutate` under the exclusive lock, refresh `updated_at`, and
    /// return the new state. Fails if the incident no longer exists, which
    /// is how enrichment write-backs lose a race against delete.
    pub fn update<F>(&self, id: &str, mutate: F) -> Result<Incident, AppError>
    where
        F: FnOnce(&mut Incident),
    {
        let mut inner = self.inner.write().unwrap();
        let incident = inner
            .incidents
            .get_mut(id)
            .ok_or_else(|| AppError::incident_not_found(id))?;
        mutate(incident);
        incident.updated_at = clock::now_rfc3339();
        Ok(incident.clone())
    }

    /// Remove an incident and its embedded artifacts.
    pub fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut inner = self.inner.write().unwrap();
        inner
            .incidents
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::incident_not_found(id))
    }

    /// Snapshot all incidents matching `predicate`. Filtering happens while
    /// the read lock is held, so the result is never a torn view.
    pub fn list<P>(&self, predicate: P) -> Vec<Incident>
    where
        P: Fn(&Incident) -> bool,
    {
        let inner = self.inner.read().unwrap();
        inner
            .incidents
            .values()
            .filter(|incident| predicate(incident))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for IncidentStore {
    fn default() -> Self {
        Self::new()
    }
}
