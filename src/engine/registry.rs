//! Endpoint identity and ownership

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;

use crate::model::{Endpoint, EndpointId, OwnerId};

/// Registry of known endpoints, keyed by engine-allocated id
pub struct EndpointRegistry {
    endpoints: DashMap<EndpointId, Endpoint>,
    next_id: AtomicU64,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self {
            endpoints: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocate an id and register a new endpoint
    pub fn create(&self, owner: OwnerId, name: String, url: String) -> Endpoint {
        let id = EndpointId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let endpoint = Endpoint {
            id,
            owner,
            name,
            url,
            created_at: Utc::now(),
        };
        self.endpoints.insert(id, endpoint.clone());
        endpoint
    }

    pub fn get(&self, id: EndpointId) -> Option<Endpoint> {
        self.endpoints.get(&id).map(|e| e.clone())
    }

    /// Ownership-scoped lookup: a foreign owner sees nothing
    pub fn get_owned(&self, owner: &OwnerId, id: EndpointId) -> Option<Endpoint> {
        self.endpoints
            .get(&id)
            .filter(|e| &e.owner == owner)
            .map(|e| e.clone())
    }

    pub fn contains(&self, id: EndpointId) -> bool {
        self.endpoints.contains_key(&id)
    }

    /// Apply a rename/re-target to an existing endpoint
    pub fn update(&self, id: EndpointId, name: Option<String>, url: Option<String>) -> Option<Endpoint> {
        let mut entry = self.endpoints.get_mut(&id)?;
        if let Some(name) = name {
            entry.name = name;
        }
        if let Some(url) = url {
            entry.url = url;
        }
        Some(entry.clone())
    }

    pub fn remove(&self, id: EndpointId) -> Option<Endpoint> {
        self.endpoints.remove(&id).map(|(_, e)| e)
    }

    /// All endpoints for one owner, id order
    pub fn list_owned(&self, owner: &OwnerId) -> Vec<Endpoint> {
        let mut endpoints: Vec<Endpoint> = self
            .endpoints
            .iter()
            .filter(|e| &e.owner == owner)
            .map(|e| e.clone())
            .collect();
        endpoints.sort_by_key(|e| e.id);
        endpoints
    }

    /// All registered ids, id order (scheduler sweep)
    pub fn ids(&self) -> Vec<EndpointId> {
        let mut ids: Vec<EndpointId> = self.endpoints.iter().map(|e| *e.key()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::new()
    }
}
