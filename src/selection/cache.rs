use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

use crate::element::AnqpElements;
use crate::types::{NetworkDetail, NetworkKey};

/// Decoded ANQP data for one access point, with the domain it was fetched in
#[derive(Debug)]
struct CachedAnqp {
    elements: Arc<AnqpElements>,
    domain_id: u16,
    fetched: Instant,
}

impl CachedAnqp {
    fn is_valid_for(&self, network: &NetworkDetail, ttl: Duration, now: Instant) -> bool {
        self.domain_id == network.anqp_domain_id && now.duration_since(self.fetched) < ttl
    }
}

struct CacheState {
    by_network: LruCache<NetworkKey, Arc<CachedAnqp>>,
    /// Shared entries for APs of one HESSID that advertise an ANQP domain
    by_hessid: LruCache<u64, Arc<CachedAnqp>>,
}

/// Bounded cache of decoded ANQP responses.
///
/// Entries are keyed by SSID and BSSID. Networks that advertise a non-zero
/// ANQP domain ID and an HESSID also share their entry with every other AP
/// of that HESSID. An entry is only returned while it is younger than the
/// TTL and the network still advertises the domain ID it was fetched in.
pub struct AnqpCache {
    state: Mutex<CacheState>,
    ttl: Duration,
}

impl AnqpCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            state: Mutex::new(CacheState {
                by_network: LruCache::new(capacity),
                by_hessid: LruCache::new(capacity),
            }),
            ttl,
        }
    }

    /// Store the elements fetched from `network`
    pub fn update(&self, network: &NetworkDetail, elements: AnqpElements) -> Arc<AnqpElements> {
        let entry = Arc::new(CachedAnqp {
            elements: Arc::new(elements),
            domain_id: network.anqp_domain_id,
            fetched: Instant::now(),
        });
        let elements = Arc::clone(&entry.elements);

        let mut state = self.state.lock();
        if let Some(hessid) = shared_hessid(network) {
            state.by_hessid.put(hessid, Arc::clone(&entry));
        }
        state.by_network.put(network.key(), entry);
        elements
    }

    /// Cached elements for `network`, if still valid
    pub fn get(&self, network: &NetworkDetail) -> Option<Arc<AnqpElements>> {
        let now = Instant::now();
        let mut state = self.state.lock();

        let mut entry = state.by_network.get(&network.key()).cloned();
        if entry.is_none() {
            if let Some(hessid) = shared_hessid(network) {
                entry = state.by_hessid.get(&hessid).cloned();
            }
        }
        let entry = entry?;

        if entry.is_valid_for(network, self.ttl, now) {
            Some(Arc::clone(&entry.elements))
        } else {
            None
        }
    }

    /// Drop expired entries, returning how many were removed
    pub fn retire_expired(&self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;
        let mut state = self.state.lock();

        let expired: Vec<NetworkKey> = state
            .by_network
            .iter()
            .filter(|(_, e)| now.duration_since(e.fetched) >= ttl)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            log::debug!("retired ANQP entry {}/{:012x}", key.ssid, key.bssid);
            state.by_network.pop(key);
        }

        let expired_hessids: Vec<u64> = state
            .by_hessid
            .iter()
            .filter(|(_, e)| now.duration_since(e.fetched) >= ttl)
            .map(|(k, _)| *k)
            .collect();
        for hessid in &expired_hessids {
            state.by_hessid.pop(hessid);
        }

        expired.len() + expired_hessids.len()
    }

    pub fn len(&self) -> usize {
        self.state.lock().by_network.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.by_network.clear();
        state.by_hessid.clear();
    }
}

fn shared_hessid(network: &NetworkDetail) -> Option<u64> {
    match network.hessid {
        Some(hessid) if hessid != 0 && network.anqp_domain_id != 0 => Some(hessid),
        _ => None,
    }
}
