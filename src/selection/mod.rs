//! Selection module.
//!
//! Evaluates the provisioned Home-SPs against observed networks, caching
//! decoded ANQP responses between scans.

mod cache;

use std::path::Path;
use std::time::Duration;

pub use cache::AnqpCache;

use crate::config::parse_profiles_from_file;
use crate::element::{parse_payload, AnqpElements};
use crate::error::Result;
use crate::profile::HomeSp;
use crate::types::{NetworkDetail, PasspointMatch};

/// Default ANQP cache size
pub const DEFAULT_CACHE_SIZE: usize = 1024;

/// Default lifetime of a cached ANQP response
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Selection manager options.
#[derive(Debug, Clone)]
pub struct SelectionOptions {
    /// Maximum number of cached ANQP responses
    pub cache_size: usize,
    /// How long a cached response stays valid
    pub cache_ttl: Duration,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl SelectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

/// A Home-SP that matched a network, with its verdict
#[derive(Debug, Clone, Copy)]
pub struct ProfileMatch<'a> {
    pub home_sp: &'a HomeSp,
    pub verdict: PasspointMatch,
}

/// The network picked by [`SelectionManager::select_best`]
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub network: &'a NetworkDetail,
    pub home_sp: &'a HomeSp,
    pub verdict: PasspointMatch,
}

/// Matches networks against a fixed set of Home-SP profiles.
///
/// Matching only reads the profiles, and the cache locks internally, so a
/// manager can be shared between threads.
pub struct SelectionManager {
    home_sps: Vec<HomeSp>,
    cache: AnqpCache,
}

impl SelectionManager {
    pub fn new(home_sps: Vec<HomeSp>, options: SelectionOptions) -> Self {
        Self {
            home_sps,
            cache: AnqpCache::new(options.cache_size, options.cache_ttl),
        }
    }

    /// Create a manager from a JSON profile file.
    pub fn from_file(path: impl AsRef<Path>, options: SelectionOptions) -> Result<Self> {
        Ok(Self::new(parse_profiles_from_file(path)?, options))
    }

    pub fn home_sps(&self) -> &[HomeSp] {
        &self.home_sps
    }

    pub fn cache(&self) -> &AnqpCache {
        &self.cache
    }

    /// Match every profile, keeping the ones with a verdict other than `None`
    pub fn match_network(
        &self,
        network: &NetworkDetail,
        elements: Option<&AnqpElements>,
    ) -> Vec<ProfileMatch<'_>> {
        let matches: Vec<ProfileMatch<'_>> = self
            .home_sps
            .iter()
            .map(|home_sp| ProfileMatch {
                home_sp,
                verdict: home_sp.match_network(network, elements),
            })
            .filter(|m| m.verdict != PasspointMatch::None)
            .collect();

        tracing::debug!(
            ssid = %network.ssid,
            bssid = network.bssid,
            anqp = elements.is_some(),
            matches = matches.len(),
            "matched network"
        );
        matches
    }

    /// Decode an ANQP response from `network`, cache it and re-match.
    pub fn notify_anqp_response(
        &self,
        network: &NetworkDetail,
        payload: &[u8],
    ) -> Result<Vec<ProfileMatch<'_>>> {
        let elements = parse_payload(payload)?;
        tracing::debug!(ssid = %network.ssid, elements = elements.len(), "ANQP response");
        let elements = self.cache.update(network, elements);
        Ok(self.match_network(network, Some(&*elements)))
    }

    /// Match using cached ANQP data when there is any
    pub fn score_network(&self, network: &NetworkDetail) -> Vec<ProfileMatch<'_>> {
        let elements = self.cache.get(network);
        self.match_network(network, elements.as_deref())
    }

    /// Pick the best network: home over roaming over incomplete.
    ///
    /// Ties keep the earlier network and the earlier profile.
    pub fn select_best<'a>(&'a self, networks: &'a [NetworkDetail]) -> Option<Selection<'a>> {
        let mut best: Option<Selection<'a>> = None;
        for network in networks {
            for m in self.score_network(network) {
                if best.map_or(true, |b| m.verdict > b.verdict) {
                    best = Some(Selection {
                        network,
                        home_sp: m.home_sp,
                        verdict: m.verdict,
                    });
                }
            }
        }
        if let Some(selection) = &best {
            tracing::debug!(
                ssid = %selection.network.ssid,
                fqdn = %selection.home_sp.fqdn(),
                verdict = ?selection.verdict,
                "selected network"
            );
        }
        best
    }
}
