//! Home-SP domain matching.
//!
//! Domains are split into lowercase labels in the order they are written,
//! and the same order is used to build the trie and to walk it.
//!
//! ## Example
//!
//! ```
//! use anqp_engine_r::matcher::domain::{DomainMatch, DomainMatcher};
//!
//! let matcher = DomainMatcher::from_domains("hotspot.example.com", &["partner.org"]);
//!
//! assert_eq!(matcher.matches("hotspot.example.com"), DomainMatch::Primary);
//! assert_eq!(matcher.matches("partner.org"), DomainMatch::Secondary);
//! assert_eq!(matcher.matches("www.hotspot.example.com"), DomainMatch::None);
//! ```

mod matcher;

pub use matcher::{DomainMatch, DomainMatcher, DomainMatcherBuilder};

/// Split a domain or NAI into lowercase labels.
///
/// A trailing root dot is dropped, and for an NAI only the part after `@`
/// is kept.
pub fn split_domain(domain: &str) -> Vec<String> {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    let domain = match domain.find('@') {
        Some(at) => &domain[at + 1..],
        None => domain,
    };
    if domain.is_empty() {
        return Vec::new();
    }
    domain.to_lowercase().split('.').map(str::to_string).collect()
}
