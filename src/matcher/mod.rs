//! Matchers used by Home-SP evaluation: the domain label trie and NAI
//! realm matching.

pub mod domain;
pub mod realm;

pub use domain::{split_domain, DomainMatch, DomainMatcher, DomainMatcherBuilder};
pub use realm::match_realms;
