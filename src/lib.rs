//! ANQP Engine - Hotspot 2.0 / Passpoint ANQP decoding and Home-SP matching
//!
//! This library provides:
//! - Decoding of ANQP response payloads into typed elements
//! - Hotspot 2.0 vendor-specific elements
//! - Home Service Provider profiles loaded from JSON
//! - Home-SP matching by SSID, roaming consortium, domain and NAI realm
//! - An LRU cache of decoded responses for network selection
//!
//! # Example
//!
//! ```rust
//! use anqp_engine_r::{parse_payload, parse_profiles, NetworkDetail, PasspointMatch};
//!
//! let profiles = parse_profiles(r#"[{
//!     "fqdn": "example.com",
//!     "credential": { "realm": "example.com", "username": "alice", "password": "c2VjcmV0" }
//! }]"#).unwrap();
//!
//! // Domain Name element (info-ID 268) listing "example.com"
//! let mut payload = vec![0x0c, 0x01, 0x0c, 0x00, 0x0b];
//! payload.extend_from_slice(b"example.com");
//!
//! let network = NetworkDetail::new("CoffeeShop");
//! assert_eq!(profiles[0].match_network(&network, None), PasspointMatch::Incomplete);
//!
//! let elements = parse_payload(&payload).unwrap();
//! assert_eq!(
//!     profiles[0].match_network(&network, Some(&elements)),
//!     PasspointMatch::HomeProvider
//! );
//! ```
//!
//! # Wire Format
//!
//! An ANQP response is a sequence of elements:
//! ```text
//! [info-ID (2, LE)][length (2, LE)][payload (length)]
//! ```
//!
//! Hotspot 2.0 elements use info-ID 56797 with the payload
//! `[50-6F-9A][0x11][subtype][reserved][element]`.
//!
//! ## Match Precedence
//!
//! | Step | Signal | Verdict |
//! |------|--------|---------|
//! | 1 | SSID (and HESSID, if configured) | HomeProvider |
//! | 2 | Roaming consortium OI | HomeProvider |
//! | 3 | No ANQP data yet | Incomplete |
//! | 4 | Domain Name element | HomeProvider |
//! | 5 | NAI Realm element | RoamingProvider |
//! | 6 | Nothing matched | None |

pub mod codec;
pub mod config;
pub mod element;
pub mod error;
pub mod matcher;
pub mod profile;
pub mod selection;
pub mod types;

// Re-export commonly used items
pub use config::{parse_profiles, parse_profiles_from_file, HomeSpConfig};
pub use element::{decode_element, parse_payload, parse_payload_strict, AnqpElements, DecodedElement};
pub use error::{AnqpError, DecodeErrorKind, Result};
pub use matcher::{split_domain, DomainMatch, DomainMatcher};
pub use profile::{CertType, Credential, CredentialKind, HomeSp, HomeSpBuilder};
pub use types::{AuthMatch, ElementType, NetworkDetail, NetworkKey, PasspointMatch};

// Re-export selection types
pub use selection::{
    AnqpCache, ProfileMatch, Selection, SelectionManager, SelectionOptions, DEFAULT_CACHE_SIZE,
    DEFAULT_CACHE_TTL,
};
