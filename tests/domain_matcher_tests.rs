//! Integration tests for DomainMatcher with realistic Passpoint provider domains

use anqp_engine_r::matcher::domain::{split_domain, DomainMatch, DomainMatcher, DomainMatcherBuilder};

/// Partner domains of a typical roaming federation profile
fn get_partner_domains() -> Vec<String> {
    vec![
        "boingo.com",
        "eduroam.org",
        "openroaming.org",
        "wballiance.com",
        "orange.fr",
        "att.net",
        "t-mobile.com",
        "wlan.mnc260.mcc310.3gppnetwork.org",
        "wlan.mnc026.mcc310.3gppnetwork.org",
        "apple.com",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[test]
fn test_primary_then_sub_and_super_domains() {
    let matcher = DomainMatcher::from_domains::<&str>("android.google.com", &[]);

    assert_eq!(matcher.matches("android.google.com"), DomainMatch::Primary);
    assert_eq!(matcher.matches("android.google.com."), DomainMatch::Primary);
    assert_eq!(matcher.matches("jan.android.google.com"), DomainMatch::None);
    assert_eq!(matcher.matches("jan.android.google.com."), DomainMatch::None);
    assert_eq!(matcher.matches("google.com"), DomainMatch::None);
    assert_eq!(matcher.matches("com"), DomainMatch::None);
    assert_eq!(matcher.matches("apple.com"), DomainMatch::None);
    assert_eq!(matcher.matches("android.google.net"), DomainMatch::None);
    assert_eq!(matcher.matches("."), DomainMatch::None);
}

#[test]
fn test_secondary_and_overwrite() {
    let matcher = DomainMatcher::from_domains("android.google.com", &["apple.com", "net"]);
    assert_eq!(matcher.matches("apple.com"), DomainMatch::Secondary);
    assert_eq!(matcher.matches("net."), DomainMatch::Secondary);
    assert_eq!(matcher.matches("garbage.apple.com"), DomainMatch::None);

    let overwritten = DomainMatcher::from_domains("apple.com", &["apple.com", "net"]);
    assert_eq!(overwritten.matches("apple.com"), DomainMatch::Primary);
    assert_eq!(overwritten.matches("net"), DomainMatch::Secondary);
}

#[test]
fn test_federation_partners() {
    let partners = get_partner_domains();
    let matcher = DomainMatcher::from_domains("hotspot.example.com", &partners);

    for partner in &partners {
        assert_eq!(
            matcher.matches(partner),
            DomainMatch::Secondary,
            "partner {} should match",
            partner
        );
    }
    assert_eq!(matcher.matches("HOTSPOT.Example.COM"), DomainMatch::Primary);
    assert_eq!(
        matcher.matches("wlan.mnc027.mcc310.3gppnetwork.org"),
        DomainMatch::None
    );
    assert_eq!(matcher.matches("example.com"), DomainMatch::None);
    assert_eq!(matcher.matches("notboingo.com"), DomainMatch::None);
}

#[test]
fn test_lookalike_domains_with_extra_labels() {
    let matcher = DomainMatcher::from_domains("hotspot.example.com", &get_partner_domains());

    for domain in [
        "hotspot.example.com.attacker.net",
        "boingo.com.evil.org",
        "eduroam.org.",
        "wlan.mnc260.mcc310.3gppnetwork.org.fake",
        "att.net.att.net",
    ] {
        let expected = if domain == "eduroam.org." {
            DomainMatch::Secondary
        } else {
            DomainMatch::None
        };
        assert_eq!(matcher.matches(domain), expected, "domain {}", domain);
    }
}

#[test]
fn test_nai_style_queries() {
    let matcher = DomainMatcher::from_domains::<&str>("example.com", &[]);
    assert_eq!(matcher.matches("alice@example.com"), DomainMatch::Primary);
    assert_eq!(matcher.is_sub_domain(&split_domain("bob@EXAMPLE.com.")), DomainMatch::Primary);
    assert_eq!(matcher.matches("alice@example.org"), DomainMatch::None);
}

#[test]
fn test_builder_is_frozen_into_matcher() {
    let mut builder = DomainMatcherBuilder::new();
    builder.insert(&split_domain("partner.net"), DomainMatch::Secondary);
    builder.insert(&split_domain("partner.net"), DomainMatch::Primary);
    let matcher = builder.build();
    assert_eq!(matcher.matches("partner.net"), DomainMatch::Primary);
}

#[test]
fn test_concurrent_lookups() {
    use std::sync::Arc;
    use std::thread;

    let matcher = Arc::new(DomainMatcher::from_domains(
        "hotspot.example.com",
        &get_partner_domains(),
    ));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let matcher = Arc::clone(&matcher);
            thread::spawn(move || {
                for _ in 0..100 {
                    assert_eq!(matcher.matches("eduroam.org"), DomainMatch::Secondary);
                    assert_eq!(matcher.matches("hotspot.example.com"), DomainMatch::Primary);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
