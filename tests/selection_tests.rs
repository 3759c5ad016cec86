//! Integration tests: decode ANQP responses and select networks

use std::fs;

use anqp_engine_r::element::roaming::BeaconRoamingConsortium;
use anqp_engine_r::{
    parse_payload, parse_payload_strict, parse_profiles, DecodeErrorKind, ElementType,
    NetworkDetail, PasspointMatch, SelectionManager, SelectionOptions,
};

fn frame(info_id: u16, payload: &[u8]) -> Vec<u8> {
    let mut bytes = info_id.to_le_bytes().to_vec();
    bytes.extend_from_slice(&(payload.len() as u16).to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

fn hs20_frame(subtype: u8, payload: &[u8]) -> Vec<u8> {
    let mut body = vec![0x50, 0x6f, 0x9a, 0x11, subtype, 0x00];
    body.extend_from_slice(payload);
    frame(0xdddd, &body)
}

fn domain_list(domains: &[&str]) -> Vec<u8> {
    let mut body = Vec::new();
    for domain in domains {
        body.push(domain.len() as u8);
        body.extend_from_slice(domain.as_bytes());
    }
    body
}

fn nai_realm(realm: &str, eap: &[u8]) -> Vec<u8> {
    let mut data = vec![0x00, realm.len() as u8];
    data.extend_from_slice(realm.as_bytes());
    data.extend_from_slice(eap);
    let mut element = 1u16.to_le_bytes().to_vec();
    element.extend_from_slice(&(data.len() as u16).to_le_bytes());
    element.extend(data);
    element
}

/// A venue response: capability list, venue name, roaming consortium,
/// domain names, NAI realm and two Hotspot 2.0 elements
fn venue_response() -> Vec<u8> {
    let mut payload = frame(257, &[0x01, 0x01, 0x02, 0x01, 0x05, 0x01, 0x07, 0x01, 0x0c, 0x01]);

    let mut venue = vec![2, 8, 10];
    venue.extend_from_slice(b"engAirport");
    payload.extend(frame(258, &venue));

    payload.extend(frame(261, &[3, 0x00, 0x40, 0x96]));
    payload.extend(frame(268, &domain_list(&["venue-operator.net"])));
    // TTLS with MS-CHAP-V2 inner auth
    payload.extend(frame(263, &nai_realm("partner.org", &[1, 5, 21, 1, 2, 1, 4])));

    let mut friendly = vec![11];
    friendly.extend_from_slice(b"engOperator");
    payload.extend(hs20_frame(3, &friendly));

    let mut wan = vec![0x01];
    wan.extend_from_slice(&50_000u32.to_le_bytes());
    wan.extend_from_slice(&10_000u32.to_le_bytes());
    wan.extend_from_slice(&[20, 5, 0x0a, 0x00]);
    payload.extend(hs20_frame(4, &wan));
    payload
}

const PROFILES: &str = r#"[
    {
        "fqdn": "partner.org",
        "friendly_name": "Partner",
        "credential": {
            "realm": "partner.org",
            "eap_method": { "method": "EAP-TTLS", "inner": "MS-CHAP-V2" },
            "username": "bob",
            "password": "aHVudGVyMg=="
        }
    },
    {
        "fqdn": "venue-operator.net",
        "ssids": { "OperatorHome": null },
        "credential": {
            "realm": "venue-operator.net",
            "cert_type": "x509v3",
            "fingerprint": "00112233"
        }
    },
    {
        "fqdn": "consortium.example",
        "match_any_ois": ["004096"],
        "credential": {
            "realm": "consortium.example",
            "username": "carol",
            "password": ""
        }
    }
]"#;

#[test]
fn test_decode_full_response() {
    let elements = parse_payload(&venue_response()).unwrap();
    assert_eq!(elements.len(), 7);

    assert_eq!(elements.roaming_consortium().unwrap().ois(), [0x004096]);
    assert_eq!(
        elements.domain_name().unwrap().domains(),
        ["venue-operator.net"]
    );
    let venue = elements.venue_name().unwrap();
    assert_eq!(venue.names[0].text, "Airport");
    assert_eq!(elements.friendly_name().unwrap().name_for("eng"), Some("Operator"));
    assert!(elements.contains(ElementType::HsWanMetrics));
    assert!(elements.contains(ElementType::CapabilityList));

    let realm = &elements.nai_realm().unwrap().realm_data()[0];
    assert_eq!(realm.realms(), ["partner.org"]);
    assert_eq!(realm.eap_methods().len(), 1);
}

#[test]
fn test_strict_and_lenient_decoding() {
    let mut payload = venue_response();
    // IP address availability must be a single byte
    payload.extend(frame(262, &[0x0d, 0x00]));

    let lenient = parse_payload(&payload).unwrap();
    assert!(!lenient.contains(ElementType::IpAddrAvailability));
    assert_eq!(lenient.len(), 7);

    let err = parse_payload_strict(&payload).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::MalformedField);
}

#[test]
fn test_misframed_response_is_rejected() {
    let mut payload = venue_response();
    payload.extend_from_slice(&[0x0c, 0x01, 0xff, 0x00, 0x01]);
    let err = parse_payload(&payload).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::Truncated);
}

#[test]
fn test_selection_over_scan() {
    let manager = SelectionManager::new(parse_profiles(PROFILES).unwrap(), SelectionOptions::new());

    let venue = NetworkDetail::new("AirportWiFi")
        .with_bssid(0x0200_0000_0010)
        .with_hessid(0x0200_0000_0000)
        .with_anqp_domain_id(12);

    let before: Vec<PasspointMatch> = manager.score_network(&venue).iter().map(|m| m.verdict).collect();
    assert_eq!(before, vec![PasspointMatch::Incomplete; 3]);

    let matches = manager.notify_anqp_response(&venue, &venue_response()).unwrap();
    let verdicts: Vec<(&str, PasspointMatch)> = matches
        .iter()
        .map(|m| (m.home_sp.fqdn(), m.verdict))
        .collect();
    assert_eq!(
        verdicts,
        vec![
            ("partner.org", PasspointMatch::RoamingProvider),
            ("venue-operator.net", PasspointMatch::HomeProvider),
            ("consortium.example", PasspointMatch::HomeProvider),
        ]
    );

    // Another AP of the same HESSID and ANQP domain reuses the response
    let sibling = venue.clone().with_bssid(0x0200_0000_0011);
    assert_eq!(manager.score_network(&sibling).len(), 3);

    // A changed ANQP domain needs a fresh query
    let renumbered = venue.clone().with_anqp_domain_id(13);
    assert!(manager
        .score_network(&renumbered)
        .iter()
        .all(|m| m.verdict == PasspointMatch::Incomplete));

    let networks = [renumbered, venue];
    let best = manager.select_best(&networks).unwrap();
    assert_eq!(best.network.anqp_domain_id, 12);
    assert_eq!(best.home_sp.fqdn(), "venue-operator.net");
    assert_eq!(best.verdict, PasspointMatch::HomeProvider);
}

#[test]
fn test_beacon_roaming_consortium_ie() {
    let manager = SelectionManager::new(parse_profiles(PROFILES).unwrap(), SelectionOptions::new());

    let ie = [1, 0x33, 0x50, 0x6f, 0x9a, 0x00, 0x40, 0x96];
    let rc = BeaconRoamingConsortium::parse(&ie).unwrap();
    let network = NetworkDetail::new("Street").with_beacon_roaming_consortium(&rc);
    assert_eq!(network.anqp_oi_count, 1);

    let matches = manager.match_network(&network, None);
    let consortium = matches
        .iter()
        .find(|m| m.home_sp.fqdn() == "consortium.example")
        .unwrap();
    assert_eq!(consortium.verdict, PasspointMatch::HomeProvider);
}

#[test]
fn test_ssid_home() {
    let manager = SelectionManager::new(parse_profiles(PROFILES).unwrap(), SelectionOptions::new());
    let network = NetworkDetail::new("OperatorHome");
    let best = manager.select_best(std::slice::from_ref(&network)).unwrap();
    assert_eq!(best.home_sp.fqdn(), "venue-operator.net");
    assert_eq!(best.verdict, PasspointMatch::HomeProvider);
}

#[test]
fn test_manager_from_file() {
    let path = std::env::temp_dir().join(format!("anqp-profiles-{}.json", std::process::id()));
    fs::write(&path, PROFILES).unwrap();
    let manager = SelectionManager::from_file(&path, SelectionOptions::new()).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(manager.home_sps().len(), 3);
    assert_eq!(manager.home_sps()[0].friendly_name(), "Partner");

    assert!(SelectionManager::from_file("/nonexistent/profiles.json", SelectionOptions::new()).is_err());
}
