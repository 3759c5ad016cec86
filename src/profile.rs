//! Home Service Provider profiles and their match against a network.

use std::collections::{HashMap, HashSet};

use crate::element::eap::EapMethod;
use crate::element::AnqpElements;
use crate::matcher::{match_realms, split_domain, DomainMatch, DomainMatcher};
use crate::types::{AuthMatch, NetworkDetail, PasspointMatch};

/// Certificate type of a certificate credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertType {
    /// IEEE 802.1ar device certificate
    Ieee,
    X509v3,
}

impl CertType {
    /// Parse the provisioning name ("x509v3" or "802.1ar")
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "x509v3" => Some(CertType::X509v3),
            "802.1ar" => Some(CertType::Ieee),
            _ => None,
        }
    }
}

/// Secret material of a credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialKind {
    UserPassword {
        username: String,
        password: String,
        machine_managed: bool,
    },
    Certificate {
        cert_type: CertType,
        /// SHA-256 fingerprint of the client certificate
        fingerprint: Vec<u8>,
    },
    Sim {
        /// IMSI digits, or an MCC/MNC prefix
        imsi: String,
    },
}

/// The single credential of a Home-SP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    realm: String,
    eap_method: EapMethod,
    kind: CredentialKind,
}

impl Credential {
    pub fn new(realm: impl Into<String>, eap_method: EapMethod, kind: CredentialKind) -> Self {
        Self {
            realm: realm.into(),
            eap_method,
            kind,
        }
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn eap_method(&self) -> &EapMethod {
        &self.eap_method
    }

    pub fn kind(&self) -> &CredentialKind {
        &self.kind
    }

    /// IMSI of a SIM-based credential
    pub fn imsi(&self) -> Option<&str> {
        match &self.kind {
            CredentialKind::Sim { imsi } => Some(imsi),
            _ => None,
        }
    }
}

/// A provisioned Home Service Provider.
///
/// Immutable once built; the domain trie is built together with it.
#[derive(Debug, Clone)]
pub struct HomeSp {
    fqdn: String,
    domain_matcher: DomainMatcher,
    other_home_partners: Vec<String>,
    /// SSID to optional HESSID constraint
    ssids: HashMap<String, Option<u64>>,
    roaming_consortiums: HashSet<u64>,
    match_any_ois: HashSet<u64>,
    match_all_ois: Vec<u64>,
    friendly_name: String,
    icon_url: Option<String>,
    credential: Credential,
}

impl HomeSp {
    pub fn builder(fqdn: impl Into<String>, credential: Credential) -> HomeSpBuilder {
        HomeSpBuilder::new(fqdn, credential)
    }

    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }

    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    pub fn icon_url(&self) -> Option<&str> {
        self.icon_url.as_deref()
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn other_home_partners(&self) -> &[String] {
        &self.other_home_partners
    }

    pub fn ssids(&self) -> &HashMap<String, Option<u64>> {
        &self.ssids
    }

    pub fn roaming_consortiums(&self) -> &HashSet<u64> {
        &self.roaming_consortiums
    }

    pub fn match_any_ois(&self) -> &HashSet<u64> {
        &self.match_any_ois
    }

    pub fn match_all_ois(&self) -> &[u64] {
        &self.match_all_ois
    }

    pub fn domain_matcher(&self) -> &DomainMatcher {
        &self.domain_matcher
    }

    /// Decide whether a network is served by this provider.
    ///
    /// `elements` is `None` until the network has answered an ANQP query;
    /// in that case anything short of an SSID or OI hit is `Incomplete`.
    pub fn match_network(
        &self,
        network: &NetworkDetail,
        elements: Option<&AnqpElements>,
    ) -> PasspointMatch {
        if let Some(hessid) = self.ssids.get(&network.ssid) {
            if hessid.is_none() || *hessid == network.hessid {
                tracing::debug!(fqdn = %self.fqdn, ssid = %network.ssid, "SSID match");
                return PasspointMatch::HomeProvider;
            }
        }

        let mut advertised: HashSet<u64> = network.roaming_consortiums.iter().copied().collect();
        if let Some(rc) = elements.and_then(|e| e.roaming_consortium()) {
            advertised.extend(rc.ois().iter().copied());
        }
        if self.match_ois(&advertised) {
            tracing::debug!(fqdn = %self.fqdn, ssid = %network.ssid, "OI match");
            return PasspointMatch::HomeProvider;
        }

        let Some(elements) = elements else {
            return PasspointMatch::Incomplete;
        };

        if let Some(domain_names) = elements.domain_name() {
            let home = domain_names
                .domains()
                .iter()
                .any(|d| self.domain_matcher.is_sub_domain(&split_domain(d)) != DomainMatch::None);
            if home {
                tracing::debug!(fqdn = %self.fqdn, ssid = %network.ssid, "domain match");
                return PasspointMatch::HomeProvider;
            }
        }

        if let Some(nai_realm) = elements.nai_realm() {
            let auth = match_realms(
                &self.domain_matcher,
                &self.credential,
                nai_realm,
                elements.three_gpp_network(),
            );
            if auth != AuthMatch::None {
                tracing::debug!(fqdn = %self.fqdn, ssid = %network.ssid, ?auth, "realm match");
                return PasspointMatch::RoamingProvider;
            }
        }

        PasspointMatch::None
    }

    fn match_ois(&self, advertised: &HashSet<u64>) -> bool {
        if !self.roaming_consortiums.is_disjoint(advertised) {
            return true;
        }
        if self.match_all_ois.is_empty() && self.match_any_ois.is_empty() {
            return false;
        }
        advertised.iter().any(|oi| {
            let all = !self.match_all_ois.is_empty() && self.match_all_ois.iter().all(|m| m == oi);
            all || self.match_any_ois.contains(oi)
        })
    }
}

/// Builder for [`HomeSp`]
#[derive(Debug, Clone)]
pub struct HomeSpBuilder {
    fqdn: String,
    credential: Credential,
    other_home_partners: Vec<String>,
    ssids: HashMap<String, Option<u64>>,
    roaming_consortiums: HashSet<u64>,
    match_any_ois: HashSet<u64>,
    match_all_ois: Vec<u64>,
    friendly_name: Option<String>,
    icon_url: Option<String>,
}

impl HomeSpBuilder {
    pub fn new(fqdn: impl Into<String>, credential: Credential) -> Self {
        Self {
            fqdn: fqdn.into(),
            credential,
            other_home_partners: Vec::new(),
            ssids: HashMap::new(),
            roaming_consortiums: HashSet::new(),
            match_any_ois: HashSet::new(),
            match_all_ois: Vec::new(),
            friendly_name: None,
            icon_url: None,
        }
    }

    /// Treat an SSID as home, optionally only for one HESSID
    pub fn with_ssid(mut self, ssid: impl Into<String>, hessid: Option<u64>) -> Self {
        self.ssids.insert(ssid.into(), hessid);
        self
    }

    pub fn with_other_home_partner(mut self, domain: impl Into<String>) -> Self {
        self.other_home_partners.push(domain.into());
        self
    }

    pub fn with_roaming_consortiums(mut self, ois: impl IntoIterator<Item = u64>) -> Self {
        self.roaming_consortiums.extend(ois);
        self
    }

    pub fn with_match_any_ois(mut self, ois: impl IntoIterator<Item = u64>) -> Self {
        self.match_any_ois.extend(ois);
        self
    }

    pub fn with_match_all_ois(mut self, ois: impl IntoIterator<Item = u64>) -> Self {
        self.match_all_ois.extend(ois);
        self
    }

    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    pub fn with_icon_url(mut self, url: impl Into<String>) -> Self {
        self.icon_url = Some(url.into());
        self
    }

    pub fn build(self) -> HomeSp {
        let domain_matcher = DomainMatcher::from_domains(&self.fqdn, &self.other_home_partners);
        HomeSp {
            friendly_name: self.friendly_name.unwrap_or_else(|| self.fqdn.clone()),
            fqdn: self.fqdn,
            domain_matcher,
            other_home_partners: self.other_home_partners,
            ssids: self.ssids,
            roaming_consortiums: self.roaming_consortiums,
            match_any_ois: self.match_any_ois,
            match_all_ois: self.match_all_ois,
            icon_url: self.icon_url,
            credential: self.credential,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::cellular::{CellularNetwork, Plmn, ThreeGppNetworkElement};
    use crate::element::eap::{AuthParam, EapMethodId, NonEapInnerAuthType};
    use crate::element::info::DomainNameElement;
    use crate::element::nai_realm::{NaiRealmData, NaiRealmElement};
    use crate::element::roaming::RoamingConsortiumElement;
    use crate::element::DecodedElement;

    const OI_A: u64 = 0x506f9a;
    const OI_B: u64 = 0x004096;

    fn ttls_mschapv2() -> EapMethod {
        EapMethod::new(
            EapMethodId::Ttls,
            vec![AuthParam::NonEapInnerAuth(NonEapInnerAuthType::MsChapV2)],
        )
    }

    fn user_credential() -> Credential {
        Credential::new(
            "example.com",
            ttls_mschapv2(),
            CredentialKind::UserPassword {
                username: "user".to_string(),
                password: "pass".to_string(),
                machine_managed: true,
            },
        )
    }

    fn sim_credential() -> Credential {
        Credential::new(
            "wlan.mnc026.mcc310.3gppnetwork.org",
            EapMethod::new(EapMethodId::Sim, vec![]),
            CredentialKind::Sim {
                imsi: "310026000000001".to_string(),
            },
        )
    }

    fn home_sp() -> HomeSp {
        HomeSp::builder("example.com", user_credential())
            .with_other_home_partner("partner.net")
            .build()
    }

    fn realm_element(realm: &str, methods: Vec<EapMethod>) -> DecodedElement {
        DecodedElement::NaiRealm(NaiRealmElement::new(vec![NaiRealmData::new(
            vec![realm.to_string()],
            methods,
        )]))
    }

    fn domain_element(domains: &[&str]) -> DecodedElement {
        DecodedElement::DomainName(DomainNameElement::new(
            domains.iter().map(|d| d.to_string()).collect(),
        ))
    }

    #[test]
    fn test_ssid_short_circuits() {
        let sp = HomeSp::builder("example.com", user_credential())
            .with_ssid("HomeNet", None)
            .build();
        let network = NetworkDetail::new("HomeNet");
        let elements: AnqpElements = vec![domain_element(&["unrelated.org"])].into_iter().collect();
        assert_eq!(sp.match_network(&network, Some(&elements)), PasspointMatch::HomeProvider);
        assert_eq!(sp.match_network(&network, None), PasspointMatch::HomeProvider);
    }

    #[test]
    fn test_ssid_with_hessid_constraint() {
        let sp = HomeSp::builder("example.com", user_credential())
            .with_ssid("HomeNet", Some(0x001122334455))
            .build();
        let matching = NetworkDetail::new("HomeNet").with_hessid(0x001122334455);
        let other = NetworkDetail::new("HomeNet").with_hessid(0x001122334456);
        let absent = NetworkDetail::new("HomeNet");
        assert_eq!(sp.match_network(&matching, None), PasspointMatch::HomeProvider);
        assert_eq!(sp.match_network(&other, None), PasspointMatch::Incomplete);
        assert_eq!(sp.match_network(&absent, None), PasspointMatch::Incomplete);
    }

    #[test]
    fn test_roaming_consortium_from_beacon() {
        let sp = HomeSp::builder("example.com", user_credential())
            .with_roaming_consortiums([OI_A])
            .build();
        let network = NetworkDetail::new("Venue").with_roaming_consortiums([OI_B, OI_A]);
        assert_eq!(sp.match_network(&network, None), PasspointMatch::HomeProvider);
    }

    #[test]
    fn test_roaming_consortium_from_anqp() {
        let sp = HomeSp::builder("example.com", user_credential())
            .with_roaming_consortiums([OI_B])
            .build();
        let network = NetworkDetail::new("Venue");
        let elements: AnqpElements = vec![DecodedElement::RoamingConsortium(
            RoamingConsortiumElement::new(vec![OI_B]),
        )]
        .into_iter()
        .collect();
        assert_eq!(sp.match_network(&network, Some(&elements)), PasspointMatch::HomeProvider);
    }

    #[test]
    fn test_match_all_requires_every_entry_equal() {
        let network = NetworkDetail::new("Venue").with_roaming_consortiums([OI_A]);

        let both = HomeSp::builder("example.com", user_credential())
            .with_match_all_ois([OI_A, OI_B])
            .build();
        assert_eq!(both.match_network(&network, None), PasspointMatch::Incomplete);

        let single = HomeSp::builder("example.com", user_credential())
            .with_match_all_ois([OI_A])
            .build();
        assert_eq!(single.match_network(&network, None), PasspointMatch::HomeProvider);
    }

    #[test]
    fn test_match_any() {
        let sp = HomeSp::builder("example.com", user_credential())
            .with_match_any_ois([OI_B, 0x123456])
            .build();
        let hit = NetworkDetail::new("Venue").with_roaming_consortiums([OI_A, OI_B]);
        let miss = NetworkDetail::new("Venue").with_roaming_consortiums([OI_A]);
        assert_eq!(sp.match_network(&hit, None), PasspointMatch::HomeProvider);
        assert_eq!(sp.match_network(&miss, None), PasspointMatch::Incomplete);
    }

    #[test]
    fn test_incomplete_then_none() {
        let sp = home_sp();
        let network = NetworkDetail::new("Venue");
        assert_eq!(sp.match_network(&network, None), PasspointMatch::Incomplete);
        assert_eq!(
            sp.match_network(&network, Some(&AnqpElements::new())),
            PasspointMatch::None
        );
    }

    #[test]
    fn test_domain_name_match() {
        let sp = home_sp();
        let network = NetworkDetail::new("Venue");
        let primary: AnqpElements = vec![domain_element(&["other.org", "EXAMPLE.com"])]
            .into_iter()
            .collect();
        let partner: AnqpElements = vec![domain_element(&["partner.net"])].into_iter().collect();
        let neither: AnqpElements = vec![domain_element(&["other.org"])].into_iter().collect();
        assert_eq!(sp.match_network(&network, Some(&primary)), PasspointMatch::HomeProvider);
        assert_eq!(sp.match_network(&network, Some(&partner)), PasspointMatch::HomeProvider);
        assert_eq!(sp.match_network(&network, Some(&neither)), PasspointMatch::None);
    }

    #[test]
    fn test_domain_with_trailing_labels_is_rejected() {
        let sp = home_sp();
        let network = NetworkDetail::new("Venue");
        let spoofed: AnqpElements = vec![
            domain_element(&["example.com.attacker.net", "partner.net.evil.org"]),
            realm_element("example.com.attacker.net", vec![ttls_mschapv2()]),
        ]
        .into_iter()
        .collect();
        assert_eq!(sp.match_network(&network, Some(&spoofed)), PasspointMatch::None);
    }

    #[test]
    fn test_realm_match_is_roaming() {
        let sp = home_sp();
        let network = NetworkDetail::new("Venue");
        let elements: AnqpElements = vec![
            domain_element(&["operator.org"]),
            realm_element("example.com", vec![ttls_mschapv2()]),
        ]
        .into_iter()
        .collect();
        assert_eq!(sp.match_network(&network, Some(&elements)), PasspointMatch::RoamingProvider);
    }

    #[test]
    fn test_realm_with_incompatible_method() {
        let sp = home_sp();
        let network = NetworkDetail::new("Venue");
        let elements: AnqpElements =
            vec![realm_element("example.com", vec![EapMethod::new(EapMethodId::Tls, vec![])])]
                .into_iter()
                .collect();
        assert_eq!(sp.match_network(&network, Some(&elements)), PasspointMatch::None);
    }

    #[test]
    fn test_sim_credential_needs_3gpp_element() {
        let sp = HomeSp::builder("operator.example", sim_credential()).build();
        let network = NetworkDetail::new("Venue");
        let realm = realm_element(
            "wlan.mnc026.mcc310.3gppnetwork.org",
            vec![EapMethod::new(EapMethodId::Sim, vec![])],
        );

        let without: AnqpElements = vec![realm.clone()].into_iter().collect();
        assert_eq!(sp.match_network(&network, Some(&without)), PasspointMatch::None);

        let three_gpp = DecodedElement::ThreeGppNetwork(ThreeGppNetworkElement::new(vec![
            CellularNetwork::new(vec![Plmn::decode([0x13, 0x60, 0x20])]),
        ]));
        let with: AnqpElements = vec![realm, three_gpp].into_iter().collect();
        assert_eq!(sp.match_network(&network, Some(&with)), PasspointMatch::RoamingProvider);
    }

    #[test]
    fn test_builder_defaults() {
        let sp = home_sp();
        assert_eq!(sp.fqdn(), "example.com");
        assert_eq!(sp.friendly_name(), "example.com");
        assert_eq!(sp.icon_url(), None);
        assert_eq!(sp.other_home_partners(), ["partner.net"]);
        assert_eq!(sp.credential().imsi(), None);
        assert_eq!(sim_credential().imsi(), Some("310026000000001"));
    }

    #[test]
    fn test_cert_type_names() {
        assert_eq!(CertType::from_name("x509v3"), Some(CertType::X509v3));
        assert_eq!(CertType::from_name("802.1ar"), Some(CertType::Ieee));
        assert_eq!(CertType::from_name("pem"), None);
    }
}
