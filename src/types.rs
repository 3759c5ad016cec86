use std::fmt;

use crate::element::roaming::BeaconRoamingConsortium;

/// ANQP element identifier.
///
/// Covers the IEEE 802.11 ANQP info-IDs and the Hotspot 2.0 vendor-specific
/// subtypes, which arrive wrapped in the vendor-specific info-ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementType {
    QueryList,
    CapabilityList,
    VenueName,
    EmergencyNumber,
    NetworkAuthType,
    RoamingConsortium,
    IpAddrAvailability,
    NaiRealm,
    ThreeGppNetwork,
    GeoLocation,
    CivicLocation,
    LocationUri,
    DomainName,
    EmergencyAlertUri,
    TdlsCapability,
    EmergencyNai,
    NeighborReport,
    VendorSpecific,
    HsQueryList,
    HsCapabilityList,
    HsFriendlyName,
    HsWanMetrics,
    HsConnCapability,
    HsNaiHomeRealmQuery,
    HsOperatingClass,
    HsOsuProviders,
    HsIconRequest,
    HsIconFile,
}

/// Info-ID carrying Hotspot 2.0 (and other vendors') elements.
pub const VENDOR_SPECIFIC_INFO_ID: u16 = 0xdddd;

impl TryFrom<u16> for ElementType {
    type Error = ();

    fn try_from(value: u16) -> std::result::Result<Self, Self::Error> {
        match value {
            256 => Ok(ElementType::QueryList),
            257 => Ok(ElementType::CapabilityList),
            258 => Ok(ElementType::VenueName),
            259 => Ok(ElementType::EmergencyNumber),
            260 => Ok(ElementType::NetworkAuthType),
            261 => Ok(ElementType::RoamingConsortium),
            262 => Ok(ElementType::IpAddrAvailability),
            263 => Ok(ElementType::NaiRealm),
            264 => Ok(ElementType::ThreeGppNetwork),
            265 => Ok(ElementType::GeoLocation),
            266 => Ok(ElementType::CivicLocation),
            267 => Ok(ElementType::LocationUri),
            268 => Ok(ElementType::DomainName),
            269 => Ok(ElementType::EmergencyAlertUri),
            270 => Ok(ElementType::TdlsCapability),
            271 => Ok(ElementType::EmergencyNai),
            272 => Ok(ElementType::NeighborReport),
            VENDOR_SPECIFIC_INFO_ID => Ok(ElementType::VendorSpecific),
            _ => Err(()),
        }
    }
}

impl ElementType {
    /// Map a Hotspot 2.0 subtype byte to its element type
    pub fn from_hs_subtype(subtype: u8) -> Option<Self> {
        match subtype {
            1 => Some(ElementType::HsQueryList),
            2 => Some(ElementType::HsCapabilityList),
            3 => Some(ElementType::HsFriendlyName),
            4 => Some(ElementType::HsWanMetrics),
            5 => Some(ElementType::HsConnCapability),
            6 => Some(ElementType::HsNaiHomeRealmQuery),
            7 => Some(ElementType::HsOperatingClass),
            8 => Some(ElementType::HsOsuProviders),
            10 => Some(ElementType::HsIconRequest),
            11 => Some(ElementType::HsIconFile),
            _ => None,
        }
    }

    /// ANQP info-ID for this element; Hotspot 2.0 subtypes share the vendor-specific ID.
    pub fn info_id(&self) -> u16 {
        match self {
            ElementType::QueryList => 256,
            ElementType::CapabilityList => 257,
            ElementType::VenueName => 258,
            ElementType::EmergencyNumber => 259,
            ElementType::NetworkAuthType => 260,
            ElementType::RoamingConsortium => 261,
            ElementType::IpAddrAvailability => 262,
            ElementType::NaiRealm => 263,
            ElementType::ThreeGppNetwork => 264,
            ElementType::GeoLocation => 265,
            ElementType::CivicLocation => 266,
            ElementType::LocationUri => 267,
            ElementType::DomainName => 268,
            ElementType::EmergencyAlertUri => 269,
            ElementType::TdlsCapability => 270,
            ElementType::EmergencyNai => 271,
            ElementType::NeighborReport => 272,
            _ => VENDOR_SPECIFIC_INFO_ID,
        }
    }

    /// Hotspot 2.0 subtype byte, if this is a Hotspot 2.0 element
    pub fn hs_subtype(&self) -> Option<u8> {
        match self {
            ElementType::HsQueryList => Some(1),
            ElementType::HsCapabilityList => Some(2),
            ElementType::HsFriendlyName => Some(3),
            ElementType::HsWanMetrics => Some(4),
            ElementType::HsConnCapability => Some(5),
            ElementType::HsNaiHomeRealmQuery => Some(6),
            ElementType::HsOperatingClass => Some(7),
            ElementType::HsOsuProviders => Some(8),
            ElementType::HsIconRequest => Some(10),
            ElementType::HsIconFile => Some(11),
            _ => None,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Verdict of matching a Home-SP profile against a network.
///
/// Ordered by preference, so the best of several verdicts is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PasspointMatch {
    /// The profile does not apply to this network
    None,
    /// A verdict needs ANQP data that has not been fetched yet
    Incomplete,
    /// The network is operated by a roaming partner of the home provider
    RoamingProvider,
    /// The network is operated by the home provider
    HomeProvider,
}

/// Match score for EAP credentials against an advertised realm record.
///
/// Keep the variants in order of preference; `Exact` is the best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AuthMatch {
    /// Realm, method or parameter is defined and mismatches the credential
    None,
    /// No ANQP information to match against
    Indeterminate,
    /// A realm matched but the record lists no EAP methods
    RealmOnly,
    /// The EAP method matched but one side has no auth parameters
    MethodOnly,
    /// The EAP method and at least one auth parameter matched
    Exact,
}

/// Cache key identifying one access point of one network
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkKey {
    pub ssid: String,
    pub bssid: u64,
}

/// Observed network descriptor, built from scan results
#[derive(Debug, Clone, Default)]
pub struct NetworkDetail {
    /// Network SSID
    pub ssid: String,
    /// BSSID of the advertising access point (48 bits)
    pub bssid: u64,
    /// Homogeneous ESS identifier (48 bits), if advertised
    pub hessid: Option<u64>,
    /// ANQP domain ID from the Hotspot 2.0 indication; 0 means per-AP data
    pub anqp_domain_id: u16,
    /// Number of additional OIs only available through ANQP
    pub anqp_oi_count: u8,
    /// Roaming consortium OIs advertised in the beacon
    pub roaming_consortiums: Vec<u64>,
}

impl NetworkDetail {
    /// Create a new NetworkDetail with just an SSID
    pub fn new(ssid: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            ..Default::default()
        }
    }

    pub fn with_bssid(mut self, bssid: u64) -> Self {
        self.bssid = bssid;
        self
    }

    pub fn with_hessid(mut self, hessid: u64) -> Self {
        self.hessid = Some(hessid);
        self
    }

    pub fn with_anqp_domain_id(mut self, domain_id: u16) -> Self {
        self.anqp_domain_id = domain_id;
        self
    }

    pub fn with_roaming_consortiums(mut self, ois: impl IntoIterator<Item = u64>) -> Self {
        self.roaming_consortiums = ois.into_iter().collect();
        self
    }

    /// Take the advertised OIs from a parsed beacon Roaming Consortium IE
    pub fn with_beacon_roaming_consortium(mut self, rc: &BeaconRoamingConsortium) -> Self {
        self.anqp_oi_count = rc.anqp_oi_count;
        self.roaming_consortiums = rc.ois.clone();
        self
    }

    /// Key identifying this access point in the ANQP cache
    pub fn key(&self) -> NetworkKey {
        NetworkKey {
            ssid: self.ssid.clone(),
            bssid: self.bssid,
        }
    }
}
