//! Informational ANQP elements: capability list, network authentication
//! type, IP address type availability and domain name list.

use crate::codec::{bits, ByteReader, Encoding};
use crate::error::{AnqpError, Result};
use crate::types::ElementType;

/// ANQP Capability List: the info-IDs the AP can answer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CapabilityListElement {
    capabilities: Vec<ElementType>,
}

impl CapabilityListElement {
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(payload);
        let mut capabilities = Vec::with_capacity(payload.len() / 2);
        while !reader.is_empty() {
            let info_id = reader.read_u16_le("capability info-ID")?;
            match ElementType::try_from(info_id) {
                Ok(element) => capabilities.push(element),
                Err(()) => log::debug!("dropping unknown capability info-ID {}", info_id),
            }
        }
        Ok(Self { capabilities })
    }

    pub fn capabilities(&self) -> &[ElementType] {
        &self.capabilities
    }
}

/// Network authentication type indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkAuthKind {
    TermsAndConditions,
    OnlineEnrollment,
    HttpRedirection,
    DnsRedirection,
    Reserved(u8),
}

impl From<u8> for NetworkAuthKind {
    fn from(value: u8) -> Self {
        match value {
            0 => NetworkAuthKind::TermsAndConditions,
            1 => NetworkAuthKind::OnlineEnrollment,
            2 => NetworkAuthKind::HttpRedirection,
            3 => NetworkAuthKind::DnsRedirection,
            other => NetworkAuthKind::Reserved(other),
        }
    }
}

/// One network authentication requirement with its redirect URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkAuthType {
    pub kind: NetworkAuthKind,
    pub url: String,
}

/// Network Authentication Type ANQP element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkAuthTypeElement {
    auth_types: Vec<NetworkAuthType>,
}

impl NetworkAuthTypeElement {
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(payload);
        let mut auth_types = Vec::new();
        while !reader.is_empty() {
            let kind = NetworkAuthKind::from(reader.read_u8("network auth indicator")?);
            let url = reader.read_prefixed_string(2, Encoding::Utf8, "network auth URL")?;
            auth_types.push(NetworkAuthType { kind, url });
        }
        Ok(Self { auth_types })
    }

    pub fn auth_types(&self) -> &[NetworkAuthType] {
        &self.auth_types
    }
}

/// IPv6 address availability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv6Availability {
    NotAvailable,
    Available,
    Unknown,
    Reserved,
}

/// IPv4 address availability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv4Availability {
    NotAvailable,
    Public,
    PortRestricted,
    SingleNat,
    DoubleNat,
    PortRestrictedSingleNat,
    PortRestrictedDoubleNat,
    Unknown,
    Reserved,
}

/// IP Address Type Availability ANQP element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpAddrAvailabilityElement {
    pub ipv4: Ipv4Availability,
    pub ipv6: Ipv6Availability,
}

impl IpAddrAvailabilityElement {
    pub fn parse(payload: &[u8]) -> Result<Self> {
        if payload.len() != 1 {
            return Err(AnqpError::malformed(
                "IP address availability",
                format!("length {} (expected 1)", payload.len()),
            ));
        }
        let field = payload[0];
        let ipv6 = match bits(field, 0, 2) {
            0 => Ipv6Availability::NotAvailable,
            1 => Ipv6Availability::Available,
            2 => Ipv6Availability::Unknown,
            _ => Ipv6Availability::Reserved,
        };
        let ipv4 = match bits(field, 2, 6) {
            0 => Ipv4Availability::NotAvailable,
            1 => Ipv4Availability::Public,
            2 => Ipv4Availability::PortRestricted,
            3 => Ipv4Availability::SingleNat,
            4 => Ipv4Availability::DoubleNat,
            5 => Ipv4Availability::PortRestrictedSingleNat,
            6 => Ipv4Availability::PortRestrictedDoubleNat,
            7 => Ipv4Availability::Unknown,
            _ => Ipv4Availability::Reserved,
        };
        Ok(Self { ipv4, ipv6 })
    }
}

/// Domain Name ANQP element: FQDNs of the network operator
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomainNameElement {
    domains: Vec<String>,
}

impl DomainNameElement {
    pub fn new(domains: Vec<String>) -> Self {
        Self { domains }
    }

    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(payload);
        let mut domains = Vec::new();
        while !reader.is_empty() {
            domains.push(reader.read_prefixed_string(1, Encoding::Ascii, "domain name")?);
        }
        Ok(Self { domains })
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }
}
