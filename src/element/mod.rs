//! ANQP element decoders and the response dispatcher.
//!
//! A response payload is a sequence of
//! `[info-ID (2, LE)][length (2, LE)][payload]` frames. The dispatcher
//! hands each payload, bounded by its declared length, to the decoder for
//! its element type and collects the results keyed by type.

pub mod cellular;
pub mod eap;
pub mod hs20;
pub mod i18n;
pub mod info;
pub mod nai_realm;
pub mod roaming;

use std::collections::HashMap;

use crate::codec::ByteReader;
use crate::error::{AnqpError, Result};
use crate::types::ElementType;

use cellular::ThreeGppNetworkElement;
use hs20::{ConnCapabilityElement, HsCapabilityListElement, WanMetricsElement};
use i18n::{FriendlyNameElement, VenueNameElement};
use info::{CapabilityListElement, DomainNameElement, IpAddrAvailabilityElement, NetworkAuthTypeElement};
use nai_realm::NaiRealmElement;
use roaming::RoamingConsortiumElement;

/// A decoded ANQP element, tagged by its type
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedElement {
    CapabilityList(CapabilityListElement),
    VenueName(VenueNameElement),
    NetworkAuthType(NetworkAuthTypeElement),
    RoamingConsortium(RoamingConsortiumElement),
    IpAddrAvailability(IpAddrAvailabilityElement),
    NaiRealm(NaiRealmElement),
    ThreeGppNetwork(ThreeGppNetworkElement),
    DomainName(DomainNameElement),
    HsCapabilityList(HsCapabilityListElement),
    HsFriendlyName(FriendlyNameElement),
    HsWanMetrics(WanMetricsElement),
    HsConnCapability(ConnCapabilityElement),
    /// Element without a dedicated decoder, kept as its raw payload
    Generic {
        element_type: ElementType,
        data: Vec<u8>,
    },
}

impl DecodedElement {
    pub fn element_type(&self) -> ElementType {
        match self {
            DecodedElement::CapabilityList(_) => ElementType::CapabilityList,
            DecodedElement::VenueName(_) => ElementType::VenueName,
            DecodedElement::NetworkAuthType(_) => ElementType::NetworkAuthType,
            DecodedElement::RoamingConsortium(_) => ElementType::RoamingConsortium,
            DecodedElement::IpAddrAvailability(_) => ElementType::IpAddrAvailability,
            DecodedElement::NaiRealm(_) => ElementType::NaiRealm,
            DecodedElement::ThreeGppNetwork(_) => ElementType::ThreeGppNetwork,
            DecodedElement::DomainName(_) => ElementType::DomainName,
            DecodedElement::HsCapabilityList(_) => ElementType::HsCapabilityList,
            DecodedElement::HsFriendlyName(_) => ElementType::HsFriendlyName,
            DecodedElement::HsWanMetrics(_) => ElementType::HsWanMetrics,
            DecodedElement::HsConnCapability(_) => ElementType::HsConnCapability,
            DecodedElement::Generic { element_type, .. } => *element_type,
        }
    }
}

/// Decode one element payload of a known type
pub fn decode_element(element_type: ElementType, payload: &[u8]) -> Result<DecodedElement> {
    decode_inner(element_type, payload).map_err(|source| AnqpError::InvalidElement {
        element: element_type,
        source: Box::new(source),
    })
}

fn decode_inner(element_type: ElementType, payload: &[u8]) -> Result<DecodedElement> {
    let element = match element_type {
        ElementType::CapabilityList => {
            DecodedElement::CapabilityList(CapabilityListElement::parse(payload)?)
        }
        ElementType::VenueName => DecodedElement::VenueName(VenueNameElement::parse(payload)?),
        ElementType::NetworkAuthType => {
            DecodedElement::NetworkAuthType(NetworkAuthTypeElement::parse(payload)?)
        }
        ElementType::RoamingConsortium => {
            DecodedElement::RoamingConsortium(RoamingConsortiumElement::parse(payload)?)
        }
        ElementType::IpAddrAvailability => {
            DecodedElement::IpAddrAvailability(IpAddrAvailabilityElement::parse(payload)?)
        }
        ElementType::NaiRealm => DecodedElement::NaiRealm(NaiRealmElement::parse(payload)?),
        ElementType::ThreeGppNetwork => {
            DecodedElement::ThreeGppNetwork(ThreeGppNetworkElement::parse(payload)?)
        }
        ElementType::DomainName => DecodedElement::DomainName(DomainNameElement::parse(payload)?),
        ElementType::HsCapabilityList => {
            DecodedElement::HsCapabilityList(HsCapabilityListElement::parse(payload)?)
        }
        ElementType::HsFriendlyName => {
            DecodedElement::HsFriendlyName(FriendlyNameElement::parse(payload)?)
        }
        ElementType::HsWanMetrics => DecodedElement::HsWanMetrics(WanMetricsElement::parse(payload)?),
        ElementType::HsConnCapability => {
            DecodedElement::HsConnCapability(ConnCapabilityElement::parse(payload)?)
        }
        other => DecodedElement::Generic {
            element_type: other,
            data: payload.to_vec(),
        },
    };
    Ok(element)
}

/// Decoded elements of one ANQP response, at most one per type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnqpElements {
    elements: HashMap<ElementType, DecodedElement>,
}

impl AnqpElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element, returning the one it replaced
    pub fn insert(&mut self, element: DecodedElement) -> Option<DecodedElement> {
        self.elements.insert(element.element_type(), element)
    }

    pub fn get(&self, element_type: ElementType) -> Option<&DecodedElement> {
        self.elements.get(&element_type)
    }

    pub fn contains(&self, element_type: ElementType) -> bool {
        self.elements.contains_key(&element_type)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecodedElement> {
        self.elements.values()
    }

    pub fn roaming_consortium(&self) -> Option<&RoamingConsortiumElement> {
        match self.get(ElementType::RoamingConsortium)? {
            DecodedElement::RoamingConsortium(e) => Some(e),
            _ => None,
        }
    }

    pub fn nai_realm(&self) -> Option<&NaiRealmElement> {
        match self.get(ElementType::NaiRealm)? {
            DecodedElement::NaiRealm(e) => Some(e),
            _ => None,
        }
    }

    pub fn three_gpp_network(&self) -> Option<&ThreeGppNetworkElement> {
        match self.get(ElementType::ThreeGppNetwork)? {
            DecodedElement::ThreeGppNetwork(e) => Some(e),
            _ => None,
        }
    }

    pub fn domain_name(&self) -> Option<&DomainNameElement> {
        match self.get(ElementType::DomainName)? {
            DecodedElement::DomainName(e) => Some(e),
            _ => None,
        }
    }

    pub fn venue_name(&self) -> Option<&VenueNameElement> {
        match self.get(ElementType::VenueName)? {
            DecodedElement::VenueName(e) => Some(e),
            _ => None,
        }
    }

    pub fn friendly_name(&self) -> Option<&FriendlyNameElement> {
        match self.get(ElementType::HsFriendlyName)? {
            DecodedElement::HsFriendlyName(e) => Some(e),
            _ => None,
        }
    }
}

impl FromIterator<DecodedElement> for AnqpElements {
    fn from_iter<I: IntoIterator<Item = DecodedElement>>(iter: I) -> Self {
        let mut elements = AnqpElements::new();
        for element in iter {
            elements.insert(element);
        }
        elements
    }
}

/// Decode a full ANQP response payload.
///
/// A framing error (an element header or declared length running past the
/// end of the payload) fails the whole response, since every later element
/// would be misaligned. An element whose own contents fail to decode is
/// dropped and the rest of the response is kept. Unknown info-IDs are
/// skipped.
pub fn parse_payload(payload: &[u8]) -> Result<AnqpElements> {
    parse_frames(payload, false)
}

/// Like [`parse_payload`], but any element that fails to decode fails the
/// whole response.
pub fn parse_payload_strict(payload: &[u8]) -> Result<AnqpElements> {
    parse_frames(payload, true)
}

fn parse_frames(payload: &[u8], strict: bool) -> Result<AnqpElements> {
    let mut reader = ByteReader::new(payload);
    let mut elements = AnqpElements::new();

    while !reader.is_empty() {
        let info_id = reader.read_u16_le("ANQP element header")?;
        let length = reader.read_u16_le("ANQP element header")? as usize;
        let body = reader.take(length, "ANQP element payload")?;

        let decoded = match ElementType::try_from(info_id) {
            Err(()) => {
                log::debug!("skipping unknown ANQP info-ID {} ({} bytes)", info_id, length);
                continue;
            }
            Ok(ElementType::VendorSpecific) => match hs20::unwrap_vendor_specific(body) {
                Ok(Some((element_type, inner))) => decode_element(element_type, inner),
                Ok(None) => continue,
                Err(source) => Err(AnqpError::InvalidElement {
                    element: ElementType::VendorSpecific,
                    source: Box::new(source),
                }),
            },
            Ok(element_type) => decode_element(element_type, body),
        };

        match decoded {
            Ok(element) => {
                if let Some(previous) = elements.insert(element) {
                    log::debug!("duplicate {} element replaced", previous.element_type());
                }
            }
            Err(e) if strict => return Err(e),
            Err(e) => log::warn!("dropping ANQP element: {}", e),
        }
    }

    Ok(elements)
}
