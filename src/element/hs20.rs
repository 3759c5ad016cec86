//! Hotspot 2.0 vendor-specific ANQP elements.
//!
//! Hotspot 2.0 elements travel inside the vendor-specific info-ID with a
//! `[OI 50-6F-9A][type 0x11][subtype][reserved]` header.

use crate::codec::{bits, ByteOrder, ByteReader};
use crate::error::{AnqpError, Result};
use crate::types::ElementType;

/// Wi-Fi Alliance OI
pub const WFA_OI: u64 = 0x506f9a;

/// Vendor type marking a Hotspot 2.0 ANQP element
const HS20_ANQP_TYPE: u8 = 0x11;

/// Unwrap a vendor-specific payload.
///
/// Returns the Hotspot 2.0 element type and its payload, or `None` for
/// other vendors' elements and unknown subtypes.
pub fn unwrap_vendor_specific(payload: &[u8]) -> Result<Option<(ElementType, &[u8])>> {
    let mut reader = ByteReader::new(payload);
    let oi = reader.read_uint(3, ByteOrder::BigEndian, "vendor OI")?;
    let vendor_type = reader.read_u8("vendor type")?;
    if oi != WFA_OI || vendor_type != HS20_ANQP_TYPE {
        log::debug!("skipping vendor element OI {:06x} type {}", oi, vendor_type);
        return Ok(None);
    }

    let subtype = reader.read_u8("Hotspot 2.0 subtype")?;
    reader.skip(1, "Hotspot 2.0 reserved")?;
    match ElementType::from_hs_subtype(subtype) {
        Some(element) => Ok(Some((element, reader.rest()))),
        None => {
            log::debug!("skipping unknown Hotspot 2.0 subtype {}", subtype);
            Ok(None)
        }
    }
}

/// Hotspot 2.0 Capability List: subtypes the AP can answer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HsCapabilityListElement {
    capabilities: Vec<ElementType>,
}

impl HsCapabilityListElement {
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let capabilities = payload
            .iter()
            .filter_map(|subtype| ElementType::from_hs_subtype(*subtype))
            .collect();
        Ok(Self { capabilities })
    }

    pub fn capabilities(&self) -> &[ElementType] {
        &self.capabilities
    }
}

/// WAN link status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Reserved,
    Up,
    Down,
    Test,
}

/// Hotspot 2.0 WAN Metrics element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WanMetricsElement {
    pub status: LinkStatus,
    pub symmetric: bool,
    pub at_capacity: bool,
    /// Downlink speed in kbps
    pub downlink_speed: u32,
    /// Uplink speed in kbps
    pub uplink_speed: u32,
    pub downlink_load: u8,
    pub uplink_load: u8,
    /// Load measurement duration in tenths of a second
    pub lmd: u16,
}

const WAN_METRICS_LEN: usize = 13;

impl WanMetricsElement {
    pub fn parse(payload: &[u8]) -> Result<Self> {
        if payload.len() != WAN_METRICS_LEN {
            return Err(AnqpError::malformed(
                "WAN metrics",
                format!("length {} (expected {})", payload.len(), WAN_METRICS_LEN),
            ));
        }
        let mut reader = ByteReader::new(payload);
        let info = reader.read_u8("WAN info")?;
        let status = match bits(info, 0, 2) {
            1 => LinkStatus::Up,
            2 => LinkStatus::Down,
            3 => LinkStatus::Test,
            _ => LinkStatus::Reserved,
        };
        Ok(Self {
            status,
            symmetric: bits(info, 2, 1) != 0,
            at_capacity: bits(info, 3, 1) != 0,
            downlink_speed: reader.read_u32_le("WAN downlink speed")?,
            uplink_speed: reader.read_u32_le("WAN uplink speed")?,
            downlink_load: reader.read_u8("WAN downlink load")?,
            uplink_load: reader.read_u8("WAN uplink load")?,
            lmd: reader.read_u16_le("WAN LMD")?,
        })
    }
}

/// Port status in a connection capability tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortStatus {
    Closed,
    Open,
    Unknown,
}

/// One `(protocol, port, status)` tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolPort {
    pub protocol: u8,
    pub port: u16,
    pub status: PortStatus,
}

/// Hotspot 2.0 Connection Capability element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnCapabilityElement {
    tuples: Vec<ProtocolPort>,
}

impl ConnCapabilityElement {
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(payload);
        let mut tuples = Vec::with_capacity(payload.len() / 4);
        while !reader.is_empty() {
            let protocol = reader.read_u8("connection capability")?;
            let port = reader.read_u16_le("connection capability")?;
            let status = match reader.read_u8("connection capability")? {
                0 => PortStatus::Closed,
                1 => PortStatus::Open,
                _ => PortStatus::Unknown,
            };
            tuples.push(ProtocolPort {
                protocol,
                port,
                status,
            });
        }
        Ok(Self { tuples })
    }

    pub fn tuples(&self) -> &[ProtocolPort] {
        &self.tuples
    }

    /// Status of a protocol/port pair; unlisted pairs are unknown
    pub fn status(&self, protocol: u8, port: u16) -> PortStatus {
        self.tuples
            .iter()
            .find(|t| t.protocol == protocol && t.port == port)
            .map(|t| t.status)
            .unwrap_or(PortStatus::Unknown)
    }
}
