//! Roaming consortium OIs, from the ANQP element and from the beacon IE.

use std::fmt;

use crate::codec::{bits, ByteOrder, ByteReader};
use crate::error::{AnqpError, Result};

/// Format an OI the way it is written in provisioning data
pub fn format_oi(oi: u64) -> String {
    if oi > 0xff_ffff {
        format!("{:09x}", oi)
    } else {
        format!("{:06x}", oi)
    }
}

/// Roaming Consortium ANQP element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoamingConsortiumElement {
    ois: Vec<u64>,
}

impl RoamingConsortiumElement {
    pub fn new(ois: Vec<u64>) -> Self {
        Self { ois }
    }

    /// Parse a sequence of `[len][OI bytes]` entries filling the payload
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(payload);
        let mut ois = Vec::new();
        while !reader.is_empty() {
            let len = reader.read_u8("OI length")? as usize;
            ois.push(reader.read_uint(len, ByteOrder::BigEndian, "OI entry")?);
        }
        Ok(Self { ois })
    }

    /// OIs in advertised order, duplicates included
    pub fn ois(&self) -> &[u64] {
        &self.ois
    }
}

impl fmt::Display for RoamingConsortiumElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ois: Vec<String> = self.ois.iter().map(|oi| format_oi(*oi)).collect();
        write!(f, "RoamingConsortium[{}]", ois.join(", "))
    }
}

/// Roaming Consortium information element from a beacon or probe response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BeaconRoamingConsortium {
    /// Number of further OIs only available through ANQP
    pub anqp_oi_count: u8,
    /// Up to three OIs carried in the IE itself
    pub ois: Vec<u64>,
}

impl BeaconRoamingConsortium {
    /// Parse the IE body (without element ID and length).
    ///
    /// The second byte packs the lengths of OI #1 (low nibble) and OI #2
    /// (high nibble); OI #3 takes whatever remains.
    pub fn parse(ie: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(ie);
        let anqp_oi_count = reader.read_u8("roaming consortium IE")?;
        let lengths = reader.read_u8("roaming consortium IE")?;
        let oi1_len = bits(lengths, 0, 4) as usize;
        let oi2_len = bits(lengths, 4, 4) as usize;

        if oi1_len + oi2_len > reader.remaining() {
            return Err(AnqpError::malformed(
                "roaming consortium IE",
                format!(
                    "OI lengths {}+{} exceed {} available bytes",
                    oi1_len,
                    oi2_len,
                    reader.remaining()
                ),
            ));
        }
        let oi3_len = reader.remaining() - oi1_len - oi2_len;

        let mut ois = Vec::with_capacity(3);
        if oi1_len > 0 {
            ois.push(reader.read_uint(oi1_len, ByteOrder::BigEndian, "OI #1")?);
            if oi2_len > 0 {
                ois.push(reader.read_uint(oi2_len, ByteOrder::BigEndian, "OI #2")?);
                if oi3_len > 0 {
                    ois.push(reader.read_uint(oi3_len, ByteOrder::BigEndian, "OI #3")?);
                }
            }
        }

        Ok(Self { anqp_oi_count, ois })
    }
}
