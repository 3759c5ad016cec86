//! 3GPP Cellular Network element and PLMN list decoding.

use std::fmt;

use crate::codec::ByteReader;
use crate::error::{AnqpError, Result};

/// Information element identifier of a PLMN list
const PLMN_LIST_IEI: u8 = 0;

/// MNC digit nibble marking a 2-digit MNC
const MNC_FILLER: u8 = 0x0f;

/// A (MCC, MNC) pair.
///
/// Digits are kept as BCD nibbles, so MCC "310" is stored as `0x310`.
/// `mnc_three_digits` tells a 2-digit "12" (`0x12`) apart from a 3-digit
/// "012" (`0x012`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Plmn {
    pub mcc: u16,
    pub mnc: u16,
    pub mnc_three_digits: bool,
}

impl Plmn {
    /// Decode a 3-byte PLMN record
    pub fn decode(record: [u8; 3]) -> Self {
        let [b0, b1, b2] = record;
        let mcc = (((b0 & 0x0f) as u16) << 8) | (b0 & 0xf0) as u16 | (b1 & 0x0f) as u16;
        let mnc = (((b2 & 0x0f) as u16) << 4) | (b2 >> 4) as u16;
        let mnc_digit3 = b1 >> 4;
        if mnc_digit3 == MNC_FILLER {
            Self {
                mcc,
                mnc,
                mnc_three_digits: false,
            }
        } else {
            Self {
                mcc,
                mnc: (mnc << 4) | mnc_digit3 as u16,
                mnc_three_digits: true,
            }
        }
    }

    /// Encode back into the 3-byte wire record
    pub fn encode(&self) -> [u8; 3] {
        let mcc = self.mcc;
        let b0 = ((mcc >> 8) & 0x0f) as u8 | (mcc & 0xf0) as u8;
        let (mnc_d1, mnc_d2, mnc_d3) = if self.mnc_three_digits {
            (
                ((self.mnc >> 8) & 0x0f) as u8,
                ((self.mnc >> 4) & 0x0f) as u8,
                (self.mnc & 0x0f) as u8,
            )
        } else {
            (
                ((self.mnc >> 4) & 0x0f) as u8,
                (self.mnc & 0x0f) as u8,
                MNC_FILLER,
            )
        };
        let b1 = (mnc_d3 << 4) | (mcc & 0x0f) as u8;
        let b2 = (mnc_d2 << 4) | mnc_d1;
        [b0, b1, b2]
    }
}

impl fmt::Display for Plmn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mnc_three_digits {
            write!(f, "{:03x}/{:03x}", self.mcc, self.mnc)
        } else {
            write!(f, "{:03x}/{:02x}", self.mcc, self.mnc)
        }
    }
}

/// MCC and MNC candidates taken from an IMSI, computed once per match.
#[derive(Debug, Clone, Copy)]
struct ImsiCandidates {
    mcc: u16,
    mnc2: Option<u16>,
    mnc3: Option<u16>,
}

impl ImsiCandidates {
    fn from_imsi(imsi: &str) -> Option<Self> {
        if imsi.len() < 5 {
            return None;
        }
        let mcc = parse_digits(imsi.get(0..3)?)?;
        Some(Self {
            mcc,
            mnc2: imsi.get(3..5).and_then(parse_digits),
            mnc3: imsi.get(3..6).and_then(parse_digits),
        })
    }

    fn matches(&self, plmn: &Plmn) -> bool {
        if plmn.mcc != self.mcc {
            return false;
        }
        let candidate = if plmn.mnc_three_digits {
            self.mnc3
        } else {
            self.mnc2
        };
        candidate == Some(plmn.mnc)
    }
}

/// Parse decimal digits as BCD nibbles, the representation PLMNs are stored in
fn parse_digits(digits: &str) -> Option<u16> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

/// One PLMN list information element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellularNetwork {
    plmns: Vec<Plmn>,
}

impl CellularNetwork {
    pub fn new(plmns: Vec<Plmn>) -> Self {
        Self { plmns }
    }

    /// Parse one information element.
    ///
    /// Returns `Ok(None)` after skipping the element when its identifier is
    /// not a PLMN list.
    pub fn parse(reader: &mut ByteReader<'_>) -> Result<Option<Self>> {
        let iei = reader.read_u8("cellular IE header")?;
        let length = (reader.read_u8("cellular IE header")? & 0x7f) as usize;
        let mut body = reader.sub_reader(length, "cellular IE body")?;

        if iei != PLMN_LIST_IEI {
            log::debug!("skipping cellular IE {} ({} bytes)", iei, length);
            return Ok(None);
        }

        let count = body.read_u8("PLMN count")? as usize;
        let mut plmns = Vec::with_capacity(count);
        for _ in 0..count {
            let record = body.take(3, "PLMN record")?;
            plmns.push(Plmn::decode([record[0], record[1], record[2]]));
        }
        Ok(Some(Self { plmns }))
    }

    pub fn plmns(&self) -> &[Plmn] {
        &self.plmns
    }

    /// Check whether the IMSI belongs to any PLMN in this list.
    ///
    /// An MNC is only compared against the IMSI digits of the same length
    /// class; an IMSI too short for a 3-digit MNC skips those entries.
    pub fn match_imsi(&self, imsi: &str) -> bool {
        let Some(candidates) = ImsiCandidates::from_imsi(imsi) else {
            return false;
        };
        self.plmns.iter().any(|plmn| candidates.matches(plmn))
    }
}

impl fmt::Display for CellularNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PLMN:")?;
        for plmn in &self.plmns {
            write!(f, " {}", plmn)?;
        }
        Ok(())
    }
}

/// 3GPP Cellular Network ANQP element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreeGppNetworkElement {
    networks: Vec<CellularNetwork>,
}

impl ThreeGppNetworkElement {
    pub fn new(networks: Vec<CellularNetwork>) -> Self {
        Self { networks }
    }

    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(payload);
        let gud = reader.read_u8("3GPP GUD")?;
        if gud != 0 {
            return Err(AnqpError::malformed(
                "3GPP GUD",
                format!("unsupported version {}", gud),
            ));
        }
        let udhl = reader.read_u8("3GPP UDHL")? as usize;
        let mut body = reader.sub_reader(udhl, "3GPP user data")?;

        let mut networks = Vec::new();
        while !body.is_empty() {
            if let Some(network) = CellularNetwork::parse(&mut body)? {
                networks.push(network);
            }
        }
        Ok(Self { networks })
    }

    pub fn networks(&self) -> &[CellularNetwork] {
        &self.networks
    }
}
