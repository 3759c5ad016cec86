//! EAP method descriptors carried in NAI Realm records.

use std::fmt;

use crate::codec::{ByteOrder, ByteReader};
use crate::error::{AnqpError, Result};
use crate::types::AuthMatch;

/// EAP method type (IANA EAP registry)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EapMethodId {
    Tls,
    Sim,
    Ttls,
    Aka,
    Peap,
    AkaPrime,
    Pwd,
    Other(u8),
}

impl From<u8> for EapMethodId {
    fn from(value: u8) -> Self {
        match value {
            13 => EapMethodId::Tls,
            18 => EapMethodId::Sim,
            21 => EapMethodId::Ttls,
            23 => EapMethodId::Aka,
            25 => EapMethodId::Peap,
            50 => EapMethodId::AkaPrime,
            52 => EapMethodId::Pwd,
            other => EapMethodId::Other(other),
        }
    }
}

impl EapMethodId {
    pub fn value(&self) -> u8 {
        match self {
            EapMethodId::Tls => 13,
            EapMethodId::Sim => 18,
            EapMethodId::Ttls => 21,
            EapMethodId::Aka => 23,
            EapMethodId::Peap => 25,
            EapMethodId::AkaPrime => 50,
            EapMethodId::Pwd => 52,
            EapMethodId::Other(v) => *v,
        }
    }

    /// Parse a method name ("TTLS", "EAP-SIM", "AKA'", ...) or a numeric type
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix("EAP-").unwrap_or(&upper);
        let method = match bare {
            "TLS" => EapMethodId::Tls,
            "SIM" => EapMethodId::Sim,
            "TTLS" => EapMethodId::Ttls,
            "AKA" => EapMethodId::Aka,
            "PEAP" => EapMethodId::Peap,
            "AKA'" | "AKA-PRIME" => EapMethodId::AkaPrime,
            "PWD" => EapMethodId::Pwd,
            other => return other.parse::<u8>().ok().map(EapMethodId::from),
        };
        Some(method)
    }

    /// Methods that authenticate with a SIM and therefore an IMSI
    pub fn is_sim_based(&self) -> bool {
        matches!(self, EapMethodId::Sim | EapMethodId::Aka | EapMethodId::AkaPrime)
    }
}

/// Non-EAP inner authentication type, IEEE 802.11 table 9-336
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonEapInnerAuthType {
    Reserved,
    Pap,
    Chap,
    MsChap,
    MsChapV2,
}

impl From<u8> for NonEapInnerAuthType {
    fn from(value: u8) -> Self {
        match value {
            1 => NonEapInnerAuthType::Pap,
            2 => NonEapInnerAuthType::Chap,
            3 => NonEapInnerAuthType::MsChap,
            4 => NonEapInnerAuthType::MsChapV2,
            _ => NonEapInnerAuthType::Reserved,
        }
    }
}

impl NonEapInnerAuthType {
    /// Parse the name used in provisioning data ("PAP", "MS-CHAP-V2", ...)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "PAP" => Some(NonEapInnerAuthType::Pap),
            "CHAP" => Some(NonEapInnerAuthType::Chap),
            "MS-CHAP" => Some(NonEapInnerAuthType::MsChap),
            "MS-CHAP-V2" => Some(NonEapInnerAuthType::MsChapV2),
            _ => None,
        }
    }
}

/// Credential type auth parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialType {
    Sim,
    Usim,
    Nfc,
    HardwareToken,
    Softoken,
    Certificate,
    UsernamePassword,
    Anonymous,
    VendorSpecific,
    Reserved(u8),
}

impl From<u8> for CredentialType {
    fn from(value: u8) -> Self {
        match value {
            1 => CredentialType::Sim,
            2 => CredentialType::Usim,
            3 => CredentialType::Nfc,
            4 => CredentialType::HardwareToken,
            5 => CredentialType::Softoken,
            6 => CredentialType::Certificate,
            7 => CredentialType::UsernamePassword,
            9 => CredentialType::Anonymous,
            10 => CredentialType::VendorSpecific,
            other => CredentialType::Reserved(other),
        }
    }
}

/// One authentication parameter of an EAP method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuthParam {
    ExpandedEapMethod { vendor_id: u32, vendor_type: u32 },
    NonEapInnerAuth(NonEapInnerAuthType),
    InnerAuthEap(EapMethodId),
    ExpandedInnerEapMethod { vendor_id: u32, vendor_type: u32 },
    CredentialType(CredentialType),
    TunneledEapCredentialType(CredentialType),
    VendorSpecific(Vec<u8>),
}

const AUTH_EXPANDED_EAP: u8 = 1;
const AUTH_NON_EAP_INNER: u8 = 2;
const AUTH_INNER_EAP: u8 = 3;
const AUTH_EXPANDED_INNER_EAP: u8 = 4;
const AUTH_CREDENTIAL: u8 = 5;
const AUTH_TUNNELED_CREDENTIAL: u8 = 6;
const AUTH_VENDOR_SPECIFIC: u8 = 221;

impl AuthParam {
    fn parse(id: u8, body: &mut ByteReader<'_>) -> Result<Self> {
        let len = body.remaining();
        let param = match id {
            AUTH_EXPANDED_EAP | AUTH_EXPANDED_INNER_EAP => {
                expect_len(len, 7, "expanded EAP method")?;
                let vendor_id = body.read_uint(3, ByteOrder::BigEndian, "expanded EAP method")? as u32;
                let vendor_type = body.read_uint(4, ByteOrder::BigEndian, "expanded EAP method")? as u32;
                if id == AUTH_EXPANDED_EAP {
                    AuthParam::ExpandedEapMethod {
                        vendor_id,
                        vendor_type,
                    }
                } else {
                    AuthParam::ExpandedInnerEapMethod {
                        vendor_id,
                        vendor_type,
                    }
                }
            }
            AUTH_NON_EAP_INNER => {
                expect_len(len, 1, "non-EAP inner auth")?;
                AuthParam::NonEapInnerAuth(body.read_u8("non-EAP inner auth")?.into())
            }
            AUTH_INNER_EAP => {
                expect_len(len, 1, "inner EAP method")?;
                AuthParam::InnerAuthEap(body.read_u8("inner EAP method")?.into())
            }
            AUTH_CREDENTIAL => {
                expect_len(len, 1, "credential type")?;
                AuthParam::CredentialType(body.read_u8("credential type")?.into())
            }
            AUTH_TUNNELED_CREDENTIAL => {
                expect_len(len, 1, "tunneled credential type")?;
                AuthParam::TunneledEapCredentialType(body.read_u8("tunneled credential type")?.into())
            }
            AUTH_VENDOR_SPECIFIC => AuthParam::VendorSpecific(body.rest().to_vec()),
            other => {
                return Err(AnqpError::malformed(
                    "auth parameter",
                    format!("unknown auth parameter ID {}", other),
                ))
            }
        };
        Ok(param)
    }
}

fn expect_len(actual: usize, expected: usize, context: &'static str) -> Result<()> {
    if actual != expected {
        return Err(AnqpError::malformed(
            context,
            format!("length {} (expected {})", actual, expected),
        ));
    }
    Ok(())
}

/// An EAP method with its authentication parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EapMethod {
    pub method: EapMethodId,
    pub params: Vec<AuthParam>,
}

impl EapMethod {
    pub fn new(method: EapMethodId, params: Vec<AuthParam>) -> Self {
        Self { method, params }
    }

    /// Parse one `[len][method][count][params...]` record
    pub fn parse(reader: &mut ByteReader<'_>) -> Result<Self> {
        let length = reader.read_u8("EAP method")? as usize;
        if length < 2 {
            return Err(AnqpError::malformed(
                "EAP method",
                format!("length {} too short", length),
            ));
        }
        let mut body = reader.sub_reader(length, "EAP method")?;
        let method = EapMethodId::from(body.read_u8("EAP method")?);
        let count = body.read_u8("EAP method")? as usize;

        let mut params = Vec::with_capacity(count);
        while !body.is_empty() {
            let id = body.read_u8("auth parameter")?;
            let len = body.read_u8("auth parameter")? as usize;
            if len == 0 {
                return Err(AnqpError::malformed("auth parameter", "zero length"));
            }
            let mut param_body = body.sub_reader(len, "auth parameter")?;
            params.push(AuthParam::parse(id, &mut param_body)?);
        }

        if params.len() != count {
            return Err(AnqpError::malformed(
                "EAP method",
                format!("parameter count {}, expected {}", params.len(), count),
            ));
        }
        Ok(Self { method, params })
    }

    /// Compare auth parameters with a credential's method of the same type
    pub fn match_auth_params(&self, other: &EapMethod) -> AuthMatch {
        if self.params.is_empty() || other.params.is_empty() {
            return AuthMatch::MethodOnly;
        }
        if other.params.iter().any(|p| self.params.contains(p)) {
            AuthMatch::Exact
        } else {
            AuthMatch::None
        }
    }
}

impl fmt::Display for EapMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EAP method {:?}", self.method)?;
        for param in &self.params {
            write!(f, " {:?}", param)?;
        }
        Ok(())
    }
}
