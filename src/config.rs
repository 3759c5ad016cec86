//! JSON provisioning format for Home-SP profiles.
//!
//! ```json
//! [{
//!   "fqdn": "example.com",
//!   "friendly_name": "Example Wi-Fi",
//!   "other_home_partners": ["partner.net"],
//!   "ssids": { "ExampleHome": "00:11:22:33:44:55", "ExampleOpen": null },
//!   "roaming_consortiums": ["506f9a", 4096],
//!   "credential": {
//!     "realm": "example.com",
//!     "eap_method": { "method": "TTLS", "inner": "MS-CHAP-V2" },
//!     "username": "alice",
//!     "password": "c2VjcmV0"
//!   }
//! }]
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::element::eap::{AuthParam, EapMethod, EapMethodId, NonEapInnerAuthType};
use crate::error::{AnqpError, Result};
use crate::profile::{CertType, Credential, CredentialKind, HomeSp};

/// IMSI or MCC/MNC prefix, optionally ending in a `*` wildcard
static IMSI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{5,15}\*?$").expect("IMSI_PATTERN: hardcoded regex is invalid")
});

/// Largest OI: five bytes
const MAX_OI: u64 = 0xff_ffff_ffff;

/// An OI written either as a hex string or as an integer
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OiValue {
    Number(u64),
    Hex(String),
}

impl OiValue {
    pub fn to_oi(&self) -> Result<u64> {
        let oi = match self {
            OiValue::Number(n) => *n,
            OiValue::Hex(s) => {
                let digits = s.trim().trim_start_matches("0x");
                if digits.is_empty() || digits.len() > 10 {
                    return Err(AnqpError::ConfigError(format!("invalid OI '{}'", s)));
                }
                u64::from_str_radix(digits, 16)
                    .map_err(|e| AnqpError::ConfigError(format!("invalid OI '{}': {}", s, e)))?
            }
        };
        if oi > MAX_OI {
            return Err(AnqpError::ConfigError(format!("OI {:x} longer than 5 bytes", oi)));
        }
        Ok(oi)
    }
}

/// EAP method of a credential
#[derive(Debug, Clone, Deserialize)]
pub struct EapMethodConfig {
    /// Outer method name, e.g. "TTLS" or "SIM"
    pub method: String,
    /// Inner method: a non-EAP name ("MS-CHAP-V2") or an EAP method name
    #[serde(default)]
    pub inner: Option<String>,
}

impl EapMethodConfig {
    fn to_eap_method(&self) -> Result<EapMethod> {
        let method = EapMethodId::from_name(&self.method).ok_or_else(|| {
            AnqpError::ConfigError(format!("unknown EAP method '{}'", self.method))
        })?;
        let mut params = Vec::new();
        if let Some(inner) = &self.inner {
            let param = match NonEapInnerAuthType::from_name(inner) {
                Some(non_eap) => AuthParam::NonEapInnerAuth(non_eap),
                None => AuthParam::InnerAuthEap(EapMethodId::from_name(inner).ok_or_else(|| {
                    AnqpError::ConfigError(format!("unknown inner method '{}'", inner))
                })?),
            };
            params.push(param);
        }
        Ok(EapMethod::new(method, params))
    }
}

/// Credential section; exactly one of username, certificate or IMSI is set
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialConfig {
    pub realm: String,
    #[serde(default)]
    pub eap_method: Option<EapMethodConfig>,
    #[serde(default)]
    pub username: Option<String>,
    /// Base64 encoded
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub machine_managed: bool,
    #[serde(default)]
    pub cert_type: Option<String>,
    /// SHA-256 fingerprint, hex
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub imsi: Option<String>,
}

impl CredentialConfig {
    fn to_credential(&self) -> Result<Credential> {
        let kind = match (&self.username, &self.cert_type, &self.imsi) {
            (Some(username), None, None) => CredentialKind::UserPassword {
                username: username.clone(),
                password: decode_password(self.password.as_deref().unwrap_or(""))?,
                machine_managed: self.machine_managed,
            },
            (None, Some(cert_type), None) => CredentialKind::Certificate {
                cert_type: CertType::from_name(cert_type).ok_or_else(|| {
                    AnqpError::ConfigError(format!("unknown certificate type '{}'", cert_type))
                })?,
                fingerprint: decode_hex(self.fingerprint.as_deref().unwrap_or(""))?,
            },
            (None, None, Some(imsi)) => CredentialKind::Sim {
                imsi: parse_imsi(imsi)?,
            },
            _ => {
                return Err(AnqpError::ConfigError(format!(
                    "credential for realm '{}' needs exactly one of username, cert_type or imsi",
                    self.realm
                )))
            }
        };

        let eap_method = match &self.eap_method {
            Some(config) => config.to_eap_method()?,
            None => default_eap_method(&kind),
        };
        if let CredentialKind::Sim { .. } = kind {
            if !eap_method.method.is_sim_based() {
                return Err(AnqpError::ConfigError(format!(
                    "SIM credential cannot use EAP method {:?}",
                    eap_method.method
                )));
            }
        }

        Ok(Credential::new(self.realm.clone(), eap_method, kind))
    }
}

fn default_eap_method(kind: &CredentialKind) -> EapMethod {
    match kind {
        CredentialKind::UserPassword { .. } => EapMethod::new(
            EapMethodId::Ttls,
            vec![AuthParam::NonEapInnerAuth(NonEapInnerAuthType::MsChapV2)],
        ),
        CredentialKind::Certificate { .. } => EapMethod::new(EapMethodId::Tls, Vec::new()),
        CredentialKind::Sim { .. } => EapMethod::new(EapMethodId::Sim, Vec::new()),
    }
}

/// One Home-SP profile
#[derive(Debug, Clone, Deserialize)]
pub struct HomeSpConfig {
    pub fqdn: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub other_home_partners: Vec<String>,
    /// SSID to HESSID; `null` accepts any HESSID
    #[serde(default)]
    pub ssids: HashMap<String, Option<String>>,
    #[serde(default)]
    pub roaming_consortiums: Vec<OiValue>,
    #[serde(default)]
    pub match_any_ois: Vec<OiValue>,
    #[serde(default)]
    pub match_all_ois: Vec<OiValue>,
    pub credential: CredentialConfig,
}

impl HomeSpConfig {
    pub fn to_home_sp(&self) -> Result<HomeSp> {
        if self.fqdn.trim().is_empty() {
            return Err(AnqpError::ConfigError("empty FQDN".to_string()));
        }

        let mut builder = HomeSp::builder(self.fqdn.clone(), self.credential.to_credential()?)
            .with_roaming_consortiums(parse_ois(&self.roaming_consortiums)?)
            .with_match_any_ois(parse_ois(&self.match_any_ois)?)
            .with_match_all_ois(parse_ois(&self.match_all_ois)?);

        for partner in &self.other_home_partners {
            builder = builder.with_other_home_partner(partner.clone());
        }
        for (ssid, hessid) in &self.ssids {
            let hessid = hessid.as_deref().map(parse_hessid).transpose()?;
            builder = builder.with_ssid(ssid.clone(), hessid);
        }
        if let Some(name) = &self.friendly_name {
            builder = builder.with_friendly_name(name.clone());
        }
        if let Some(url) = &self.icon_url {
            builder = builder.with_icon_url(url.clone());
        }
        Ok(builder.build())
    }
}

fn parse_ois(values: &[OiValue]) -> Result<Vec<u64>> {
    values.iter().map(OiValue::to_oi).collect()
}

/// Parse a HESSID written as "00:11:22:33:44:55", "00-11-..." or "001122334455"
pub fn parse_hessid(text: &str) -> Result<u64> {
    let digits: String = text.chars().filter(|c| *c != ':' && *c != '-').collect();
    if digits.len() != 12 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AnqpError::ConfigError(format!("invalid HESSID '{}'", text)));
    }
    u64::from_str_radix(&digits, 16)
        .map_err(|e| AnqpError::ConfigError(format!("invalid HESSID '{}': {}", text, e)))
}

/// Validate an IMSI and strip a trailing wildcard
pub fn parse_imsi(text: &str) -> Result<String> {
    if !IMSI_PATTERN.is_match(text) {
        return Err(AnqpError::ConfigError(format!("invalid IMSI '{}'", text)));
    }
    Ok(text.trim_end_matches('*').to_string())
}

fn decode_password(encoded: &str) -> Result<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| AnqpError::ConfigError(format!("password is not base64: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|_| AnqpError::ConfigError("password is not valid UTF-8".to_string()))
}

fn decode_hex(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    if text.len() % 2 != 0 {
        return Err(AnqpError::ConfigError(format!("odd-length hex string '{}'", text)));
    }
    (0..text.len())
        .step_by(2)
        .map(|i| {
            text.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| AnqpError::ConfigError(format!("invalid hex string '{}'", text)))
        })
        .collect()
}

/// Parse a JSON list of Home-SP profiles
pub fn parse_profiles(text: &str) -> Result<Vec<HomeSp>> {
    let configs: Vec<HomeSpConfig> = serde_json::from_str(text)?;
    configs.iter().map(HomeSpConfig::to_home_sp).collect()
}

/// Parse Home-SP profiles from a JSON file
pub fn parse_profiles_from_file(path: impl AsRef<Path>) -> Result<Vec<HomeSp>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        AnqpError::ParseError(format!(
            "Failed to read profile file '{}': {}",
            path.display(),
            e
        ))
    })?;
    parse_profiles(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeErrorKind;

    const PROFILE: &str = r#"[{
        "fqdn": "example.com",
        "friendly_name": "Example Wi-Fi",
        "other_home_partners": ["partner.net"],
        "ssids": { "ExampleHome": "00:11:22:33:44:55", "ExampleOpen": null },
        "roaming_consortiums": ["506f9a", 4096],
        "match_any_ois": ["0x001bc50460"],
        "credential": {
            "realm": "example.com",
            "eap_method": { "method": "TTLS", "inner": "MS-CHAP-V2" },
            "username": "alice",
            "password": "c2VjcmV0"
        }
    }]"#;

    #[test]
    fn test_imsi_pattern_compiles() {
        assert!(IMSI_PATTERN.is_match("310026*"));
    }

    #[test]
    fn test_parse_profile() {
        let profiles = parse_profiles(PROFILE).unwrap();
        assert_eq!(profiles.len(), 1);
        let sp = &profiles[0];
        assert_eq!(sp.fqdn(), "example.com");
        assert_eq!(sp.friendly_name(), "Example Wi-Fi");
        assert_eq!(sp.ssids().get("ExampleHome"), Some(&Some(0x001122334455)));
        assert_eq!(sp.ssids().get("ExampleOpen"), Some(&None));
        assert!(sp.roaming_consortiums().contains(&0x506f9a));
        assert!(sp.roaming_consortiums().contains(&4096));
        assert!(sp.match_any_ois().contains(&0x001bc50460));
        match sp.credential().kind() {
            CredentialKind::UserPassword { username, password, .. } => {
                assert_eq!(username, "alice");
                assert_eq!(password, "secret");
            }
            other => panic!("unexpected credential {:?}", other),
        }
        assert_eq!(
            sp.credential().eap_method().params,
            vec![AuthParam::NonEapInnerAuth(NonEapInnerAuthType::MsChapV2)]
        );
    }

    #[test]
    fn test_sim_credential_defaults() {
        let text = r#"[{
            "fqdn": "operator.example",
            "credential": { "realm": "wlan.mnc026.mcc310.3gppnetwork.org", "imsi": "310026*" }
        }]"#;
        let profiles = parse_profiles(text).unwrap();
        let credential = profiles[0].credential();
        assert_eq!(credential.imsi(), Some("310026"));
        assert_eq!(credential.eap_method().method, EapMethodId::Sim);
    }

    #[test]
    fn test_certificate_credential() {
        let text = r#"[{
            "fqdn": "example.com",
            "credential": { "realm": "example.com", "cert_type": "x509v3", "fingerprint": "0aFF10" }
        }]"#;
        let profiles = parse_profiles(text).unwrap();
        match profiles[0].credential().kind() {
            CredentialKind::Certificate { cert_type, fingerprint } => {
                assert_eq!(*cert_type, CertType::X509v3);
                assert_eq!(fingerprint, &vec![0x0a, 0xff, 0x10]);
            }
            other => panic!("unexpected credential {:?}", other),
        }
        assert_eq!(profiles[0].credential().eap_method().method, EapMethodId::Tls);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(parse_imsi("3100").is_err());
        assert!(parse_imsi("31002a123").is_err());
        assert_eq!(parse_imsi("310026123456789").unwrap(), "310026123456789");

        assert_eq!(parse_hessid("001122334455").unwrap(), 0x001122334455);
        assert!(parse_hessid("00:11:22").is_err());

        assert!(OiValue::Hex("xyz".to_string()).to_oi().is_err());
        assert!(OiValue::Number(0x01_0000_0000_00).to_oi().is_err());
        assert!(decode_hex("abc").is_err());
        assert!(decode_password("not base64!").is_err());
    }

    #[test]
    fn test_ambiguous_credential_rejected() {
        let text = r#"[{
            "fqdn": "example.com",
            "credential": { "realm": "example.com", "username": "a", "imsi": "310026" }
        }]"#;
        let err = parse_profiles(text).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::Config);
    }

    #[test]
    fn test_sim_with_non_sim_method_rejected() {
        let text = r#"[{
            "fqdn": "example.com",
            "credential": {
                "realm": "example.com",
                "imsi": "310026",
                "eap_method": { "method": "TTLS" }
            }
        }]"#;
        assert!(parse_profiles(text).is_err());
    }

    #[test]
    fn test_bad_json() {
        let err = parse_profiles("{").unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::Io);
    }

    #[test]
    fn test_missing_file() {
        let err = parse_profiles_from_file("/nonexistent/profiles.json").unwrap_err();
        assert!(matches!(err, AnqpError::ParseError(_)));
    }
}
