//! NAI Realm element, IEEE 802.11 section 9.4.5.10.

use crate::codec::{ByteReader, Encoding};
use crate::element::eap::EapMethod;
use crate::error::Result;
use crate::types::AuthMatch;

/// One NAI Realm Data record: realm names and the EAP methods they accept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaiRealmData {
    realms: Vec<String>,
    eap_methods: Vec<EapMethod>,
}

impl NaiRealmData {
    pub fn new(realms: Vec<String>, eap_methods: Vec<EapMethod>) -> Self {
        Self {
            realms,
            eap_methods,
        }
    }

    /// Parse one record, bounded by its own 2-byte length field
    pub fn parse(reader: &mut ByteReader<'_>) -> Result<Self> {
        let length = reader.read_u16_le("NAI realm data length")? as usize;
        let mut body = reader.sub_reader(length, "NAI realm data")?;

        let encoding = Encoding::from_flags(body.read_u8("NAI realm encoding")?);
        let realm = body.read_prefixed_string(1, encoding, "NAI realm")?;
        let realms = realm
            .split(';')
            .filter(|r| !r.is_empty())
            .map(String::from)
            .collect();

        let method_count = body.read_u8("EAP method count")? as usize;
        let mut eap_methods = Vec::with_capacity(method_count);
        for _ in 0..method_count {
            eap_methods.push(EapMethod::parse(&mut body)?);
        }

        Ok(Self {
            realms,
            eap_methods,
        })
    }

    pub fn realms(&self) -> &[String] {
        &self.realms
    }

    pub fn eap_methods(&self) -> &[EapMethod] {
        &self.eap_methods
    }

    /// Match a credential's EAP method against the methods of this record.
    ///
    /// A record without EAP methods only vouches for the realm.
    pub fn match_eap_methods(&self, credential_method: &EapMethod) -> AuthMatch {
        if self.eap_methods.is_empty() {
            return AuthMatch::RealmOnly;
        }
        self.eap_methods
            .iter()
            .filter(|m| m.method == credential_method.method)
            .map(|m| m.match_auth_params(credential_method))
            .max()
            .unwrap_or(AuthMatch::None)
    }
}

/// NAI Realm ANQP element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NaiRealmElement {
    realm_data: Vec<NaiRealmData>,
}

impl NaiRealmElement {
    pub fn new(realm_data: Vec<NaiRealmData>) -> Self {
        Self { realm_data }
    }

    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(payload);
        if reader.is_empty() {
            return Ok(Self::default());
        }
        let count = reader.read_u16_le("NAI realm count")? as usize;
        let mut realm_data = Vec::with_capacity(count.min(payload.len()));
        for _ in 0..count {
            realm_data.push(NaiRealmData::parse(&mut reader)?);
        }
        Ok(Self { realm_data })
    }

    /// Records in the order they were advertised
    pub fn realm_data(&self) -> &[NaiRealmData] {
        &self.realm_data
    }
}
