//! Language-tagged names: Venue Name and Hotspot 2.0 Operator Friendly Name.

use crate::codec::{ByteReader, Encoding};
use crate::error::{AnqpError, Result};

/// A name tagged with an ISO 639 language code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nName {
    pub language: String,
    pub text: String,
}

impl I18nName {
    /// Parse `[len][lang(3)][text(len-3)]`
    pub fn parse(reader: &mut ByteReader<'_>) -> Result<Self> {
        let len = reader.read_u8("I18N name")? as usize;
        if len < 3 {
            return Err(AnqpError::malformed(
                "I18N name",
                format!("length {} shorter than language code", len),
            ));
        }
        let mut body = reader.sub_reader(len, "I18N name")?;
        let language = body
            .read_string(3, Encoding::Ascii, "I18N language")?
            .trim_end_matches('\0')
            .to_string();
        let text_len = body.remaining();
        let text = body.read_string(text_len, Encoding::Utf8, "I18N text")?;
        Ok(Self { language, text })
    }

    /// Parse names until the payload is exhausted
    pub fn parse_all(reader: &mut ByteReader<'_>) -> Result<Vec<Self>> {
        let mut names = Vec::new();
        while !reader.is_empty() {
            names.push(Self::parse(reader)?);
        }
        Ok(names)
    }
}

/// Venue Name ANQP element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueNameElement {
    pub venue_group: u8,
    pub venue_type: u8,
    pub names: Vec<I18nName>,
}

impl VenueNameElement {
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(payload);
        let venue_group = reader.read_u8("venue info")?;
        let venue_type = reader.read_u8("venue info")?;
        let names = I18nName::parse_all(&mut reader)?;
        Ok(Self {
            venue_group,
            venue_type,
            names,
        })
    }
}

/// Hotspot 2.0 Operator Friendly Name element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FriendlyNameElement {
    pub names: Vec<I18nName>,
}

impl FriendlyNameElement {
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let names = I18nName::parse_all(&mut ByteReader::new(payload))?;
        Ok(Self { names })
    }

    /// Name in the given language, falling back to the first one
    pub fn name_for(&self, language: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|n| n.language.eq_ignore_ascii_case(language))
            .or_else(|| self.names.first())
            .map(|n| n.text.as_str())
    }
}
