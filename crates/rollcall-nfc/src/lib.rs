//! NDEF message model, parser and encoder for the tags used to mark
//! attendance

pub mod encoder;
pub mod header;
pub mod message;
pub mod ndef_type;
pub mod parser;
pub mod payload;
pub mod record;

use tracing::debug;

pub use message::NdefMessage;
pub use record::NdefRecord;

/// Language code written into text records
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdefError {
    #[error("unable to parse NDEF message: {0}")]
    Parse(String),

    #[error("language code is {0} bytes, at most 63 are allowed")]
    LanguageTooLong(usize),

    #[error("record {field} is {length} bytes, too large to encode")]
    FieldTooLarge { field: &'static str, length: usize },
}

pub type Error = NdefError;
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Decode a complete NDEF message, bytes after the final record are ignored
pub fn parse_message(bytes: &[u8]) -> Result<NdefMessage> {
    let mut input = parser::stream::new(bytes);

    let records = parser::parse_ndef_message(&mut input)
        .map_err(|error| NdefError::Parse(format!("{error:?}")))?;

    if !input.is_empty() {
        debug!("ignoring {} bytes after the last NDEF record", input.len());
    }

    Ok(NdefMessage::from(records))
}

pub fn encode_message(message: &NdefMessage) -> Result<Vec<u8>> {
    encoder::encode_message(message)
}

/// Format a tag UID the way browsers report serial numbers, `04:a2:5b:...`
pub fn serial_number(uid: &[u8]) -> String {
    uid.iter().map(|byte| hex::encode([*byte])).collect::<Vec<_>>().join(":")
}
