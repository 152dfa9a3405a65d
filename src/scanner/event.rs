use rollcall_nfc::NdefMessage;

use super::NfcError;
use crate::api::types::TagId;

/// A successful tag reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReadEvent {
    /// Serial number assigned by the platform
    pub tag_id: TagId,

    /// First text record on the tag, if any
    pub data: Option<String>,

    pub raw_message: NdefMessage,
}

impl TagReadEvent {
    pub fn from_reading(serial_number: String, message: &[u8]) -> Result<Self, NfcError> {
        // blank tags carry no records
        let raw_message = if message.is_empty() {
            NdefMessage::new()
        } else {
            rollcall_nfc::parse_message(message)
                .map_err(|error| NfcError::InvalidMessage(error.to_string()))?
        };

        let data = raw_message.first_text().map(str::to_string);

        Ok(Self { tag_id: TagId::from(serial_number), data, raw_message })
    }
}
