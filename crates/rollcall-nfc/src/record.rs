use crate::{
    header::NdefHeader,
    ndef_type::NdefType,
    payload::{NdefPayload, TextPayload, TextPayloadFormat},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    pub header: NdefHeader,
    pub type_: Vec<u8>,
    pub id: Option<Vec<u8>>,
    pub payload: NdefPayload,
}

impl NdefRecord {
    /// Well-known text record (`T`), UTF-8 encoded
    pub fn text(text: impl Into<String>, language: impl Into<String>) -> Self {
        let payload = NdefPayload::Text(TextPayload {
            format: TextPayloadFormat::Utf8,
            language: language.into(),
            text: text.into(),
        });

        Self::new(NdefType::WellKnown, b"T".to_vec(), payload)
    }

    /// Well-known URI record (`U`)
    pub fn uri(uri: impl Into<String>) -> Self {
        Self::new(NdefType::WellKnown, b"U".to_vec(), NdefPayload::Uri(uri.into()))
    }

    /// Mime record carrying opaque bytes
    pub fn mime(mime_type: &str, data: Vec<u8>) -> Self {
        Self::new(NdefType::Mime, mime_type.as_bytes().to_vec(), NdefPayload::Data(data))
    }

    fn new(type_name_format: NdefType, type_: Vec<u8>, payload: NdefPayload) -> Self {
        // flags and lengths are recomputed on encode
        let header = NdefHeader {
            message_begin: true,
            message_end: true,
            chunked: false,
            short_record: true,
            has_id_length: false,
            type_name_format,
            type_length: type_.len() as u8,
            payload_length: 0,
            id_length: None,
        };

        Self { header, type_, id: None, payload }
    }

    /// The record type as a string, `T`, `U`, `text/plain`, etc.
    pub fn record_type(&self) -> Option<&str> {
        std::str::from_utf8(&self.type_).ok()
    }

    pub fn is_text(&self) -> bool {
        matches!(self.payload, NdefPayload::Text(_))
    }
}
