use crate::{
    Error, Result,
    header::NdefHeader,
    message::NdefMessage,
    payload::{NdefPayload, TextPayloadFormat, split_uri_prefix},
    record::NdefRecord,
};

/// Largest language code a text record status byte can describe
const MAX_LANGUAGE_LENGTH: usize = 0b0011_1111;

const UTF16_FLAG: u8 = 0b1000_0000;

pub fn encode_message(message: &NdefMessage) -> Result<Vec<u8>> {
    let records = message.records();
    let last = records.len().saturating_sub(1);
    let mut bytes = Vec::new();

    for (index, record) in records.iter().enumerate() {
        encode_record(record, index == 0, index == last, &mut bytes)?;
    }

    Ok(bytes)
}

fn encode_record(
    record: &NdefRecord,
    message_begin: bool,
    message_end: bool,
    out: &mut Vec<u8>,
) -> Result<()> {
    let payload = encode_payload(&record.payload)?;

    let type_length = u8::try_from(record.type_.len())
        .map_err(|_| Error::FieldTooLarge { field: "type", length: record.type_.len() })?;

    let id_length = match &record.id {
        Some(id) => Some(
            u8::try_from(id.len())
                .map_err(|_| Error::FieldTooLarge { field: "id", length: id.len() })?,
        ),
        None => None,
    };

    let payload_length = u32::try_from(payload.len())
        .map_err(|_| Error::FieldTooLarge { field: "payload", length: payload.len() })?;

    let short_record = payload_length <= u8::MAX as u32;

    let header = NdefHeader {
        message_begin,
        message_end,
        chunked: false,
        short_record,
        has_id_length: id_length.is_some(),
        type_name_format: record.header.type_name_format,
        type_length,
        payload_length,
        id_length,
    };

    out.push(header.first_byte());
    out.push(type_length);

    if short_record {
        out.push(payload_length as u8);
    } else {
        out.extend_from_slice(&payload_length.to_be_bytes());
    }

    if let Some(id_length) = id_length {
        out.push(id_length);
    }

    out.extend_from_slice(&record.type_);

    if let Some(id) = &record.id {
        out.extend_from_slice(id);
    }

    out.extend_from_slice(&payload);
    Ok(())
}

fn encode_payload(payload: &NdefPayload) -> Result<Vec<u8>> {
    match payload {
        NdefPayload::Text(text) => {
            let language = text.language.as_bytes();
            if language.len() > MAX_LANGUAGE_LENGTH {
                return Err(Error::LanguageTooLong(language.len()));
            }

            let mut status = language.len() as u8;
            let encoded = match text.format {
                TextPayloadFormat::Utf8 => text.text.as_bytes().to_vec(),
                TextPayloadFormat::Utf16 => {
                    status |= UTF16_FLAG;
                    text.text.encode_utf16().flat_map(u16::to_be_bytes).collect()
                }
            };

            let mut bytes = Vec::with_capacity(1 + language.len() + encoded.len());
            bytes.push(status);
            bytes.extend_from_slice(language);
            bytes.extend_from_slice(&encoded);
            Ok(bytes)
        }

        NdefPayload::Uri(uri) => {
            let (code, rest) = split_uri_prefix(uri);
            let mut bytes = Vec::with_capacity(1 + rest.len());
            bytes.push(code);
            bytes.extend_from_slice(rest.as_bytes());
            Ok(bytes)
        }

        NdefPayload::Data(data) => Ok(data.clone()),
    }
}
