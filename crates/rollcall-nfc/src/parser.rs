pub mod stream;

use stream::Stream;
use winnow::{
    ModalResult, Parser,
    binary::{
        Endianness, be_u8,
        bits::{bits, bool as take_bool, take as take_bits},
    },
    error::{ContextError, ErrMode},
    token::{any, take},
};

use crate::{
    header::NdefHeader,
    ndef_type::NdefType,
    payload::{NdefPayload, TextPayload, TextPayloadFormat, URI_PREFIXES},
    record::NdefRecord,
};

/// Parse records until one carries the message end flag
pub fn parse_ndef_message(input: &mut Stream<'_>) -> ModalResult<Vec<NdefRecord>> {
    let mut records = Vec::new();

    loop {
        let record = parse_ndef_record.parse_next(input)?;
        let message_end = record.header.message_end;
        records.push(record);

        if message_end || input.is_empty() {
            break;
        }
    }

    Ok(records)
}

pub fn parse_ndef_record(input: &mut Stream<'_>) -> ModalResult<NdefRecord> {
    let header = parse_header.parse_next(input)?;
    let type_ = parse_type(input, header.type_length)?;
    let id = parse_id(input, header.id_length)?;
    let payload = parse_payload(input, &header, &type_)?;

    Ok(NdefRecord { header, type_, id, payload })
}

// private
fn parse_header_byte(input: &mut Stream<'_>) -> ModalResult<(bool, bool, bool, bool, bool, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bits(3_u8),
    ))
    .parse_next(input)
}

fn parse_header(input: &mut Stream<'_>) -> ModalResult<NdefHeader> {
    let (message_begin, message_end, chunked, short_record, has_id_length, type_name_format) =
        parse_header_byte(input)?;

    let type_length = winnow::binary::u8.parse_next(input)?;
    let type_name_format = NdefType::from_bits(type_name_format);

    let payload_length = if short_record {
        any.map(|x: u8| x as u32).parse_next(input)?
    } else {
        winnow::binary::u32(Endianness::Big).parse_next(input)?
    };

    let id_length = if has_id_length { Some(any.parse_next(input)?) } else { None };

    Ok(NdefHeader {
        message_begin,
        message_end,
        chunked,
        short_record,
        has_id_length,
        type_name_format,
        type_length,
        payload_length,
        id_length,
    })
}

fn parse_type(input: &mut Stream<'_>, type_length: u8) -> ModalResult<Vec<u8>> {
    take(type_length as usize).map(|s: &[u8]| s.to_vec()).parse_next(input)
}

fn parse_id(input: &mut Stream<'_>, id_length: Option<u8>) -> ModalResult<Option<Vec<u8>>> {
    if let Some(id_len) = id_length {
        take(id_len as usize).map(|s: &[u8]| Some(s.to_vec())).parse_next(input)
    } else {
        Ok(None)
    }
}

fn parse_payload(
    input: &mut Stream<'_>,
    header: &NdefHeader,
    type_: &[u8],
) -> ModalResult<NdefPayload> {
    let payload_length = header.payload_length;
    let well_known = header.type_name_format == NdefType::WellKnown;

    match type_ {
        b"T" if well_known => parse_text_payload(input, payload_length),
        b"U" if well_known && payload_length > 0 => {
            let prefix_code = be_u8.parse_next(input)?;
            let rest = take(payload_length as usize - 1).parse_next(input)?;
            let prefix = URI_PREFIXES.get(prefix_code as usize).copied().unwrap_or_default();

            Ok(NdefPayload::Uri(format!("{prefix}{}", String::from_utf8_lossy(rest))))
        }
        _ => take(payload_length as usize)
            .map(|s: &[u8]| NdefPayload::Data(s.to_vec()))
            .parse_next(input),
    }
}

fn parse_text_payload(input: &mut Stream<'_>, payload_length: u32) -> ModalResult<NdefPayload> {
    let (is_utf16, language_code_length): (bool, u8) =
        bits::<_, _, ErrMode<ContextError>, _, _>((take_bool, take_bits(7_u8))).parse_next(input)?;

    // status byte plus language code must fit in the payload
    let Some(remaining_length) = payload_length.checked_sub(language_code_length as u32 + 1)
    else {
        return Err(ErrMode::Cut(ContextError::new()));
    };

    let language_code = take(language_code_length as usize).parse_next(input)?;
    let text = take(remaining_length as usize).parse_next(input)?;

    let parsed_text = if is_utf16 {
        String::from_utf16_lossy(
            &text
                .chunks_exact(2)
                .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                .collect::<Vec<u16>>(),
        )
    } else {
        String::from_utf8_lossy(text).to_string()
    };

    let parsed_text = TextPayload {
        format: if is_utf16 { TextPayloadFormat::Utf16 } else { TextPayloadFormat::Utf8 },
        language: String::from_utf8_lossy(language_code).to_string(),
        text: parsed_text,
    };

    Ok(NdefPayload::Text(parsed_text))
}
