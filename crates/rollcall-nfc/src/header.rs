use crate::ndef_type::NdefType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefHeader {
    pub message_begin: bool,
    pub message_end: bool,
    pub chunked: bool,
    pub short_record: bool,
    pub has_id_length: bool,
    pub type_name_format: NdefType,
    pub type_length: u8,
    pub payload_length: u32,
    pub id_length: Option<u8>,
}

const MESSAGE_BEGIN: u8 = 0b1000_0000;
const MESSAGE_END: u8 = 0b0100_0000;
const CHUNKED: u8 = 0b0010_0000;
const SHORT_RECORD: u8 = 0b0001_0000;
const ID_LENGTH: u8 = 0b0000_1000;

impl NdefHeader {
    /// The flags and type name format packed into the first header byte
    pub fn first_byte(&self) -> u8 {
        let mut byte = self.type_name_format.bits();

        for (set, flag) in [
            (self.message_begin, MESSAGE_BEGIN),
            (self.message_end, MESSAGE_END),
            (self.chunked, CHUNKED),
            (self.short_record, SHORT_RECORD),
            (self.has_id_length, ID_LENGTH),
        ] {
            if set {
                byte |= flag;
            }
        }

        byte
    }
}
