use rollcall_macros::impl_default_for;

use crate::record::NdefRecord;

/// A decoded NDEF message, the ordered records read from or written to a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefMessage {
    records: Vec<NdefRecord>,
}

impl_default_for!(NdefMessage);

impl NdefMessage {
    pub const fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Message holding a single UTF-8 text record
    pub fn text(text: impl Into<String>) -> Self {
        Self::from(vec![NdefRecord::text(text, crate::DEFAULT_LANGUAGE)])
    }

    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }

    pub fn push(&mut self, record: NdefRecord) {
        self.records.push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Text of the first text record, if any
    pub fn first_text(&self) -> Option<&str> {
        self.records.iter().find_map(|record| record.payload.as_text())
    }
}

impl From<Vec<NdefRecord>> for NdefMessage {
    fn from(records: Vec<NdefRecord>) -> Self {
        Self { records }
    }
}

impl IntoIterator for NdefMessage {
    type Item = NdefRecord;
    type IntoIter = std::vec::IntoIter<NdefRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
