use winnow::Bytes;

/// Complete input, a tag hands over the whole message at once
pub type Stream<'i> = &'i Bytes;

pub fn new(b: &[u8]) -> Stream<'_> {
    Bytes::new(b)
}
