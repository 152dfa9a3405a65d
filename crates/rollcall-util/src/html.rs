//! Minimal HTML text escaping for string-built fragments

use std::fmt;

/// Wraps text so that its `Display` output is safe inside element content and
/// double-quoted attribute values
#[derive(Debug, Clone, Copy)]
pub struct Escaped<'a>(pub &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut last = 0;

        for (index, byte) in self.0.bytes().enumerate() {
            let entity = match byte {
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'&' => "&amp;",
                b'"' => "&quot;",
                b'\'' => "&#39;",
                _ => continue,
            };

            f.write_str(&self.0[last..index])?;
            f.write_str(entity)?;
            last = index + 1;
        }

        f.write_str(&self.0[last..])
    }
}
