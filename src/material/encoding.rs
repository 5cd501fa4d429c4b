//! Candidate text encodings for material files.
//!
//! The loader tries `CANDIDATES` in order and keeps the first one that decodes.
//! The last candidate (Latin-1) maps every byte to a code point, so the list
//! always terminates with a successful decode.

use std::fmt;

use encoding_rs::{UTF_8, WINDOWS_1252};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// Strict UTF-8. A leading BOM stays in the text and is written back as-is.
    Utf8,
    /// Windows Latin code page 1252; rejects the five bytes it leaves undefined.
    Windows1252,
    /// ISO-8859-1, total over bytes.
    Latin1,
}

/// Decode order used by the loader.
pub const CANDIDATES: [TextEncoding; 3] = [
    TextEncoding::Utf8,
    TextEncoding::Windows1252,
    TextEncoding::Latin1,
];

// Bytes without a mapping in the cp1252 code chart.
const CP1252_UNDEFINED: [u8; 5] = [0x81, 0x8D, 0x8F, 0x90, 0x9D];

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Windows1252 => "cp1252",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    /// Decode `bytes` strictly. `None` means this candidate does not apply.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => UTF_8
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|cow| cow.into_owned()),
            TextEncoding::Windows1252 => {
                if bytes.iter().any(|b| CP1252_UNDEFINED.contains(b)) {
                    return None;
                }
                WINDOWS_1252
                    .decode_without_bom_handling_and_without_replacement(bytes)
                    .map(|cow| cow.into_owned())
            }
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Encode `text` exactly. Returns the first character that has no
    /// representation in this encoding as the error.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, char> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Windows1252 => {
                let (bytes, _, had_errors) = WINDOWS_1252.encode(text);
                if had_errors {
                    return Err(first_unmappable(text, |c| {
                        let mut buf = [0u8; 4];
                        !WINDOWS_1252.encode(c.encode_utf8(&mut buf)).2
                    }));
                }
                Ok(bytes.into_owned())
            }
            TextEncoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).map_err(|_| c))
                .collect(),
        }
    }
}

fn first_unmappable(text: &str, representable: impl Fn(char) -> bool) -> char {
    text.chars()
        .find(|&c| !representable(c))
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
