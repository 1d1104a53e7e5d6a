use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use xhtmlchardet::detect;

use crate::error::Error;

/// Detect the encoding of XML bytes from a byte order mark or the XML
/// declaration. Falls back to UTF-8.
pub(crate) fn encoding(data: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(data) {
        return encoding;
    }
    let mut cursor = std::io::Cursor::new(data);
    let charsets = detect(&mut cursor, None).unwrap_or_default();
    charsets
        .first()
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// The input encoding of a document and whether it started with a byte
/// order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Decoded {
    pub(crate) encoding: &'static Encoding,
    pub(crate) byte_order_mark: bool,
}

/// Decode XML bytes into a string. The byte order mark, if any, is not part
/// of the string.
pub(crate) fn decode(data: &[u8]) -> Result<(String, Decoded), Error> {
    let encoding = encoding(data);
    let byte_order_mark = Encoding::for_bom(data).is_some();
    let (text, used, had_errors) = encoding.decode(data);
    if had_errors {
        return Err(Error::Encoding(used.name().to_string()));
    }
    Ok((
        text.into_owned(),
        Decoded {
            encoding: used,
            byte_order_mark,
        },
    ))
}

/// Encode a serialized document back into the encoding it was read in.
///
/// UTF-16 output always starts with a byte order mark; other encodings get
/// one only if the input had it.
pub(crate) fn encode(text: &str, decoded: Decoded) -> Result<Vec<u8>, Error> {
    let encoding = decoded.encoding;
    // encoding_rs only encodes into ASCII-compatible encodings
    if encoding == UTF_16LE || encoding == UTF_16BE {
        let little_endian = encoding == UTF_16LE;
        let mut bytes = Vec::with_capacity(2 * (text.len() + 1));
        for unit in std::iter::once(0xFEFF).chain(text.encode_utf16()) {
            if little_endian {
                bytes.extend_from_slice(&unit.to_le_bytes());
            } else {
                bytes.extend_from_slice(&unit.to_be_bytes());
            }
        }
        return Ok(bytes);
    }
    let (bytes, used, had_errors) = encoding.encode(text);
    if had_errors || used != encoding {
        return Err(Error::Encoding(encoding.name().to_string()));
    }
    if decoded.byte_order_mark && encoding == UTF_8 {
        let mut marked = b"\xEF\xBB\xBF".to_vec();
        marked.extend_from_slice(&bytes);
        return Ok(marked);
    }
    Ok(bytes.into_owned())
}
