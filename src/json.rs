//! JSON text encoding for serialized records.
//!
//! By default `/` is written as `\/` and everything outside ASCII as `\uXXXX`
//! escapes, so the output is plain 7-bit text safe to embed anywhere. The
//! [`JsonOptions`] flags turn either escaping off, or switch to the 4-space
//! indented pretty form.

use std::io;

use bitflags::bitflags;
use serde::Serialize;
use serde_json::ser::{CharEscape, CompactFormatter, Formatter, PrettyFormatter};

use crate::error::Result;

bitflags! {
    /// Encoding options for [`encode`]. Combine with bitwise OR:
    /// `JsonOptions::PRETTY_PRINT | JsonOptions::UNESCAPED_SLASHES`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct JsonOptions: u8 {
        const PRETTY_PRINT = 1 << 0;
        const UNESCAPED_SLASHES = 1 << 1;
        const UNESCAPED_UNICODE = 1 << 2;
    }
}

const INDENT: &[u8] = b"    ";

/// Wraps a serde_json formatter and applies the slash/unicode escaping.
struct Escaping<F> {
    inner: F,
    options: JsonOptions,
}

impl<F: Formatter> Escaping<F> {
    fn write_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let escape_slashes = !self.options.contains(JsonOptions::UNESCAPED_SLASHES);
        let escape_unicode = !self.options.contains(JsonOptions::UNESCAPED_UNICODE);
        let mut start = 0;
        for (index, c) in fragment.char_indices() {
            let escaped = (escape_slashes && c == '/') || (escape_unicode && !c.is_ascii());
            if !escaped {
                continue;
            }
            if start < index {
                self.inner.write_string_fragment(writer, &fragment[start..index])?;
            }
            if c == '/' {
                writer.write_all(b"\\/")?;
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
            start = index + c.len_utf8();
        }
        if start < fragment.len() {
            self.inner.write_string_fragment(writer, &fragment[start..])?;
        }
        Ok(())
    }
}

// Everything but string fragments goes straight to the wrapped formatter.
impl<F: Formatter> Formatter for Escaping<F> {
    fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        self.write_fragment(writer, fragment)
    }
    fn write_char_escape<W: ?Sized + io::Write>(&mut self, writer: &mut W, char_escape: CharEscape) -> io::Result<()> {
        self.inner.write_char_escape(writer, char_escape)
    }
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }
    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }
    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }
    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }
    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }
    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }
    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }
    fn end_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_key(writer)
    }
    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }
    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}

fn write<T: Serialize + ?Sized, F: Formatter>(value: &T, inner: F, options: JsonOptions) -> Result<String> {
    let mut out = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, Escaping { inner, options });
    value.serialize(&mut serializer)?;
    // both formatters only ever emit UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Encodes `value` as JSON text according to `options`.
pub fn encode<T: Serialize + ?Sized>(value: &T, options: JsonOptions) -> Result<String> {
    if options.contains(JsonOptions::PRETTY_PRINT) {
        write(value, PrettyFormatter::with_indent(INDENT), options)
    } else {
        write(value, CompactFormatter, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compact_escapes_slashes_and_unicode() {
        let value = json!({"path": "a/b", "name": "Zoë", "emoji": "😀"});
        assert_eq!(
            encode(&value, JsonOptions::empty()).unwrap(),
            r#"{"path":"a\/b","name":"Zo\u00eb","emoji":"\ud83d\ude00"}"#
        );
    }

    #[test]
    fn unescaped_flags() {
        let value = json!({"path": "a/b", "name": "Zoë"});
        let options = JsonOptions::UNESCAPED_SLASHES | JsonOptions::UNESCAPED_UNICODE;
        assert_eq!(encode(&value, options).unwrap(), r#"{"path":"a/b","name":"Zoë"}"#);
    }

    #[test]
    fn control_characters_keep_standard_escapes() {
        let value = json!({"text": "line\n\"quoted\"\t/"});
        assert_eq!(
            encode(&value, JsonOptions::empty()).unwrap(),
            r#"{"text":"line\n\"quoted\"\t\/"}"#
        );
    }

    #[test]
    fn pretty_print_uses_four_spaces() {
        let value = json!({"outer": {"inner": [1, 2]}, "empty": {}});
        assert_eq!(
            encode(&value, JsonOptions::PRETTY_PRINT).unwrap(),
            "{\n    \"outer\": {\n        \"inner\": [\n            1,\n            2\n        ]\n    },\n    \"empty\": {}\n}"
        );
    }
}
