// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF text string encoding and decoding for bookmark titles.

use lopdf::{Document, Object, StringFormat};

/// Decode a PDF text string, following one level of indirection.
///
/// UTF-16BE with BOM, then UTF-8 (with or without BOM), then Latin-1.
pub(crate) fn decode_text_string(document: &Document, object: &Object) -> Option<String> {
    let object = match object {
        Object::Reference(id) => document.get_object(*id).ok()?,
        other => other,
    };
    match object {
        Object::String(bytes, _) => Some(decode_bytes(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

fn decode_bytes(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Encode a title: ASCII as a literal string, anything else as UTF-16BE.
pub(crate) fn encode_text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf16_with_bom() {
        let doc = Document::with_version("1.5");
        let encoded = encode_text_string("Kapitel Ü");
        assert_eq!(decode_text_string(&doc, &encoded).as_deref(), Some("Kapitel Ü"));
    }

    #[test]
    fn falls_back_to_latin1() {
        let doc = Document::with_version("1.5");
        let latin1 = Object::String(vec![0x43, 0x61, 0x66, 0xE9], StringFormat::Literal);
        assert_eq!(decode_text_string(&doc, &latin1).as_deref(), Some("Café"));
    }

    #[test]
    fn follows_reference() {
        let mut doc = Document::with_version("1.5");
        let id = doc.add_object(Object::string_literal("Indirect"));
        assert_eq!(
            decode_text_string(&doc, &Object::Reference(id)).as_deref(),
            Some("Indirect")
        );
    }

    #[test]
    fn non_string_is_none() {
        let doc = Document::with_version("1.5");
        assert!(decode_text_string(&doc, &Object::Integer(3)).is_none());
    }
}
