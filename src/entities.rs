//! HTML named-entity lookup and decoding.
//!
//! Validation during tokenization only needs a membership test; decoding to
//! an actual replacement string is a separate, narrower concern used by
//! downstream consumers of the token stream (not by the tokenizer itself).

use html_escape::NAMED_ENTITIES;
use std::borrow::Cow;

/// Returns true if `name` (without the leading `&` or trailing `;`) is a
/// registered HTML5 named character reference.
pub(crate) fn is_named_entity(name: &str) -> bool {
    NAMED_ENTITIES
        .binary_search_by(|(candidate, _)| (*candidate).cmp(name.as_bytes()))
        .is_ok()
}

/// An entity could not be decoded.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    /// `text` is not a registered named entity.
    #[error("{0:?} is not a registered HTML named entity")]
    UnknownName(String),
    /// `text` did not parse as an integer in the expected base.
    #[error("{0:?} is not a valid {1} character reference")]
    Malformed(String, &'static str),
    /// The parsed code point is out of Unicode's valid range.
    #[error("{0:#x} is not a valid Unicode scalar value")]
    InvalidCodepoint(u32),
}

/// Decodes an already-classified HTML entity payload to its replacement
/// text.
///
/// `text` is the segment tokenized between `HTMLEntityStart`/`HTMLEntityNumeric`/
/// `HTMLEntityHex` and `HTMLEntityEnd` (i.e. a [`crate::Token::Text`]
/// payload from that span) — the digits of a numeric reference, or the bare
/// name of a named one. Unlike the tokenizer, which only ever calls this
/// shape of validation on text it has already shape-checked, this function
/// is meant to be usable on arbitrary input, so it reports a proper error
/// instead of asserting.
pub fn decode(numeric: bool, hexadecimal: bool, text: &str) -> Result<Cow<'static, str>, DecodeError> {
    if numeric {
        let radix = if hexadecimal { 16 } else { 10 };
        let kind = if hexadecimal { "hexadecimal" } else { "decimal" };
        let value = u32::from_str_radix(text, radix)
            .map_err(|_| DecodeError::Malformed(text.to_string(), kind))?;
        let ch = char::from_u32(value).ok_or(DecodeError::InvalidCodepoint(value))?;
        Ok(Cow::Owned(ch.to_string()))
    } else {
        NAMED_ENTITIES
            .binary_search_by(|(candidate, _)| (*candidate).cmp(text.as_bytes()))
            .map(|index| Cow::Borrowed(NAMED_ENTITIES[index].1))
            .map_err(|_| DecodeError::UnknownName(text.to_string()))
    }
}
