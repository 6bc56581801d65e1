// SPDX-License-Identifier: Apache-2.0

//! UTF-8 sequence decoding.

use crate::ParseError;

/// Continuation byte template: `10xxxxxx`
const SEQ_BYTE: u8 = 0x80;
const SEQ_MASK: u8 = 0xC0;

/// (template, mask) for lead bytes of 1, 2, 3 and 4 byte sequences.
const LEAD_BYTES: [(u8, u8); 4] = [
    (0x00, 0x80), // 0xxxxxxx
    (0xC0, 0xE0), // 110xxxxx
    (0xE0, 0xF0), // 1110xxxx
    (0xF0, 0xF8), // 11110xxx
];

/// Smallest code point that needs a sequence of 1, 2, 3 and 4 bytes.
const MIN_VALUES: [u32; 4] = [0, 0x80, 0x800, 0x10000];

/// Length of the UTF-8 sequence introduced by `lead`, or `None` if `lead`
/// cannot start a sequence.
pub fn seq_length(lead: u8) -> Option<usize> {
    LEAD_BYTES
        .iter()
        .position(|&(template, mask)| lead & mask == template)
        .map(|index| index + 1)
}

/// Decode one complete UTF-8 sequence whose length was given by [`seq_length`].
///
/// Continuation bytes must match the `10xxxxxx` template. Overlong forms,
/// encoded surrogates and values above U+10FFFF are rejected.
pub fn decode(seq: &[u8]) -> Result<u32, ParseError> {
    let (&lead, rest) = seq.split_first().ok_or(ParseError::InvalidEncoding)?;
    let (_, mask) = LEAD_BYTES
        .get(seq.len() - 1)
        .copied()
        .ok_or(ParseError::InvalidEncoding)?;

    let mut result = u32::from(lead & !mask);
    for &byte in rest {
        if byte & SEQ_MASK != SEQ_BYTE {
            return Err(ParseError::InvalidEncoding);
        }
        result = (result << 6) | u32::from(byte & !SEQ_MASK);
    }

    let min = MIN_VALUES.get(seq.len() - 1).copied().unwrap_or(u32::MAX);
    if result < min || (0xD800..=0xDFFF).contains(&result) || result > 0x10FFFF {
        return Err(ParseError::InvalidEncoding);
    }
    Ok(result)
}
