// SPDX-License-Identifier: Apache-2.0

//! Conversion of number token text into value payloads.
//!
//! The integer width and the treatment of float literals are chosen with
//! Cargo features, see `config_check.rs`.

use crate::ParseError;

#[cfg(feature = "int32")]
use crate::int_parser::parse_decimal_i32 as parse_decimal;
#[cfg(feature = "int64")]
use crate::int_parser::parse_decimal_i64 as parse_decimal;

/// The integer type carried by [`Value::Int`](crate::Value::Int).
#[cfg(feature = "int32")]
pub type Int = i32;
/// The integer type carried by [`Value::Int`](crate::Value::Int).
#[cfg(feature = "int64")]
pub type Int = i64;

/// A decoded number literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(Int),
    #[cfg(feature = "float")]
    Float(f64),
}

/// Parse the text of an integer token.
pub(crate) fn parse_integer(text: &str) -> Result<Number, ParseError> {
    parse_decimal(text.as_bytes()).map(Number::Int)
}

/// Parse the text of a float token.
#[cfg(feature = "float")]
pub(crate) fn parse_float(text: &str) -> Result<Number, ParseError> {
    use core::str::FromStr;

    match f64::from_str(text) {
        Ok(val) if val.is_finite() => Ok(Number::Float(val)),
        Ok(_) => Err(ParseError::NumericOverflow),
        Err(_) => Err(ParseError::InvalidNumber),
    }
}

/// Parse the text of a float token when float support is disabled.
#[cfg(not(feature = "float"))]
pub(crate) fn parse_float(text: &str) -> Result<Number, ParseError> {
    #[cfg(feature = "float-error")]
    {
        let _ = text;
        Err(ParseError::FloatNotAllowed)
    }
    #[cfg(feature = "float-truncate")]
    {
        // Evaluating an exponent needs float math
        if text.contains(['e', 'E']) {
            return Err(ParseError::InvalidNumber);
        }
        let int_part = match text.find('.') {
            Some(dot_pos) => text.get(..dot_pos).unwrap_or(text),
            None => text,
        };
        let truncated = parse_decimal(int_part.as_bytes())?;
        Ok(Number::Int(truncated))
    }
}
