// SPDX-License-Identifier: Apache-2.0

// Panic-free base-10 integer parsing, shaped after core::num's radix parser

use crate::ParseError;

/// Generates a const parser for one signed integer width.
///
/// The lexer has already checked JSON number grammar, so the only failures
/// left to report are an empty digit run and overflow.
macro_rules! define_decimal_parser {
    ($fn_name:ident, $int_ty:ty) => {
        #[doc = concat!("Parses ASCII decimal digits with an optional leading `-` into an `", stringify!($int_ty), "`.")]
        pub const fn $fn_name(src: &[u8]) -> Result<$int_ty, ParseError> {
            let (is_negative, mut digits) = match src {
                [b'-', rest @ ..] => (true, rest),
                _ => (false, src),
            };

            if digits.is_empty() {
                return Err(ParseError::InvalidNumber);
            }

            let mut result: $int_ty = 0;

            while let Some((&byte, rest)) = digits.split_first() {
                let digit = match byte {
                    b'0'..=b'9' => (byte - b'0') as $int_ty,
                    _ => return Err(ParseError::InvalidNumber),
                };

                result = match result.checked_mul(10) {
                    Some(val) => val,
                    None => return Err(ParseError::NumericOverflow),
                };

                // Accumulating negatively reaches MIN without overflowing
                result = if is_negative {
                    match result.checked_sub(digit) {
                        Some(val) => val,
                        None => return Err(ParseError::NumericOverflow),
                    }
                } else {
                    match result.checked_add(digit) {
                        Some(val) => val,
                        None => return Err(ParseError::NumericOverflow),
                    }
                };

                digits = rest;
            }

            Ok(result)
        }
    };
}

#[cfg(feature = "int32")]
define_decimal_parser!(parse_decimal_i32, i32);
#[cfg(feature = "int64")]
define_decimal_parser!(parse_decimal_i64, i64);
