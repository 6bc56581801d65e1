// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;

use log::trace;

use crate::char_reader::CharReader;
use crate::encoding::Encoding;
use crate::escape_processor::{EscapeProcessor, UnicodeCollector};
use crate::{ParseError, Reader, Token};

/// Token buffers grow by at least this many bytes at a time.
const TEXT_GROWTH: usize = 32;

/// States of the number recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Num {
    /// After a leading `-`
    Sign,
    /// After a leading `0`, no more integer digits may follow
    LeadingZero,
    BeforeDecimalPoint,
    /// Just after `.`, a digit is required
    Decimal,
    AfterDecimalPoint,
    /// Just after `e` or `E`
    Exponent,
    ExponentSign,
    AfterExponent,
}

impl Num {
    /// Whether the literal may end in this state.
    fn is_complete(self) -> bool {
        matches!(
            self,
            Num::LeadingZero | Num::BeforeDecimalPoint | Num::AfterDecimalPoint | Num::AfterExponent
        )
    }

    /// Next state on `c`, `None` if `c` does not continue the literal.
    fn advance(self, c: char) -> Option<Num> {
        let next = match (self, c) {
            (Num::Sign, '0') => Num::LeadingZero,
            (Num::Sign, '1'..='9') => Num::BeforeDecimalPoint,
            (Num::BeforeDecimalPoint, '0'..='9') => Num::BeforeDecimalPoint,
            (Num::LeadingZero | Num::BeforeDecimalPoint, '.') => Num::Decimal,
            (Num::Decimal | Num::AfterDecimalPoint, '0'..='9') => Num::AfterDecimalPoint,
            (
                Num::LeadingZero | Num::BeforeDecimalPoint | Num::AfterDecimalPoint,
                'e' | 'E',
            ) => Num::Exponent,
            (Num::Exponent, '+' | '-') => Num::ExponentSign,
            (Num::Exponent | Num::ExponentSign | Num::AfterExponent, '0'..='9') => {
                Num::AfterExponent
            }
            _ => return None,
        };
        Some(next)
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Characters allowed right after a number or keyword.
fn is_delimiter(c: char) -> bool {
    is_whitespace(c) || matches!(c, ',' | ':' | '[' | ']' | '{' | '}')
}

/// Splits a character stream into JSON tokens, with one token of lookahead.
///
/// The text of the most recently read token stays available through
/// [`token_text`](Self::token_text) while the next token is peeked: the two
/// live in separate buffers that swap roles on every [`read_token`](Self::read_token).
///
/// After the first error every call returns that same error.
pub struct Lexer<R: Reader> {
    reader: CharReader<R>,
    /// Text of `current`
    current_text: String,
    /// Text of `lookahead`
    lookahead_text: String,
    /// Last token returned by `read_token`
    current: Option<Token>,
    lookahead: Option<Token>,
    unicode: UnicodeCollector,
    error: Option<ParseError>,
}

impl<R: Reader> Lexer<R> {
    /// Create a lexer over `source` with the default buffer size.
    pub fn new(source: R) -> Self {
        Self::from_char_reader(CharReader::new(source))
    }

    /// Create a lexer whose byte buffer holds `capacity` bytes.
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        Self::from_char_reader(CharReader::with_capacity(source, capacity))
    }

    fn from_char_reader(reader: CharReader<R>) -> Self {
        Self {
            reader,
            current_text: String::new(),
            lookahead_text: String::new(),
            current: None,
            lookahead: None,
            unicode: UnicodeCollector::new(),
            error: None,
        }
    }

    /// The encoding detected for the input, once known.
    pub fn encoding(&self) -> Option<Encoding> {
        self.reader.encoding()
    }

    /// Return the next token without consuming it.
    ///
    /// Repeated peeks return the same token and do not touch the text of the
    /// last token read.
    pub fn peek_token(&mut self) -> Result<Token, ParseError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if let Some(token) = self.lookahead {
            return Ok(token);
        }

        match self.scan_token() {
            Ok(token) => {
                self.lookahead = Some(token);
                Ok(token)
            }
            Err(error) => {
                self.error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Consume and return the next token.
    pub fn read_token(&mut self) -> Result<Token, ParseError> {
        let token = self.peek_token()?;
        self.lookahead = None;
        core::mem::swap(&mut self.current_text, &mut self.lookahead_text);
        self.current = Some(token);
        trace!("Token {:?}", token);
        Ok(token)
    }

    /// Text of the token last returned by [`read_token`](Self::read_token),
    /// if it was a string or a number.
    ///
    /// String text has its escapes decoded; number text is the literal as written.
    pub fn token_text(&self) -> Option<&str> {
        match self.current {
            Some(token) if token.has_text() => Some(self.current_text.as_str()),
            _ => None,
        }
    }

    fn scan_token(&mut self) -> Result<Token, ParseError> {
        let Self {
            reader,
            lookahead_text: text,
            unicode,
            ..
        } = self;
        text.clear();

        let c = loop {
            match read_scalar(reader)? {
                None => return Ok(Token::EndOfFile),
                Some(c) if is_whitespace(c) => continue,
                Some(c) => break c,
            }
        };

        let token = match c {
            '[' => Token::BeginArray,
            ']' => Token::EndArray,
            '{' => Token::BeginObject,
            '}' => Token::EndObject,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '"' => {
                unicode.reset_all();
                scan_string(reader, text, unicode)?
            }
            't' => scan_keyword(reader, "rue", Token::True)?,
            'f' => scan_keyword(reader, "alse", Token::False)?,
            'n' => scan_keyword(reader, "ull", Token::Null)?,
            '-' | '0'..='9' => scan_number(reader, text, c)?,
            other => return Err(ParseError::UnexpectedCharacter(other as u32)),
        };
        Ok(token)
    }
}

/// Read a code point that must be a Unicode scalar value.
fn read_scalar<R: Reader>(reader: &mut CharReader<R>) -> Result<Option<char>, ParseError> {
    match reader.read_char()? {
        Some(cp) => char::from_u32(cp)
            .map(Some)
            .ok_or(ParseError::InvalidCodepoint(cp)),
        None => Ok(None),
    }
}

/// Append `c` to token text, growing the buffer in steps.
fn push_text(text: &mut String, c: char) -> Result<(), ParseError> {
    if text.capacity() - text.len() < c.len_utf8() {
        text.try_reserve(TEXT_GROWTH)?;
    }
    text.push(c);
    Ok(())
}

fn scan_keyword<R: Reader>(
    reader: &mut CharReader<R>,
    rest: &str,
    token: Token,
) -> Result<Token, ParseError> {
    for expected in rest.chars() {
        match reader.read_char() {
            Ok(Some(cp)) if cp == expected as u32 => {}
            Ok(_) | Err(ParseError::EndOfFile) => return Err(ParseError::InvalidKeyword),
            Err(e) => return Err(e),
        }
    }
    end_literal(reader, ParseError::InvalidKeyword)?;
    Ok(token)
}

/// Check what follows a number or keyword, leaving it unread.
fn end_literal<R: Reader>(reader: &mut CharReader<R>, error: ParseError) -> Result<(), ParseError> {
    match read_scalar(reader)? {
        Some(c) if is_delimiter(c) => {
            reader.unread_char(c as u32);
            Ok(())
        }
        Some(_) => Err(error),
        None => Ok(()),
    }
}

fn scan_number<R: Reader>(
    reader: &mut CharReader<R>,
    text: &mut String,
    first: char,
) -> Result<Token, ParseError> {
    let mut state = match first {
        '-' => Num::Sign,
        '0' => Num::LeadingZero,
        _ => Num::BeforeDecimalPoint,
    };
    let mut is_float = false;
    push_text(text, first)?;

    loop {
        let Some(c) = read_scalar(reader)? else {
            break;
        };
        match state.advance(c) {
            Some(next) => {
                is_float |= matches!(next, Num::Decimal | Num::Exponent);
                state = next;
                push_text(text, c)?;
            }
            None => {
                reader.unread_char(c as u32);
                break;
            }
        }
    }

    if !state.is_complete() {
        return Err(ParseError::InvalidNumber);
    }
    // Rejects `01` and `1x` alike
    end_literal(reader, ParseError::InvalidNumber)?;

    Ok(if is_float { Token::Float } else { Token::Integer })
}

fn scan_string<R: Reader>(
    reader: &mut CharReader<R>,
    text: &mut String,
    unicode: &mut UnicodeCollector,
) -> Result<Token, ParseError> {
    let utf16 = matches!(
        reader.encoding(),
        Some(Encoding::Utf16Le | Encoding::Utf16Be)
    );
    loop {
        let cp = read_string_char(reader)?;
        let decoded = match cp {
            0x22 => {
                // Closing quote
                unicode.finish()?;
                return Ok(Token::String);
            }
            0x5C => {
                let escaped = read_escape(reader, unicode)?;
                unicode.accept(escaped)?
            }
            cp if cp < 0x20 => return Err(ParseError::UnescapedControlCharacter),
            cp => unicode.accept_raw(cp, utf16)?,
        };
        if let Some(c) = decoded {
            push_text(text, c)?;
        }
    }
}

/// Read one code point inside a string, where end of input is unterminated.
fn read_string_char<R: Reader>(reader: &mut CharReader<R>) -> Result<u32, ParseError> {
    match reader.read_char() {
        Ok(Some(cp)) => Ok(cp),
        Ok(None) | Err(ParseError::EndOfFile) => Err(ParseError::UnterminatedString),
        Err(e) => Err(e),
    }
}

/// Decode the escape after a backslash into the code point it stands for.
fn read_escape<R: Reader>(
    reader: &mut CharReader<R>,
    unicode: &mut UnicodeCollector,
) -> Result<u32, ParseError> {
    let escape = read_string_char(reader)?;
    let escape = char::from_u32(escape).ok_or(ParseError::InvalidEscapeSequence)?;
    if escape != 'u' {
        return EscapeProcessor::process_simple_escape(escape).map(u32::from);
    }
    loop {
        let digit = read_string_char(reader)?;
        if let Some(cp) = unicode.add_hex_digit(digit)? {
            return Ok(cp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChunkReader;
    use alloc::vec::Vec;

    fn lexer(json: &str) -> Lexer<ChunkReader<'_>> {
        Lexer::new(ChunkReader::full_slice(json.as_bytes()))
    }

    /// Read every token up to end of file, with its text.
    fn tokens(json: &str) -> Result<Vec<(Token, Option<String>)>, ParseError> {
        let mut lexer = lexer(json);
        let mut out = Vec::new();
        loop {
            let token = lexer.read_token()?;
            if token == Token::EndOfFile {
                return Ok(out);
            }
            out.push((token, lexer.token_text().map(String::from)));
        }
    }

    fn text(s: &str) -> Option<String> {
        Some(String::from(s))
    }

    #[test_log::test]
    fn test_object_token_sequence() {
        let expected = [
            (Token::BeginObject, None),
            (Token::String, text("a")),
            (Token::Colon, None),
            (Token::Integer, text("1")),
            (Token::Comma, None),
            (Token::String, text("b")),
            (Token::Colon, None),
            (Token::BeginArray, None),
            (Token::True, None),
            (Token::Comma, None),
            (Token::Null, None),
            (Token::EndArray, None),
            (Token::EndObject, None),
        ];
        assert_eq!(tokens(r#"{"a":1,"b":[true,null]}"#).unwrap(), expected);
        assert_eq!(
            tokens(" {\n\t\"a\" : 1 ,\r\n \"b\": [ true , null ] } ").unwrap(),
            expected
        );
    }

    #[test_log::test]
    fn test_escapes() {
        assert_eq!(
            tokens(r#""\u0041\n""#).unwrap(),
            [(Token::String, text("A\n"))]
        );
        assert_eq!(
            tokens(r#""\ud83d\ude00""#).unwrap(),
            [(Token::String, text("😀"))]
        );
        assert_eq!(
            tokens(r#""\"\\\/\b\f\n\r\t""#).unwrap(),
            [(Token::String, text("\"\\/\u{08}\u{0C}\n\r\t"))]
        );
        assert_eq!(
            tokens(r#""😀 é""#).unwrap(),
            [(Token::String, text("😀 é"))]
        );
    }

    #[test_log::test]
    fn test_string_errors() {
        assert_eq!(tokens(r#""\x""#), Err(ParseError::InvalidEscapeSequence));
        assert_eq!(tokens(r#""\u00g1""#), Err(ParseError::InvalidUnicodeHex));
        assert_eq!(tokens(r#""\ud83d""#), Err(ParseError::InvalidUnicodeCodepoint));
        assert_eq!(tokens(r#""\ude00""#), Err(ParseError::InvalidUnicodeCodepoint));
        assert_eq!(tokens(r#""abc"#), Err(ParseError::UnterminatedString));
        assert_eq!(tokens(r#""ab\"#), Err(ParseError::UnterminatedString));
        assert_eq!(tokens(r#""\u00"#), Err(ParseError::UnterminatedString));
        assert_eq!(tokens("\"a\nb\""), Err(ParseError::UnescapedControlCharacter));
    }

    #[test_log::test]
    fn test_numbers() {
        assert_eq!(
            tokens("0 -0 12 -3.25 1e5 2E-3 0.5e+2").unwrap(),
            [
                (Token::Integer, text("0")),
                (Token::Integer, text("-0")),
                (Token::Integer, text("12")),
                (Token::Float, text("-3.25")),
                (Token::Float, text("1e5")),
                (Token::Float, text("2E-3")),
                (Token::Float, text("0.5e+2")),
            ]
        );
        // Terminating character is left for the next token
        assert_eq!(
            tokens("[1,-2]").unwrap(),
            [
                (Token::BeginArray, None),
                (Token::Integer, text("1")),
                (Token::Comma, None),
                (Token::Integer, text("-2")),
                (Token::EndArray, None),
            ]
        );
    }

    #[test_log::test]
    fn test_invalid_numbers() {
        for json in ["-", "01", "1.", "1.e3", "1e", "1e+", "-a", "12abc", ".5", "1.5.2"] {
            let result = tokens(json);
            assert!(
                matches!(
                    result,
                    Err(ParseError::InvalidNumber | ParseError::UnexpectedCharacter(_))
                ),
                "{json}: {result:?}"
            );
        }
        assert_eq!(tokens("01"), Err(ParseError::InvalidNumber));
        assert_eq!(tokens("1.e3"), Err(ParseError::InvalidNumber));
    }

    #[test_log::test]
    fn test_keywords() {
        assert_eq!(
            tokens("true false null").unwrap(),
            [(Token::True, None), (Token::False, None), (Token::Null, None)]
        );
        assert_eq!(tokens("tru"), Err(ParseError::InvalidKeyword));
        assert_eq!(tokens("nul1"), Err(ParseError::InvalidKeyword));
        assert_eq!(tokens("falsey"), Err(ParseError::InvalidKeyword));
    }

    #[test_log::test]
    fn test_unexpected_character() {
        assert_eq!(tokens("[x]"), Err(ParseError::UnexpectedCharacter('x' as u32)));
        assert_eq!(tokens("'a'"), Err(ParseError::UnexpectedCharacter('\'' as u32)));
    }

    #[test_log::test]
    fn test_peek_is_idempotent() {
        let mut lexer = lexer(r#""first" "second""#);
        assert_eq!(lexer.read_token(), Ok(Token::String));
        assert_eq!(lexer.token_text(), Some("first"));

        assert_eq!(lexer.peek_token(), Ok(Token::String));
        assert_eq!(lexer.peek_token(), Ok(Token::String));
        // Peeking does not disturb the text of the token already read
        assert_eq!(lexer.token_text(), Some("first"));

        assert_eq!(lexer.read_token(), Ok(Token::String));
        assert_eq!(lexer.token_text(), Some("second"));
        assert_eq!(lexer.read_token(), Ok(Token::EndOfFile));
        assert_eq!(lexer.read_token(), Ok(Token::EndOfFile));
        assert_eq!(lexer.token_text(), None);
    }

    #[test_log::test]
    fn test_errors_are_sticky() {
        let mut lexer = lexer("[?]");
        assert_eq!(lexer.read_token(), Ok(Token::BeginArray));
        let error = ParseError::UnexpectedCharacter('?' as u32);
        assert_eq!(lexer.peek_token(), Err(error.clone()));
        assert_eq!(lexer.read_token(), Err(error.clone()));
        assert_eq!(lexer.read_token(), Err(error));
    }

    #[test_log::test]
    fn test_long_string_grows_buffer() {
        let long: String = core::iter::repeat('x').take(1000).collect();
        let json = alloc::format!("\"{long}\"");
        let mut lexer = Lexer::with_capacity(ChunkReader::new(json.as_bytes(), 7), 16);
        assert_eq!(lexer.read_token(), Ok(Token::String));
        assert_eq!(lexer.token_text(), Some(long.as_str()));
    }

    #[test_log::test]
    fn test_utf16_surrogates_in_string() {
        // "😀" as UTF-16LE after a byte order mark: quote, D83D, DE00, quote
        let bytes = [0xFF, 0xFE, 0x22, 0x00, 0x3D, 0xD8, 0x00, 0xDE, 0x22, 0x00];
        let mut lexer = Lexer::new(ChunkReader::full_slice(&bytes));
        assert_eq!(lexer.read_token(), Ok(Token::String));
        assert_eq!(lexer.token_text(), Some("😀"));
        assert_eq!(lexer.encoding(), Some(Encoding::Utf16Le));
    }

    #[test_log::test]
    fn test_utf32_surrogates_in_string() {
        // UTF-32LE quote, D83D, DE00, quote
        let bytes = [
            0x22, 0x00, 0x00, 0x00, 0x3D, 0xD8, 0x00, 0x00, 0x00, 0xDE, 0x00, 0x00, 0x22, 0x00,
            0x00, 0x00,
        ];
        let mut lexer = Lexer::new(ChunkReader::full_slice(&bytes));
        assert_eq!(lexer.read_token(), Err(ParseError::InvalidCodepoint(0xD83D)));
        assert_eq!(lexer.encoding(), Some(Encoding::Utf32Le));
    }

    #[test_log::test]
    fn test_invalid_codepoint_outside_string() {
        // UTF-32LE space, then 0x110000 where a token should start
        let bytes = [0x20, 0x00, 0x00, 0x00, 0x00, 0x00, 0x11, 0x00];
        let mut lexer = Lexer::new(ChunkReader::full_slice(&bytes));
        assert_eq!(lexer.read_token(), Err(ParseError::InvalidCodepoint(0x110000)));
    }
}
