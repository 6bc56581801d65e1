// SPDX-License-Identifier: Apache-2.0

/// Tokens produced by the [`Lexer`](crate::Lexer).
///
/// `Integer`, `Float` and `String` carry text, available from
/// [`Lexer::token_text`](crate::Lexer::token_text) right after the token was read.
/// Lexer failures are reported through `Err(ParseError)` rather than a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `[`
    BeginArray,
    /// `]`
    EndArray,
    /// `{`
    BeginObject,
    /// `}`
    EndObject,
    /// A number without fraction or exponent.
    Integer,
    /// A number with a fraction and/or an exponent.
    Float,
    /// A quoted string, escapes already decoded.
    String,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// No more tokens; input ended between tokens.
    EndOfFile,
}

impl Token {
    /// Whether [`Lexer::token_text`](crate::Lexer::token_text) has text for this token.
    pub fn has_text(&self) -> bool {
        matches!(self, Token::Integer | Token::Float | Token::String)
    }
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Token::BeginArray => "'['",
            Token::EndArray => "']'",
            Token::BeginObject => "'{'",
            Token::EndObject => "'}'",
            Token::Integer => "integer",
            Token::Float => "float",
            Token::String => "string",
            Token::True => "'true'",
            Token::False => "'false'",
            Token::Null => "'null'",
            Token::Comma => "','",
            Token::Colon => "':'",
            Token::EndOfFile => "end of file",
        };
        f.write_str(s)
    }
}
