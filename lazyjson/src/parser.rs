// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;

use log::trace;

use crate::encoding::Encoding;
use crate::lexer::Lexer;
use crate::number::{self, Int, Number};
use crate::value::{Array, Object};
use crate::{ParseError, Reader, Token, Value};

/// A value whose first token was consumed, before it is bound to the parser.
pub(crate) enum Node {
    Null,
    Boolean(bool),
    Int(Int),
    #[cfg(feature = "float")]
    Float(f64),
    String(String),
    Array,
    Object,
}

/// Position of an [`Array`] or [`Object`] cursor among its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cursor {
    /// Nothing consumed after the opening bracket
    First,
    /// At least one child consumed, a separator comes next
    Subsequent,
    /// Closing bracket consumed
    Done,
}

/// A pull parser producing a lazily iterated [`Value`] tree.
///
/// Leaves are decoded when they are returned; arrays and objects are
/// returned as cursors that read their children on demand. A document may
/// hold several top-level values, each returned by its own
/// [`read_value`](Self::read_value) call.
///
/// Once any operation fails, the parser keeps returning that error.
///
/// # Example
///
/// ```rust
/// use lazyjson::{ChunkReader, Parser, Value};
///
/// let mut parser = Parser::new(ChunkReader::full_slice(br#"{"name": "widget", "tags": ["a", "b"]}"#));
/// let Some(Value::Object(mut object)) = parser.read_value().unwrap() else {
///     panic!("expected an object");
/// };
/// while let Some(mut field) = object.read_next().unwrap() {
///     if field.key() == Some("tags") {
///         let mut count = 0;
///         while field.read_next().unwrap().is_some() {
///             count += 1;
///         }
///         assert_eq!(count, 2);
///     }
/// }
/// ```
pub struct Parser<R: Reader> {
    lexer: Lexer<R>,
    /// Number of containers opened and not yet closed
    depth: usize,
    error: Option<ParseError>,
}

impl<R: Reader> Parser<R> {
    /// Create a parser over `source` with the default buffer size.
    pub fn new(source: R) -> Self {
        Self::from_lexer(Lexer::new(source))
    }

    /// Create a parser whose input buffer holds `capacity` bytes.
    pub fn with_capacity(source: R, capacity: usize) -> Self {
        Self::from_lexer(Lexer::with_capacity(source, capacity))
    }

    fn from_lexer(lexer: Lexer<R>) -> Self {
        Self {
            lexer,
            depth: 0,
            error: None,
        }
    }

    /// The encoding detected for the input, once known.
    pub fn encoding(&self) -> Option<Encoding> {
        self.lexer.encoding()
    }

    /// Read the next top-level value.
    ///
    /// Returns `Ok(None)` at the end of input. A container returned earlier
    /// must have been drained first, otherwise this fails with
    /// [`ParseError::SiblingNotDrained`].
    pub fn read_value(&mut self) -> Result<Option<Value<'_, R>>, ParseError> {
        let node = self.guarded(|parser| {
            parser.check_depth(0)?;
            match parser.lexer.read_token()? {
                Token::EndOfFile => Ok(None),
                token => parser.node_from(token).map(Some),
            }
        })?;
        match node {
            Some(node) => Ok(Some(self.open(node))),
            None => Ok(None),
        }
    }

    /// Whether only whitespace remains in the input.
    pub fn at_end(&mut self) -> Result<bool, ParseError> {
        self.guarded(|parser| Ok(parser.lexer.peek_token()? == Token::EndOfFile))
    }

    /// Run a parsing step, poisoning the parser if it fails.
    pub(crate) fn guarded<T>(
        &mut self,
        step: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        let result = step(self);
        if let Err(error) = &result {
            self.error = Some(error.clone());
        }
        result
    }

    /// Bind a node to the parser, opening a container if it is one.
    pub(crate) fn open(&mut self, node: Node) -> Value<'_, R> {
        match node {
            Node::Null => Value::Null,
            Node::Boolean(b) => Value::Boolean(b),
            Node::Int(i) => Value::Int(i),
            #[cfg(feature = "float")]
            Node::Float(f) => Value::Float(f),
            Node::String(s) => Value::String(s),
            Node::Array => {
                self.depth += 1;
                trace!("Opened array at depth {}", self.depth);
                Value::Array(Array::new(self.depth, self))
            }
            Node::Object => {
                self.depth += 1;
                trace!("Opened object at depth {}", self.depth);
                Value::Object(Object::new(self.depth, self))
            }
        }
    }

    /// Consume the separator or closing bracket after an array element,
    /// then the first token of the next element.
    pub(crate) fn array_step(
        &mut self,
        depth: usize,
        cursor: Cursor,
    ) -> Result<Option<Node>, ParseError> {
        let Some(token) = self.next_child_token(depth, cursor, Token::EndArray)? else {
            return Ok(None);
        };
        self.node_from(token).map(Some)
    }

    /// Like [`array_step`](Self::array_step), reading `"key":` before the value.
    pub(crate) fn object_step(
        &mut self,
        depth: usize,
        cursor: Cursor,
    ) -> Result<Option<(String, Node)>, ParseError> {
        let Some(token) = self.next_child_token(depth, cursor, Token::EndObject)? else {
            return Ok(None);
        };
        if token != Token::String {
            return Err(unexpected(token));
        }
        let key = self.take_text()?;

        match self.lexer.read_token()? {
            Token::Colon => {}
            other => return Err(unexpected(other)),
        }
        let token = self.lexer.read_token()?;
        Ok(Some((key, self.node_from(token)?)))
    }

    /// First token of the next child, or `None` after consuming `close`.
    fn next_child_token(
        &mut self,
        depth: usize,
        cursor: Cursor,
        close: Token,
    ) -> Result<Option<Token>, ParseError> {
        self.check_depth(depth)?;
        let token = self.lexer.read_token()?;
        let token = match (cursor, token) {
            (Cursor::First | Cursor::Subsequent, t) if t == close => {
                self.depth -= 1;
                trace!("Closed {} at depth {}", close, depth);
                return Ok(None);
            }
            (Cursor::First, t) => t,
            (Cursor::Subsequent, Token::Comma) => self.lexer.read_token()?,
            (_, other) => return Err(unexpected(other)),
        };
        Ok(Some(token))
    }

    fn check_depth(&self, depth: usize) -> Result<(), ParseError> {
        if self.depth != depth {
            return Err(ParseError::SiblingNotDrained);
        }
        Ok(())
    }

    fn node_from(&mut self, token: Token) -> Result<Node, ParseError> {
        let node = match token {
            Token::BeginArray => Node::Array,
            Token::BeginObject => Node::Object,
            Token::Null => Node::Null,
            Token::True => Node::Boolean(true),
            Token::False => Node::Boolean(false),
            Token::String => Node::String(self.take_text()?),
            Token::Integer => number_node(number::parse_integer(self.text())?),
            Token::Float => number_node(number::parse_float(self.text())?),
            other => return Err(unexpected(other)),
        };
        Ok(node)
    }

    fn text(&self) -> &str {
        self.lexer.token_text().unwrap_or_default()
    }

    fn take_text(&self) -> Result<String, ParseError> {
        let text = self.text();
        let mut owned = String::new();
        owned.try_reserve_exact(text.len())?;
        owned.push_str(text);
        Ok(owned)
    }
}

fn number_node(number: Number) -> Node {
    match number {
        Number::Int(i) => Node::Int(i),
        #[cfg(feature = "float")]
        Number::Float(f) => Node::Float(f),
    }
}

/// Error for a token that cannot appear where it was found.
fn unexpected(token: Token) -> ParseError {
    match token {
        Token::EndOfFile => ParseError::EndOfFile,
        other => ParseError::UnexpectedToken(other),
    }
}
