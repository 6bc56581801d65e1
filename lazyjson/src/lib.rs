// SPDX-License-Identifier: Apache-2.0

//! A streaming JSON decoder with a lazily iterated value tree.
//!
//! Input bytes come from a [`Reader`] and may be UTF-8, UTF-16 or UTF-32 in
//! either byte order; the encoding is detected from the first bytes. The
//! [`Parser`] hands out one [`Value`] at a time: arrays and objects are
//! cursors whose children are decoded only when asked for, so a document is
//! never held in memory as a whole.
//!
//! ```rust
//! use lazyjson::{ChunkReader, Parser, Value};
//!
//! let mut parser = Parser::new(ChunkReader::full_slice(br#"{"id": 7, "ok": true}"#));
//! let mut root = parser.read_value().unwrap().unwrap();
//! while let Some(member) = root.read_next().unwrap() {
//!     match member.key() {
//!         Some("id") => assert_eq!(member.as_mapping().unwrap().value().as_int(), Some(7)),
//!         Some("ok") => assert_eq!(member.as_mapping().unwrap().value().as_bool(), Some(true)),
//!         other => panic!("unexpected key {other:?}"),
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;
#[cfg(all(feature = "std", not(test)))]
extern crate std;

// Compile-time configuration validation
mod config_check;

mod reader;
pub use reader::Reader;

mod chunk_reader;
pub use chunk_reader::ChunkReader;

#[cfg(feature = "std")]
mod io_reader;
#[cfg(feature = "std")]
pub use io_reader::IoReader;

mod parse_error;
pub use parse_error::{ErrorKind, ParseError};

mod utf8;

mod encoding;
pub use encoding::Encoding;

mod char_reader;
pub use char_reader::{CharReader, DEFAULT_BUFFER_SIZE};

mod escape_processor;

mod int_parser;

mod number;
pub use number::Int;

mod token;
pub use token::Token;

mod lexer;
pub use lexer::Lexer;

mod parser;
pub use parser::Parser;

mod value;
pub use value::{Array, Mapping, Object, Value, ValueType};
