// SPDX-License-Identifier: Apache-2.0

// Shared helpers, included by the integration tests with `mod common;`
#![allow(dead_code)]

use std::fmt::Write;

use lazyjson::{ChunkReader, ParseError, Parser, Reader, Value};

/// Walk a value depth first and write it back out as compact JSON.
pub fn render<R: Reader>(value: &mut Value<'_, R>, out: &mut String) -> Result<(), ParseError> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Boolean(b) => write!(out, "{b}").unwrap(),
        Value::Int(i) => write!(out, "{i}").unwrap(),
        #[cfg(feature = "float")]
        Value::Float(f) => write!(out, "{f}").unwrap(),
        Value::String(s) => write!(out, "\"{s}\"").unwrap(),
        Value::Array(array) => {
            out.push('[');
            let mut first = true;
            while let Some(mut item) = array.read_next()? {
                if !first {
                    out.push(',');
                }
                first = false;
                render(&mut item, out)?;
            }
            out.push(']');
        }
        Value::Object(object) => {
            out.push('{');
            let mut first = true;
            while let Some(mut member) = object.read_next()? {
                if !first {
                    out.push(',');
                }
                first = false;
                render(&mut member, out)?;
            }
            out.push('}');
        }
        Value::Mapping(mapping) => {
            write!(out, "\"{}\":", mapping.key()).unwrap();
            render(mapping.value_mut(), out)?;
        }
    }
    Ok(())
}

/// Render every top-level value of the input, separated by spaces.
pub fn render_all<R: Reader>(parser: &mut Parser<R>) -> Result<String, ParseError> {
    let mut out = String::new();
    while let Some(mut value) = parser.read_value()? {
        if !out.is_empty() {
            out.push(' ');
        }
        render(&mut value, &mut out)?;
    }
    Ok(out)
}

/// Render `json` read in chunks of `chunk_size` bytes through a `capacity` byte buffer.
pub fn render_chunked(json: &[u8], chunk_size: usize, capacity: usize) -> Result<String, ParseError> {
    let mut parser = Parser::with_capacity(ChunkReader::new(json, chunk_size), capacity);
    render_all(&mut parser)
}

pub fn render_str(json: &str) -> Result<String, ParseError> {
    let mut parser = Parser::new(ChunkReader::full_slice(json.as_bytes()));
    render_all(&mut parser)
}
