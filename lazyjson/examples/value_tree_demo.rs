// SPDX-License-Identifier: Apache-2.0

// Walks a JSON document depth first and prints its value tree.
//
//   cargo run --example value_tree_demo --features std [-- path/to/file.json]
//
// Without a path a built-in UTF-16 document is used. Set RUST_LOG=trace to
// watch tokens and buffer refills.

use lazyjson::{ChunkReader, IoReader, ParseError, Parser, Reader, Value};

fn print_value<R: Reader>(value: &mut Value<'_, R>, indent: usize) -> Result<(), ParseError> {
    let pad = "  ".repeat(indent);
    match value {
        Value::Null => println!("{pad}null"),
        Value::Boolean(b) => println!("{pad}Boolean: {b}"),
        Value::Int(i) => println!("{pad}Int: {i}"),
        #[cfg(feature = "float")]
        Value::Float(f) => println!("{pad}Float: {f}"),
        Value::String(s) => println!("{pad}String: {s:?}"),
        Value::Array(array) => {
            println!("{pad}Array [");
            while let Some(mut item) = array.read_next()? {
                print_value(&mut item, indent + 1)?;
            }
            println!("{pad}]");
        }
        Value::Object(object) => {
            println!("{pad}Object {{");
            while let Some(mut member) = object.read_next()? {
                print_value(&mut member, indent + 1)?;
            }
            println!("{pad}}}");
        }
        Value::Mapping(mapping) => {
            println!("{pad}Key: {:?}", mapping.key());
            print_value(mapping.value_mut(), indent + 1)?;
        }
    }
    Ok(())
}

fn print_document<R: Reader>(mut parser: Parser<R>) -> Result<(), ParseError> {
    let mut count = 0;
    while let Some(mut value) = parser.read_value()? {
        count += 1;
        println!("Value {count}:");
        print_value(&mut value, 1)?;
    }
    println!("Encoding: {:?}, {} top-level value(s)", parser.encoding(), count);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if let Some(path) = std::env::args().nth(1) {
        let file = std::fs::File::open(&path)?;
        print_document(Parser::new(IoReader::new(file)))?;
        return Ok(());
    }

    let json = r#"{"name": "lazyjson", "tags": ["streaming", "no_std"], "limits": {"depth": null, "buffer": 256}, "ok": true}"#;
    let utf16: Vec<u8> = json.encode_utf16().flat_map(u16::to_le_bytes).collect();
    // Eight bytes per read, as a slow stream would deliver them
    print_document(Parser::new(ChunkReader::new(&utf16, 8)))?;
    Ok(())
}
