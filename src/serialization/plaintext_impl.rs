//! Plain text serialization for double-array tries.
//!
//! Serializes the stored entries, not the units: one entry per line, the key
//! bytes followed by a tab and the decimal value. Loading rebuilds the trie,
//! so this format survives changes to the packing algorithm. It is ideal for:
//! - Manual editing
//! - Version control
//! - Cross-language compatibility
//!
//! # Format
//!
//! ```text
//! apple	1
//! banana	2
//! cherry	3
//! ```
//!
//! Keys may not contain tab or newline bytes.

use super::{DictionarySerializer, SerializationError};
use crate::dictionary::double_array_trie::{DoubleArrayTrie, DoubleArrayTrieBuilder};
use std::io::{BufRead, BufReader, Read, Write};

/// Plain text serializer using tab-separated `key<TAB>value` lines.
pub struct PlainTextSerializer;

impl DictionarySerializer for PlainTextSerializer {
    fn serialize<W>(dict: &DoubleArrayTrie, mut writer: W) -> Result<(), SerializationError>
    where
        W: Write,
    {
        for (key, value) in dict.iter() {
            if key.iter().any(|&b| b == b'\t' || b == b'\n') {
                return Err(SerializationError::DictionaryError(format!(
                    "key {:?} contains a tab or newline",
                    String::from_utf8_lossy(&key)
                )));
            }
            writer.write_all(&key)?;
            writeln!(writer, "\t{}", value)?;
        }
        writer.flush()?;

        Ok(())
    }

    fn deserialize<R>(reader: R) -> Result<DoubleArrayTrie, SerializationError>
    where
        R: Read,
    {
        let mut reader = BufReader::new(reader);
        let mut builder = DoubleArrayTrieBuilder::new();
        let mut line = Vec::new();
        let mut line_no = 0usize;

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            line_no += 1;

            if line.last() == Some(&b'\n') {
                line.pop();
            }
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if line.is_empty() {
                continue;
            }

            let tab = line.iter().rposition(|&b| b == b'\t').ok_or_else(|| {
                SerializationError::DictionaryError(format!("line {}: missing tab", line_no))
            })?;
            let value = std::str::from_utf8(&line[tab + 1..])
                .ok()
                .and_then(|s| s.trim().parse::<i32>().ok())
                .ok_or_else(|| {
                    SerializationError::DictionaryError(format!("line {}: invalid value", line_no))
                })?;

            builder.put(&line[..tab], value)?;
        }

        Ok(builder.build()?)
    }
}
