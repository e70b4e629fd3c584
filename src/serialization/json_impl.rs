//! JSON serializer for human-readable format.

use crate::dictionary::double_array_trie::DoubleArrayTrie;
use std::io::{Read, Write};

use super::{DictionarySerializer, SerializationError};

/// JSON serializer for human-readable format.
///
/// Useful for debugging and inspecting the packed units; several times larger
/// than the raw or bincode formats.
pub struct JsonSerializer;

impl DictionarySerializer for JsonSerializer {
    fn serialize<W>(dict: &DoubleArrayTrie, mut writer: W) -> Result<(), SerializationError>
    where
        W: Write,
    {
        serde_json::to_writer(&mut writer, dict)?;
        Ok(())
    }

    fn deserialize<R>(mut reader: R) -> Result<DoubleArrayTrie, SerializationError>
    where
        R: Read,
    {
        let dict: DoubleArrayTrie = serde_json::from_reader(&mut reader)?;
        Ok(dict)
    }
}
