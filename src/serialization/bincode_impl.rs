//! Bincode serializer for compact binary format.

use crate::dictionary::double_array_trie::DoubleArrayTrie;
use std::io::{Read, Write};

use super::{DictionarySerializer, SerializationError};

/// Bincode serializer for compact binary format.
///
/// Encodes the unit array with a length prefix, so several tries can be
/// stored back to back in one stream.
pub struct BincodeSerializer;

impl DictionarySerializer for BincodeSerializer {
    fn serialize<W>(dict: &DoubleArrayTrie, mut writer: W) -> Result<(), SerializationError>
    where
        W: Write,
    {
        bincode::serialize_into(&mut writer, dict)?;
        Ok(())
    }

    fn deserialize<R>(mut reader: R) -> Result<DoubleArrayTrie, SerializationError>
    where
        R: Read,
    {
        let dict: DoubleArrayTrie = bincode::deserialize_from(&mut reader)?;
        Ok(dict)
    }
}
