//! Raw serializer for the native unit format.

use crate::dictionary::double_array_trie::DoubleArrayTrie;
use std::io::{Read, Write};

use super::{DictionarySerializer, SerializationError};

/// Raw serializer writing each unit as four little-endian bytes.
///
/// The output carries no header or length; the reader consumes its input to
/// the end. This is the format [`DoubleArrayTrie::write_to`] produces.
pub struct RawSerializer;

impl DictionarySerializer for RawSerializer {
    fn serialize<W>(dict: &DoubleArrayTrie, writer: W) -> Result<(), SerializationError>
    where
        W: Write,
    {
        dict.write_to(writer)?;
        Ok(())
    }

    fn deserialize<R>(reader: R) -> Result<DoubleArrayTrie, SerializationError>
    where
        R: Read,
    {
        Ok(DoubleArrayTrie::load(reader)?)
    }
}
