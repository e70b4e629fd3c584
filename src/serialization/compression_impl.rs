//! Gzip compression wrapper for serializers.

use crate::dictionary::double_array_trie::DoubleArrayTrie;
use std::io::{Read, Write};

use super::{DictionarySerializer, SerializationError};

/// Gzip-compressed serializer wrapper.
///
/// This wrapper applies gzip compression to any underlying serializer. Packed
/// unit arrays compress well because fixed blocks are mostly zero.
///
/// # Example
///
/// ```rust,ignore
/// use libdarts::prelude::*;
/// use libdarts::serialization::{GzipSerializer, RawSerializer};
/// use std::fs::File;
///
/// let dict = DoubleArrayTrie::from_entries([("test", 1), ("testing", 2)])?;
///
/// // Serialize with gzip compression
/// let file = File::create("dict.dat.gz")?;
/// GzipSerializer::<RawSerializer>::serialize(&dict, file)?;
///
/// // Deserialize
/// let file = File::open("dict.dat.gz")?;
/// let loaded = GzipSerializer::<RawSerializer>::deserialize(file)?;
/// ```
pub struct GzipSerializer<S> {
    _inner: std::marker::PhantomData<S>,
}

impl<S: DictionarySerializer> DictionarySerializer for GzipSerializer<S> {
    fn serialize<W>(dict: &DoubleArrayTrie, writer: W) -> Result<(), SerializationError>
    where
        W: Write,
    {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut encoder = GzEncoder::new(writer, Compression::default());
        S::serialize(dict, &mut encoder)?;
        encoder.finish().map_err(SerializationError::Io)?;
        Ok(())
    }

    fn deserialize<R>(reader: R) -> Result<DoubleArrayTrie, SerializationError>
    where
        R: Read,
    {
        use flate2::read::GzDecoder;

        let decoder = GzDecoder::new(reader);
        S::deserialize(decoder)
    }
}
