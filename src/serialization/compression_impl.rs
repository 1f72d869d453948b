//! Gzip compression wrapper for serializers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

use super::{DictionarySerializer, SerializationError};

/// Gzip-compressed serializer wrapper.
///
/// Applies gzip compression to any underlying structural serializer. Double
/// arrays are mostly small integers and unset sentinels, so they compress
/// well.
///
/// # Example
///
/// ```rust
/// use libdarray::prelude::*;
/// use libdarray::serialization::{BincodeSerializer, GzipSerializer};
///
/// let dict = DoubleArrayTrie::from_terms(["test", "testing"]).unwrap();
///
/// let mut buffer = Vec::new();
/// GzipSerializer::<BincodeSerializer>::serialize(&dict, &mut buffer).unwrap();
/// assert_eq!(&buffer[..2], &[0x1f, 0x8b]);
///
/// let loaded: DoubleArrayTrie =
///     GzipSerializer::<BincodeSerializer>::deserialize(&buffer[..]).unwrap();
/// assert!(loaded.contains("testing"));
/// ```
pub struct GzipSerializer<S> {
    _inner: std::marker::PhantomData<S>,
}

impl<S: DictionarySerializer> DictionarySerializer for GzipSerializer<S> {
    fn serialize<D, W>(dict: &D, writer: W) -> Result<(), SerializationError>
    where
        D: Serialize,
        W: Write,
    {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut encoder = GzEncoder::new(writer, Compression::default());
        S::serialize(dict, &mut encoder)?;
        encoder.finish().map_err(SerializationError::Io)?;
        Ok(())
    }

    fn deserialize<D, R>(reader: R) -> Result<D, SerializationError>
    where
        D: DeserializeOwned,
        R: Read,
    {
        use flate2::read::GzDecoder;

        let decoder = GzDecoder::new(reader);
        S::deserialize(decoder)
    }
}
