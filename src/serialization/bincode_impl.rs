//! Bincode serializer for compact binary format.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

use super::{DictionarySerializer, SerializationError};

/// Bincode serializer for compact binary format.
///
/// Writes the dictionary's arrays as fixed-width integers. This is the
/// format to ship: loading is a validated copy, no rebuilding.
pub struct BincodeSerializer;

impl DictionarySerializer for BincodeSerializer {
    fn serialize<D, W>(dict: &D, mut writer: W) -> Result<(), SerializationError>
    where
        D: Serialize,
        W: Write,
    {
        bincode::serialize_into(&mut writer, dict)?;
        Ok(())
    }

    fn deserialize<D, R>(mut reader: R) -> Result<D, SerializationError>
    where
        D: DeserializeOwned,
        R: Read,
    {
        Ok(bincode::deserialize_from(&mut reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::double_array_trie::DoubleArrayTrie;
    use crate::dictionary::SnapshotError;

    #[test]
    fn test_truncated_input_is_rejected() {
        let dict = DoubleArrayTrie::from_terms(["abc", "abd"]).unwrap();
        let mut buffer = Vec::new();
        BincodeSerializer::serialize(&dict, &mut buffer).unwrap();

        buffer.truncate(buffer.len() / 2);
        let result: Result<DoubleArrayTrie, _> = BincodeSerializer::deserialize(&buffer[..]);
        assert!(matches!(result, Err(SerializationError::Bincode(_))));
    }

    #[test]
    fn test_dangling_check_is_rejected() {
        let dict = DoubleArrayTrie::from_terms(["abc"]).unwrap();
        let (base, mut check) = dict.store().to_parts();
        let owned = check.iter().rposition(|&c| c >= 0).unwrap();
        check[owned] = check.len() as i32 + 5;

        let mut buffer = Vec::new();
        bincode::serialize_into(&mut buffer, &(check.len() as u32, base, check)).unwrap();

        let err = BincodeSerializer::deserialize::<DoubleArrayTrie, _>(&buffer[..]).unwrap_err();
        let expected = SnapshotError::DanglingCheck {
            slot: owned,
            owner: dict.store().len() as i32 + 5,
        };
        assert!(err.to_string().contains(&expected.to_string()), "{err}");
    }
}
