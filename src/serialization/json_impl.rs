//! JSON serializer for human-readable format.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

use super::{DictionarySerializer, SerializationError};

/// JSON serializer for human-readable format.
///
/// Same snapshot as [`BincodeSerializer`](super::BincodeSerializer), pretty
/// printed. Useful for inspecting small dictionaries and for hand-written
/// fixtures.
pub struct JsonSerializer;

impl DictionarySerializer for JsonSerializer {
    fn serialize<D, W>(dict: &D, mut writer: W) -> Result<(), SerializationError>
    where
        D: Serialize,
        W: Write,
    {
        serde_json::to_writer_pretty(&mut writer, dict)?;
        Ok(())
    }

    fn deserialize<D, R>(mut reader: R) -> Result<D, SerializationError>
    where
        D: DeserializeOwned,
        R: Read,
    {
        Ok(serde_json::from_reader(&mut reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::double_array_trie::DoubleArrayTrie;
    use crate::dictionary::flat_table::FlatTable;

    #[test]
    fn test_snapshot_shape() {
        let mut dict = DoubleArrayTrie::from_terms(["a"]).unwrap();
        dict.trim();
        let mut buffer = Vec::new();
        JsonSerializer::serialize(&dict, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["state_count"], 2);
        assert_eq!(value["check"], serde_json::json!([-1, 0]));
    }

    #[test]
    fn test_untrimmed_snapshot_records_every_slot() {
        let dict = DoubleArrayTrie::from_terms(["a"]).unwrap();
        let mut buffer = Vec::new();
        JsonSerializer::serialize(&dict, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        let slots = value["check"].as_array().unwrap().len();
        assert_eq!(value["state_count"], slots as u64);
        assert_eq!(slots, dict.store().len());

        let loaded: DoubleArrayTrie = JsonSerializer::deserialize(buffer.as_slice()).unwrap();
        assert_eq!(loaded, dict);
    }

    #[test]
    fn test_unreachable_subtree_rejected() {
        // state 1 is never claimed by the root, yet owns terminal slot 2
        let json = r#"{"state_count": 3, "base": [0, 0, 2147483648], "check": [-1, -1, 1]}"#;
        let result: Result<DoubleArrayTrie, _> = JsonSerializer::deserialize(json.as_bytes());
        assert!(matches!(result, Err(SerializationError::Json(_))));
    }

    #[test]
    fn test_hand_written_fixture() {
        // root -A-> 1 (final)
        let mut cells = vec![0u32; 54];
        cells[1] = 1 | (1 << 31);
        cells[27] = 1 << 31;
        let json = serde_json::json!({
            "state_count": 2,
            "word_count": 1,
            "cells": cells,
        });

        let table: FlatTable = JsonSerializer::deserialize(json.to_string().as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.is_word(&crate::dictionary::alphabet::encode("a").unwrap()));
    }

    #[test]
    fn test_state_count_must_match() {
        let json = r#"{"state_count": 3, "base": [0, 0], "check": [-1, -1]}"#;
        let result: Result<DoubleArrayTrie, _> = JsonSerializer::deserialize(json.as_bytes());
        assert!(matches!(result, Err(SerializationError::Json(_))));
    }
}
