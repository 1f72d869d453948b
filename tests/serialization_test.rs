//! Serialization round trips and corrupt-input rejection for every backend

#[cfg(feature = "serialization")]
mod serialization_tests {
    use libdarray::prelude::*;
    use libdarray::serialization::{extract_terms, SerializationError};

    /// Test data
    fn test_terms() -> Vec<String> {
        [
            "apple",
            "application",
            "apply",
            "banana",
            "band",
            "test",
            "testing",
            "zebra",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn probes() -> Vec<Word> {
        [
            "APPLE", "APP", "APPLIED", "BAN", "BANANAS", "TESTING", "TESTINGS", "Z", "ZEBRA",
            "QUIZ",
        ]
        .iter()
        .map(|s| encode(s).unwrap())
        .collect()
    }

    fn assert_same_lookups<A: Dictionary, B: Dictionary>(before: &A, after: &B) {
        for word in probes() {
            assert_eq!(
                before.lookup(&word),
                after.lookup(&word),
                "lookup of {} changed",
                decode(&word)
            );
        }
        assert_eq!(extract_terms(before), extract_terms(after));
    }

    fn roundtrip<S, D>(dict: &D) -> D
    where
        S: DictionarySerializer,
        D: serde::Serialize + serde::de::DeserializeOwned,
    {
        let mut buffer = Vec::new();
        S::serialize(dict, &mut buffer).expect("serialize");
        S::deserialize(&buffer[..]).expect("deserialize")
    }

    // ============================================================================
    // Bincode Round-Trip Tests
    // ============================================================================

    #[test]
    fn test_double_array_trie_bincode_roundtrip() {
        let dict = DoubleArrayTrie::from_terms(test_terms()).unwrap();
        let loaded = roundtrip::<BincodeSerializer, _>(&dict);

        assert_eq!(loaded, dict);
        assert_eq!(loaded.len(), dict.len());
        assert_same_lookups(&dict, &loaded);
    }

    #[test]
    fn test_linked_bincode_roundtrip() {
        let dict = <LinkedDoubleArray as DictionaryFromTerms>::from_terms(test_terms()).unwrap();
        let loaded = roundtrip::<BincodeSerializer, _>(&dict);

        assert_eq!(loaded, dict);
        assert_same_lookups(&dict, &loaded);
    }

    #[test]
    fn test_flat_bincode_roundtrip() {
        let dict = <FlatTable as DictionaryFromTerms>::from_terms(test_terms()).unwrap();
        let loaded = roundtrip::<BincodeSerializer, _>(&dict);

        assert_eq!(loaded, dict);
        assert_same_lookups(&dict, &loaded);
    }

    // ============================================================================
    // JSON Round-Trip Tests
    // ============================================================================

    #[test]
    fn test_double_array_trie_json_roundtrip() {
        let dict = DoubleArrayTrie::from_terms(test_terms()).unwrap();
        let loaded = roundtrip::<JsonSerializer, _>(&dict);

        assert_eq!(loaded, dict);
        assert_same_lookups(&dict, &loaded);
    }

    #[test]
    fn test_linked_json_roundtrip() {
        let dict = <LinkedDoubleArray as DictionaryFromTerms>::from_terms(test_terms()).unwrap();
        let loaded = roundtrip::<JsonSerializer, _>(&dict);

        assert_eq!(loaded, dict);
        assert_same_lookups(&dict, &loaded);
    }

    #[test]
    fn test_container_json_roundtrip() {
        for backend in [
            DictionaryBackend::DoubleArray,
            DictionaryBackend::Linked,
            DictionaryBackend::Flat,
        ] {
            let dict =
                DictionaryFactory::create(backend, test_terms(), DoubleArrayConfig::default())
                    .unwrap();
            let loaded = roundtrip::<JsonSerializer, _>(&dict);
            assert_eq!(loaded.backend(), backend);
            assert_eq!(loaded, dict);
        }
    }

    // ============================================================================
    // Compressed Round-Trip Tests
    // ============================================================================

    #[test]
    #[cfg(feature = "compression")]
    fn test_gzip_roundtrips() {
        let dict = DictionaryFactory::create(
            DictionaryBackend::Linked,
            test_terms(),
            DoubleArrayConfig::default(),
        )
        .unwrap();

        let loaded = roundtrip::<GzipSerializer<BincodeSerializer>, _>(&dict);
        assert_eq!(loaded, dict);

        let loaded = roundtrip::<GzipSerializer<JsonSerializer>, _>(&dict);
        assert_eq!(loaded, dict);
    }

    // ============================================================================
    // Plain Text Tests
    // ============================================================================

    #[test]
    fn test_plaintext_rebuilds_every_backend() {
        let trie = DoubleArrayTrie::from_terms(test_terms()).unwrap();
        let mut buffer = Vec::new();
        PlainTextSerializer::serialize(&trie, &mut buffer).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert_eq!(text.lines().next(), Some("APPLE"));
        assert_eq!(text.lines().count(), test_terms().len());

        let trie_again: DoubleArrayTrie = PlainTextSerializer::deserialize(&buffer[..]).unwrap();
        let linked: LinkedDoubleArray = PlainTextSerializer::deserialize(&buffer[..]).unwrap();
        let flat: FlatTable = PlainTextSerializer::deserialize(&buffer[..]).unwrap();

        assert_same_lookups(&trie, &trie_again);
        assert_same_lookups(&trie, &linked);
        assert_same_lookups(&trie, &flat);
    }

    #[test]
    fn test_plaintext_rejects_invalid_word() {
        let result: Result<DoubleArrayTrie, _> =
            PlainTextSerializer::deserialize("apple\nnot a word\n".as_bytes());
        assert!(matches!(result, Err(SerializationError::Dictionary(_))));
    }

    // ============================================================================
    // Corrupt Input Tests
    // ============================================================================

    #[test]
    fn test_truncated_bincode_is_rejected() {
        let dict = DoubleArrayTrie::from_terms(test_terms()).unwrap();
        let mut buffer = Vec::new();
        BincodeSerializer::serialize(&dict, &mut buffer).unwrap();
        buffer.truncate(buffer.len() / 2);

        let result: Result<DoubleArrayTrie, _> = BincodeSerializer::deserialize(&buffer[..]);
        assert!(matches!(result, Err(SerializationError::Bincode(_))));
    }

    #[test]
    fn test_mismatched_array_lengths_are_rejected() {
        let json = r#"{"state_count": 3, "base": [0, 0], "check": [-1, -1]}"#;
        let result: Result<DoubleArrayTrie, _> = JsonSerializer::deserialize(json.as_bytes());
        assert!(matches!(result, Err(SerializationError::Json(_))));
    }

    #[test]
    fn test_edited_linked_arrays_are_rejected() {
        let dict = <LinkedDoubleArray as DictionaryFromTerms>::from_terms(test_terms()).unwrap();
        let mut value = serde_json::to_value(&dict).unwrap();
        // Point every transition at a state that does not exist.
        let next = value["next"].as_array_mut().unwrap();
        for target in next.iter_mut() {
            *target = serde_json::json!(u32::MAX - 1);
        }
        let bytes = serde_json::to_vec(&value).unwrap();

        let result: Result<LinkedDoubleArray, _> = JsonSerializer::deserialize(&bytes[..]);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let dict = DoubleArrayTrie::from_terms(test_terms()).unwrap();
        let mut buffer = Vec::new();
        JsonSerializer::serialize(&dict, &mut buffer).unwrap();

        let result: Result<FlatTable, _> = JsonSerializer::deserialize(&buffer[..]);
        assert!(result.is_err());
    }
}
