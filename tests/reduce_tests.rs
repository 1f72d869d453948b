//! Reduction and re-projection against the unreduced trie

use libdarray::dictionary::flat_table::FlatTableError;
use libdarray::dictionary::StateId;
use libdarray::prelude::*;

const SCENARIO: [&str; 9] = [
    "HE", "HEAT", "HEAL", "HEAP", "HEM", "HA", "HAT", "HATE", "HAPPY",
];

const PROBES: [&str; 14] = [
    "H", "HE", "HEA", "HEAT", "HEATS", "HEM", "HEMP", "HA", "HAP", "HAPP", "HAPPY", "HATE",
    "HELLO", "X",
];

fn automaton() -> MinimalAutomaton {
    MinimalAutomaton::from_terms(SCENARIO).unwrap()
}

#[test]
fn test_every_projection_agrees_with_the_trie() {
    let trie = DoubleArrayTrie::from_terms(SCENARIO).unwrap();
    let explicit = ExplicitTrie::from_terms(SCENARIO).unwrap();
    let reduced = automaton();
    let linked = reduced
        .to_linked_double_array(DoubleArrayConfig::default())
        .unwrap();
    let flat = reduced.to_flat_table().unwrap();

    for probe in PROBES {
        let word = encode(probe).unwrap();
        let expected = trie.lookup(&word);
        assert_eq!(explicit.lookup(&word), expected, "explicit: {probe}");
        assert_eq!(reduced.lookup(&word), expected, "reduced: {probe}");
        assert_eq!(linked.lookup(&word), expected, "linked: {probe}");
        assert_eq!(flat.lookup(&word), expected, "flat: {probe}");
    }

    assert_eq!(linked.len(), SCENARIO.len());
    assert_eq!(flat.len(), SCENARIO.len());
}

#[test]
fn test_reduction_shrinks_the_scenario() {
    let explicit = ExplicitTrie::from_terms(SCENARIO).unwrap();
    let before = explicit.num_states();
    let reduced = explicit.reduce();
    let stats = reduced.stats();

    assert_eq!(stats.states_before, before);
    assert!(stats.states_after < stats.states_before);
    // Every word-final leaf (T, L, P, M, E, Y) collapses into one state.
    let leaves = reduced
        .nodes()
        .iter()
        .filter(|node| node.child_count() == 0)
        .count();
    assert_eq!(leaves, 1);
}

#[test]
fn test_linked_states_match_the_automaton() {
    let reduced = automaton();
    let linked = reduced
        .to_linked_double_array(DoubleArrayConfig::default())
        .unwrap();

    assert_eq!(linked.num_states(), reduced.num_states());
    for (state, node) in reduced.nodes().iter().enumerate() {
        let state = state as StateId;
        assert_eq!(linked.is_terminal(state), node.is_final());
        for (symbol, target) in node.children() {
            assert_eq!(linked.transition(state, symbol), Some(target));
        }
    }
}

#[test]
fn test_flat_rows_match_the_automaton() {
    let reduced = automaton();
    let flat = reduced.to_flat_table().unwrap();

    assert_eq!(flat.num_states(), reduced.num_states());
    for (state, node) in reduced.nodes().iter().enumerate() {
        let state = state as StateId;
        assert_eq!(flat.is_terminal(state), node.is_final());
        for code in 1..=26u8 {
            let symbol = Symbol::from_char((b'A' + code - 1) as char).unwrap();
            assert_eq!(flat.transition(state, symbol), node.child(symbol));
        }
    }
}

#[test]
fn test_flat_table_refuses_large_automata() {
    let reduced = automaton();
    let states = reduced.num_states();
    assert!(matches!(
        FlatTable::with_limit(&reduced, states - 1),
        Err(FlatTableError::TooManyStates { .. })
    ));
    assert!(FlatTable::with_limit(&reduced, states).is_ok());
}

#[test]
fn test_linked_layout_is_stable_under_growth_settings() {
    let reduced = automaton();
    let roomy = reduced
        .to_linked_double_array(DoubleArrayConfig::default().with_initial_capacity(4096))
        .unwrap();
    let tight = reduced
        .to_linked_double_array(
            DoubleArrayConfig::default()
                .with_growth_chunk(1)
                .with_lookback(0),
        )
        .unwrap();

    for probe in PROBES {
        let word = encode(probe).unwrap();
        assert_eq!(roomy.lookup(&word), tight.lookup(&word), "{probe}");
    }
    assert!(tight.num_slots() <= roomy.num_slots());
}

#[test]
fn test_dictionary_round_trips_through_the_explicit_trie() {
    let linked = DictionaryFactory::create(
        DictionaryBackend::Linked,
        SCENARIO,
        DoubleArrayConfig::default(),
    )
    .unwrap();
    let as_trie = linked
        .convert(DictionaryBackend::DoubleArray, DoubleArrayConfig::default())
        .unwrap();
    let as_flat = as_trie
        .convert(DictionaryBackend::Flat, DoubleArrayConfig::default())
        .unwrap();

    for probe in PROBES {
        let word = encode(probe).unwrap();
        assert_eq!(linked.lookup(&word), as_trie.lookup(&word), "{probe}");
        assert_eq!(linked.lookup(&word), as_flat.lookup(&word), "{probe}");
    }
    assert_eq!(as_flat.num_states(), linked.num_states());
}
