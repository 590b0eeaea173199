#[cfg(test)]
mod tests {
    use crate::index::forward::ForwardStore;
    use crate::index::radix::RadixTrieIndex;
    use crate::ingest::types::AddressRecord;

    fn record(hash: u64, street: &str) -> AddressRecord {
        AddressRecord {
            longitude: -122.3,
            latitude: 47.6,
            hash,
            number: "100".to_string(),
            street: street.to_string(),
            unit: String::new(),
            city: "SEATTLE".to_string(),
            postcode: "98101".to_string(),
            original_street: street.to_string(),
            original_unit: String::new(),
            original_city: "Seattle".to_string(),
        }
    }

    // ============================================================
    // RADIX TRIE TESTS - insert & search
    // ============================================================

    #[test]
    fn test_insert_and_exact_search() {
        let mut trie = RadixTrieIndex::new();
        trie.insert("MAIN STREET", 1);

        assert_eq!(trie.search("MAIN STREET"), vec![1]);
    }

    #[test]
    fn test_prefix_search_finds_all_extensions() {
        let mut trie = RadixTrieIndex::new();
        trie.insert("MAIN STREET", 1);
        trie.insert("MAIN AVENUE", 2);
        trie.insert("MAPLE COURT", 3);

        let main = trie.search("MAIN");
        assert_eq!(main.len(), 2);
        assert!(main.contains(&1));
        assert!(main.contains(&2));

        let ma = trie.search("MA");
        assert_eq!(ma.len(), 3);
    }

    #[test]
    fn test_search_every_prefix_of_inserted_term() {
        let mut trie = RadixTrieIndex::new();
        trie.insert("STEILACOOM", 7);

        let term = "STEILACOOM";
        for end in 1..=term.len() {
            let prefix = &term[..end];
            assert!(
                trie.search(prefix).contains(&7),
                "prefix {:?} should find the record",
                prefix
            );
        }
    }

    #[test]
    fn test_edge_split_keeps_both_terms() {
        let mut trie = RadixTrieIndex::new();
        // Second insert forces a split of the "TEST" edge
        trie.insert("TESTER", 1);
        trie.insert("TESTING", 2);

        assert_eq!(trie.search("TESTER"), vec![1]);
        assert_eq!(trie.search("TESTING"), vec![2]);
        let both = trie.search("TEST");
        assert_eq!(both.len(), 2);
    }

    #[test]
    fn test_term_terminating_at_split_point() {
        let mut trie = RadixTrieIndex::new();
        trie.insert("STREETS", 1);
        trie.insert("STREET", 2);

        assert_eq!(trie.search("STREET").len(), 2);
        assert_eq!(trie.search("STREETS"), vec![1]);
    }

    #[test]
    fn test_empty_prefix_returns_nothing() {
        let mut trie = RadixTrieIndex::new();
        trie.insert("ANYTHING", 1);

        assert!(trie.search("").is_empty());
    }

    #[test]
    fn test_empty_term_insert_is_noop() {
        let mut trie = RadixTrieIndex::new();
        trie.insert("", 1);

        assert_eq!(trie.term_count(), 0);
        assert!(trie.search("A").is_empty());
    }

    #[test]
    fn test_no_match_returns_empty() {
        let mut trie = RadixTrieIndex::new();
        trie.insert("SEATTLE", 1);

        assert!(trie.search("PORTLAND").is_empty());
        assert!(trie.search("SEATTLEX").is_empty());
    }

    #[test]
    fn test_duplicate_insert_deduplicates_ids() {
        let mut trie = RadixTrieIndex::new();
        trie.insert("MAIN", 1);
        trie.insert("MAIN", 1);

        assert_eq!(trie.search("MAIN"), vec![1]);
        // term_count counts insert calls, not distinct terms
        assert_eq!(trie.term_count(), 2);
    }

    #[test]
    fn test_shared_term_accumulates_ids() {
        let mut trie = RadixTrieIndex::new();
        trie.insert("SEATTLE", 3);
        trie.insert("SEATTLE", 1);
        trie.insert("SEATTLE", 2);

        assert_eq!(trie.search("SEATTLE"), vec![1, 2, 3]);
    }

    #[test]
    fn test_search_result_is_duplicate_free() {
        let mut trie = RadixTrieIndex::new();
        // Same record under two terms sharing the "MAIN" prefix subtree
        trie.insert("MAIN STREET", 1);
        trie.insert("MAIN ST", 1);

        assert_eq!(trie.search("MAIN"), vec![1]);
    }

    #[test]
    fn test_search_is_stable_across_insertion_orders() {
        let terms: &[(&str, u64)] = &[
            ("MAIN STREET", 1),
            ("MAIN AVENUE", 2),
            ("MAPLE COURT", 3),
            ("MA", 4),
            ("MARKET", 5),
        ];

        let mut forward = RadixTrieIndex::new();
        for &(term, id) in terms {
            forward.insert(term, id);
        }
        let mut reverse = RadixTrieIndex::new();
        for &(term, id) in terms.iter().rev() {
            reverse.insert(term, id);
        }

        assert_eq!(forward.search("MA"), reverse.search("MA"));
        assert_eq!(forward.search("MAIN"), reverse.search("MAIN"));
    }

    #[test]
    fn test_memory_usage_grows_with_content() {
        let mut trie = RadixTrieIndex::new();
        let empty = trie.memory_usage();

        trie.insert("SOME REASONABLY LONG STREET NAME", 1);
        assert!(trie.memory_usage() > empty);
    }

    // ============================================================
    // FORWARD STORE TESTS
    // ============================================================

    #[test]
    fn test_forward_insert_and_get() {
        let store = ForwardStore::new();
        store.insert(42, record(42, "MAIN STREET"));

        let found = store.get(42).expect("record should exist");
        assert_eq!(found.hash, 42);
        assert_eq!(found.street, "MAIN STREET");
        assert!(store.get(43).is_none());
    }

    #[test]
    fn test_forward_contains_and_count() {
        let store = ForwardStore::new();
        assert_eq!(store.record_count(), 0);

        store.insert(1, record(1, "A ST"));
        store.insert(2, record(2, "B ST"));

        assert!(store.contains(1));
        assert!(!store.contains(3));
        assert_eq!(store.record_count(), 2);
    }

    #[test]
    fn test_forward_last_insert_wins() {
        let store = ForwardStore::new();
        store.insert(1, record(1, "OLD STREET"));
        store.insert(1, record(1, "NEW STREET"));

        assert_eq!(store.record_count(), 1);
        assert_eq!(store.get(1).unwrap().street, "NEW STREET");
    }

    #[test]
    fn test_forward_storage_size_accounts_strings() {
        let store = ForwardStore::new();
        store.insert(1, record(1, "A VERY LONG STREET NAME INDEED"));

        let with_one = store.storage_size();
        assert!(with_one > std::mem::size_of::<AddressRecord>());

        store.insert(2, record(2, "ANOTHER STREET"));
        assert!(store.storage_size() > with_one);
    }

    #[test]
    fn test_forward_get_returns_matching_hash() {
        let store = ForwardStore::new();
        for id in [10u64, 20, 30] {
            store.insert(id, record(id, "X ST"));
        }
        for id in [10u64, 20, 30] {
            assert_eq!(store.get(id).unwrap().hash, id);
        }
    }
}
