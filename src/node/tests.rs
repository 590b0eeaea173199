#[cfg(test)]
mod tests {
    use crate::node::{DataNode, NodeState, composite_keys, parse_structured_query};
    use std::io::Write;

    const HEADER: &str = "LON,LAT,NUMBER,STREET,UNIT,CITY,DISTRICT,REGION,POSTCODE,ID,HASH";

    const DEMO_ROWS: &[&str] = &[
        "-122.608996,47.166377,611,3RD ST,,Steilacoom,,,98388,,46a6ea62641c0d1c",
        "-121.655759,36.700241,1531,MCKINNON STREET,,Salinas,,,93906,,8a4e2b10cc93d0aa",
        "-122.335167,47.608013,400,PINE STREET,,Seattle,,,98101,,0000000000000001",
        "-122.335167,47.608013,401,PINE STREET,,Seattle,,,98101,,0000000000000002",
        "-73.985130,40.758896,1560,BROADWAY,,New York,,,10036,,0000000000000003",
    ];

    fn shard_file(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp csv");
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    fn ready_node(rows: &[&str]) -> (DataNode, tempfile::NamedTempFile) {
        let file = shard_file(rows);
        let mut node = DataNode::new(0, file.path());
        node.initialize().expect("initialize should succeed");
        (node, file)
    }

    fn terms(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    // ============================================================
    // INITIALIZATION & STATE MACHINE
    // ============================================================

    #[test]
    fn test_initialize_builds_indexes_and_statistics() {
        let (node, _file) = ready_node(DEMO_ROWS);

        assert_eq!(node.state(), NodeState::Ready);
        let stats = node.statistics();
        assert_eq!(stats.total_records, 5);
        assert!(stats.radix_memory_bytes > 0);
        assert!(stats.forward_bytes > 0);
    }

    #[test]
    fn test_initialize_fails_on_empty_shard() {
        let file = shard_file(&[]);
        let mut node = DataNode::new(0, file.path());

        assert!(node.initialize().is_err());
        assert_ne!(node.state(), NodeState::Ready);
    }

    #[test]
    fn test_initialize_fails_on_missing_file() {
        let mut node = DataNode::new(0, "/nonexistent/shard_0.csv");
        assert!(node.initialize().is_err());
    }

    #[test]
    fn test_search_before_initialize_is_empty() {
        let node = DataNode::new(0, "/nonexistent/shard_0.csv");
        assert!(node.search(&terms(&["MAIN"])).is_empty());
    }

    // ============================================================
    // SEARCH - single and multi term
    // ============================================================

    #[test]
    fn test_single_term_search_finds_record() {
        let (node, _file) = ready_node(DEMO_ROWS);

        let results = node.search(&terms(&["3RD"]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].postcode, "98388");
        assert_eq!(results[0].city, "STEILACOOM");
        assert_eq!(results[0].original_city, "Steilacoom");
    }

    #[test]
    fn test_multi_term_search_intersects_fields() {
        let (node, _file) = ready_node(DEMO_ROWS);

        let results = node.search(&terms(&["MCKINNON", "SALINAS"]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].number, "1531");
        assert_eq!(results[0].postcode, "93906");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let (node, _file) = ready_node(DEMO_ROWS);

        let results = node.search(&terms(&["steilacoom"]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].hash, 0x46a6ea62641c0d1c);
    }

    #[test]
    fn test_prefix_matches_multiple_records() {
        let (node, _file) = ready_node(DEMO_ROWS);

        let results = node.search(&terms(&["PINE"]));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_multi_term_narrows_to_intersection() {
        let (node, _file) = ready_node(DEMO_ROWS);

        // "PINE" alone matches two records; adding the number narrows to one
        let results = node.search(&terms(&["PINE", "400"]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].number, "400");
    }

    #[test]
    fn test_disjoint_terms_return_empty() {
        let (node, _file) = ready_node(DEMO_ROWS);

        assert!(node.search(&terms(&["PINE", "SALINAS"])).is_empty());
    }

    #[test]
    fn test_empty_query_returns_empty() {
        let (node, _file) = ready_node(DEMO_ROWS);
        assert!(node.search(&[]).is_empty());
    }

    #[test]
    fn test_unknown_term_returns_empty() {
        let (node, _file) = ready_node(DEMO_ROWS);
        assert!(node.search(&terms(&["NONEXISTENT"])).is_empty());
    }

    #[test]
    fn test_number_field_is_searchable() {
        let (node, _file) = ready_node(DEMO_ROWS);

        let results = node.search(&terms(&["1560"]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].street, "BROADWAY");
    }

    #[test]
    fn test_suffix_expanded_street_is_searchable() {
        let (node, _file) = ready_node(DEMO_ROWS);

        // Stored as "3RD ST"; the expanded spelling must match too
        let results = node.search(&terms(&["3RD STREET"]));
        assert!(results.iter().any(|r| r.hash == 0x46a6ea62641c0d1c));
    }

    #[test]
    fn test_bad_rows_are_absent_from_search() {
        let rows = [
            "-200.0,50.0,1,BADLON STREET,,Ghosttown,,,11111,,aaaa",
            "50.0,100.0,2,BADLAT STREET,,Ghosttown,,,22222,,bbbb",
            "-122.6,47.1,3,REAL STREET,,Town,,,33333,,cccc",
        ];
        let (node, _file) = ready_node(&rows);

        assert_eq!(node.statistics().total_records, 1);
        assert!(node.search(&terms(&["BADLON"])).is_empty());
        assert!(node.search(&terms(&["BADLAT"])).is_empty());
        assert!(node.search(&terms(&["GHOSTTOWN"])).is_empty());
        assert_eq!(node.search(&terms(&["REAL"])).len(), 1);
    }

    // ============================================================
    // STRUCTURED QUERIES
    // ============================================================

    #[test]
    fn test_structured_query_full_address() {
        let (node, _file) = ready_node(DEMO_ROWS);

        let results = node.search(&terms(&["611 3RD ST, Steilacoom, 98388"]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].hash, 0x46a6ea62641c0d1c);
    }

    #[test]
    fn test_structured_query_without_postcode() {
        let (node, _file) = ready_node(DEMO_ROWS);

        let results = node.search(&terms(&["1531 MCKINNON STREET, Salinas"]));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].postcode, "93906");
    }

    #[test]
    fn test_structured_query_no_match() {
        let (node, _file) = ready_node(DEMO_ROWS);

        assert!(node.search(&terms(&["999 NOWHERE AVE, Atlantis"])).is_empty());
    }

    #[test]
    fn test_parse_structured_query_components() {
        let parsed = parse_structured_query("611 3RD ST, Steilacoom, 98388");
        assert_eq!(parsed.number, "611");
        assert_eq!(parsed.street, "3RD ST");
        assert_eq!(parsed.city, "Steilacoom");
        assert_eq!(parsed.postcode, "98388");
    }

    #[test]
    fn test_parse_structured_query_partial() {
        let parsed = parse_structured_query("1531 MCKINNON STREET, Salinas");
        assert_eq!(parsed.number, "1531");
        assert_eq!(parsed.street, "MCKINNON STREET");
        assert_eq!(parsed.city, "Salinas");
        assert_eq!(parsed.postcode, "");
    }

    #[test]
    fn test_composite_keys_specificity_ladder() {
        let keys = composite_keys("611", "3RD ST", "STEILACOOM", "98388");
        assert_eq!(
            keys,
            vec![
                "611|3RD ST".to_string(),
                "611|3RD ST|STEILACOOM".to_string(),
                "611|3RD ST|STEILACOOM|98388".to_string(),
            ]
        );
    }

    #[test]
    fn test_composite_keys_require_number_and_street() {
        assert!(composite_keys("", "3RD ST", "X", "1").is_empty());
        assert!(composite_keys("611", "", "X", "1").is_empty());
        assert_eq!(composite_keys("611", "3RD ST", "", "1").len(), 1);
    }
}
