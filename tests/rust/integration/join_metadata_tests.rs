//! Integration tests for building and querying join metadata

#[cfg(test)]
mod join_metadata_integration_tests {
    use joinmeta::{
        map::StoreError,
        metadata::MetadataError, ColumnResolution, ColumnType, GenericRecordMetadata,
        JoinMetadataConfig, JoinMetadataError, JoinRecordMetadata, RecordMetadata,
    };
    use test_case::test_case;

    fn table(columns: &[(&str, ColumnType)]) -> GenericRecordMetadata {
        GenericRecordMetadata::from_columns(columns.iter().copied()).unwrap()
    }

    /// Three tables sharing `id`, with `name` in two of them
    fn users_orders_items() -> JoinRecordMetadata {
        let mut metadata = JoinRecordMetadata::new(&JoinMetadataConfig::default(), 7);
        metadata
            .copy_column_metadata_from(
                Some("u"),
                &table(&[("id", ColumnType::Long), ("name", ColumnType::String)]),
            )
            .unwrap();
        metadata
            .copy_column_metadata_from(
                Some("o"),
                &table(&[
                    ("id", ColumnType::Long),
                    ("user_id", ColumnType::Long),
                    ("ts", ColumnType::Timestamp),
                ]),
            )
            .unwrap();
        metadata
            .copy_column_metadata_from(
                Some("i"),
                &table(&[("id", ColumnType::Long), ("name", ColumnType::String)]),
            )
            .unwrap();
        metadata
    }

    #[test]
    fn test_two_tables_sharing_a_column() {
        let mut metadata = JoinRecordMetadata::new(&JoinMetadataConfig::default(), 3);
        metadata.add(Some("t1"), "a", ColumnType::Int).unwrap();
        metadata.add(Some("t1"), "b", ColumnType::Int).unwrap();
        metadata.add(Some("t2"), "a", ColumnType::Int).unwrap();

        assert_eq!(metadata.column_index_quiet("t1.a"), 0);
        assert_eq!(metadata.column_index_quiet("t2.a"), 2);
        assert_eq!(metadata.column_index_quiet("a"), -1);
        assert_eq!(metadata.column_index_quiet("b"), 1);
        assert_eq!(metadata.column_index_quiet("t1.c"), -1);
    }

    #[test]
    fn test_copy_preserves_source_order() {
        let metadata = users_orders_items();
        let names: Vec<&str> = metadata.columns().iter().map(|c| c.name()).collect();

        assert_eq!(
            names,
            vec!["u.id", "u.name", "o.id", "o.user_id", "o.ts", "i.id", "i.name"]
        );
        for (index, name) in names.iter().enumerate() {
            assert_eq!(metadata.column_index_quiet(name), index as i32);
        }
        assert_eq!(metadata.column_type(4), ColumnType::Timestamp);
    }

    #[test_case("id", ColumnResolution::Ambiguous; "shared by all tables")]
    #[test_case("name", ColumnResolution::Ambiguous; "shared by two tables")]
    #[test_case("user_id", ColumnResolution::Found(3); "unique to one table")]
    #[test_case("i.name", ColumnResolution::Found(6); "qualified shared name")]
    #[test_case("price", ColumnResolution::NotFound; "never added")]
    #[test_case("x.id", ColumnResolution::NotFound; "unknown alias")]
    fn test_resolution(name: &str, expected: ColumnResolution) {
        assert_eq!(users_orders_items().resolve(name), expected);
    }

    #[test]
    fn test_every_distinct_pair_resolves_to_insertion_index() {
        let aliases = ["a", "b", "c", "d"];
        let columns = ["k", "v", "w"];
        let mut metadata = JoinRecordMetadata::new(&JoinMetadataConfig::default(), 12);

        for alias in aliases {
            for column in columns {
                metadata.add(Some(alias), column, ColumnType::Int).unwrap();
            }
        }

        let mut expected = 0;
        for alias in aliases {
            for column in columns {
                let name = format!("{}.{}", alias, column);
                assert_eq!(metadata.column_index_quiet(&name), expected);
                expected += 1;
            }
        }
        assert_eq!(metadata.column_count(), 12);
    }

    #[test]
    fn test_partial_copy_on_duplicate() {
        let mut metadata = JoinRecordMetadata::new(&JoinMetadataConfig::default(), 4);
        metadata.add(Some("t"), "b", ColumnType::Int).unwrap();

        let err = metadata
            .copy_column_metadata_from(
                Some("t"),
                &table(&[
                    ("a", ColumnType::Int),
                    ("b", ColumnType::Int),
                    ("c", ColumnType::Int),
                ]),
            )
            .unwrap_err();

        assert_eq!(
            err,
            JoinMetadataError::DuplicateColumn {
                name: "b".to_string(),
                alias: Some("t".to_string()),
            }
        );
        // Columns added before the failure stay, the rest are never reached
        assert_eq!(metadata.column_count(), 2);
        assert_eq!(metadata.column_index_quiet("t.a"), 1);
        assert_eq!(metadata.column_index_quiet("t.c"), -1);
    }

    #[test]
    fn test_column_index_errors() {
        let metadata = users_orders_items();

        assert!(matches!(
            metadata.column_index("name"),
            Err(MetadataError::AmbiguousColumn { .. })
        ));
        assert!(matches!(
            metadata.column_index("u.email"),
            Err(MetadataError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn test_timestamp_from_resolved_column() {
        let mut metadata = users_orders_items();
        let ts = metadata.column_index_quiet("o.ts");
        metadata.set_timestamp_index(ts);

        assert_eq!(metadata.timestamp_index(), 4);
        assert_eq!(
            metadata.timestamp_column().map(|c| c.column_type()),
            Some(ColumnType::Timestamp)
        );
    }

    #[test]
    fn test_small_pages_and_growth() {
        let config = JoinMetadataConfig {
            page_size: 64,
            ..Default::default()
        };
        // Undersized on purpose so the store has to grow
        let mut metadata = JoinRecordMetadata::new(&config, 1);
        for i in 0..100 {
            metadata
                .add(Some("t"), &format!("c{}", i), ColumnType::Long)
                .unwrap();
        }

        assert_eq!(metadata.column_count(), 100);
        assert_eq!(metadata.column_index_quiet("c99"), 99);
        assert_eq!(metadata.column_index_quiet("t.c42"), 42);
    }

    #[test]
    fn test_growth_limit_is_a_store_error() {
        let config = JoinMetadataConfig {
            max_resizes: 0,
            ..Default::default()
        };
        let mut metadata = JoinRecordMetadata::new(&config, 1);

        let mut added = 0;
        let err = loop {
            match metadata.add(Some("t"), &format!("c{}", added), ColumnType::Long) {
                Ok(()) => added += 1,
                Err(err) => break err,
            }
        };
        assert!(matches!(
            err,
            JoinMetadataError::Store(StoreError::CapacityExceeded { max_resizes: 0, .. })
        ));

        // The rejected column left no trace
        assert_eq!(metadata.column_count(), added);
        let rejected = format!("c{}", added);
        assert_eq!(metadata.resolve(&format!("t.{}", rejected)), ColumnResolution::NotFound);
        assert_eq!(metadata.resolve(&rejected), ColumnResolution::NotFound);
        for i in 0..added {
            assert_eq!(metadata.column_index_quiet(&format!("c{}", i)), i as i32);
        }
    }

    #[test]
    fn test_out_of_range_config_does_not_panic() {
        let config = JoinMetadataConfig {
            load_factor: f64::NAN,
            ..Default::default()
        };
        let mut metadata = JoinRecordMetadata::new(&config, usize::MAX / 2);
        metadata.add(Some("t"), "a", ColumnType::Int).unwrap();

        assert_eq!(metadata.column_index_quiet("a"), 0);
    }
}
