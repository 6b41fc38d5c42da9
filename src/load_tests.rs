#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::{Cursor, Write};

    use crate::hierarchy::IdScheme;
    use crate::{
        classify, load, load_from_reader, resolve_row, row_of, write_records, Error, HealthCheck,
        HierarchyStats, LoadOptions, Role, WriteOptions,
    };

    const SMALL: &str = "root;1;0.0\nroot.0;1;1.0\nroot.2;0;2.0\n";

    fn small_options() -> LoadOptions {
        LoadOptions::default()
            .with_class_column(true)
            .with_breadth_fill(true)
            .with_scheme(IdScheme::new("root", '.'))
    }

    #[test]
    fn small_example_fills_sibling_gap() -> crate::Result<()> {
        let h = load_from_reader(Cursor::new(SMALL), &small_options())?;

        assert_eq!(h.node_count(), 4);
        assert_eq!(h.instance_count(), 3);
        assert_eq!(h.class_histogram().get("0"), Some(&1));
        assert_eq!(h.class_histogram().get("1"), Some(&2));
        assert_eq!(h.class_histogram().len(), 2);

        let gap = h.find_by_id("root.1").unwrap();
        assert!(gap.is_synthesized());
        assert!(gap.instances().is_empty());

        let children: Vec<&str> = h.children(h.root()).map(|n| n.id()).collect();
        assert_eq!(children, vec!["root.0", "root.1", "root.2"]);
        Ok(())
    }

    #[test]
    fn without_breadth_fill_only_explicit_nodes() -> crate::Result<()> {
        let h = load_from_reader(Cursor::new(SMALL), &small_options().with_breadth_fill(false))?;
        assert_eq!(h.node_count(), 3);
        assert!(h.find_by_id("root.1").is_none());
        Ok(())
    }

    #[test]
    fn short_row_is_malformed() {
        let err = load_from_reader(Cursor::new("root;1;0.0\nroot.1;1\n"), &small_options()).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line: 2, .. }));
    }

    #[test]
    fn non_numeric_feature_is_rejected() {
        let err = load_from_reader(Cursor::new("root;1;0.0\nroot.1;1;abc\n"), &small_options()).unwrap_err();
        match err {
            Error::InvalidFeatureValue { line, column, token } => {
                assert_eq!((line, column), (2, 0));
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_root_is_rejected() {
        let err = load_from_reader(Cursor::new("root.0;1;0.0\n"), &small_options()).unwrap_err();
        assert!(matches!(err, Error::MissingOrDuplicateRoot { found: 0, .. }));
        assert!(!err.is_ingest_error());
    }

    #[test]
    fn foreign_identifier_is_unresolvable() {
        let err = load_from_reader(Cursor::new("root;1;0.0\nother.3;1;1.0\n"), &small_options()).unwrap_err();
        assert!(matches!(err, Error::UnresolvableParent { ref id } if id == "other.3"));
    }

    #[test]
    fn loads_from_file() -> crate::Result<()> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"gen.0;0.0;0.0\ngen.0.1.4;1.0;2.0\ngen.0.1.4;1.5;2.5\n").unwrap();

        let h = load(file.path(), &LoadOptions::default())?;
        assert_eq!(h.node_count(), 3);
        assert_eq!(h.feature_count(), 2);
        assert_eq!(h.find_by_id("gen.0.1.4").unwrap().instances().len(), 2);
        assert!(h.find_by_id("gen.0.1").unwrap().is_synthesized());
        Ok(())
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("absent.csv"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
        assert!(err.is_ingest_error());
    }

    #[test]
    fn detected_layout_loads() -> crate::Result<()> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"id;class;name;a;b\ngen.0;gen.0;r;0;0\ngen.0.0;gen.0.0;c;1;1\n")
            .unwrap();

        let options = LoadOptions::detect(file.path())?;
        assert!(options.has_header && options.has_class_column && options.has_name_column);

        let h = load(file.path(), &options)?;
        assert_eq!(h.feature_names(), Some(&["a".to_string(), "b".to_string()][..]));
        assert_eq!(h.root().instances()[0].name(), Some("r"));
        assert_eq!(h.class_count("gen.0", true), Some(2));
        Ok(())
    }

    #[test]
    fn written_records_reload_to_same_structure() -> crate::Result<()> {
        let options = small_options().with_name_column(true).with_header(true);
        let input = "id;class;name;x;y\nroot;1;a;0.5;1\nroot.2.1;0;;2;3\nroot.0;1;b;-1;0.25\n";
        let h = load_from_reader(Cursor::new(input), &options)?;

        let mut out = Vec::new();
        write_records(&h, &mut out, &WriteOptions::matching(&options)).unwrap();
        let again = load_from_reader(Cursor::new(out), &options)?;

        let ids = |h: &crate::Hierarchy| -> Vec<(String, usize, bool)> {
            h.all_nodes()
                .iter()
                .map(|n| (n.id().to_string(), n.instances().len(), n.is_synthesized()))
                .collect()
        };
        assert_eq!(ids(&h), ids(&again));
        assert_eq!(h.class_histogram(), again.class_histogram());
        assert_eq!(again.feature_names(), h.feature_names());
        let leaf = again.find_by_id("root.2.1").unwrap();
        assert_eq!(leaf.instances()[0].features(), &[2.0, 3.0]);
        assert_eq!(leaf.instances()[0].name(), None);
        Ok(())
    }

    #[test]
    fn queries_on_loaded_hierarchy() -> crate::Result<()> {
        let h = load_from_reader(Cursor::new(SMALL), &small_options())?;

        let focus = resolve_row(&h, 2).unwrap();
        assert_eq!(focus.id(), "root.1");
        assert_eq!(row_of(&h, focus), Some(2));
        assert_eq!(classify(&h, focus, h.root()), Role::DirectParent);
        assert_eq!(classify(&h, focus, h.find_by_id("root.2").unwrap()), Role::Other);

        let stats = HierarchyStats::compute(&h);
        assert_eq!(stats.height(), 1);
        assert_eq!(stats.leaf_count, 3);

        let report = h.health_check();
        assert!(report.is_healthy(), "{report}");
        Ok(())
    }

    #[test]
    fn hierarchy_can_be_read_from_threads() -> crate::Result<()> {
        let h = load_from_reader(Cursor::new(SMALL), &small_options())?;
        let counts: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = h
                .all_nodes()
                .iter()
                .map(|focus| {
                    let h = &h;
                    s.spawn(move || {
                        h.all_nodes()
                            .iter()
                            .filter(|n| classify(h, focus, n) == Role::Child)
                            .count()
                    })
                })
                .collect();
            handles.into_iter().map(|t| t.join().unwrap()).collect()
        });
        assert_eq!(counts, vec![3, 0, 0, 0]);
        Ok(())
    }
}
