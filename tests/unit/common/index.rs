//! Unit tests for index.rs

use crbh::error::CrbhError;
use crbh::index::{DirectionalHitIndex, HitTable};
use super::super::helpers::{crbh_fixture, hit_line, make_hit, write_text};

#[test]
fn test_build_groups_by_query() {
    let index = DirectionalHitIndex::build(vec![
        make_hit("a", "x", 100, 1e-40),
        make_hit("b", "y", 100, 1e-30),
        make_hit("a", "z", 100, 1e-20),
    ]);
    assert_eq!(index.num_sources(), 2);
    assert_eq!(index.num_hits(), 3);
    assert_eq!(index.best_hit("a").unwrap().target, "x");
    assert_eq!(index.hits_for("a").unwrap()[1].target, "z");
    assert!(index.hits_for("c").is_none());
    assert!(!index.contains("c"));
}

#[test]
fn test_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let text = [hit_line("q1", "t1", 100, "1e-50"), hit_line("q1", "t2", 80, "1e-10")].concat();
    let path = write_text(dir.path(), "q_into_t.1.blast", &text);

    let index = DirectionalHitIndex::from_path(&path).unwrap();
    assert_eq!(index.num_hits(), 2);
    assert_eq!(index.source_name(), path.display().to_string());
}

#[test]
fn test_from_path_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = DirectionalHitIndex::from_path(&dir.path().join("absent.blast")).unwrap_err();
    assert!(matches!(err, CrbhError::Io(_)));
}

#[test]
fn test_parse_error_names_file_and_line() {
    let dir = tempfile::tempdir().unwrap();
    let text = format!("# comment\n{}q2\tt2\n", hit_line("q1", "t1", 100, "1e-50"));
    let path = write_text(dir.path(), "bad.blast", &text);

    let err = DirectionalHitIndex::from_path(&path).unwrap_err();
    assert!(err.is_parse());
    let message = err.to_string();
    assert!(message.contains("bad.blast"), "{message}");
    assert!(message.contains(":3:"), "{message}");
}

#[test]
fn test_fixture_shape() {
    let (forward, reverse) = crbh_fixture().indexes();
    // 7 strict queries, 10 multi-hit queries, one orphan.
    assert_eq!(forward.num_sources(), 18);
    assert_eq!(forward.num_hits(), 7 + 70 + 1);
    assert_eq!(reverse.num_sources(), 7 + 70);
    assert_eq!(reverse.num_hits(), 7 + 140);
}

#[test]
fn test_fixture_rank_order_violations() {
    let (forward, reverse) = crbh_fixture().indexes();
    // m1 and m3 list a better e-value after rank 0, and so does u3_1 (0.0 after its decoy).
    assert_eq!(forward.rank_order_violations(), 2);
    assert_eq!(reverse.rank_order_violations(), 1);
}

#[test]
fn test_hit_table_insertion_order() {
    let mut table = HitTable::new();
    table.push("z", make_hit("z", "1", 10, 1.0));
    table.push("a", make_hit("a", "2", 10, 1.0));
    table.push("z", make_hit("z", "3", 10, 1.0));
    let ids: Vec<&str> = table.ids().collect();
    assert_eq!(ids, vec!["z", "a"]);
    assert_eq!(table.get("z").unwrap().len(), 2);
    assert_eq!(table.num_hits(), 3);
}
