//! Unit tests for common.rs

use std::cmp::Ordering;

use crbh::common::{evalue_comp, Hit, TABULAR_COLUMNS, TABULAR_FIELDS};
use crbh::error::CrbhError;
use super::super::helpers::{hit_line, make_hit};

#[test]
fn test_parse_line_fields() {
    let hit = Hit::parse_line("contig_1\tprot_9\t87.50\t240\t30\t0\t1\t720\t5\t244\t3.2e-41\t166.4").unwrap();
    assert_eq!(hit.query, "contig_1");
    assert_eq!(hit.target, "prot_9");
    assert_eq!(hit.identity, 87.5);
    assert_eq!(hit.length, 240);
    assert_eq!(hit.mismatch, 30);
    assert_eq!(hit.gapopen, 0);
    assert_eq!((hit.q_start, hit.q_end), (1, 720));
    assert_eq!((hit.t_start, hit.t_end), (5, 244));
    assert_eq!(hit.e_value, 3.2e-41);
    assert_eq!(hit.bit_score, 166.4);
}

#[test]
fn test_parse_line_matches_helper() {
    let line = hit_line("a", "b", 100, "1e-50");
    let parsed = Hit::parse_line(line.trim_end()).unwrap();
    assert_eq!(parsed, make_hit("a", "b", 100, 1e-50));
}

#[test]
fn test_wrong_field_count_rejected() {
    assert!(Hit::parse_line("a\tb\t90.0\t100").is_err());
    let extra = format!("{}\textra", hit_line("a", "b", 100, "1e-5").trim_end());
    assert!(Hit::parse_line(&extra).is_err());
}

#[test]
fn test_non_numeric_fields_rejected() {
    assert!(Hit::parse_line("a\tb\t90.0\tlong\t1\t0\t1\t100\t1\t100\t1e-5\t50.0").is_err());
    assert!(Hit::parse_line("a\tb\t90.0\t100\t1\t0\t1\t100\t1\t100\tsmall\t50.0").is_err());
}

#[test]
fn test_negative_evalue_rejected() {
    assert!(Hit::parse_line("a\tb\t90.0\t100\t1\t0\t1\t100\t1\t100\t-1e-5\t50.0").is_err());
}

#[test]
fn test_from_str_gives_parse_error() {
    let err = "not a record".parse::<Hit>().unwrap_err();
    assert!(matches!(err, CrbhError::Parse { .. }));
}

#[test]
fn test_transformed_evalue_floors_zero() {
    assert!((make_hit("a", "b", 100, 0.0).transformed_evalue() - 200.0).abs() < 1e-9);
    assert!((make_hit("a", "b", 100, 1e-50).transformed_evalue() - 50.0).abs() < 1e-9);
}

#[test]
fn test_same_pair_ignores_scores() {
    let a = make_hit("q", "t", 100, 1e-50);
    let b = make_hit("q", "t", 40, 1e-3);
    let c = make_hit("q", "u", 100, 1e-50);
    assert!(a.same_pair(&b));
    assert!(!a.same_pair(&c));
}

#[test]
fn test_evalue_comp_ordering() {
    assert_eq!(evalue_comp(1e-50, 1e-10), Ordering::Less);
    assert_eq!(evalue_comp(1e-10, 1e-50), Ordering::Greater);
    assert_eq!(evalue_comp(1e-5, 1e-5), Ordering::Equal);
}

#[test]
fn test_tabular_columns() {
    assert_eq!(TABULAR_COLUMNS.len(), TABULAR_FIELDS);
    assert_eq!(TABULAR_COLUMNS[0], "qseqid");
    assert_eq!(TABULAR_COLUMNS[TABULAR_FIELDS - 1], "bitscore");
}
