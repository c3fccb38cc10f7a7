//! Unit tests for search backends over existing outputs

use std::io::Read;
use std::path::{Path, PathBuf};

use crbh::api::Crbh;
use crbh::search::blast_plus::BlastTools;
use crbh::search::{BlastPlus, BlastPlusConfig, Direction, SearchBackend, SequenceType, TabularFiles, TabularText};
use super::super::helpers::{crbh_fixture, hit_line, write_fasta, write_text, FIXTURE_RESCUED, FIXTURE_STRICT};

fn unused_tools(dir: &Path) -> BlastTools {
    let missing = |name: &str| -> PathBuf { dir.join("no-such-bin").join(name) };
    BlastTools {
        makeblastdb: missing("makeblastdb"),
        blastn: missing("blastn"),
        blastx: missing("blastx"),
        tblastn: missing("tblastn"),
    }
}

fn read_all(backend: &impl SearchBackend, direction: Direction) -> String {
    let mut text = String::new();
    backend.search(direction).unwrap().read_to_string(&mut text).unwrap();
    text
}

#[test]
fn test_tabular_text_streams() {
    let backend = TabularText::new("fwd", "rev");
    assert_eq!(read_all(&backend, Direction::Forward), "fwd");
    assert_eq!(read_all(&backend, Direction::Reverse), "rev");
    assert_eq!(backend.stream_name(Direction::Reverse), "text:reverse");
}

#[test]
fn test_tabular_files_streams() {
    let dir = tempfile::tempdir().unwrap();
    let forward = write_text(dir.path(), "a.blast", &hit_line("q1", "t1", 100, "1e-50"));
    let reverse = write_text(dir.path(), "b.blast", &hit_line("t1", "q1", 100, "1e-50"));
    let backend = TabularFiles::new(&forward, &reverse);

    assert!(read_all(&backend, Direction::Forward).starts_with("q1\tt1"));
    assert!(read_all(&backend, Direction::Reverse).starts_with("t1\tq1"));
    assert_eq!(backend.stream_name(Direction::Forward), forward.display().to_string());
}

#[test]
fn test_backend_by_reference() {
    let backend = TabularText::new("x", "y");
    let by_ref = &backend;
    assert_eq!(by_ref.name(), "text");
    assert_eq!(read_all(&by_ref, Direction::Forward), "x");
}

#[test]
fn test_blast_plus_reuses_existing_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let query = write_fasta(dir.path(), "contigs.fa", &[("q1", "ACGTACGTACGTACGTACGT")]);
    let target = write_fasta(dir.path(), "genes.fa", &[("t1", "ACGTTGCAACGTTGCAACGT")]);
    // Existing databases and search outputs mean no BLAST+ program is run.
    write_text(dir.path(), "contigs.nin", "");
    write_text(dir.path(), "genes.nin", "");
    let fixture = crbh_fixture();
    write_text(dir.path(), "contigs_into_genes.1.blast", &fixture.forward);
    write_text(dir.path(), "genes_into_contigs.2.blast", &fixture.reverse);

    let mut backend = BlastPlus::with_tools(&query, &target, unused_tools(dir.path()), BlastPlusConfig::default());
    let databases = backend.prepare().unwrap();
    assert_eq!(databases.query_name, "contigs");
    assert_eq!(databases.target_type, SequenceType::Nucleotide);

    let mut crbh = Crbh::new(backend);
    let summary = crbh.run().unwrap();
    assert_eq!(summary.strict, FIXTURE_STRICT);
    assert_eq!(summary.rescued, FIXTURE_RESCUED);
    assert!(crbh
        .forward_index()
        .unwrap()
        .source_name()
        .ends_with("contigs_into_genes.1.blast"));
}

#[test]
fn test_blast_plus_protein_target_databases() {
    let dir = tempfile::tempdir().unwrap();
    let query = write_fasta(dir.path(), "contigs.fa", &[("q1", "ACGTACGTACGTACGTACGT")]);
    let target = write_fasta(dir.path(), "proteome.fa", &[("p1", "MKVLAAGIVGLLLAQSTEEW")]);
    write_text(dir.path(), "contigs.nsq", "");
    write_text(dir.path(), "proteome.psq", "");

    let mut backend = BlastPlus::with_tools(&query, &target, unused_tools(dir.path()), BlastPlusConfig::default());
    let databases = backend.prepare().unwrap();
    assert!(databases.target_is_protein());
}

#[test]
fn test_blast_plus_rejects_protein_query() {
    let dir = tempfile::tempdir().unwrap();
    let query = write_fasta(dir.path(), "proteome.fa", &[("p1", "MKVLAAGIVGLLLAQSTEEW")]);
    let target = write_fasta(dir.path(), "contigs.fa", &[("q1", "ACGTACGTACGTACGTACGT")]);

    let mut backend = BlastPlus::with_tools(&query, &target, unused_tools(dir.path()), BlastPlusConfig::default());
    let err = backend.prepare().unwrap_err();
    assert!(err.to_string().contains("not nucleotide"), "{err}");
    assert!(backend.databases().is_none());
}

#[test]
fn test_blast_plus_missing_tool_fails() {
    let dir = tempfile::tempdir().unwrap();
    let query = write_fasta(dir.path(), "contigs.fa", &[("q1", "ACGTACGTACGTACGTACGT")]);
    let target = write_fasta(dir.path(), "genes.fa", &[("t1", "ACGTTGCAACGTTGCAACGT")]);

    // No cached database, so makeblastdb must run and cannot be spawned.
    let mut backend = BlastPlus::with_tools(&query, &target, unused_tools(dir.path()), BlastPlusConfig::default());
    assert!(backend.prepare().is_err());
}
