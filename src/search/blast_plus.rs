//! NCBI BLAST+ backend
//!
//! Builds one database per input FASTA with `makeblastdb`, then searches in
//! both directions:
//!
//! | target     | forward (query -> target) | reverse (target -> query) |
//! |------------|---------------------------|---------------------------|
//! | nucleotide | `blastn`                  | `blastn`                  |
//! | protein    | `blastx`                  | `tblastn`                 |
//!
//! Databases and search outputs already present in the working directory are
//! reused, so an interrupted run resumes from the last finished step.

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use super::seqtype::{classify_fasta, SequenceType};
use super::{Direction, HitStream, SearchBackend};
use crate::blastinput::crbh_args::{DEFAULT_EVALUE, DEFAULT_MAX_TARGET_SEQS, DEFAULT_NUM_THREADS};
use crate::error::CrbhError;

/// Directory searched before `PATH` when locating BLAST+ programs.
pub const BLAST_PATH_ENV: &str = "CRBH_BLAST_PATH";

/// Search parameters passed to every BLAST+ search.
#[derive(Debug, Clone)]
pub struct BlastPlusConfig {
    pub evalue: f64,
    pub num_threads: usize,
    pub max_target_seqs: usize,
    /// Where databases and outputs are written; defaults to the query's directory.
    pub working_dir: Option<PathBuf>,
    /// Show a spinner while a search runs.
    pub progress: bool,
}

impl Default for BlastPlusConfig {
    fn default() -> Self {
        Self {
            evalue: DEFAULT_EVALUE,
            num_threads: DEFAULT_NUM_THREADS,
            max_target_seqs: DEFAULT_MAX_TARGET_SEQS,
            working_dir: None,
            progress: false,
        }
    }
}

/// Resolved paths of the BLAST+ programs.
#[derive(Debug, Clone)]
pub struct BlastTools {
    pub makeblastdb: PathBuf,
    pub blastn: PathBuf,
    pub blastx: PathBuf,
    pub tblastn: PathBuf,
}

impl BlastTools {
    /// Locate every program, failing on the first one missing.
    pub fn locate() -> Result<Self> {
        Ok(Self {
            makeblastdb: which("makeblastdb")?,
            blastn: which("blastn")?,
            blastx: which("blastx")?,
            tblastn: which("tblastn")?,
        })
    }
}

/// Find `program` in `$CRBH_BLAST_PATH` then `$PATH`.
pub fn which(program: &str) -> Result<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    if let Some(dir) = env::var_os(BLAST_PATH_ENV) {
        dirs.push(PathBuf::from(dir));
    }
    if let Some(path) = env::var_os("PATH") {
        dirs.extend(env::split_paths(&path));
    }
    for dir in dirs {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    bail!("{} was not in the PATH", program)
}

/// Database name for a FASTA path: the file name without its last extension.
pub fn database_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Databases built by [`BlastPlus::prepare`].
#[derive(Debug, Clone)]
pub struct Databases {
    pub query_name: String,
    pub target_name: String,
    pub target_type: SequenceType,
}

impl Databases {
    pub fn target_is_protein(&self) -> bool {
        self.target_type == SequenceType::Protein
    }
}

/// BLAST+ backend for one query/target pair.
#[derive(Debug)]
pub struct BlastPlus {
    query: PathBuf,
    target: PathBuf,
    working_dir: PathBuf,
    tools: BlastTools,
    config: BlastPlusConfig,
    databases: Option<Databases>,
    /// Both directions search at once; their spinners share one display.
    spinners: MultiProgress,
}

impl BlastPlus {
    /// Locate the BLAST+ programs for a search between `query` and `target`.
    pub fn new(query: impl Into<PathBuf>, target: impl Into<PathBuf>, config: BlastPlusConfig) -> Result<Self> {
        let tools = BlastTools::locate()?;
        Ok(Self::with_tools(query, target, tools, config))
    }

    pub fn with_tools(
        query: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        tools: BlastTools,
        config: BlastPlusConfig,
    ) -> Self {
        let query = query.into();
        let target = target.into();
        let working_dir = config.working_dir.clone().unwrap_or_else(|| {
            query
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        });
        Self {
            query,
            target,
            working_dir,
            tools,
            config,
            databases: None,
            spinners: MultiProgress::new(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn databases(&self) -> Option<&Databases> {
        self.databases.as_ref()
    }

    /// Check input types and build both databases unless already present.
    ///
    /// The query must be nucleotide. The target is protein when more than 90%
    /// of its records look like protein.
    pub fn prepare(&mut self) -> Result<&Databases> {
        let query_comp = classify_fasta(&self.query)?;
        if !query_comp.all_nucleotide() {
            bail!(
                "Query sequence looks like it's not nucleotide: {} of {} records in {} look like protein",
                query_comp.protein_records,
                query_comp.records,
                self.query.display()
            );
        }
        let target_type = classify_fasta(&self.target)?.file_type();
        log::info!("Target {} looks like {:?}", self.target.display(), target_type);

        let query_name = database_name(&self.query);
        let target_name = database_name(&self.target);

        if self.database_exists(&query_name, SequenceType::Nucleotide) {
            log::info!("Reusing query database {}", query_name);
        } else {
            self.make_database(&self.query, &query_name, SequenceType::Nucleotide)?;
        }
        if self.database_exists(&target_name, target_type) {
            log::info!("Reusing target database {}", target_name);
        } else {
            self.make_database(&self.target, &target_name, target_type)?;
        }

        Ok(self.databases.insert(Databases {
            query_name,
            target_name,
            target_type,
        }))
    }

    fn database_exists(&self, name: &str, seq_type: SequenceType) -> bool {
        let suffixes: &[&str] = match seq_type {
            SequenceType::Nucleotide => &["nin", "nsq"],
            SequenceType::Protein => &["pin", "psq"],
        };
        suffixes
            .iter()
            .any(|suffix| self.working_dir.join(format!("{}.{}", name, suffix)).is_file())
    }

    fn make_database(&self, fasta: &Path, name: &str, seq_type: SequenceType) -> Result<()> {
        let mut cmd = Command::new(&self.tools.makeblastdb);
        cmd.arg("-in")
            .arg(fasta)
            .arg("-dbtype")
            .arg(seq_type.dbtype())
            .arg("-title")
            .arg(name)
            .arg("-out")
            .arg(self.working_dir.join(name));
        run_command(cmd, &format!("makeblastdb {}", name), None)
    }

    /// `-num_threads` for one search. Forward and reverse run concurrently,
    /// so each gets half of the configured threads (at least one).
    pub fn search_threads(&self) -> usize {
        (self.config.num_threads / 2).max(1)
    }

    /// Output path for a direction's search.
    pub fn output_path(&self, databases: &Databases, direction: Direction) -> PathBuf {
        let file = match direction {
            Direction::Forward => format!("{}_into_{}.1.blast", databases.query_name, databases.target_name),
            Direction::Reverse => format!("{}_into_{}.2.blast", databases.target_name, databases.query_name),
        };
        self.working_dir.join(file)
    }

    /// Build the search command for `direction`.
    pub fn search_command(&self, databases: &Databases, direction: Direction) -> Command {
        let (program, input, db) = match (direction, databases.target_is_protein()) {
            (Direction::Forward, false) => (&self.tools.blastn, &self.query, &databases.target_name),
            (Direction::Forward, true) => (&self.tools.blastx, &self.query, &databases.target_name),
            (Direction::Reverse, false) => (&self.tools.blastn, &self.target, &databases.query_name),
            (Direction::Reverse, true) => (&self.tools.tblastn, &self.target, &databases.query_name),
        };
        let mut cmd = Command::new(program);
        cmd.arg("-query")
            .arg(input)
            .arg("-db")
            .arg(self.working_dir.join(db))
            .arg("-out")
            .arg(self.output_path(databases, direction))
            .arg("-evalue")
            .arg(self.config.evalue.to_string())
            .arg("-outfmt")
            .arg("6")
            .arg("-max_target_seqs")
            .arg(self.config.max_target_seqs.to_string())
            .arg("-num_threads")
            .arg(self.search_threads().to_string());
        cmd
    }
}

impl SearchBackend for BlastPlus {
    fn name(&self) -> &str {
        "blast+"
    }

    fn search(&self, direction: Direction) -> Result<HitStream> {
        let databases = self
            .databases
            .as_ref()
            .ok_or_else(|| CrbhError::state("BLAST databases must be prepared before searching"))?;
        let output = self.output_path(databases, direction);

        if output.is_file() {
            log::info!("Reusing {} search output {}", direction, output.display());
        } else {
            let cmd = self.search_command(databases, direction);
            let spinners = self.config.progress.then_some(&self.spinners);
            run_command(cmd, &format!("{} search", direction), spinners)?;
        }

        let file = File::open(&output)
            .with_context(|| format!("Failed to open {} search output: {}", direction, output.display()))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn stream_name(&self, direction: Direction) -> String {
        match &self.databases {
            Some(databases) => self.output_path(databases, direction).display().to_string(),
            None => format!("{}:{}", self.name(), direction),
        }
    }
}

fn run_command(mut cmd: Command, label: &str, spinners: Option<&MultiProgress>) -> Result<()> {
    log::debug!("Running {:?}", cmd);
    let bar = if let Some(spinners) = spinners {
        let bar = spinners.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .context("Invalid progress template")?,
        );
        bar.set_message(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Some(bar)
    } else {
        None
    };

    let start = Instant::now();
    let output = cmd
        .output()
        .with_context(|| format!("Failed to launch {}", label))?;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    if !output.status.success() {
        bail!(
            "{} failed ({}): {}",
            label,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    log::info!("{} finished in {:.2?}", label, start.elapsed());
    Ok(())
}
