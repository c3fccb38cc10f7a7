//! Command-line arguments for the `blast` and `tabular` subcommands

use std::path::PathBuf;

use clap::Args;

use crate::search::BlastPlusConfig;

pub const DEFAULT_EVALUE: f64 = 1e-5;
pub const DEFAULT_NUM_THREADS: usize = 1;
pub const DEFAULT_MAX_TARGET_SEQS: usize = 50;

/// Output options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write reciprocal hits here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Also write the candidates left unpromoted after rescue
    #[arg(long)]
    pub missed: Option<PathBuf>,
    /// Prefix the tables with a `#` header block (outfmt 7 style)
    #[arg(long, default_value_t = false)]
    pub header: bool,
    /// Print e-values and bit scores with fixed precision instead of BLAST's tabular style
    #[arg(long, default_value_t = false)]
    pub plain: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Run BLAST+ in both directions, then find conditional reciprocal best hits.
#[derive(Args, Debug, Clone)]
pub struct BlastArgs {
    /// Nucleotide FASTA (e.g. assembled transcripts)
    #[arg(short, long)]
    pub query: PathBuf,
    /// Nucleotide or protein FASTA to find orthologs in
    #[arg(short, long)]
    pub target: PathBuf,
    #[arg(short, long, default_value_t = DEFAULT_EVALUE)]
    pub evalue: f64,
    /// Threads for BLAST+ and for parsing (0 = all CPUs)
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_THREADS)]
    pub num_threads: usize,
    #[arg(long, default_value_t = DEFAULT_MAX_TARGET_SEQS)]
    pub max_target_seqs: usize,
    /// Directory for databases and search outputs (default: the query's directory)
    #[arg(short = 'w', long)]
    pub working_dir: Option<PathBuf>,
    #[command(flatten)]
    pub out: OutputArgs,
}

impl BlastArgs {
    pub fn blast_config(&self, num_threads: usize) -> BlastPlusConfig {
        BlastPlusConfig {
            evalue: self.evalue,
            num_threads,
            max_target_seqs: self.max_target_seqs,
            working_dir: self.working_dir.clone(),
            progress: self.out.verbose > 0,
        }
    }
}

/// Find conditional reciprocal best hits in precomputed outfmt 6 files.
#[derive(Args, Debug, Clone)]
pub struct TabularArgs {
    /// Query-against-target hits
    #[arg(short, long)]
    pub forward: PathBuf,
    /// Target-against-query hits
    #[arg(short, long)]
    pub reverse: PathBuf,
    #[command(flatten)]
    pub out: OutputArgs,
}

/// Resolve a thread-count argument, 0 meaning every CPU.
pub fn resolve_threads(num_threads: usize) -> usize {
    if num_threads == 0 {
        num_cpus::get()
    } else {
        num_threads
    }
}
