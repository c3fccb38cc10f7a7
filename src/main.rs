use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crbh::api::{Crbh, RunSummary};
use crbh::blastinput::{resolve_threads, BlastArgs, OutputArgs, TabularArgs};
use crbh::report::{write_missed, write_reciprocals, OutputConfig, ReportContext};
use crbh::search::{BlastPlus, SearchBackend, TabularFiles};

#[derive(Parser)]
#[command(name = "crbh")]
#[command(version)]
#[command(about = "Conditional reciprocal best hit ortholog detection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run BLAST+ both ways between two FASTA files, then match
    Blast(BlastArgs),

    /// Match precomputed BLAST tabular (outfmt 6) files
    Tabular(TabularArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn build_thread_pool(num_threads: usize) -> Result<()> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .context("Failed to build thread pool")
}

fn open_writer(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn write_results<B: SearchBackend>(crbh: &Crbh<B>, out: &OutputArgs, context: &ReportContext) -> Result<()> {
    let config = if out.plain {
        OutputConfig::plain()
    } else {
        OutputConfig::blast_compatible()
    }
    .with_header(out.header);

    if let Some(reciprocals) = crbh.reciprocals() {
        let mut writer = open_writer(out.output.as_ref())?;
        write_reciprocals(&mut writer, reciprocals, &config, context).context("Failed to write reciprocal hits")?;
        writer.flush()?;
    }

    if let (Some(path), Some(residual)) = (out.missed.as_ref(), crbh.residual_missed()) {
        let mut writer = open_writer(Some(path))?;
        write_missed(&mut writer, &residual, &config, context).context("Failed to write missed hits")?;
        writer.flush()?;
    }
    Ok(())
}

fn log_summary(summary: &RunSummary) {
    log::info!(
        "Loaded {} forward and {} reverse hits",
        summary.forward_hits,
        summary.reverse_hits
    );
    log::info!(
        "{} strict reciprocal hits, {} rescued, {} query sequences with an ortholog ({} candidate entries)",
        summary.strict,
        summary.rescued,
        summary.reciprocal_ids,
        summary.missed_entries
    );
}

fn run_blast(args: BlastArgs) -> Result<()> {
    init_logging(args.out.verbose);
    let num_threads = resolve_threads(args.num_threads);
    build_thread_pool(num_threads)?;

    let mut backend = BlastPlus::new(&args.query, &args.target, args.blast_config(num_threads))?;
    backend.prepare()?;

    let context = ReportContext {
        query_name: Some(args.query.display().to_string()),
        target_name: Some(args.target.display().to_string()),
        ..Default::default()
    };

    let mut crbh = Crbh::new(backend);
    let summary = crbh.run()?;
    log_summary(&summary);
    write_results(&crbh, &args.out, &context)
}

fn run_tabular(args: TabularArgs) -> Result<()> {
    init_logging(args.out.verbose);

    let context = ReportContext {
        query_name: Some(args.forward.display().to_string()),
        target_name: Some(args.reverse.display().to_string()),
        ..Default::default()
    };

    let mut crbh = Crbh::new(TabularFiles::new(&args.forward, &args.reverse));
    let summary = crbh.run()?;
    log_summary(&summary);
    write_results(&crbh, &args.out, &context)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Blast(args) => run_blast(args)?,
        Commands::Tabular(args) => run_tabular(args)?,
    }
    Ok(())
}
