// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and delegates to the use cases in
// Layer 2. This is the only layer that prints:
//
//   run      → `test auc=<v> acc=<v>` on stderr
//   predict  → `smiles,score` lines on stdout
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, RunArgs};

#[derive(Parser, Debug)]
#[command(
    name = "chem-bench",
    version,
    about = "Download a molecular dataset, train a binary classifier, and report test AUC/accuracy."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Run(args) => run_benchmark(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_benchmark(args: RunArgs) -> Result<()> {
    use crate::application::benchmark_use_case::BenchmarkUseCase;

    let use_case = BenchmarkUseCase::new(args.into());
    let report = use_case.execute()?;

    eprintln!("{}", report.metrics.summary_line());
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case = PredictUseCase::from_checkpoint(&args.checkpoint_dir)?;
    for (smiles, score) in use_case.score_file(&args.input, &args.smiles_column)? {
        println!("{smiles},{score:.6}");
    }
    Ok(())
}
