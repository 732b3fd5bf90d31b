//! Command line front end of the two mapping phases.
//!
//! ```shell
//! $ lutcut enumerate design.blif cuts.json 6
//! $ # an external optimizer writes selection.json from cuts.json
//! $ lutcut rebuild design.blif cuts.json selection.json mapped.blif
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use lutcut::cut::{CutParams, DEFAULT_CUT_LIMIT, DEFAULT_CUT_SIZE};
use lutcut::flow::{run_enumerate, run_rebuild};

#[derive(Debug, Parser)]
#[command(name = "lutcut")]
#[command(about = "K-feasible cut enumeration and cut-driven rebuild of LUT networks")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Enumerate the cuts of a BLIF network and export them as JSON.
    Enumerate {
        input: PathBuf,
        output: PathBuf,
        /// Maximum number of leaves of a cut, 0 meaning the default.
        #[arg(default_value_t = DEFAULT_CUT_SIZE)]
        cut_size: usize,
        /// Maximum number of cuts kept per node.
        #[arg(long, default_value_t = DEFAULT_CUT_LIMIT)]
        cut_limit: usize,
    },
    /// Rebuild a BLIF network from the cuts chosen by the optimizer.
    Rebuild {
        input: PathBuf,
        cuts: PathBuf,
        selection: PathBuf,
        output: PathBuf,
        /// Cut limit to re-enumerate with, when it differs from the one in the cuts file.
        #[arg(long)]
        cut_limit: Option<usize>,
    },
}

/// A cut size of 0 selects the default one.
fn cut_size_or_default(cut_size: usize) -> usize {
    if cut_size == 0 {
        log::warn!("cut size 0, using the default {}", DEFAULT_CUT_SIZE);
        DEFAULT_CUT_SIZE
    } else {
        cut_size
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Enumerate {
            input,
            output,
            cut_size,
            cut_limit,
        } => {
            let params = CutParams::new(cut_size_or_default(cut_size), cut_limit);
            let summary = run_enumerate(&input, &output, params)
                .with_context(|| {
                    format!(
                        "enumerating cuts of {} into {}",
                        input.display(),
                        output.display()
                    )
                })?;
            log::info!(
                "wrote {} cuts of {} LUTs and {} outputs to {}",
                summary.cuts,
                summary.gates,
                summary.outputs,
                output.display()
            );
        }
        Command::Rebuild {
            input,
            cuts,
            selection,
            output,
            cut_limit,
        } => {
            let summary = run_rebuild(&input, &cuts, &selection, &output, cut_limit)
                .with_context(|| {
                    format!(
                        "rebuilding {} from {} and {}",
                        input.display(),
                        cuts.display(),
                        selection.display()
                    )
                })?;
            println!("{}", summary);
            if !summary.diagnostics.is_empty() {
                log::warn!("{} nodes or outputs were left out", summary.diagnostics.len());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cut_size_test() {
        assert_eq!(cut_size_or_default(0), DEFAULT_CUT_SIZE);
        assert_eq!(cut_size_or_default(6), 6);

        let args = Args::try_parse_from(["lutcut", "enumerate", "in.blif", "out.json", "0"]).unwrap();
        let Command::Enumerate { cut_size, .. } = args.command else {
            panic!("expected the enumerate subcommand");
        };
        assert!(CutParams::new(cut_size_or_default(cut_size), DEFAULT_CUT_LIMIT)
            .validate()
            .is_ok());
    }
}
