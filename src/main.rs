use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ferrite_digits::commands::{run_evaluate, run_train};
use ferrite_digits::config::{ConfigOverrides, RunConfig};
use ferrite_digits::logging::init_logging;

/// Handwritten digit classifier: a one-hidden-layer sigmoid network trained
/// on MNIST with mini-batch SGD.
#[derive(Parser)]
#[command(name = "ferrite-digits", version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a network on MNIST and export its parameters
    Train(TrainArgs),
    /// Report test-set accuracy of exported parameters
    Evaluate {
        /// JSON file written by `train`
        #[arg(long, value_name = "PATH")]
        weights: PathBuf,
        /// Directory holding the MNIST IDX files
        #[arg(long, value_name = "DIR", default_value = ".")]
        data_dir: PathBuf,
    },
}

#[derive(Args)]
struct TrainArgs {
    /// JSON run configuration; flags below override its values
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Hidden layer size
    #[arg(long, value_name = "INT")]
    hidden: Option<usize>,
    #[arg(short, long, value_name = "INT")]
    epochs: Option<usize>,
    #[arg(short, long, value_name = "INT")]
    batch_size: Option<usize>,
    #[arg(short, long, value_name = "FLOAT")]
    learning_rate: Option<f32>,
    /// Seed for initialization and shuffling
    #[arg(long, value_name = "INT")]
    seed: Option<u64>,
    #[arg(long, value_name = "PATH")]
    weights_out: Option<PathBuf>,
    /// CSV file for per-epoch accuracy
    #[arg(long, value_name = "PATH")]
    accuracy_log: Option<PathBuf>,
    /// Skip per-epoch accuracy measurement
    #[arg(long)]
    no_report: bool,
}

impl TrainArgs {
    fn into_config(self) -> Result<RunConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load_json(path)?,
            None => RunConfig::default(),
        };
        config.apply(ConfigOverrides {
            data_dir: self.data_dir,
            hidden_neurons: self.hidden,
            epochs: self.epochs,
            mini_batch_size: self.batch_size,
            learning_rate: self.learning_rate,
            seed: self.seed,
            weights_out: self.weights_out,
            accuracy_log: self.accuracy_log,
            no_report: self.no_report,
        });
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Command::Train(args) => {
            let config = args.into_config()?;
            let report = run_train(&config)?;
            println!(
                "trained {} epochs: training accuracy {:.2}%, test accuracy {:.2}%",
                report.epochs.len(),
                report.final_training_accuracy * 100.0,
                report.final_test_accuracy.unwrap_or(0.0) * 100.0
            );
        }
        Command::Evaluate { weights, data_dir } => {
            let acc = run_evaluate(&weights, &data_dir)?;
            println!("test accuracy {:.2}%", acc * 100.0);
        }
    }
    Ok(())
}
