//! stockcast CLI for training and forecasting price series.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockcast_core::Seed;
use stockcast_data::PriceFrame;
use stockcast_train::{evaluate, forecast, spawn_training, CancelToken, TrainEvent, TrainSpec};

#[derive(Parser)]
#[command(name = "stockcast")]
#[command(author, version)]
#[command(about = "LSTM price forecasting CLI - train on a CSV and forecast future values")]
#[command(long_about = "stockcast: next-step price forecasting with a stacked LSTM.

EXAMPLES:
  # Inspect a CSV before training
  stockcast inspect prices.csv

  # Train on the Close column and forecast 30 steps
  stockcast train --csv prices.csv --target Close --horizon 30

  # Use calendar labels and a longer window
  stockcast train --csv prices.csv --target Close --date-col Date --seq-length 90")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the columns and row count of a CSV file
    Inspect {
        /// Path to the CSV file
        csv: PathBuf,
    },
    /// Train a model and forecast future values
    Train {
        /// Path to the CSV file with a header row
        #[arg(long, value_name = "FILE")]
        csv: PathBuf,

        /// Target column to model (e.g., Close)
        #[arg(long, value_name = "COLUMN")]
        target: String,

        /// Date column used to label forecast steps
        #[arg(long, value_name = "COLUMN")]
        date_col: Option<String>,

        /// Input window length
        #[arg(long, default_value = "60", value_name = "N")]
        seq_length: usize,

        /// Fraction of windows held out for evaluation
        #[arg(long, default_value = "0.2", value_name = "FRAC")]
        test_size: f32,

        /// Number of training epochs
        #[arg(long, default_value = "50", value_name = "N")]
        epochs: usize,

        /// Learning rate for Adam optimizer
        #[arg(long, default_value = "0.001", value_name = "LR")]
        lr: f64,

        /// Batch size for training
        #[arg(long, default_value = "32", value_name = "SIZE")]
        batch_size: usize,

        /// Early stopping patience on training loss (0 = disabled)
        #[arg(long, default_value = "5", value_name = "N")]
        patience: usize,

        /// Random seed for reproducibility
        #[arg(long, default_value = "42", value_name = "SEED")]
        seed: u64,

        /// Number of steps to forecast past the end of the series
        #[arg(long, default_value = "30", value_name = "N")]
        horizon: usize,

        /// Output directory for the training history
        #[arg(long, default_value = "./runs", value_name = "DIR")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::from_level(log_level))
        .init();

    match cli.command {
        Commands::Inspect { csv } => handle_inspect(csv),
        Commands::Train {
            csv,
            target,
            date_col,
            seq_length,
            test_size,
            epochs,
            lr,
            batch_size,
            patience,
            seed,
            horizon,
            output,
        } => handle_train(TrainArgs {
            csv,
            target,
            date_col,
            seq_length,
            test_size,
            epochs,
            lr,
            batch_size,
            patience,
            seed,
            horizon,
            output,
        }),
    }
}

fn handle_inspect(csv: PathBuf) -> Result<()> {
    let frame = PriceFrame::from_csv(&csv)
        .with_context(|| format!("Failed to read CSV file {:?}", csv))?;

    println!("File: {:?}", csv);
    println!("─────────────────────────────────────────");
    println!("  Rows:    {}", frame.n_rows());
    println!("  Columns: {}", frame.column_names().len());
    println!();
    println!("  {:<20} {:>10} {:>8}", "Column", "Numeric", "Dates");
    for name in frame.column_names() {
        let numeric = frame.numeric_column(name).is_ok();
        let dates = frame.date_column(name).is_ok();
        println!(
            "  {:<20} {:>10} {:>8}",
            name,
            if numeric { "yes" } else { "no" },
            if dates { "yes" } else { "no" }
        );
    }
    Ok(())
}

struct TrainArgs {
    csv: PathBuf,
    target: String,
    date_col: Option<String>,
    seq_length: usize,
    test_size: f32,
    epochs: usize,
    lr: f64,
    batch_size: usize,
    patience: usize,
    seed: u64,
    horizon: usize,
    output: PathBuf,
}

fn handle_train(args: TrainArgs) -> Result<()> {
    println!("=== stockcast Training ===\n");
    println!("Configuration:");
    println!("  CSV: {:?}", args.csv);
    println!("  Target column: {}", args.target);
    if let Some(col) = &args.date_col {
        println!("  Date column: {}", col);
    }
    println!("  Window length: {}", args.seq_length);
    println!("  Test size: {}", args.test_size);
    println!("  Epochs: {}", args.epochs);
    println!("  Learning rate: {}", args.lr);
    println!("  Batch size: {}", args.batch_size);
    println!("  Seed: {}", args.seed);
    println!("  Forecast horizon: {}\n", args.horizon);

    let frame = PriceFrame::from_csv(&args.csv)
        .with_context(|| format!("Failed to read CSV file {:?}", args.csv))?;
    if !frame.has_column(&args.target) {
        bail!(
            "Column '{}' not found. Use 'stockcast inspect {:?}' to list columns.",
            args.target,
            args.csv
        );
    }

    println!("Loaded {} rows.\n", frame.n_rows());

    let spec = TrainSpec {
        date_col: args.date_col,
        seq_length: args.seq_length,
        test_size: args.test_size,
        n_epochs: args.epochs,
        batch_size: args.batch_size,
        lr: args.lr,
        early_stopping_patience: args.patience,
        seed: Seed::new(args.seed),
        ..TrainSpec::new(frame, &args.target)
    };

    println!("Starting training...\n");
    let (events, handle) = spawn_training(spec, CancelToken::new());

    let mut fit = None;
    for event in events {
        match event {
            TrainEvent::Progress(percent) => {
                println!("  Progress: {percent:3}%");
            }
            TrainEvent::Completed(result) => fit = Some(result),
            TrainEvent::Failed(err) => bail!("Training failed: {err}"),
            TrainEvent::Cancelled => bail!("Training was cancelled"),
        }
    }
    handle.join().map_err(|_| anyhow::anyhow!("Training thread panicked"))?;

    let fit = fit.context("Training ended without a result")?;

    println!("\nTraining complete!");
    println!("  Epochs run: {}", fit.epochs_run);
    println!("  Best epoch: {}", fit.best_epoch + 1);
    println!("  Training time: {:.1}s", fit.training_time_secs);

    // Held-out evaluation
    let eval = evaluate(&fit).context("Evaluation failed")?;
    println!("\nHeld-out metrics ({} windows):", eval.actual.len());
    println!("  MSE:  {:.4}", eval.metrics.mse);
    println!("  RMSE: {:.4}", eval.metrics.rmse);
    println!("  MAE:  {:.4}", eval.metrics.mae);

    println!("\nActual vs predicted (last {} windows):", eval.actual.len().min(10));
    println!("  {:>12} {:>12}", "Actual", "Predicted");
    let tail = eval.actual.len().saturating_sub(10);
    for (a, p) in eval.actual[tail..].iter().zip(&eval.predicted[tail..]) {
        println!("  {:>12.4} {:>12.4}", a, p);
    }

    // Forecast
    let points = forecast(&fit, args.horizon).context("Forecast failed")?;
    println!("\nForecast ({} steps):", points.len());
    println!("  {:<12} {:>12}", "Label", "Value");
    for point in &points {
        println!("  {:<12} {:>12.4}", point.label, point.value);
    }

    // Save history
    std::fs::create_dir_all(&args.output)?;
    let history_path = args.output.join("history.json");
    let history = serde_json::json!({
        "train_losses": fit.train_losses,
        "best_epoch": fit.best_epoch,
        "epochs_run": fit.epochs_run,
        "training_time_secs": fit.training_time_secs,
        "metrics": eval.metrics,
        "forecast": points,
    });
    std::fs::write(&history_path, serde_json::to_string_pretty(&history)?)?;
    println!("\nSaved history to {:?}", history_path);

    println!("\n=== Training finished successfully! ===");

    Ok(())
}
