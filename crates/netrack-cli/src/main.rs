//! netrack CLI — record practice exams and track net scores.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use netrack_core::catalog::{ExamFamily, ExamType};

mod commands;

#[derive(Parser)]
#[command(name = "netrack", version, about = "Practice exam net tracker for TYT/AYT")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and sample records
    Init,

    /// Show subject catalogs
    Subjects {
        /// Exam type (TYT, AYT, AYT_SAYISAL, AYT_ESIT, AYT_SOZEL)
        #[arg(long = "type")]
        exam_type: Option<ExamType>,
    },

    /// Record an exam
    Add {
        /// Exam type (defaults to the configured one)
        #[arg(long = "type")]
        exam_type: Option<ExamType>,

        /// Exam date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Subject score as subject=correct/wrong[/blank], repeatable
        #[arg(long = "score", required = true)]
        scores: Vec<String>,

        /// Record id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// List recorded exams, newest first
    List {
        /// Only this exam type
        #[arg(long = "type")]
        exam_type: Option<ExamType>,

        /// Only this family (TYT or AYT, which covers every AYT variant)
        #[arg(long, conflicts_with = "exam_type")]
        family: Option<ExamFamily>,
    },

    /// Show one exam's per-subject breakdown
    Show {
        /// Record id
        id: String,
    },

    /// Delete an exam
    Delete {
        /// Record id
        id: String,
    },

    /// Summary statistics for an exam type
    Stats {
        /// Exam type (defaults to the configured one)
        #[arg(long = "type")]
        exam_type: Option<ExamType>,
    },

    /// Net-over-time series for an exam type
    Chart {
        /// Exam type (defaults to the configured one)
        #[arg(long = "type")]
        exam_type: Option<ExamType>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Write an analytics report
    Report {
        /// Output directory (defaults to the configured one)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all
        #[arg(long, default_value = "all")]
        format: String,
    },

    /// Compare two analytics reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Average-net change below this counts as unchanged
        #[arg(long, default_value = "0.5")]
        threshold: f64,

        /// Exit code 1 if any average dropped
        #[arg(long)]
        fail_on_decline: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check record files without importing them
    Validate {
        /// Record file (.json/.toml) or directory
        #[arg(long)]
        path: PathBuf,
    },

    /// Import record files into the store
    Import {
        /// Record file (.json/.toml) or directory
        #[arg(long)]
        path: PathBuf,
    },

    /// Inspect or edit configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set a key, e.g. `user_id` or `store.path`
    Set {
        key: String,
        value: String,

        /// Edit ~/.config/netrack/config.toml instead of ./netrack.toml
        #[arg(long)]
        global: bool,
    },

    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("netrack=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Subjects { exam_type } => commands::subjects::execute(exam_type),
        Commands::Add {
            exam_type,
            date,
            scores,
            id,
        } => commands::add::execute(config, exam_type, date, scores, id).await,
        Commands::List { exam_type, family } => {
            commands::list::execute(config, exam_type, family).await
        }
        Commands::Show { id } => commands::show::execute(config, &id).await,
        Commands::Delete { id } => commands::delete::execute(config, &id).await,
        Commands::Stats { exam_type } => commands::stats::execute(config, exam_type).await,
        Commands::Chart { exam_type, format } => {
            commands::chart::execute(config, exam_type, &format).await
        }
        Commands::Report { output, format } => {
            commands::report::execute(config, output, &format).await
        }
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_decline,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_decline, format),
        Commands::Validate { path } => commands::validate::execute(path),
        Commands::Import { path } => commands::import::execute(config, path).await,
        Commands::Config { action } => match action {
            ConfigAction::Set { key, value, global } => {
                commands::config::set(config, &key, &value, global)
            }
            ConfigAction::Show => commands::config::show(config),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
