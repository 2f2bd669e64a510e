mod preset;
mod report;
mod scan;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use stakewatch_core::ThresholdPolicy;
use stakewatch_edgar::{EdgarClient, EdgarError};
use stakewatch_notify::{Digest, Mailer, NotifyError, SmtpSettings};
use stakewatch_relevance::{RelevanceConfig, RelevanceEngine};
use stakewatch_store::{DuckStore, SeenStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::preset::Provider;
use crate::scan::{ScanOptions, commit, run_scan};

const EXIT_CONFIG: u8 = 1;
const EXIT_NETWORK: u8 = 2;
const EXIT_EMAIL: u8 = 3;

/// Scan SEC filings for government equity investments and email a digest.
#[derive(Parser, Debug)]
#[command(name = "stakewatch", version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Relevance configuration (TOML). Built-in patterns when omitted.
    #[arg(long, global = true, env = "STAKEWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Seen-filing database.
    #[arg(
        long,
        global = true,
        env = "STAKEWATCH_DB",
        default_value = "stakewatch_seen.duckdb"
    )]
    db: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan the latest daily index and send a digest of new hits
    Scan(ScanArgs),
    /// Score a local document and explain the result
    Evaluate {
        file: PathBuf,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show counts from the seen-filing database
    Status,
    /// Remove every seen-filing record
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the effective relevance configuration as TOML
    Patterns,
    /// Print a .env template for an SMTP provider
    SmtpPreset { provider: Provider },
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Identifies you to EDGAR, e.g. "Jane Doe jane@example.com"
    #[arg(long, env = "SEC_USER_AGENT")]
    user_agent: Option<String>,

    /// Form type to scan
    #[arg(long, default_value = "8-K")]
    form: String,

    /// Maximum filings to fetch this run
    #[arg(long)]
    limit: Option<usize>,

    /// Pause between filings, in milliseconds
    #[arg(long, default_value_t = 200)]
    delay_ms: u64,

    /// Print the digest instead of sending it; nothing is marked seen
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    smtp: SmtpArgs,
}

#[derive(Args, Debug)]
struct SmtpArgs {
    #[arg(long, env = "SMTP_HOST")]
    smtp_host: Option<String>,
    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    smtp_port: u16,
    #[arg(long, env = "SMTP_USER")]
    smtp_user: Option<String>,
    #[arg(long, env = "SMTP_PASS", hide_env_values = true)]
    smtp_pass: Option<String>,
    #[arg(long, env = "FROM_EMAIL")]
    from_email: Option<String>,
    #[arg(long, env = "TO_EMAIL")]
    to_email: Option<String>,
}

impl SmtpArgs {
    fn settings(self) -> anyhow::Result<SmtpSettings> {
        Ok(SmtpSettings {
            host: required("SMTP_HOST", self.smtp_host)?,
            port: self.smtp_port,
            username: required("SMTP_USER", self.smtp_user)?,
            password: required("SMTP_PASS", self.smtp_pass)?,
            from: required("FROM_EMAIL", self.from_email)?,
            to: required("TO_EMAIL", self.to_email)?,
        })
    }
}

fn required(name: &str, value: Option<String>) -> anyhow::Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("missing required setting {name}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_CONFIG)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Map a failure onto the process exit code: network and email failures are
/// distinguished, anything else is a configuration problem.
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if cause.is::<EdgarError>() {
            return EXIT_NETWORK;
        }
        if cause.is::<NotifyError>() {
            return EXIT_EMAIL;
        }
    }
    EXIT_CONFIG
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Scan(args) => {
            let engine = RelevanceEngine::new(config)?;
            scan_command(args, &engine, &cli.db).await
        }
        Command::Evaluate { file, json } => {
            let engine = RelevanceEngine::new(config)?;
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let assessment = engine.assess(&raw);
            if json {
                println!("{}", serde_json::to_string_pretty(&assessment.result)?);
            } else {
                print!(
                    "{}",
                    report::render_assessment(
                        &file.display().to_string(),
                        &assessment,
                        &engine.policy()
                    )
                );
            }
            Ok(())
        }
        Command::Status => {
            print!("{}", status_report(&cli.db, &config.policy())?);
            Ok(())
        }
        Command::Clear { yes } => {
            if !cli.db.exists() {
                println!("Nothing to clear: {} does not exist.", cli.db.display());
                return Ok(());
            }
            let mut store = DuckStore::open_persistent(&cli.db)?;
            let count = store.stats(config.high_threshold)?.processed;
            if !yes && !confirm(&format!(
                "Remove {count} seen records from {}? [y/N] ",
                cli.db.display()
            ))? {
                println!("Aborted.");
                return Ok(());
            }
            let removed = store.clear()?;
            println!("Removed {removed} records.");
            Ok(())
        }
        Command::Patterns => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Command::SmtpPreset { provider } => {
            print!("{}", preset::env_template(provider));
            Ok(())
        }
    }
}

/// Counts from the seen store. A missing database is reported, not created.
fn status_report(db: &Path, policy: &ThresholdPolicy) -> anyhow::Result<String> {
    let name = db.display().to_string();
    if !db.exists() {
        return Ok(report::render_missing_store(&name));
    }
    let store = DuckStore::open_persistent(db)?;
    let stats = store.stats(policy.high)?;
    Ok(report::render_status(&name, &stats, policy))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<RelevanceConfig> {
    match path {
        Some(p) => {
            let config = RelevanceConfig::from_file(p)?;
            info!(path = %p.display(), "loaded relevance config");
            Ok(config)
        }
        None => Ok(RelevanceConfig::default()),
    }
}

async fn scan_command(args: ScanArgs, engine: &RelevanceEngine, db: &Path) -> anyhow::Result<()> {
    let user_agent = required("SEC_USER_AGENT", args.user_agent)?;
    let mailer = if args.dry_run {
        None
    } else {
        Some(Mailer::new(args.smtp.settings()?))
    };

    let client = EdgarClient::new(&user_agent)?;
    let mut store = DuckStore::open_persistent(db)?;
    let opts = ScanOptions {
        form: args.form,
        limit: args.limit,
        delay: Duration::from_millis(args.delay_ms),
        today: Local::now().date_naive(),
    };

    let report = run_scan(&client, engine, &store, &opts).await?;
    eprintln!(
        "  Scanned {} filings: {} hits, {} already seen, {} failed",
        report.scanned(),
        report.hits.len(),
        report.already_seen,
        report.failed
    );

    let policy = engine.policy();
    let digest = (!report.hits.is_empty())
        .then(|| Digest::compose(&report.hits, &policy, Utc::now().date_naive()));

    let Some(mailer) = mailer else {
        match digest {
            Some(d) => println!("Subject: {}\n\n{}", d.subject, d.text_body),
            None => info!("no new hits"),
        }
        return Ok(());
    };

    match digest {
        Some(digest) => {
            tokio::task::spawn_blocking(move || mailer.send(&digest))
                .await
                .context("mail task failed")??;
            let high = report
                .hits
                .iter()
                .filter(|h| h.confidence() >= policy.high)
                .count();
            info!(hits = report.hits.len(), high, "digest delivered");
        }
        None => info!("no new hits"),
    }

    let marked = commit(&mut store, &report)?;
    info!(marked, "marked filings seen");
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    eprint!("{prompt}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "YES"))
}
