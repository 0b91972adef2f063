//! Nethaul main entry point
//!
//! Command-line surface mirroring the tool-calling contract: start a job,
//! probe its status, block on completion, or cancel it. Reports are printed
//! as JSON so the orchestration layer can consume them directly.

use clap::{Parser, Subcommand};
use nethaul::config::Config;
use nethaul::job::JobKind;
use nethaul::pipeline::Supervisor;
use nethaul::store::StoreUri;
use tracing_subscriber::EnvFilter;

/// Nethaul: crawl-job orchestration into object storage
#[derive(Parser, Debug)]
#[command(name = "nethaul")]
#[command(version = "0.1.0")]
#[command(about = "Drive crawl jobs and deliver their content to object storage", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a job and return its handle immediately
    Start {
        /// Job kind
        #[arg(value_enum)]
        kind: KindArg,

        /// URL to crawl or extract from
        url: String,

        /// Destination prefix (s3://bucket/prefix)
        destination: String,

        /// Page/URL limit (text-extraction accepts 1-100)
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Probe a job's current status
    Status {
        #[arg(value_enum)]
        kind: KindArg,
        job_id: String,
    },

    /// Block until a submitted job finishes and its content is delivered
    Wait {
        #[arg(value_enum)]
        kind: KindArg,
        job_id: String,

        /// Destination prefix (s3://bucket/prefix)
        destination: String,

        /// Seconds between status polls
        #[arg(long)]
        poll_interval: Option<u64>,

        /// Wall-clock seconds before giving up
        #[arg(long)]
        deadline: Option<u64>,
    },

    /// Submit a job and block until its content is delivered
    Run {
        #[arg(value_enum)]
        kind: KindArg,
        url: String,
        destination: String,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        poll_interval: Option<u64>,

        #[arg(long)]
        deadline: Option<u64>,
    },

    /// Cancel a job (page-crawl only; text-extraction stops local polling
    /// while the provider job continues)
    Cancel {
        #[arg(value_enum)]
        kind: KindArg,
        job_id: String,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    PageCrawl,
    TextExtraction,
}

impl From<KindArg> for JobKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::PageCrawl => JobKind::PageCrawl,
            KindArg::TextExtraction => JobKind::TextExtraction,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Configuration problems surface here, before any job is touched
    let config = Config::from_env()?;
    let supervisor = Supervisor::from_config(&config)?;

    match cli.command {
        Command::Start {
            kind,
            url,
            destination,
            limit,
        } => {
            let destination = StoreUri::parse(&destination)?;
            let job = supervisor
                .start_crawl(kind.into(), &url, destination, limit)
                .await?;
            println!("{}", serde_json::to_string_pretty(&job)?);
        }

        Command::Status { kind, job_id } => {
            let snapshot = supervisor.check_status(kind.into(), &job_id).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        Command::Wait {
            kind,
            job_id,
            destination,
            poll_interval,
            deadline,
        } => {
            let destination = StoreUri::parse(&destination)?;
            let job = nethaul::job::CrawlJob::attach(job_id, kind.into(), destination);
            let report = supervisor
                .wait_for_completion(&job, poll_interval, deadline)
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Run {
            kind,
            url,
            destination,
            limit,
            poll_interval,
            deadline,
        } => {
            let destination = StoreUri::parse(&destination)?;
            let job = supervisor
                .start_crawl(kind.into(), &url, destination, limit)
                .await?;
            let report = supervisor
                .wait_for_completion(&job, poll_interval, deadline)
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Cancel { kind, job_id } => {
            let ack = supervisor.cancel(kind.into(), &job_id).await?;
            println!("{}", serde_json::to_string_pretty(&ack)?);
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("nethaul=info,warn"),
            1 => EnvFilter::new("nethaul=debug,info"),
            2 => EnvFilter::new("nethaul=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
