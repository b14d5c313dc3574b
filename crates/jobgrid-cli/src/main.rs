use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use jobgrid_api::AppState;
use jobgrid_ingest::{
    credentials_from_env, titles_or_default, IngestConfig, IngestPipeline, DEFAULT_MAX_PAGES,
};
use jobgrid_sources::sources::{all_sources, source_by_name};
use jobgrid_sources::HttpClient;
use jobgrid_storage::{export_postings_csv, MongoStore};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "jobgrid")]
#[command(about = "JobGrid job-board aggregation backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch one source, normalize, and insert into MongoDB.
    Ingest {
        /// Source label (Adzuna, Arbeitnow, Jobicy, TheMuse, RemoteOK,
        /// Remotive, SerpAPI, USAJobs).
        #[arg(long)]
        source: String,
        /// Job titles to query; defaults to "Software Engineer".
        #[arg(long)]
        titles: Vec<String>,
        /// Pages to fetch per title.
        #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: u32,
    },
    /// Run every registered source in sequence; a failing source is
    /// reported and skipped.
    IngestAll {
        #[arg(long)]
        titles: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: u32,
    },
    /// Fetch one source and write canonical CSV instead of MongoDB.
    ExportCsv {
        #[arg(long)]
        source: String,
        /// Output directory for the timestamped CSV file.
        #[arg(long, default_value = "./csv")]
        out: String,
        #[arg(long)]
        titles: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: u32,
    },
    /// Serve the REST API.
    Serve {
        #[arg(long, env = "JOBGRID_LISTEN", default_value = "0.0.0.0:8000")]
        listen: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            source,
            titles,
            max_pages,
        } => {
            let Some(source) = source_by_name(&source) else {
                bail!("unknown source: {source}");
            };
            let config = IngestConfig::from_env()?;
            let pipeline = IngestPipeline::connect(config).await?;

            println!("{} -> MongoDB", source.name());
            println!("{}", "=".repeat(50));
            let summary = pipeline
                .run_source(source.as_ref(), &titles_or_default(&titles), max_pages)
                .await?;
            println!(
                "Retrieved {} job postings from {} ({} unique).",
                summary.fetched, summary.source, summary.unique
            );
            println!("Inserted {} documents into MongoDB.", summary.inserted);
        }
        Commands::IngestAll { titles, max_pages } => {
            let config = IngestConfig::from_env()?;
            let pipeline = IngestPipeline::connect(config).await?;
            let titles = titles_or_default(&titles);

            let mut total = 0usize;
            for source in all_sources() {
                match pipeline
                    .run_source(source.as_ref(), &titles, max_pages)
                    .await
                {
                    Ok(summary) => {
                        println!(
                            "{}: fetched {} / unique {} / inserted {}",
                            summary.source, summary.fetched, summary.unique, summary.inserted
                        );
                        total += summary.inserted;
                    }
                    Err(err) => {
                        eprintln!("{}: skipped ({err:#})", source.name());
                    }
                }
            }
            println!("Inserted {total} documents across all sources.");
        }
        Commands::ExportCsv {
            source,
            out,
            titles,
            max_pages,
        } => {
            let Some(source) = source_by_name(&source) else {
                bail!("unknown source: {source}");
            };
            let http = HttpClient::with_defaults()?;
            let creds = credentials_from_env();

            let (postings, fetched) = jobgrid_ingest::collect_postings(
                &http,
                &creds,
                source.as_ref(),
                &titles_or_default(&titles),
                max_pages,
            )
            .await?;
            println!(
                "Retrieved {fetched} job postings from {} ({} unique).",
                source.name(),
                postings.len()
            );
            if postings.is_empty() {
                println!("No jobs to export");
            } else {
                let path = export_postings_csv(&postings, &out, source.name())?;
                println!("Exported {} job postings to {}", postings.len(), path.display());
            }
        }
        Commands::Serve { listen } => {
            let config = IngestConfig::from_env()?;
            let store = MongoStore::connect(&config.mongodb_uri, &config.db_name).await?;
            store.ensure_indexes().await?;
            jobgrid_api::serve(AppState::new(store), &listen).await?;
        }
    }

    Ok(())
}
