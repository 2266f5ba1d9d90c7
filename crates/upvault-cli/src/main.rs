//! upvault CLI: upload files straight to the object store and delete them.
//!
//! Set UPVAULT_API_URL (or API_URL) to the credential server.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use upvault_api_client::{ApiClient, TransferClient};
use upvault_cli::{format_entry_row, init_tracing, load_batch, truncate_string};
use upvault_uploader::{EntryUpdate, IntakePolicy, UploadOrchestrator, UploadStatus};

#[derive(Parser)]
#[command(name = "upvault", about = "Direct-to-store uploads")]
struct Cli {
    /// Credential server URL (overrides UPVAULT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one or more files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Maximum number of files accepted per batch
        #[arg(long)]
        max_files: Option<usize>,
        /// Files of this size or larger are rejected
        #[arg(long)]
        max_size_bytes: Option<u64>,
        /// Accepted content type pattern, e.g. image/* (repeatable)
        #[arg(long = "accept")]
        accept: Vec<String>,
    },
    /// Delete a stored object by key
    Delete {
        /// Object key printed by `upload`
        key: String,
    },
}

fn api_client(api_url: Option<String>) -> anyhow::Result<ApiClient> {
    match api_url {
        Some(url) => ApiClient::new(url),
        None => ApiClient::from_env(),
    }
    .context("Failed to create API client. Set UPVAULT_API_URL (or API_URL)")
}

async fn upload(
    client: ApiClient,
    files: Vec<PathBuf>,
    policy: IntakePolicy,
) -> anyhow::Result<()> {
    let batch = load_batch(&files, &policy).await?;
    if let Some(rejection) = &batch.oversized {
        eprintln!("warning: {}", rejection);
    }

    let mut orchestrator =
        UploadOrchestrator::from_clients(policy, client, TransferClient::new()?);
    let mut updates = orchestrator.subscribe();
    let mut last_status = HashMap::new();

    orchestrator.submit(batch.candidates);

    loop {
        let more = orchestrator.step().await;

        while let Ok(update) = updates.try_recv() {
            if let EntryUpdate::Changed(snapshot) = update {
                tracing::debug!(file = %snapshot.file_name, progress = snapshot.progress, "Progress");
                if last_status.insert(snapshot.id, snapshot.status) != Some(snapshot.status) {
                    println!(
                        "{:<10} {}",
                        snapshot.status,
                        truncate_string(&snapshot.file_name, 60)
                    );
                }
            }
        }
        for notice in orchestrator.take_notices() {
            eprintln!("warning: {}", notice);
        }

        if !more {
            break;
        }
    }

    let snapshots = orchestrator.snapshots();
    if !snapshots.is_empty() {
        println!();
        println!(
            "{:<32} {:>10} {:>5} {:<10} KEY",
            "FILE", "SIZE", "DONE", "STATUS"
        );
        for snapshot in &snapshots {
            println!("{}", format_entry_row(snapshot));
        }
    }

    let failed = snapshots
        .iter()
        .filter(|s| s.status == UploadStatus::Failed)
        .count();
    if failed > 0 {
        anyhow::bail!("{} of {} upload(s) failed", failed, snapshots.len());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let client = api_client(cli.api_url)?;

    match cli.command {
        Commands::Upload {
            files,
            max_files,
            max_size_bytes,
            accept,
        } => {
            let mut policy = IntakePolicy::default();
            if let Some(max_files) = max_files {
                policy = policy.with_max_files(max_files);
            }
            if let Some(max_size_bytes) = max_size_bytes {
                policy = policy.with_max_file_size(max_size_bytes);
            }
            if !accept.is_empty() {
                policy = policy.with_accepted_types(accept);
            }
            upload(client, files, policy).await?;
        }
        Commands::Delete { key } => {
            let response = client.delete_object(&key).await?;
            println!("{}", response.message);
        }
    }

    Ok(())
}
