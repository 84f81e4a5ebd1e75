use anyhow::Context;
use clap::{Parser, Subcommand};
use depot_core::{CoreConfig, UploadService};
use depot_types::{FileName, NonEmptyText};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "depot")]
#[command(about = "Depot upload service CLI")]
struct Cli {
    /// Data directory (defaults to $DEPOT_DATA_DIR, then ./data)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all uploads with their metadata
    List,
    /// Show metadata for one uploaded file
    Stats {
        /// Uploaded file name
        filename: String,
    },
    /// Ingest a local file as an upload
    Add {
        /// Path of the file to ingest
        path: PathBuf,
        /// Position label to attach
        #[arg(long)]
        position: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .or_else(|| std::env::var("DEPOT_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"));

    let service = UploadService::open(Arc::new(CoreConfig::new(data_dir)))
        .context("failed to open upload service")?;

    match cli.command {
        Commands::List => {
            let uploads = service.list_uploads();
            if uploads.is_empty() {
                println!("No uploads found.");
            } else {
                for entry in uploads {
                    println!(
                        "Name: {}, Position: {}, Uploaded: {}",
                        entry.name, entry.metadata.position, entry.metadata.upload_date
                    );
                }
            }
        }
        Commands::Stats { filename } => match service.stats(&filename) {
            Some(record) => {
                println!("Name: {filename}");
                println!("Position: {}", record.position);
                println!("Uploaded: {}", record.upload_date);
            }
            None => {
                println!("File not found: {filename}");
            }
        },
        Commands::Add { path, position } => {
            let raw_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .context("path has no usable file name")?;
            let filename = FileName::new(raw_name)
                .with_context(|| format!("invalid file name: {raw_name}"))?;
            let position = NonEmptyText::new(&position).context("position cannot be empty")?;

            let content = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;

            let record = service.store_upload(&filename, &position, &content)?;
            println!(
                "Stored {} (position {}, uploaded {})",
                filename, record.position, record.upload_date
            );
        }
    }

    Ok(())
}
