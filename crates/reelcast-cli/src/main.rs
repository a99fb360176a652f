//! reelcast: command-line front end for the transcoding provider registry.
//!
//! Provider settings come from the environment (or `.env`); see
//! `reelcast_core::Config::from_env`. Results are printed as JSON.

use anyhow::Context;
use clap::{Parser, Subcommand};
use reelcast_cli::{init_tracing, print_json, read_json};
use reelcast_core::models::{Job, Preset};
use reelcast_core::Config;
use reelcast_providers::ProviderRegistry;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reelcast", about = "Submit and track transcoding jobs across providers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect registered providers
    Providers {
        #[command(subcommand)]
        sub: ProviderCommands,
    },
    /// Manage presets on a provider
    Preset {
        /// Provider name (e.g. mediaconvert, bitmovin)
        #[arg(long, short)]
        provider: String,
        #[command(subcommand)]
        sub: PresetCommands,
    },
    /// Submit, poll and cancel jobs
    Job {
        /// Provider name (e.g. mediaconvert, bitmovin)
        #[arg(long, short)]
        provider: String,
        #[command(subcommand)]
        sub: JobCommands,
    },
}

#[derive(Subcommand)]
enum ProviderCommands {
    /// Names of configured and healthy providers
    List,
    /// Capabilities and health of one provider
    Describe {
        /// Provider name
        name: String,
    },
}

#[derive(Subcommand)]
enum PresetCommands {
    /// Create a preset from a JSON document
    Create {
        /// Path to the preset JSON
        file: PathBuf,
    },
    /// Show a stored preset
    Get {
        /// Provider preset ID
        id: String,
    },
    /// Delete a stored preset
    Delete {
        /// Provider preset ID
        id: String,
    },
}

#[derive(Subcommand)]
enum JobCommands {
    /// Submit a job from a JSON document
    Submit {
        /// Path to the job JSON
        file: PathBuf,
    },
    /// Poll a job described by a JSON document
    Status {
        /// Path to the job JSON (must carry provider_job_id, or use --provider-job-id)
        file: PathBuf,
        /// Provider job ID returned by submit
        #[arg(long)]
        provider_job_id: Option<String>,
    },
    /// Cancel a job
    Cancel {
        /// Provider job ID
        provider_job_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load provider configuration")?;
    let registry = ProviderRegistry::with_defaults();

    let cli = Cli::parse();

    match cli.command {
        Commands::Providers { sub } => match sub {
            ProviderCommands::List => {
                let names = registry.list(&config).await;
                print_json(&names)?;
            }
            ProviderCommands::Describe { name } => {
                let descriptor = registry.describe(&name, &config).await?;
                print_json(&descriptor)?;
            }
        },
        Commands::Preset { provider, sub } => {
            let provider = registry.build(&provider, &config).await?;
            match sub {
                PresetCommands::Create { file } => {
                    let preset: Preset = read_json(&file)?;
                    let id = provider.create_preset(&preset).await?;
                    print_json(&serde_json::json!({ "provider": provider.name(), "preset_id": id }))?;
                }
                PresetCommands::Get { id } => {
                    let details = provider.get_preset(&id).await?;
                    print_json(&details)?;
                }
                PresetCommands::Delete { id } => {
                    provider.delete_preset(&id).await?;
                    print_json(&serde_json::json!({ "success": true, "preset_id": id }))?;
                }
            }
        }
        Commands::Job { provider, sub } => {
            let provider = registry.build(&provider, &config).await?;
            match sub {
                JobCommands::Submit { file } => {
                    let job: Job = read_json(&file)?;
                    let status = provider.create_job(&job).await?;
                    print_json(&status)?;
                }
                JobCommands::Status {
                    file,
                    provider_job_id,
                } => {
                    let mut job: Job = read_json(&file)?;
                    if provider_job_id.is_some() {
                        job.provider_job_id = provider_job_id;
                    }
                    let status = provider.job_status(&job).await?;
                    print_json(&status)?;
                }
                JobCommands::Cancel { provider_job_id } => {
                    provider.cancel_job(&provider_job_id).await?;
                    print_json(&serde_json::json!({
                        "success": true,
                        "provider_job_id": provider_job_id,
                    }))?;
                }
            }
        }
    }

    Ok(())
}
