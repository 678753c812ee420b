//! NotePress CLI

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use notepress::{FsDocumentSource, TerminalConfirmGate, TerminalNotifier};
use notepress_api::{CommunityClient, KnowledgeBaseClient};
use notepress_core::{Action, PublishConfig};
use notepress_publish::{
    BlogDestination, CommunityDestination, Destination, KnowledgeBaseDestination, Processor,
    ProcessorState, SystemClipboard,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// NotePress - publish one authored note to a blog repo, a knowledge base,
/// a community platform, or the clipboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "notepress.yaml", env = "NOTEPRESS_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transform a note and commit it to a destination
    Publish {
        /// The note to publish
        file: PathBuf,

        /// Destination to publish to
        #[arg(long = "to", value_enum, default_value_t = DestinationArg::Blog)]
        destination: DestinationArg,

        /// Action to dispatch (create, publish, copy)
        #[arg(long, default_value = "create")]
        action: String,

        /// Workspace root the note's path is reported relative to
        #[arg(long)]
        vault_root: Option<PathBuf>,
    },

    /// Write a default configuration file
    ConfigInit,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum DestinationArg {
    Blog,
    KnowledgeBase,
    Community,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("notepress=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ConfigInit => {
            let config = PublishConfig::default();
            config
                .save_to_file(&cli.config)
                .await
                .context("failed to write configuration")?;
            println!("Configuration written to {}", cli.config.display());
            Ok(())
        }
        Commands::Publish {
            file,
            destination,
            action,
            vault_root,
        } => {
            let config = PublishConfig::load_from_file(&cli.config)
                .await
                .context("failed to load configuration")?;
            let action: Action = action.parse()?;

            let root = vault_root
                .or_else(|| file.parent().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));
            let source = Arc::new(FsDocumentSource::new(root, &file));
            let notifier = Arc::new(TerminalNotifier);
            let confirm = Arc::new(TerminalConfirmGate);
            let timeout = Duration::from_secs(config.request_timeout_secs);

            let destination: Box<dyn Destination> = match destination {
                DestinationArg::Blog => {
                    Box::new(BlogDestination::new(config.clone(), confirm.clone()))
                }
                DestinationArg::KnowledgeBase => {
                    let client = KnowledgeBaseClient::new(config.knowledge_base.clone(), timeout)?;
                    Box::new(KnowledgeBaseDestination::new(
                        config.clone(),
                        Arc::new(client),
                        confirm.clone(),
                    ))
                }
                DestinationArg::Community => {
                    let client = CommunityClient::new(config.community.clone(), timeout)?;
                    Box::new(CommunityDestination::new(Arc::new(client), confirm.clone()))
                }
            };

            let processor = Processor::new(
                config,
                destination,
                source,
                notifier,
                Arc::new(SystemClipboard),
            );

            match processor.process(action).await? {
                ProcessorState::Committed => Ok(()),
                _ => std::process::exit(1),
            }
        }
    }
}
