use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use galaxy_workflows::{cli, session::Identity};
use owo_colors::OwoColorize;
use std::path::PathBuf;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Galaxy Workflows: list, create, update, delete and copy workflows on a Galaxy server
#[derive(Parser)]
#[command(name = "gxwf", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source credentials from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Test authorization and show the current user
    Auth,

    /// List workflows visible to the current user
    List,

    /// Create a workflow from a JSON definition file
    Create {
        /// JSON file holding the workflow draft
        file: PathBuf,
    },

    /// Update a workflow from a JSON patch file
    Update {
        /// Workflow id
        id: String,

        /// JSON file holding the patch
        file: PathBuf,
    },

    /// Delete a workflow
    Delete {
        /// Workflow id
        id: String,
    },

    /// Copy a workflow under a new name
    Copy {
        /// Workflow id
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(e) = dotenvy::from_filename(&cli.env) {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    if let Commands::Auth = cli.command {
        let session = cli::check_auth().await?;
        if session.is_anonymous() {
            log::warn!("Connected anonymously");
        } else {
            log::info!("✓ Authenticated as {}", session.username().cyan());
        }
        return Ok(());
    }

    let client = cli::load_workflow_client().await?;

    match cli.command {
        Commands::Auth => {}
        Commands::List => {
            let workflows = client.list().await?;
            for workflow in &workflows {
                println!("{}", cli::format_workflow(workflow));
            }
            log::info!("✓ Listed {} workflow(s)", workflows.len());
        }
        Commands::Create { file } => {
            let created = cli::create_workflow_from_file(&client, &file).await?;
            println!("{}", serde_json::to_string_pretty(&created)?);
            log::info!("✓ Created workflow from {}", file.display());
        }
        Commands::Update { id, file } => {
            let updated = cli::update_workflow_from_file(&client, &id, &file).await?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
            log::info!("✓ Updated workflow {}", id.cyan());
        }
        Commands::Delete { id } => {
            let confirmation = client.delete(&id).await?;
            println!("{}", serde_json::to_string_pretty(&confirmation)?);
            log::info!("✓ Deleted workflow {}", id.cyan());
        }
        Commands::Copy { id } => {
            let copy = cli::copy_workflow_by_id(&client, &id).await?;
            println!("{}", cli::format_workflow(&copy));
            log::info!("✓ Copied workflow {} to {}", id.cyan(), copy.name.cyan());
        }
    }

    Ok(())
}
