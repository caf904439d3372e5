use clap::{Parser, Subcommand};

use bzr_source::{params, BazaarSource, BzrCli, ConnectionData, DataSource, SourceParams};

#[derive(Parser)]
#[command(
    name = "bzr-source",
    about = "Bazaar repository data source - fetch branches for ingestion"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a repository into a local directory
    Fetch {
        /// Bazaar repository URL (e.g. bzr://example.com/trunk or lp:project)
        repo_url: String,

        /// Directory the repository is branched into
        target_directory: String,

        /// User name recorded with the connection
        #[arg(long)]
        username: Option<String>,
    },

    /// Print the plugin icon (SVG)
    Icon,

    /// Print the connection descriptor as JSON
    Connection,

    /// Check that the bzr executable is available
    Doctor,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch {
            repo_url,
            target_directory,
            username,
        } => cmd_fetch(repo_url, target_directory, username),
        Commands::Icon => cmd_icon(),
        Commands::Connection => cmd_connection(),
        Commands::Doctor => cmd_doctor(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_fetch(
    repo_url: String,
    target_directory: String,
    username: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut source_params = SourceParams::new();
    source_params.set(params::REPO_URL, repo_url);
    source_params.set(params::TARGET_DIRECTORY, target_directory);
    if let Some(username) = username {
        source_params.set(params::USERNAME, username);
    }

    let source = BazaarSource::new("bazaar", source_params);
    source.fetch()?;
    Ok(())
}

fn cmd_icon() -> Result<(), Box<dyn std::error::Error>> {
    let source = BazaarSource::new("bazaar", SourceParams::new());
    println!("{}", source.icon().trim_end());
    Ok(())
}

fn cmd_connection() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&ConnectionData::bazaar())?);
    Ok(())
}

fn cmd_doctor() -> Result<(), Box<dyn std::error::Error>> {
    match BzrCli::new().version() {
        Ok(version) => {
            println!("bzr: {}", version);
            Ok(())
        }
        Err(e) => Err(format!("bzr is not usable: {}", e).into()),
    }
}
