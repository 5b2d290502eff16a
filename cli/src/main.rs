mod cli;

use clap::{Parser, Subcommand};

use tracing_subscriber::EnvFilter;

use crate::cli::about::{about_cli, AboutCLI};
use crate::cli::post::{post_cli, PostCLI};

#[derive(Parser)]
#[command(name = "pressroom", bin_name = "pressroom", version, about, long_about = None, rename_all = "kebab-case")]
struct Pressroom {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Post related commands.
    Post(PostCLI),

    /// About section commands.
    About(AboutCLI),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Pressroom::parse();

    match cli.command {
        Commands::Post(args) => post_cli(args).await,
        Commands::About(args) => about_cli(args).await,
    }
}
