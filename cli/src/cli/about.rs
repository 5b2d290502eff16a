use clap::{Parser, Subcommand};

use post_model::AboutPayload;

use pressroom::{errors::Error, Pressroom};

use crate::cli::post::service_from_env;

#[derive(Debug, Parser)]
pub struct AboutCLI {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the About section.
    Show,

    /// Replace the About section.
    Edit(Edit),
}

pub async fn about_cli(cli: AboutCLI) {
    let res = match cli.cmd {
        Command::Show => show().await,
        Command::Edit(args) => edit(args).await,
    };

    if let Err(e) = res {
        eprintln!("❗ Pressroom: {:#?}", e);
    }
}

async fn show() -> Result<(), Error> {
    let pressroom = Pressroom::new(service_from_env()?);

    let about = pressroom.about().await?;

    println!("# {}", about.header);

    if let Some(updated) = about.last_updated {
        println!("Updated: {}", updated);
    }

    println!("\n{}", about.body);

    Ok(())
}

#[derive(Debug, Parser)]
pub struct Edit {
    /// Section header.
    #[arg(long)]
    header: String,

    /// Section body text.
    #[arg(long)]
    body: String,
}

async fn edit(args: Edit) -> Result<(), Error> {
    let pressroom = Pressroom::new(service_from_env()?);

    let payload = AboutPayload {
        header: args.header,
        body: args.body,
    };

    let about = pressroom.update_about(&payload).await?;

    println!("✅ Updated About section \"{}\"", about.header);

    Ok(())
}
