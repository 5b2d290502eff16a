use std::io::{self, Write};
use std::path::PathBuf;

use admin_api::{SiteService, DEFAULT_URI};

use clap::{ArgAction, Parser, Subcommand};

use post_model::{MediaKind, PostDraft, PostId};

use pressroom::{
    errors::Error,
    submit::{PostDraftSubmitter, SubmitMode},
    utils::read_media_file,
    Pressroom,
};

use url::Url;

#[derive(Debug, Parser)]
pub struct PostCLI {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all posts, hidden ones included.
    List,

    /// Print one post.
    Show(Show),

    /// Create a new post.
    Create(Create),

    /// Edit an existing post.
    Edit(Edit),

    /// Delete a post and its stored media.
    Delete(Delete),

    /// Show or hide a post on the public site.
    Visibility(Visibility),
}

pub async fn post_cli(cli: PostCLI) {
    let res = match cli.cmd {
        Command::List => list().await,
        Command::Show(args) => show(args).await,
        Command::Create(args) => create(args).await,
        Command::Edit(args) => edit(args).await,
        Command::Delete(args) => delete(args).await,
        Command::Visibility(args) => visibility(args).await,
    };

    if let Err(e) = res {
        eprintln!("❗ Pressroom: {:#?}", e);
    }
}

/// Ambient configuration: `PRESSROOM_API_URL` for the API base and
/// `PRESSROOM_SESSION` for the credential cookie.
pub(crate) fn service_from_env() -> Result<SiteService, Error> {
    let raw = std::env::var("PRESSROOM_API_URL").unwrap_or_else(|_| DEFAULT_URI.to_owned());
    let base_url = Url::parse(&raw).map_err(admin_api::errors::Error::Parse)?;

    let session = std::env::var("PRESSROOM_SESSION").ok();

    Ok(SiteService::new(base_url, session.as_deref())?)
}

async fn list() -> Result<(), Error> {
    let pressroom = Pressroom::new(service_from_env()?);

    let posts = pressroom.posts().await?;

    for post in posts {
        let marker = if post.is_visible { "●" } else { "○" };
        let kind = format!("{:<5}", post.media_type.to_string());

        println!("{} {:>4}  {}  {}", marker, post.id, kind, post.title);
    }

    Ok(())
}

#[derive(Debug, Parser)]
pub struct Show {
    /// Post id.
    #[arg(long)]
    id: PostId,
}

async fn show(args: Show) -> Result<(), Error> {
    let pressroom = Pressroom::new(service_from_env()?);

    let (post, _) = pressroom.load_draft(args.id).await?;

    println!("# {} ({})", post.title, post.id);

    if let Some(timestamp) = post.timestamp {
        println!("Published: {}", timestamp);
    }

    println!("Visible: {}", post.is_visible);
    println!("Media: {}", post.media_type);

    if let Some(href) = post.media_href {
        println!("Media URL: {}", href);
    }

    if let Some(blurb) = post.blurb {
        println!("\n{}", blurb);
    }

    if let Some(writeup) = post.writeup {
        println!("\n{}", writeup);
    }

    Ok(())
}

#[derive(Debug, Parser)]
pub struct Create {
    /// The post title.
    #[arg(long)]
    title: String,

    /// Short blurb shown in the post list.
    #[arg(long, default_value = "")]
    blurb: String,

    /// Long form writeup.
    #[arg(long, default_value = "")]
    writeup: String,

    /// Media kind: none, image, video, audio or link.
    #[arg(long, default_value_t = MediaKind::None)]
    media_type: MediaKind,

    /// Path to the image or audio file to upload.
    #[arg(long)]
    media_file: Option<PathBuf>,

    /// URL for video or link media.
    #[arg(long)]
    media_url: Option<String>,

    /// Keep the post hidden from the public site.
    #[arg(long)]
    hidden: bool,
}

async fn create(args: Create) -> Result<(), Error> {
    let service = service_from_env()?;

    let Create {
        title,
        blurb,
        writeup,
        media_type,
        media_file,
        media_url,
        hidden,
    } = args;

    let mut draft = PostDraft::new();
    draft.set_title(title);
    draft.set_blurb(blurb);
    draft.set_writeup(writeup);
    draft.set_visible(!hidden);

    // A fresh draft carries no media yet, so the change never gates.
    if let Some(pending) = draft.change_media_kind(media_type) {
        draft.apply_media(pending.confirm());
    }

    if let Some(path) = media_file {
        let file = read_media_file(&path).await?;
        draft.attach_file(file)?;
    }

    if let Some(url) = media_url {
        draft.set_media_url(url)?;
    }

    let submitter = PostDraftSubmitter::new(service);

    let post = submitter.submit(&draft, SubmitMode::Create).await?;

    println!("✅ Created Post {}", post.id);

    Ok(())
}

#[derive(Debug, Parser)]
pub struct Edit {
    /// Post id.
    #[arg(long)]
    id: PostId,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    blurb: Option<String>,

    #[arg(long)]
    writeup: Option<String>,

    /// Change the media kind; switching categories discards the current
    /// media after confirmation.
    #[arg(long)]
    media_type: Option<MediaKind>,

    /// Path to a replacement image or audio file.
    #[arg(long)]
    media_file: Option<PathBuf>,

    /// Replacement URL for video or link media.
    #[arg(long)]
    media_url: Option<String>,

    #[arg(long)]
    visible: Option<bool>,

    /// Answer yes to the destructive-change confirmation.
    #[arg(long)]
    yes: bool,
}

async fn edit(args: Edit) -> Result<(), Error> {
    let service = service_from_env()?;
    let pressroom = Pressroom::new(service);

    let Edit {
        id,
        title,
        blurb,
        writeup,
        media_type,
        media_file,
        media_url,
        visible,
        yes,
    } = args;

    let (_, mut draft) = pressroom.load_draft(id).await?;

    if let Some(title) = title {
        draft.set_title(title);
    }

    if let Some(blurb) = blurb {
        draft.set_blurb(blurb);
    }

    if let Some(writeup) = writeup {
        draft.set_writeup(writeup);
    }

    if let Some(visible) = visible {
        draft.set_visible(visible);
    }

    if let Some(kind) = media_type {
        if let Some(pending) = draft.change_media_kind(kind) {
            if yes || confirm_discard(pending.previous().kind(), pending.requested())? {
                draft.apply_media(pending.confirm());
            } else {
                let kept = pending.previous().kind();

                draft.apply_media(pending.decline());

                println!("Kept {} media unchanged.", kept);
            }
        }
    }

    if let Some(path) = media_file {
        let file = read_media_file(&path).await?;
        draft.attach_file(file)?;
    }

    if let Some(url) = media_url {
        draft.set_media_url(url)?;
    }

    let submitter = pressroom.submitter();

    let post = submitter.submit(&draft, SubmitMode::Update(id)).await?;

    println!("✅ Updated Post {}", post.id);

    Ok(())
}

fn confirm_discard(previous: MediaKind, requested: MediaKind) -> Result<bool, Error> {
    println!(
        "Changing the media type from {} to {} will remove the current media from this post.",
        previous, requested
    );
    print!("Are you sure? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

#[derive(Debug, Parser)]
pub struct Delete {
    /// Post id.
    #[arg(long)]
    id: PostId,
}

async fn delete(args: Delete) -> Result<(), Error> {
    let pressroom = Pressroom::new(service_from_env()?);

    pressroom.delete_post(args.id).await?;

    println!("✅ Deleted Post {}", args.id);

    Ok(())
}

#[derive(Debug, Parser)]
pub struct Visibility {
    /// Post id.
    #[arg(long)]
    id: PostId,

    /// `true` to publish, `false` to hide.
    #[arg(long, action = ArgAction::Set)]
    visible: bool,
}

async fn visibility(args: Visibility) -> Result<(), Error> {
    let pressroom = Pressroom::new(service_from_env()?);

    let post = pressroom.set_visibility(args.id, args.visible).await?;

    let state = if post.is_visible { "visible" } else { "hidden" };

    println!("✅ Post {} is now {}", post.id, state);

    Ok(())
}
