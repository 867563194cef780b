mod config;

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    AppState, ArticleEditor, DraftField, EditorView, HttpTransport, PostListCommand,
    SessionCommand, TagEditor,
};
use shared::domain::{Article, LoginCredentials, ProfileUpdate, Registration};
use storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{load_settings, prepare_storage_url, DEFAULT_LOG_FILTER};

#[derive(Parser, Debug)]
#[command(name = "blog", about = "Command-line client for a RealWorld blog API")]
struct Cli {
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    storage_url: Option<String>,
    #[arg(long, global = true)]
    page_size: Option<u32>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Whoami,
    UpdateProfile(ProfileArgs),
    Logout,
    Posts {
        /// 1-indexed; without it the last viewed page is shown.
        #[arg(long)]
        page: Option<u32>,
    },
    Article {
        slug: String,
    },
    Publish(PublishArgs),
}

#[derive(Args, Debug)]
struct ProfileArgs {
    #[arg(long)]
    username: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    bio: Option<String>,
    #[arg(long)]
    image: Option<String>,
}

#[derive(Args, Debug)]
struct PublishArgs {
    /// Existing article to edit; omitted to create a new one.
    #[arg(long)]
    slug: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    body: Option<String>,
    #[arg(long = "tag")]
    tags: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(storage_url) = cli.storage_url {
        settings.storage_url = storage_url;
    }
    if let Some(page_size) = cli.page_size.filter(|size| *size > 0) {
        settings.page_size = page_size;
    }

    let storage_url = prepare_storage_url(&settings.storage_url);
    info!(api_url = %settings.api_url, storage_url = %storage_url, "starting blog client");

    let transport = Arc::new(HttpTransport::new(&settings.api_url)?);
    let storage = Arc::new(Storage::new(&storage_url).await?);
    storage.health_check().await?;
    let app = AppState::new(transport, storage, settings.page_size);

    app.bootstrap.mount().await;
    app.bootstrap.ready().await;

    run(&app, cli.command).await
}

async fn run(app: &AppState, command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Login { email, password } => {
            app.dispatch(SessionCommand::Login(LoginCredentials { email, password }).into())
                .await?;
            print_session(app);
        }
        CliCommand::Register {
            username,
            email,
            password,
        } => {
            app.dispatch(
                SessionCommand::Register(Registration {
                    username,
                    email,
                    password,
                })
                .into(),
            )
            .await?;
            print_session(app);
        }
        CliCommand::Whoami => print_session(app),
        CliCommand::UpdateProfile(args) => {
            let update = ProfileUpdate {
                username: args.username,
                email: args.email,
                password: args.password,
                bio: args.bio,
                image: args.image,
            };
            app.dispatch(SessionCommand::UpdateProfile(update).into())
                .await?;
            print_session(app);
        }
        CliCommand::Logout => {
            app.dispatch(SessionCommand::Logout.into()).await?;
            println!("Signed out.");
        }
        CliCommand::Posts { page } => {
            let command = match page {
                Some(page) => PostListCommand::ChangePage(page),
                None => PostListCommand::Mount,
            };
            app.dispatch(command.into()).await?;
            print_posts(app);
        }
        CliCommand::Article { slug } => {
            let token = app.session.token();
            match app.article.fetch_by_slug(&slug, token.as_deref()).await? {
                Some(article) => print_article(&article),
                None if token.is_none() => bail!("sign in to read articles"),
                None => bail!("article '{slug}' is not available"),
            }
            app.article.clear();
        }
        CliCommand::Publish(args) => publish(app, args).await?,
    }
    Ok(())
}

async fn publish(app: &AppState, args: PublishArgs) -> Result<()> {
    let mut editor = ArticleEditor::open(app, args.slug).await;
    match editor.view() {
        EditorView::RedirectHome => bail!("sign in to publish articles"),
        EditorView::LoadFailed(message) => bail!(message),
        EditorView::Loading | EditorView::Editing => {}
    }

    for (field, value) in [
        (DraftField::Title, args.title),
        (DraftField::Description, args.description),
        (DraftField::Body, args.body),
    ] {
        if let Some(value) = value {
            editor.set_field(field, value);
        }
    }
    if !args.tags.is_empty() {
        *editor.tags_mut() = TagEditor::seeded(args.tags);
    }

    let article = editor.submit().await?;
    println!("Published '{}' as {}", article.title, article.slug);
    Ok(())
}

fn print_session(app: &AppState) {
    let session = app.session.snapshot();
    match session.user {
        Some(user) if session.is_authenticated => {
            println!("Signed in as {} <{}>", user.username, user.email);
            if let Some(bio) = user.bio.filter(|bio| !bio.is_empty()) {
                println!("  {bio}");
            }
        }
        _ => println!("Not signed in."),
    }
}

fn print_posts(app: &AppState) {
    let state = app.posts.snapshot();
    let pagination = state.pagination();
    if state.articles.is_empty() {
        println!("No articles are here... yet.");
    }
    for article in &state.articles {
        let author = article
            .author
            .as_ref()
            .map(|a| a.username.as_str())
            .unwrap_or("unknown");
        println!("{:<40} {} (by {author})", article.slug, article.title);
    }
    println!(
        "Page {} of {} ({} articles)",
        pagination.current, pagination.total_pages, pagination.total
    );
}

fn print_article(article: &Article) {
    println!("{}", article.title);
    println!("{}", article.description);
    if !article.tag_list.is_empty() {
        println!("[{}]", article.tag_list.join(", "));
    }
    println!();
    println!("{}", article.body);
}
