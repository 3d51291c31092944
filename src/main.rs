use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use chartsync::{cli, config, error, store::Selection, types::TokenResponse};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Scrape chart pages into the local store
    Charts(ChartsOptions),

    /// Match stored tracks and fetch audio features
    Features(FeaturesOptions),

    /// Create a playlist from a track selection
    Playlist(PlaylistOptions),

    /// Show store statistics
    Info,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ChartsOptions {
    /// Limit the number of index pages to walk
    #[clap(long)]
    pub pages: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct FeaturesOptions {
    /// Maximum tracks to process this run (capped at 1000)
    #[clap(long)]
    pub limit: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Select tracks of one chart
    #[clap(long, group = "selection")]
    pub chart: Option<String>,

    /// Select tracks of all charts by one author
    #[clap(long, group = "selection")]
    pub author: Option<String>,

    /// Select tracks by artist name
    #[clap(long, group = "selection")]
    pub artist: Option<String>,

    /// Select tracks by genre
    #[clap(long, group = "selection")]
    pub genre: Option<String>,

    /// Playlist name (defaults to a name derived from the selection)
    #[clap(long)]
    pub name: Option<String>,

    /// Also create a recommendations playlist seeded from the matches
    #[clap(long)]
    pub recommendations: bool,
}

impl PlaylistOptions {
    fn selection(&self) -> Option<Selection> {
        if let Some(chart) = &self.chart {
            return Some(Selection::Chart(chart.clone()));
        }
        if let Some(author) = &self.author {
            return Some(Selection::Author(author.clone()));
        }
        if let Some(artist) = &self.artist {
            return Some(Selection::Artist(artist.clone()));
        }
        self.genre.as_ref().map(|g| Selection::Genre(g.clone()))
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<TokenResponse>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Charts(opt) => cli::update_charts(opt.pages).await,
        Command::Features(opt) => cli::update_features(opt.limit).await,
        Command::Playlist(opt) => match opt.selection() {
            Some(selection) => cli::playlist(selection, opt.name, opt.recommendations).await,
            None => error!("Select tracks with one of --chart, --author, --artist or --genre."),
        },
        Command::Info => cli::info().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
