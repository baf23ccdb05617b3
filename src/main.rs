use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sporlfeed::{cli, config, error, types::SearchKind};

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

    /// Show new releases, featured playlists and recommendations
    Home(HomeOptions),

    /// Search the catalog
    Search(SearchOptions),

    /// List your playlists
    Playlists(PlaylistsOptions),

    /// List the tracks of an album
    Album(TrackListOptions),

    /// List the tracks of a playlist
    Playlist(TrackListOptions),

    /// Add a track to one of your playlists
    AddToPlaylist(AddToPlaylistOptions),

    /// Open a track in the Spotify player
    Play(PlayOptions),

    /// Show the state of the cached token
    Status,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct HomeOptions {
    /// Seconds to wait for all sections before showing what loaded
    #[clap(long)]
    pub timeout: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Search query
    pub query: String,

    /// Result type(s) to include; can be repeated, defaults to all
    #[clap(long = "type", value_enum, action = ArgAction::Append, num_args = 1)]
    pub kinds: Vec<SearchKind>,

    /// Maximum results per type
    #[clap(long, default_value_t = 10)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Maximum number of playlists to list
    #[clap(long, default_value_t = 50)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct TrackListOptions {
    /// Album or playlist id, as listed by the home feed
    pub id: String,

    /// Maximum number of tracks to list
    #[clap(long, default_value_t = 50)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct AddToPlaylistOptions {
    /// Track id or spotify:track URI
    pub track: String,

    /// Target playlist id
    pub playlist: String,
}

#[derive(Parser, Debug, Clone)]
pub struct PlayOptions {
    /// Track id or spotify:track URI
    pub track: String,
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
        Command::Auth => cli::auth().await,
        Command::Home(opt) => cli::home(opt.timeout).await,
        Command::Search(opt) => cli::search(opt.query, opt.kinds, opt.limit).await,
        Command::Playlists(opt) => cli::playlists(opt.limit).await,
        Command::Album(opt) => cli::album(opt.id, opt.limit).await,
        Command::Playlist(opt) => cli::playlist(opt.id, opt.limit).await,
        Command::AddToPlaylist(opt) => cli::add_to_playlist(opt.track, opt.playlist).await,
        Command::Play(opt) => cli::play(opt.track),
        Command::Status => cli::status().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
