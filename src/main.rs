use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use musicmood::{
    catalog::{playlists::ChartKind, search::DEFAULT_SEARCH_LIMIT},
    cli, config, error,
    management::Session,
};

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
    /// Show a music chart
    Chart(ChartOptions),

    /// List curated or liked playlists
    Playlists(PlaylistsOptions),

    /// Show a playlist and its tracks
    Playlist(PlaylistOptions),

    /// Search artists and tracks
    Search(SearchOptions),

    /// Like a playlist
    Like(PlaylistIdOption),

    /// Remove a playlist from your likes
    Unlike(PlaylistIdOption),

    /// Show or edit your profile
    Profile(ProfileOptions),

    /// Preview the tracks of a playlist
    Play(PlayOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ChartOptions {
    /// Which chart to show
    #[clap(long, value_enum, default_value_t = ChartKind::Global)]
    pub kind: ChartKind,

    /// Hand the chart to the preview player
    #[clap(long)]
    pub play: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Show your liked playlists instead of the curated ones
    #[clap(long)]
    pub liked: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Catalog playlist id
    pub id: String,

    /// Maximum number of tracks to show
    #[clap(long)]
    pub limit: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// What to search for
    #[clap(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Results per category
    #[clap(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistIdOption {
    /// Catalog playlist id
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Show or edit your profile")]
pub struct ProfileOptions {
    /// Subcommands under `profile` (e.g., `set`)
    #[command(subcommand)]
    pub command: Option<ProfileSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProfileSubcommand {
    /// Show who you are signed in as
    Show,

    /// Change a profile field (name, password or phone)
    Set(ProfileSetOpts),
}

#[derive(Parser, Debug, Clone)]
pub struct ProfileSetOpts {
    pub field: String,
    pub value: String,
}

#[derive(Parser, Debug, Clone)]
pub struct PlayOptions {
    /// Catalog playlist id
    pub id: String,

    /// Wait for a command instead of starting the first preview
    #[clap(long)]
    pub no_autoplay: bool,
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

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let mut session = Session::bootstrap().await;

    match cli.command {
        Command::Chart(opt) => cli::chart(&session, opt.kind, opt.play).await,
        Command::Playlists(opt) => cli::list_playlists(&session, opt.liked).await,
        Command::Playlist(opt) => cli::show_playlist(&session, &opt.id, opt.limit).await,
        Command::Search(opt) => cli::search(&session, &opt.query.join(" "), opt.limit).await,
        Command::Like(opt) => cli::like(&mut session, &opt.id, true).await,
        Command::Unlike(opt) => cli::like(&mut session, &opt.id, false).await,
        Command::Profile(opt) => match opt.command {
            Some(ProfileSubcommand::Set(s)) => cli::set_profile(&session, &s.field, &s.value).await,
            Some(ProfileSubcommand::Show) | None => cli::show_profile(&session),
        },
        Command::Play(opt) => cli::play(&session, &opt.id, !opt.no_autoplay).await,
        Command::Completions(_) => {}
    }
}
