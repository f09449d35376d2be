use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotifygpt::{
    cli, config, error,
    types::{DEFAULT_SONG_COUNT, MAX_SONG_COUNT, MIN_SONG_COUNT},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightMagenta.on_default())
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
    /// Authorize with Spotify and serve the playlist form
    Serve(ServeOptions),

    /// Generate one playlist from the terminal
    Generate(GenerateOptions),

    /// Show the configuration with secrets masked
    CheckConfig(CheckConfigOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Do not open the form page in a browser
    #[clap(long)]
    pub no_browser: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateOptions {
    /// Free-text description of the music you want
    #[clap(long)]
    pub vibe: String,

    /// Number of songs in the playlist
    #[clap(
        long,
        default_value_t = DEFAULT_SONG_COUNT as u32,
        value_parser = clap::value_parser!(u32).range(MIN_SONG_COUNT as i64..=MAX_SONG_COUNT as i64)
    )]
    pub count: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckConfigOptions {
    /// Also run the Spotify consent flow and show the granted token
    #[clap(long)]
    pub authorize: bool,
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
        Command::Serve(opt) => cli::serve(!opt.no_browser).await,
        Command::Generate(opt) => cli::generate(opt.vibe, opt.count).await,
        Command::CheckConfig(opt) => cli::check_config(opt.authorize).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
