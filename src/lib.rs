//! SpotifyGPT library
//!
//! Turns a free-text music vibe into a private Spotify playlist. A chat model
//! invents the playlist (name, description, songs) through a function-call
//! schema, every song is matched to the top Spotify search hit, and the
//! resulting tracks are added to a new private playlist on the user's account.
//!
//! # Modules
//!
//! - `api` - routes of the local server (form page, OAuth callback, health)
//! - `cli` - command implementations
//! - `config` - configuration from the environment and `.env` files
//! - `error` - the error taxonomy of a run
//! - `generator` - chat request construction
//! - `openai` - chat completions client
//! - `pipeline` - run state machine tying everything together
//! - `publisher` - playlist creation
//! - `resolver` - function-call parsing and catalog matching
//! - `server` - local HTTP server
//! - `spotify` - Spotify Web API client and authorization flow
//! - `types` - data structures and wire types
//! - `utils` - PKCE helpers, query building and formatting
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use spotifygpt::{config::Config, openai::OpenAiClient, pipeline::{Pipeline, Silent}};
//!
//! # async fn run(session: spotifygpt::spotify::Session) -> spotifygpt::Res<()> {
//! let config = Config::from_env()?;
//! let chat = Arc::new(OpenAiClient::new(config.openai_api_url.clone(), config.openai_api_key.clone()));
//! let pipeline = Pipeline::new(chat, session.catalog, config.openai_model.clone());
//! let preference = spotifygpt::types::UserPreference::new("upbeat running music", 3);
//! pipeline.run(&preference, &Silent).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod openai;
pub mod pipeline;
pub mod publisher;
pub mod resolver;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
///
/// # Example
///
/// ```
/// use spotifygpt::Res;
///
/// async fn load() -> Res<()> {
///     spotifygpt::config::load_env().await?;
///     Ok(())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Waiting for Spotify authorization...");
/// info!("Run {}", state);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations. Used to provide positive feedback
/// when operations complete successfully.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("Authentication successful!");
/// success!("Playlist Created. Click Here: {}", url);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors
/// that require immediate program termination.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Cannot load environment. Err: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues or important notices that don't require program termination.
/// Used for recoverable issues or important information that users should notice.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("Failed to open browser. Please open {} manually.", url);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
