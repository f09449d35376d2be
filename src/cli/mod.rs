//! # CLI Module
//!
//! Command implementations behind the `spotifygpt` binary.
//!
//! ## Commands
//!
//! - [`serve`] - authorizes with Spotify, then serves the preference form page
//!   on the local server and creates a playlist for every submission
//! - [`generate`] - a single run from the terminal with spinners and a table
//!   of the resolved tracks
//! - [`check_config`] - shows the configuration with secrets masked,
//!   optionally verifying the Spotify authorization
//!
//! Every command loads its [`crate::config::Config`] once and passes it down.
//! Fatal problems are reported with [`crate::error!`], which ends the process.
//!
//! ## Usage
//!
//! ```bash
//! spotifygpt serve
//! spotifygpt generate --vibe "upbeat running music" --count 3
//! spotifygpt check-config --authorize
//! ```

mod check;
mod generate;
mod serve;
mod session;
mod spinner;

pub use check::check_config;
pub use generate::generate;
pub use serve::serve;
pub use spinner::{MIN_INDICATOR_DISPLAY, StageSpinner};
