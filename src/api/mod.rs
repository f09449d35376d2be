//! # API Module
//!
//! Routes of the local server that backs SpotifyGPT's single page.
//!
//! ## Endpoints
//!
//! - [`form_page`] - `GET /`, the preference form with its defaults
//! - [`submit_form`] - `POST /`, runs the pipeline for a submission and
//!   re-renders the form with the playlist link or the failure
//! - [`callback`] - `GET /callback`, the OAuth redirect target that exchanges
//!   the authorization code for a token
//! - [`health`] - `GET /health`, status and version
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let app = spotifygpt::server::router(state);
//! axum::serve(listener, app).await?;
//! ```

mod callback;
mod form;
mod health;

pub use callback::callback;
pub use form::{Notice, PreferenceForm, form_page, render_page, submit_form};
pub use health::health;
