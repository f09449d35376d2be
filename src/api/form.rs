use async_trait::async_trait;
use axum::{Extension, Form, response::Html};
use serde::Deserialize;

use crate::{
    info,
    pipeline::{RunOutcome, RunState, StageObserver},
    server::AppState,
    success,
    types::{DEFAULT_SONG_COUNT, MAX_SONG_COUNT, MIN_SONG_COUNT, UserPreference},
    utils::escape_html,
    warning,
};

/// Raw fields of the preference form.
#[derive(Debug, Default, Deserialize)]
pub struct PreferenceForm {
    #[serde(default)]
    pub vibe: String,
    #[serde(default)]
    pub count: String,
}

impl PreferenceForm {
    /// Numeric counts are clamped into the slider range; anything else falls
    /// back to the slider default.
    pub fn into_preference(self) -> UserPreference {
        let count = self
            .count
            .trim()
            .parse::<i64>()
            .map(|n| n.clamp(MIN_SONG_COUNT as i64, MAX_SONG_COUNT as i64) as u32)
            .unwrap_or(DEFAULT_SONG_COUNT as u32);
        UserPreference::new(self.vibe, count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Created { url: String, name: String },
    WaitingForAuthorization,
    Failed(String),
}

pub async fn form_page() -> Html<String> {
    Html(render_page(&UserPreference::default(), None))
}

pub async fn submit_form(
    Extension(app): Extension<AppState>,
    Form(form): Form<PreferenceForm>,
) -> Html<String> {
    let preference = form.into_preference();

    let Some(pipeline) = app.pipeline.get() else {
        return Html(render_page(
            &preference,
            Some(&Notice::WaitingForAuthorization),
        ));
    };

    let notice = match pipeline.run(&preference, &TerminalLog).await {
        Ok(RunOutcome::AwaitingInput) => None,
        Ok(RunOutcome::Done(playlist)) => {
            success!("Playlist created: {}", playlist.external_url);
            Some(Notice::Created {
                url: playlist.external_url,
                name: playlist.name,
            })
        }
        Err(e) => {
            warning!("{}", e);
            Some(Notice::Failed(e.to_string()))
        }
    };

    Html(render_page(&preference, notice.as_ref()))
}

/// Mirrors page-driven runs on the terminal.
struct TerminalLog;

#[async_trait]
impl StageObserver for TerminalLog {
    async fn enter(&self, state: RunState) {
        if state != RunState::AwaitingInput {
            info!("Run {}", state);
        }
    }
}

/// Renders the single page: header, form, progress notice and result.
pub fn render_page(preference: &UserPreference, notice: Option<&Notice>) -> String {
    let notice_html = match notice {
        Some(Notice::Created { url, name }) => format!(
            r#"<p class="result">Playlist Created. <a href="{url}" target="_blank">Click Here!</a> ({name})</p>"#,
            url = escape_html(url),
            name = escape_html(name),
        ),
        Some(Notice::WaitingForAuthorization) => {
            r#"<p class="notice">Still waiting for Spotify authorization. Finish the consent page and submit again.</p>"#
                .to_string()
        }
        Some(Notice::Failed(message)) => format!(
            r#"<p class="error">{}</p>"#,
            escape_html(message)
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>SpotifyGPT</title>
<style>
body {{ font-family: sans-serif; max-width: 40rem; margin: 2rem auto; }}
h1 span {{ color: violet; }}
textarea {{ width: 100%; min-height: 6rem; }}
#working {{ display: none; }}
.error {{ color: #b00020; }}
</style>
</head>
<body>
<h1><em>Spotify<span>GPT</span></em></h1>
<h2>What type of music are you feeling today?</h2>
<form method="post" action="/" onsubmit="document.getElementById('working').style.display='block'">
<label for="vibe">Enter your music vibe here...</label>
<textarea id="vibe" name="vibe">{vibe}</textarea>
<label for="count">Number of Songs: <output id="count-value">{count}</output></label>
<input type="range" id="count" name="count" min="{min}" max="{max}" value="{count}" oninput="document.getElementById('count-value').value=this.value">
<button type="submit">Create Playlist!</button>
</form>
<div id="working">
<p id="finding">Finding Those Songs!</p>
<p id="creating">Creating Playlist!</p>
</div>
{notice}
</body>
</html>
"#,
        vibe = escape_html(&preference.vibe),
        count = preference.song_count,
        min = MIN_SONG_COUNT,
        max = MAX_SONG_COUNT,
        notice = notice_html,
    )
}
