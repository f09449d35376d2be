use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::{server::AppState, spotify::auth::exchange_code, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(app): Extension<AppState>,
) -> Html<&'static str> {
    let mut state = app.auth.lock().await;
    let Some(pkce_state) = state.as_mut() else {
        return Html("<h4>No authorization in progress.</h4>");
    };

    if let Some(error) = params.get("error") {
        pkce_state.error = Some(format!("consent was not granted ({})", error));
        return Html("<h4>Authorization declined.</h4><p>Close browser window.</p>");
    }

    if params.get("state") != Some(&pkce_state.state) {
        pkce_state.error = Some("state parameter did not match".to_string());
        return Html("<h4>Login failed.</h4>");
    }

    let Some(code) = params.get("code") else {
        pkce_state.error = Some("callback carried no authorization code".to_string());
        return Html("<h4>Missing authorization code.</h4>");
    };

    let verifier = pkce_state.code_verifier.clone();

    match exchange_code(&app.config, code, &verifier).await {
        Ok(token) => {
            pkce_state.token = Some(token);
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            pkce_state.error = Some(e.to_string());
            Html("<h4>Login failed.</h4>")
        }
    }
}
