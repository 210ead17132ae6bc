use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use budgetbook_core::settings_screen::{SettingsEvent, SettingsState};
use futures_core::stream::Stream;

use crate::{error::ApiResult, events::ServerEvent, main_lib::AppState};

async fn get_settings_state(State(state): State<Arc<AppState>>) -> Json<SettingsState> {
    Json(state.settings_screen.current())
}

/// Current state first, then one event per change.
async fn stream_settings_state(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let snapshots = state.settings_screen.observe();
    let stream = tokio_stream::StreamExt::filter_map(snapshots, |snapshot| {
        match ServerEvent::SettingsState(snapshot).to_sse() {
            Ok(event) => Some(Ok(event)),
            Err(err) => {
                tracing::error!("Failed to serialize settings state: {}", err);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

async fn post_settings_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<SettingsEvent>,
) -> ApiResult<StatusCode> {
    state.settings_screen.dispatch(event).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/settings/state", get(get_settings_state))
        .route("/settings/state/stream", get(stream_settings_state))
        .route("/settings/events", post(post_settings_event))
}
