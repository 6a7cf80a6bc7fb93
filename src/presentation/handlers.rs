// HTTP request handlers
use crate::application::chart_variant::ChartVariant;
use crate::application::stats_card::CardError;
use crate::domain::stats::{Category, ALL_LOCALES};
use crate::presentation::app_state::{AppState, CardSlot};
use crate::presentation::card_view::render_card;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    Json,
};
use futures::stream::{BoxStream, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardKind {
    Clips,
    Voices,
}

impl CardKind {
    fn parse(kind: &str) -> Option<Self> {
        match kind {
            "clips" => Some(CardKind::Clips),
            "voices" => Some(CardKind::Voices),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RenderQuery {
    pub ready: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct WidthQuery {
    pub px: f64,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Selectable categories, "all" first
pub async fn list_locales(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let mut locales = Vec::with_capacity(state.locales.len() + 1);
    locales.push(ALL_LOCALES.to_string());
    locales.extend(state.locales.iter().cloned());
    Json(locales)
}

/// Render the latest snapshot of a card, optionally waiting for it to be ready
pub async fn render_card_page(
    Path(kind): Path<String>,
    Query(query): Query<RenderQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(kind) = CardKind::parse(&kind) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let wait = query.ready.unwrap_or(false).then_some(state.ready_timeout);

    match kind {
        CardKind::Clips => render_slot(&state.clips, &state.locales, wait).await,
        CardKind::Voices => render_slot(&state.voices, &state.locales, wait).await,
    }
}

/// Change the selected category of a card
pub async fn select_category(
    Path(kind): Path<String>,
    Query(query): Query<CategoryQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(kind) = CardKind::parse(&kind) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if !state.is_selectable(&query.value) {
        return (StatusCode::BAD_REQUEST, format!("unknown category: {}", query.value)).into_response();
    }

    let category = Category::parse(&query.value);
    let result = match kind {
        CardKind::Clips => state.clips.handle.select_category(category).await,
        CardKind::Voices => state.voices.handle.select_category(category).await,
    };

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => card_error(e),
    }
}

/// Report a new width for the card's surface
pub async fn resize_card(
    Path(kind): Path<String>,
    Query(query): Query<WidthQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(kind) = CardKind::parse(&kind) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if !query.px.is_finite() || query.px < 0.0 {
        return (StatusCode::BAD_REQUEST, "width must be a non-negative number").into_response();
    }

    let result = match kind {
        CardKind::Clips => state.clips.resize(query.px).await,
        CardKind::Voices => state.voices.resize(query.px).await,
    };

    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => card_error(e),
    }
}

/// Server-sent events carrying the re-rendered card on every change
pub async fn stream_card(Path(kind): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let Some(kind) = CardKind::parse(&kind) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let events = match kind {
        CardKind::Clips => card_events(&state.clips, state.locales.clone()),
        CardKind::Voices => card_events(&state.voices, state.locales.clone()),
    };

    Sse::new(events).keep_alive(KeepAlive::default()).into_response()
}

async fn render_slot<V: ChartVariant>(
    slot: &CardSlot<V>,
    locales: &[String],
    wait: Option<Duration>,
) -> Response {
    let snapshot = match wait {
        Some(timeout) => match slot.handle.wait_ready(timeout).await {
            Ok(snapshot) => snapshot,
            Err(e) => return card_error(e),
        },
        None => slot.handle.snapshot(),
    };

    Html(render_card::<V>(&snapshot, locales)).into_response()
}

fn card_events<V: ChartVariant>(
    slot: &CardSlot<V>,
    locales: Vec<String>,
) -> BoxStream<'static, Result<Event, Infallible>> {
    slot.handle
        .updates()
        .map(move |snapshot| {
            Ok(Event::default()
                .event(snapshot.status.as_str())
                .data(render_card::<V>(&snapshot, &locales)))
        })
        .boxed()
}

fn card_error(error: CardError) -> Response {
    tracing::warn!("Card request failed: {}", error);
    let status = match error {
        CardError::Closed => StatusCode::SERVICE_UNAVAILABLE,
        CardError::ReadyTimeout => StatusCode::GATEWAY_TIMEOUT,
    };
    (status, error.to_string()).into_response()
}
