use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, WebSocketUpgrade},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use greenroom_api::middleware::require_auth;
use greenroom_api::{AppState, AppStateInner, bookings, feedback};
use greenroom_gateway::{RejectReason, RoomSessions, connection, handshake};
use greenroom_schedule::Scheduler;
use greenroom_types::api::ErrorBody;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greenroom=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("GREENROOM_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("GREENROOM_DB_PATH").unwrap_or_else(|_| "greenroom.db".into());
    let host = std::env::var("GREENROOM_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("GREENROOM_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = Arc::new(greenroom_db::Database::open(&PathBuf::from(&db_path))?);

    // Shared state
    let sessions = RoomSessions::new();
    let state: AppState = Arc::new(AppStateInner {
        db: db.clone(),
        scheduler: Scheduler::new(db),
        sessions,
        jwt_secret,
    });

    // Routes
    let booking_routes = Router::new()
        .route("/interviews", get(bookings::list_bookings))
        .route("/interviews", post(bookings::create_booking))
        .route("/interviews/room/{room_id}", get(bookings::get_booking_by_room))
        .route("/interviews/{id}", get(bookings::get_booking))
        .route("/interviews/{id}", put(bookings::update_booking))
        .route("/interviews/{id}", delete(bookings::cancel_booking))
        .route("/interviews/feedback", post(feedback::submit_feedback))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // The room socket authorizes inside the upgrade handler; the bearer
    // token travels in the query string, not the Authorization header.
    let ws_route = Router::new().route("/rooms/{room_id}/socket", get(room_socket));

    let app = Router::new()
        .merge(booking_routes)
        .merge(ws_route)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Greenroom server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, Deserialize)]
struct SocketQuery {
    token: Option<String>,
}

/// Connect-time handshake for the interview room: authorize against the
/// booking first, upgrade only on acceptance. Rejections carry the stable
/// reason code in the HTTP response.
async fn room_socket(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Query(query): Query<SocketQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    match handshake::authorize(
        state.db.clone(),
        &state.jwt_secret,
        query.token.as_deref(),
        &room_id,
    )
    .await
    {
        Ok(ticket) => {
            let sessions = state.sessions.clone();
            ws.on_upgrade(move |socket| connection::handle_connection(socket, sessions, ticket))
        }
        Err(reason) => {
            let status = match reason {
                RejectReason::Unauthorized => StatusCode::UNAUTHORIZED,
                RejectReason::RoomNotFound => StatusCode::NOT_FOUND,
                RejectReason::Forbidden => StatusCode::FORBIDDEN,
                RejectReason::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(ErrorBody {
                    error: reason.as_str(),
                    message: format!("room connection rejected: {}", reason.as_str()),
                }),
            )
                .into_response()
        }
    }
}
