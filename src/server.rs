//! HTTP front end.
//!
//! A thin axum layer over the catalog, access filter and renderer. Handlers
//! authenticate, filter by role, look up the catalog and hand the result to
//! [`Renderer`]; none of them hold state of their own.
//!
//! ## Routes
//!
//! | Method | Path | Response |
//! |---|---|---|
//! | GET | `/` | album index |
//! | GET | `/album/:album` | first photo, or the list with `?list=true` |
//! | GET | `/photo/:album/:photo` | photo viewer, `?fullScreen=true` optional |
//! | GET, POST | `/reset` | clears the catalog cache (admin only) |
//! | GET | `/static/swipe.js` | touch and keyboard navigation script |
//! | GET | `/<gallery-base>/:album/:photo` | media bytes |
//!
//! An album the caller may not see, or one without media, redirects
//! `/album/...` to the index. Photo and media requests for such albums get
//! 404 so their existence is not revealed.
//!
//! ## Authentication
//!
//! HTTP Basic against the configured accounts. When no account is configured
//! at all, every visitor is treated as admin.

use crate::access::{Authenticator, Role, UserAccess};
use crate::catalog::Catalog;
use crate::config::GalleryConfig;
use crate::naming::encode_segment;
use crate::navigation::NavigationError;
use crate::render::{ALL_ALBUMS_URL, PhotoPage, Renderer};
use axum::Router;
use axum::extract::{Path as AxumPath, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const SWIPE_JS: &str = include_str!("../static/swipe.js");
const REALM: &str = "Basic realm=\"albums\", charset=\"UTF-8\"";

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("authentication required")]
    Unauthorized,
    #[error("admin access required")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, REALM)],
                self.to_string(),
            )
                .into_response(),
            ServerError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()).into_response(),
            ServerError::NotFound | ServerError::Navigation(_) => {
                (StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            ServerError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub renderer: Arc<Renderer>,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            catalog: Arc::new(Catalog::from_config(config)),
            renderer: Arc::new(Renderer::from_config(config)),
            authenticator: Arc::new(Authenticator::from_config(&config.access)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AlbumQuery {
    #[serde(default)]
    list: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhotoQuery {
    #[serde(default)]
    full_screen: bool,
}

/// All routes, bound to `state`.
pub fn router(state: AppState) -> Router {
    let media_route = format!(
        "/{}/:album/:photo",
        encode_segment(state.renderer.gallery_base())
    );
    Router::new()
        .route("/", get(albums_page))
        .route("/album/:album", get(album_page))
        .route("/photo/:album/:photo", get(photo_page))
        .route("/reset", get(reset).post(reset))
        .route("/static/swipe.js", get(swipe_js))
        .route(&media_route, get(media))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Build the state from `config` and serve until Ctrl-C.
pub async fn serve(config: GalleryConfig) -> Result<(), ServerError> {
    let state = AppState::from_config(&config);
    if state.authenticator.is_empty() {
        warn!("no accounts configured, every visitor has admin access");
    }

    if config.catalog.preload {
        let catalog = Arc::clone(&state.catalog);
        let settings = config.catalog.clone();
        let preload = tokio::task::spawn_blocking(move || {
            let albums = catalog.list_all_albums();
            catalog.preload(&albums, &settings);
        });
        if let Err(e) = preload.await {
            warn!(error = %e, "catalog preload did not finish");
        }
    }

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(
        bind = %config.server.bind,
        albums = %config.albums_root().display(),
        "listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

// ============================================================================
// Authentication
// ============================================================================

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<UserAccess, ServerError> {
    if state.authenticator.is_empty() {
        return Ok(UserAccess::admin());
    }
    let (user, password) = basic_credentials(headers).ok_or(ServerError::Unauthorized)?;
    match state.authenticator.authenticate(&user, &password) {
        Some(identity) => Ok(UserAccess::from_identity(&identity)),
        None => {
            warn!(user = %user, "rejected credentials");
            Err(ServerError::Unauthorized)
        }
    }
}

/// User and password from an `Authorization: Basic` header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = String::from_utf8(STANDARD.decode(encoded.trim()).ok()?).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

// ============================================================================
// Handlers
// ============================================================================

async fn albums_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, ServerError> {
    let access = authorize(&state, &headers)?;
    let albums = access.visible_albums(&state.catalog.list_all_albums());
    Ok(Html(state.renderer.render_albums(&albums)))
}

async fn album_page(
    State(state): State<AppState>,
    AxumPath(album): AxumPath<String>,
    Query(query): Query<AlbumQuery>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let access = authorize(&state, &headers)?;
    if !access.can_view(&album) {
        return Ok(Redirect::to(ALL_ALBUMS_URL).into_response());
    }
    let photos = state.catalog.list_photos(&album);
    if photos.is_empty() {
        return Ok(Redirect::to(ALL_ALBUMS_URL).into_response());
    }

    let html = if query.list {
        state.renderer.render_album_photos(&album, &photos)
    } else {
        state.renderer.render_photo(&PhotoPage {
            album: &album,
            photo: None,
            photos: &photos,
            full_screen: false,
        })?
    };
    Ok(Html(html).into_response())
}

async fn photo_page(
    State(state): State<AppState>,
    AxumPath((album, photo)): AxumPath<(String, String)>,
    Query(query): Query<PhotoQuery>,
    headers: HeaderMap,
) -> Result<Html<String>, ServerError> {
    let access = authorize(&state, &headers)?;
    if !access.can_view(&album) {
        return Err(ServerError::NotFound);
    }
    let photos = state.catalog.list_photos(&album);
    let html = state.renderer.render_photo(&PhotoPage {
        album: &album,
        photo: Some(photo.as_str()),
        photos: &photos,
        full_screen: query.full_screen,
    })?;
    Ok(Html(html))
}

async fn reset(State(state): State<AppState>, headers: HeaderMap) -> Result<Redirect, ServerError> {
    let access = authorize(&state, &headers)?;
    if access.role != Role::Admin {
        return Err(ServerError::Forbidden);
    }
    state.catalog.reset();
    Ok(Redirect::to(ALL_ALBUMS_URL))
}

async fn swipe_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/javascript")], SWIPE_JS)
}

async fn media(
    State(state): State<AppState>,
    AxumPath((album, photo)): AxumPath<(String, String)>,
    headers: HeaderMap,
    request: Request,
) -> Result<Response, ServerError> {
    let access = authorize(&state, &headers)?;
    if !access.can_view(&album) {
        return Err(ServerError::NotFound);
    }
    let path = state
        .catalog
        .photo_path(&album, &photo)
        .ok_or(ServerError::NotFound)?;
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => Ok(response.into_response()),
        Err(never) => match never {},
    }
}
