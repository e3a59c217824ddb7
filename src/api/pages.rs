//! Server-rendered browser surface: the create/list homepage and the redirect
//! route with its not-found page.

use askama::Template;
use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::DateTime;
use tracing::{debug, error, instrument};

use crate::{
    flows::{
        delete, listing,
        redirect::{self, RedirectState},
        shorten,
    },
    ledger::{cookie::CookieStorage, Ledger, MAX_OWNED_URLS},
    state::AppState,
    types::{ShortenForm, UrlDetailResponse},
    utils::{short_url, valid_short_code},
};

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    notice: Option<Notice>,
    count: usize,
    limit: usize,
    near_limit: bool,
    at_capacity: bool,
    urls: Vec<UrlRow>,
}

#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    missing: String,
}

#[derive(Debug)]
struct Notice {
    class: &'static str,
    title: String,
    description: String,
}

impl Notice {
    fn success(title: &str, description: &str) -> Self {
        Self {
            class: "success",
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    fn error(title: &str, description: &str) -> Self {
        Self {
            class: "error",
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// One entry of the homepage list.
#[derive(Debug)]
struct UrlRow {
    code: String,
    short_url: String,
    original_url: String,
    created: String,
}

impl From<UrlDetailResponse> for UrlRow {
    fn from(url: UrlDetailResponse) -> Self {
        Self {
            created: format_date(&url.created_at),
            code: url.code,
            short_url: url.short_url,
            original_url: url.original_url,
        }
    }
}

#[instrument(skip(state, storage))]
pub async fn home(State(state): State<AppState>, storage: CookieStorage) -> Response {
    let ledger = Ledger::new(storage);
    render_home(&state, ledger, StatusCode::OK, None).await
}

#[instrument(skip(state, storage, form))]
pub async fn submit(
    State(state): State<AppState>,
    storage: CookieStorage,
    Form(form): Form<ShortenForm>,
) -> Response {
    let mut ledger = Ledger::new(storage);
    let (status, notice) =
        match shorten::shorten(state.store.as_ref(), &mut ledger, &form.url).await {
            Ok(_) => (
                StatusCode::OK,
                Notice::success(
                    "URL Shortened!",
                    "Your short URL has been created successfully",
                ),
            ),
            Err(e) => (e.status(), Notice::error(&e.to_string(), &e.detail())),
        };
    render_home(&state, ledger, status, Some(notice)).await
}

#[instrument(skip(state, storage))]
pub async fn delete_submit(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
    storage: CookieStorage,
) -> Response {
    let mut ledger = Ledger::new(storage);
    let (status, notice) =
        match delete::delete(state.store.as_ref(), &mut ledger, &short_code).await {
            Ok(()) => (
                StatusCode::OK,
                Notice::success("Deleted", "URL removed successfully"),
            ),
            Err(e) => (e.status(), Notice::error("Error", &e.to_string())),
        };
    render_home(&state, ledger, status, Some(notice)).await
}

/// `/{segment}`: code-shaped segments go through the redirect lookup,
/// anything else gets the homepage.
#[instrument(skip(state, storage))]
pub async fn visit(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    storage: CookieStorage,
) -> Response {
    if !valid_short_code(&segment) {
        debug!(segment = %segment, "Not a short code, serving homepage");
        let ledger = Ledger::new(storage);
        return render_home(&state, ledger, StatusCode::OK, None).await;
    }

    match redirect::resolve(state.store.as_ref(), &segment).await {
        RedirectState::Redirecting(target) => Redirect::temporary(&target).into_response(),
        RedirectState::NotFound => {
            let page = NotFoundTemplate {
                missing: short_url(&state.base_url, &segment),
            };
            match page.render() {
                Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
                Err(e) => {
                    error!(error = %e, "Failed to render not-found page");
                    StatusCode::NOT_FOUND.into_response()
                }
            }
        }
    }
}

#[instrument(skip(state, storage))]
pub async fn fallback(State(state): State<AppState>, storage: CookieStorage, uri: Uri) -> Response {
    debug!(path = %uri.path(), "Unrouted path, serving homepage");
    let ledger = Ledger::new(storage);
    render_home(&state, ledger, StatusCode::OK, None).await
}

async fn render_home(
    state: &AppState,
    ledger: Ledger<CookieStorage>,
    status: StatusCode,
    notice: Option<Notice>,
) -> Response {
    let urls = listing::list(state.store.as_ref(), &ledger, &state.base_url).await;
    let page = HomeTemplate {
        notice,
        count: ledger.count(),
        limit: MAX_OWNED_URLS,
        near_limit: ledger.is_near_limit(),
        at_capacity: ledger.is_at_capacity(),
        urls: urls.into_iter().map(UrlRow::from).collect(),
    };
    let jar = ledger.into_storage().into_jar();
    match page.render() {
        Ok(html) => (status, jar, Html(html)).into_response(),
        Err(e) => {
            // the ledger may already have changed, so the cookie still goes out
            error!(error = %e, "Failed to render homepage");
            (StatusCode::INTERNAL_SERVER_ERROR, jar).into_response()
        }
    }
}

fn format_date(created_at: &str) -> String {
    match DateTime::parse_from_rfc3339(created_at) {
        Ok(parsed) => parsed.format("%b %-d, %Y, %H:%M").to_string(),
        Err(_) => created_at.to_string(),
    }
}
