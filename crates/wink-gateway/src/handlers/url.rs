use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, CreateUrlResponse, ResolveQuery};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use wink_core::{ExpirationPolicy, ShortCode, ShortenParams, UrlRecord};

fn expiration(request_ttl: Option<u64>, default: ExpirationPolicy) -> Result<ExpirationPolicy> {
    match request_ttl {
        Some(secs) => ExpirationPolicy::after_secs(secs)
            .map_err(|e| AppError::InvalidRequest(e.to_string())),
        None => Ok(default),
    }
}

async fn resolve(state: &AppState, code: &str) -> Result<UrlRecord> {
    state
        .redirector()
        .resolve(code)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn create_url_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateUrlRequest>,
) -> Result<Json<CreateUrlResponse>> {
    let params = ShortenParams {
        original_url: request.url,
        expiration: expiration(request.ttl_secs, state.default_expiration())?,
    };

    let link = state.shortener().shorten(params).await?;

    Ok(Json(CreateUrlResponse {
        id: link.code.to_string(),
    }))
}

pub async fn resolve_path_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<String> {
    Ok(resolve(&state, &code).await?.original_url)
}

pub async fn resolve_query_handler(
    Query(query): Query<ResolveQuery>,
    State(state): State<AppState>,
) -> Result<String> {
    Ok(resolve(&state, &query.id).await?.original_url)
}

pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect> {
    let record = resolve(&state, &code).await?;
    Ok(Redirect::temporary(&record.original_url))
}

pub async fn delete_url_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    let code = ShortCode::parse(&code).map_err(|e| AppError::MalformedCode(e.to_string()))?;

    if state.shortener().delete(&code).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
