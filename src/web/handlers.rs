use super::{ROLE_HEADER, Result, WebError};
use crate::core::person::deserialize_some;
use crate::core::{PersonFields, PersonPatch, Role, Status, TrackedPerson, TrackerError};
use crate::projection::status_counts;
use crate::session::{Action, SessionContext};
use crate::web::state::AppState;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct BoardPage {
    pub items: Vec<TrackedPerson>,
    pub visible: usize,
    pub total: usize,
    pub counts: Vec<StatusCount>,
}

/// `remarks` absent keeps the stored text; `null` clears it.
#[derive(Debug, Deserialize)]
pub struct InlineEditRequest {
    pub status: Status,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub remarks: Option<Option<String>>,
}

/// Role reported by the client in `x-tracker-role`; `admin` when absent.
#[derive(Debug, Clone, Copy)]
pub struct ClientRole(pub Role);

impl ClientRole {
    fn session(self) -> SessionContext {
        SessionContext::new(self.0)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientRole
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ROLE_HEADER) else {
            return Ok(Self(Role::default()));
        };
        let raw = value
            .to_str()
            .map_err(|_| WebError::Input(format!("{ROLE_HEADER} must be valid ASCII")))?;
        raw.parse::<Role>()
            .map(Self)
            .map_err(|err| WebError::Input(err.to_string()))
    }
}

pub async fn healthcheck() -> Json<ApiResponse<ApiMessage>> {
    Json(ApiResponse {
        data: ApiMessage {
            message: "ok".to_string(),
        },
    })
}

pub async fn list_dignitaries(
    State(state): State<AppState>,
    ClientRole(role): ClientRole,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<BoardPage>>> {
    let records = state.store.list_all().await?;
    let session = SessionContext::new(role).with_filter(query.search.unwrap_or_default());
    let items = session.visible(&records);

    let counts = status_counts(&records)
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect();

    Ok(Json(ApiResponse {
        data: BoardPage {
            visible: items.len(),
            total: records.len(),
            items,
            counts,
        },
    }))
}

pub async fn create_dignitary(
    State(state): State<AppState>,
    role: ClientRole,
    Json(payload): Json<PersonFields>,
) -> Result<(StatusCode, Json<ApiResponse<TrackedPerson>>)> {
    role.session().guard(Action::Add)?;

    let created = state.store.create(payload).await?;
    info!(id = %created.id, name = %created.name, "dignitary added");

    Ok((StatusCode::CREATED, Json(ApiResponse { data: created })))
}

pub async fn get_dignitary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TrackedPerson>>> {
    let record = state.store.get(id).await?;
    Ok(Json(ApiResponse { data: record }))
}

pub async fn replace_dignitary(
    State(state): State<AppState>,
    role: ClientRole,
    Path(id): Path<Uuid>,
    Json(payload): Json<PersonFields>,
) -> Result<Json<ApiResponse<TrackedPerson>>> {
    role.session().guard(Action::Edit)?;
    payload.validate()?;

    let updated = state.store.update(id, PersonPatch::from(payload)).await?;
    Ok(Json(ApiResponse { data: updated }))
}

pub async fn patch_dignitary(
    State(state): State<AppState>,
    role: ClientRole,
    Path(id): Path<Uuid>,
    Json(payload): Json<PersonPatch>,
) -> Result<Json<ApiResponse<TrackedPerson>>> {
    role.session().guard(Action::Edit)?;

    if !payload.has_changes() {
        return Err(TrackerError::validation("at least one field must be provided for PATCH").into());
    }

    let updated = state.store.update(id, payload).await?;
    Ok(Json(ApiResponse { data: updated }))
}

pub async fn inline_edit_dignitary(
    State(state): State<AppState>,
    role: ClientRole,
    Path(id): Path<Uuid>,
    Json(payload): Json<InlineEditRequest>,
) -> Result<Json<ApiResponse<TrackedPerson>>> {
    let record = state.store.get(id).await?;

    let mut session = role
        .session()
        .start_inline_edit(&record)?
        .set_draft_status(payload.status);
    if let Some(remarks) = payload.remarks {
        session = session.set_draft_remarks(remarks.unwrap_or_default());
    }

    let (_session, saved) = session.save_inline_edit(&state.store).await;
    Ok(Json(ApiResponse { data: saved? }))
}

pub async fn delete_dignitary(
    State(state): State<AppState>,
    role: ClientRole,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    role.session().guard(Action::Delete)?;

    state.store.delete(id).await?;
    info!(%id, "dignitary removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Attaches an uploaded portrait. Bytes that are not an image leave the record
/// as it was.
pub async fn upload_portrait(
    State(state): State<AppState>,
    role: ClientRole,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ApiResponse<TrackedPerson>>> {
    role.session().guard(Action::Edit)?;
    let current = state.store.get(id).await?;

    let Some(reference) = state.portraits.prepare(body.to_vec()).await? else {
        warn!(%id, "portrait upload ignored");
        return Ok(Json(ApiResponse { data: current }));
    };

    let updated = state
        .store
        .update(id, PersonPatch::portrait(Some(reference)))
        .await?;
    Ok(Json(ApiResponse { data: updated }))
}

pub async fn get_portrait(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let record = state.store.get(id).await?;
    let reference = record
        .portrait_image
        .ok_or_else(|| TrackerError::not_found(format!("portrait of {id}")))?;

    let (mime, bytes) = state.portraits.resolve(&reference).await?;
    Ok(([(header::CONTENT_TYPE, mime)], bytes).into_response())
}
