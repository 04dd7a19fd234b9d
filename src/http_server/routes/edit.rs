use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::Form;
use serde::{Deserialize, Serialize};

use crate::http_server::error::ApiError;
use crate::http_server::routes::view::ProductionResponse;
use crate::http_server::state::AppState;
use crate::services::cast::CastService;
use crate::services::production::{ProductionForm, ProductionService};
use crate::services::song::SongService;
use crate::services::team::TeamService;

#[derive(Serialize)]
pub struct IdResponse {
    pub id: i64,
}

// ---- Productions ----

pub async fn list_productions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductionResponse>>, ApiError> {
    let productions = ProductionService::new(state.db.clone()).list().await?;
    Ok(Json(productions.into_iter().map(Into::into).collect()))
}

pub async fn create_production(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProductionResponse>, ApiError> {
    let production = ProductionService::new(state.db.clone()).create().await?;
    Ok(Json(production.into()))
}

#[derive(Debug, Deserialize)]
pub struct ActiveProductionForm {
    pub active_production: i64,
}

pub async fn set_active_production(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ActiveProductionForm>,
) -> Result<StatusCode, ApiError> {
    ProductionService::new(state.db.clone())
        .set_active(form.active_production)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_production(
    State(state): State<Arc<AppState>>,
    Path(production_id): Path<i64>,
    Form(form): Form<ProductionForm>,
) -> Result<Json<ProductionResponse>, ApiError> {
    let production = ProductionService::new(state.db.clone())
        .update(production_id, form)
        .await?;
    Ok(Json(production.into()))
}

pub async fn delete_production(
    State(state): State<Arc<AppState>>,
    Path(production_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    ProductionService::new(state.db.clone())
        .delete(production_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ThanksForm {
    pub thanks_text: Option<String>,
}

pub async fn update_thanks(
    State(state): State<Arc<AppState>>,
    Path(production_id): Path<i64>,
    Form(form): Form<ThanksForm>,
) -> Result<StatusCode, ApiError> {
    ProductionService::new(state.db.clone())
        .update_thanks(production_id, form.thanks_text)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- Cast ----

#[derive(Debug, Deserialize)]
pub struct NewRoleForm {
    pub name: String,
    pub is_group: Option<String>,
    #[serde(default)]
    pub students: Vec<i64>,
}

pub async fn create_role(
    State(state): State<Arc<AppState>>,
    Path(production_id): Path<i64>,
    Form(form): Form<NewRoleForm>,
) -> Result<Json<IdResponse>, ApiError> {
    let service = CastService::new(state.db.clone());
    // Checkbox value from the cast form
    let is_group = form.is_group.as_deref() == Some("1");

    let role = service.create_role(production_id, form.name, is_group).await?;
    if !form.students.is_empty() {
        service.set_role_members(role.id, &form.students).await?;
    }

    Ok(Json(IdResponse { id: role.id }))
}

#[derive(Debug, Deserialize)]
pub struct RenameForm {
    pub name: String,
}

pub async fn rename_role(
    State(state): State<Arc<AppState>>,
    Path(role_id): Path<i64>,
    Form(form): Form<RenameForm>,
) -> Result<StatusCode, ApiError> {
    CastService::new(state.db.clone())
        .rename_role(role_id, form.name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct RoleMembersForm {
    #[serde(default)]
    pub students: Vec<i64>,
}

pub async fn set_role_members(
    State(state): State<Arc<AppState>>,
    Path(role_id): Path<i64>,
    Form(form): Form<RoleMembersForm>,
) -> Result<StatusCode, ApiError> {
    CastService::new(state.db.clone())
        .set_role_members(role_id, &form.students)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_role(
    State(state): State<Arc<AppState>>,
    Path(role_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    CastService::new(state.db.clone()).delete_role(role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct CrewForm {
    #[serde(default)]
    pub students: Vec<i64>,
}

pub async fn set_crew_membership(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CrewForm>,
) -> Result<StatusCode, ApiError> {
    CastService::new(state.db.clone())
        .set_crew_membership(&form.students)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- Creative team ----

#[derive(Debug, Deserialize)]
pub struct NameForm {
    pub name: String,
}

pub async fn create_adult(
    State(state): State<Arc<AppState>>,
    Path(production_id): Path<i64>,
    Form(form): Form<NameForm>,
) -> Result<Json<IdResponse>, ApiError> {
    let adult = TeamService::new(state.db.clone())
        .create_adult(production_id, form.name)
        .await?;
    Ok(Json(IdResponse { id: adult.id }))
}

#[derive(Debug, Deserialize)]
pub struct NewCreativeRoleForm {
    pub name: String,
    #[serde(default)]
    pub adults: Vec<i64>,
}

pub async fn create_creative_role(
    State(state): State<Arc<AppState>>,
    Path(production_id): Path<i64>,
    Form(form): Form<NewCreativeRoleForm>,
) -> Result<Json<IdResponse>, ApiError> {
    let service = TeamService::new(state.db.clone());

    let role = service.create_creative_role(production_id, form.name).await?;
    if !form.adults.is_empty() {
        service.set_creative_role_members(role.id, &form.adults).await?;
    }

    Ok(Json(IdResponse { id: role.id }))
}

pub async fn rename_creative_role(
    State(state): State<Arc<AppState>>,
    Path(role_id): Path<i64>,
    Form(form): Form<RenameForm>,
) -> Result<StatusCode, ApiError> {
    TeamService::new(state.db.clone())
        .rename_creative_role(role_id, form.name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct CreativeRoleMembersForm {
    #[serde(default)]
    pub adults: Vec<i64>,
}

pub async fn set_creative_role_members(
    State(state): State<Arc<AppState>>,
    Path(role_id): Path<i64>,
    Form(form): Form<CreativeRoleMembersForm>,
) -> Result<StatusCode, ApiError> {
    TeamService::new(state.db.clone())
        .set_creative_role_members(role_id, &form.adults)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_creative_role(
    State(state): State<Arc<AppState>>,
    Path(role_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    TeamService::new(state.db.clone())
        .delete_creative_role(role_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- Songs ----

#[derive(Debug, Deserialize)]
pub struct SongForm {
    pub title: String,
    pub act: Option<String>,
    pub intermission_message: Option<String>,
    #[serde(default)]
    pub singers: Vec<i64>,
}

pub async fn create_song(
    State(state): State<Arc<AppState>>,
    Path(production_id): Path<i64>,
    Form(form): Form<SongForm>,
) -> Result<Json<IdResponse>, ApiError> {
    let song = SongService::new(state.db.clone())
        .create_song(
            production_id,
            form.title,
            form.act,
            form.intermission_message,
            &form.singers,
        )
        .await?;
    Ok(Json(IdResponse { id: song.id }))
}

pub async fn update_song(
    State(state): State<Arc<AppState>>,
    Path(song_id): Path<i64>,
    Form(form): Form<SongForm>,
) -> Result<StatusCode, ApiError> {
    SongService::new(state.db.clone())
        .update_song(
            song_id,
            form.title,
            form.act,
            form.intermission_message,
            &form.singers,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_song(
    State(state): State<Arc<AppState>>,
    Path(song_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    SongService::new(state.db.clone()).delete_song(song_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
