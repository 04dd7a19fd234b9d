use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::entities;
use crate::http_server::error::ApiError;
use crate::http_server::state::AppState;
use crate::services::cast::{CastService, RoleWithStudents};
use crate::services::production::ProductionService;
use crate::services::song::{SongService, SongWithSingers};
use crate::services::team::{CreativeRoleWithAdults, TeamService};

#[derive(Serialize)]
pub struct ProductionResponse {
    pub id: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub price: f64,
    pub notes: Option<String>,
    pub thanks: Option<String>,
    pub is_active: bool,
}

impl From<entities::production::Model> for ProductionResponse {
    fn from(model: entities::production::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            subtitle: model.subtitle,
            image: model.image,
            start_date: model.start_date.map(|d| d.to_string()),
            end_date: model.end_date.map(|d| d.to_string()),
            location: model.location,
            price: model.price,
            notes: model.notes,
            thanks: model.thanks,
            is_active: model.is_active,
        }
    }
}

#[derive(Serialize)]
pub struct StudentResponse {
    pub id: i64,
    pub name: String,
    pub sex: Option<String>,
    pub year: Option<String>,
    pub is_crew: bool,
}

impl From<entities::student::Model> for StudentResponse {
    fn from(model: entities::student::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            sex: model.sex,
            year: model.year,
            is_crew: model.is_crew,
        }
    }
}

#[derive(Serialize)]
pub struct RoleResponse {
    pub id: i64,
    pub name: String,
    pub is_group: bool,
    pub students: Vec<StudentResponse>,
}

impl From<RoleWithStudents> for RoleResponse {
    fn from(entry: RoleWithStudents) -> Self {
        Self {
            id: entry.role.id,
            name: entry.role.name,
            is_group: entry.role.is_group,
            students: entry.students.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct AdultResponse {
    pub id: i64,
    pub name: String,
}

impl From<entities::adult::Model> for AdultResponse {
    fn from(model: entities::adult::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Serialize)]
pub struct CreativeRoleResponse {
    pub id: i64,
    pub name: String,
    pub adults: Vec<AdultResponse>,
}

impl From<CreativeRoleWithAdults> for CreativeRoleResponse {
    fn from(entry: CreativeRoleWithAdults) -> Self {
        Self {
            id: entry.role.id,
            name: entry.role.name,
            adults: entry.adults.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct SongResponse {
    pub id: i64,
    pub title: String,
    pub act: i32,
    pub intermission_message: String,
    pub singers: Vec<SingerResponse>,
}

#[derive(Serialize)]
pub struct SingerResponse {
    pub id: i64,
    pub name: String,
    pub is_group: bool,
}

impl From<SongWithSingers> for SongResponse {
    fn from(entry: SongWithSingers) -> Self {
        Self {
            id: entry.song.id,
            title: entry.song.title,
            act: entry.song.act,
            intermission_message: entry.song.intermission_message,
            singers: entry
                .singers
                .into_iter()
                .map(|role| SingerResponse {
                    id: role.id,
                    name: role.name,
                    is_group: role.is_group,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub struct TeamResponse {
    pub crew: Vec<StudentResponse>,
    pub team: Vec<CreativeRoleResponse>,
}

/// The production shown by default: the active one, else the first.
pub async fn general(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Option<ProductionResponse>>, ApiError> {
    let production = ProductionService::new(state.db.clone())
        .get_active_or_first()
        .await?;
    Ok(Json(production.map(Into::into)))
}

pub async fn cast(
    State(state): State<Arc<AppState>>,
    Path(production_id): Path<i64>,
) -> Result<Json<Vec<RoleResponse>>, ApiError> {
    let roles = CastService::new(state.db.clone())
        .list_roles(production_id)
        .await?;
    Ok(Json(roles.into_iter().map(Into::into).collect()))
}

pub async fn team(
    State(state): State<Arc<AppState>>,
    Path(production_id): Path<i64>,
) -> Result<Json<TeamResponse>, ApiError> {
    let crew = CastService::new(state.db.clone()).list_crew().await?;
    let team = TeamService::new(state.db.clone())
        .list_team(production_id)
        .await?;

    Ok(Json(TeamResponse {
        crew: crew.into_iter().map(Into::into).collect(),
        team: team.into_iter().map(Into::into).collect(),
    }))
}

pub async fn songs(
    State(state): State<Arc<AppState>>,
    Path(production_id): Path<i64>,
) -> Result<Json<Vec<SongResponse>>, ApiError> {
    let songs = SongService::new(state.db.clone())
        .list_songs(production_id)
        .await?;
    Ok(Json(songs.into_iter().map(Into::into).collect()))
}

#[derive(Serialize)]
pub struct ThanksResponse {
    pub production_id: i64,
    pub thanks: Option<String>,
}

pub async fn thanks(
    State(state): State<Arc<AppState>>,
    Path(production_id): Path<i64>,
) -> Result<Json<ThanksResponse>, ApiError> {
    let production = ProductionService::new(state.db.clone())
        .get(production_id)
        .await?;
    Ok(Json(ThanksResponse {
        production_id: production.id,
        thanks: production.thanks,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_response_formats_dates() {
        let model = entities::production::Model {
            id: 1,
            title: "The Little Mermaid".into(),
            subtitle: None,
            image: None,
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 12, 10),
            end_date: None,
            location: None,
            price: 10.0,
            notes: None,
            thanks: None,
            is_active: true,
        };

        let value = serde_json::to_value(ProductionResponse::from(model)).unwrap();
        assert_eq!(value["start_date"], "2025-12-10");
        assert_eq!(value["end_date"], serde_json::Value::Null);
        assert_eq!(value["is_active"], true);
    }
}
