use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Deserialize;

use crate::database::Database;
use crate::entities;
use crate::error::{Error, Result};

/// Raw form fields of the production edit page. Dates and price arrive as
/// strings and are validated here; the checkbox is present only when ticked.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductionForm {
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<String>,
    pub location: Option<String>,
    pub price: String,
    pub notes: Option<String>,
    pub thanks: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_active: Option<String>,
}

pub struct ProductionService {
    db: Arc<Database>,
}

impl ProductionService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// The production flagged active, else the first by id, else none.
    pub async fn get_active_or_first(&self) -> Result<Option<entities::production::Model>> {
        let active = entities::production::Entity::find()
            .filter(entities::production::Column::IsActive.eq(true))
            .one(&self.db.conn)
            .await?;

        if active.is_some() {
            return Ok(active);
        }

        Ok(entities::production::Entity::find()
            .order_by_asc(entities::production::Column::Id)
            .one(&self.db.conn)
            .await?)
    }

    pub async fn list(&self) -> Result<Vec<entities::production::Model>> {
        Ok(self.db.list_productions().await?)
    }

    pub async fn get(&self, id: i64) -> Result<entities::production::Model> {
        self.db
            .get_production(id)
            .await?
            .ok_or(Error::NotFound("production"))
    }

    /// Insert a new production with placeholder fields. The caller navigates
    /// to its edit page and fills in the real values.
    pub async fn create(&self) -> Result<entities::production::Model> {
        let new_production = entities::production::ActiveModel {
            title: Set("Title".to_owned()),
            subtitle: Set(Some("Sub Title".to_owned())),
            location: Set(Some("Location".to_owned())),
            price: Set(0.0),
            notes: Set(Some("Notes".to_owned())),
            thanks: Set(Some("Acknowledgments".to_owned())),
            is_active: Set(false),
            ..Default::default()
        };

        let model = new_production.insert(&self.db.conn).await?;
        log::info!("Production created (ID: {})", model.id);
        Ok(model)
    }

    /// Flag exactly one production as active, clearing the flag everywhere
    /// else in the same transaction.
    pub async fn set_active(&self, id: i64) -> Result<()> {
        self.db
            .conn
            .transaction::<_, (), Error>(move |txn| {
                Box::pin(async move {
                    let target = entities::production::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or(Error::NotFound("production"))?;

                    entities::production::Entity::update_many()
                        .col_expr(entities::production::Column::IsActive, Expr::value(false))
                        .exec(txn)
                        .await?;

                    let mut active: entities::production::ActiveModel = target.into();
                    active.is_active = Set(true);
                    active.update(txn).await?;

                    Ok(())
                })
            })
            .await?;

        log::info!("Production {id} set active");
        Ok(())
    }

    /// Apply the edit form. Text fields go in verbatim; dates must be
    /// `YYYY-MM-DD` (empty clears them) and the price must parse as a number.
    pub async fn update(&self, id: i64, form: ProductionForm) -> Result<entities::production::Model> {
        let start_date = parse_date("start_date", form.start_date.as_deref())?;
        let end_date = parse_date("end_date", form.end_date.as_deref())?;
        let price = form
            .price
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::validation("price", format!("`{}` is not a number", form.price)))?;
        let is_active = form.is_active.as_deref() == Some("on");

        let production = entities::production::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or(Error::NotFound("production"))?;

        let mut active: entities::production::ActiveModel = production.into();
        active.title = Set(form.title);
        active.subtitle = Set(form.subtitle);
        active.image = Set(form.image);
        active.location = Set(form.location);
        active.price = Set(price);
        active.notes = Set(form.notes);
        active.thanks = Set(form.thanks);
        active.start_date = Set(start_date);
        active.end_date = Set(end_date);
        active.is_active = Set(is_active);

        let model = active.update(&self.db.conn).await?;
        log::info!("Production updated: '{}' (ID: {})", model.title, model.id);
        Ok(model)
    }

    /// Missing text is stored as an empty string, never as NULL.
    pub async fn update_thanks(
        &self,
        id: i64,
        text: Option<String>,
    ) -> Result<entities::production::Model> {
        let production = entities::production::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or(Error::NotFound("production"))?;

        let mut active: entities::production::ActiveModel = production.into();
        active.thanks = Set(Some(text.unwrap_or_default()));

        Ok(active.update(&self.db.conn).await?)
    }

    /// Remove the production and its whole tree: song assignments, songs,
    /// role assignments, roles, creative assignments, creative roles and
    /// adults, children before parents, in one transaction.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.db
            .conn
            .transaction::<_, (), Error>(move |txn| {
                Box::pin(async move {
                    let production = entities::production::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or(Error::NotFound("production"))?;

                    let song_ids: Vec<i64> = entities::song::Entity::find()
                        .filter(entities::song::Column::ProductionId.eq(id))
                        .all(txn)
                        .await?
                        .into_iter()
                        .map(|s| s.id)
                        .collect();
                    let role_ids: Vec<i64> = entities::role::Entity::find()
                        .filter(entities::role::Column::ProductionId.eq(id))
                        .all(txn)
                        .await?
                        .into_iter()
                        .map(|r| r.id)
                        .collect();
                    let creative_role_ids: Vec<i64> = entities::creative_role::Entity::find()
                        .filter(entities::creative_role::Column::ProductionId.eq(id))
                        .all(txn)
                        .await?
                        .into_iter()
                        .map(|r| r.id)
                        .collect();

                    entities::song_assignment::Entity::delete_many()
                        .filter(entities::song_assignment::Column::SongId.is_in(song_ids.clone()))
                        .exec(txn)
                        .await?;
                    entities::song_assignment::Entity::delete_many()
                        .filter(entities::song_assignment::Column::RoleId.is_in(role_ids.clone()))
                        .exec(txn)
                        .await?;
                    entities::song::Entity::delete_many()
                        .filter(entities::song::Column::ProductionId.eq(id))
                        .exec(txn)
                        .await?;

                    entities::role_assignment::Entity::delete_many()
                        .filter(entities::role_assignment::Column::RoleId.is_in(role_ids))
                        .exec(txn)
                        .await?;
                    entities::role::Entity::delete_many()
                        .filter(entities::role::Column::ProductionId.eq(id))
                        .exec(txn)
                        .await?;

                    entities::creative_assignment::Entity::delete_many()
                        .filter(
                            entities::creative_assignment::Column::RoleId
                                .is_in(creative_role_ids),
                        )
                        .exec(txn)
                        .await?;
                    entities::creative_role::Entity::delete_many()
                        .filter(entities::creative_role::Column::ProductionId.eq(id))
                        .exec(txn)
                        .await?;
                    entities::adult::Entity::delete_many()
                        .filter(entities::adult::Column::ProductionId.eq(id))
                        .exec(txn)
                        .await?;

                    production.delete(txn).await?;

                    Ok(())
                })
            })
            .await?;

        log::info!("Production {id} deleted");
        Ok(())
    }
}

fn parse_date(field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| Error::validation(field, format!("expected YYYY-MM-DD, got `{raw}`"))),
    }
}
