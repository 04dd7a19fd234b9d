use std::collections::BTreeSet;
use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};

use crate::database::Database;
use crate::entities;
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct CreativeRoleWithAdults {
    pub role: entities::creative_role::Model,
    pub adults: Vec<entities::adult::Model>,
}

/// Backstage side of a production: adults and the creative-team roles they
/// fill.
pub struct TeamService {
    db: Arc<Database>,
}

impl TeamService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list_team(&self, production_id: i64) -> Result<Vec<CreativeRoleWithAdults>> {
        self.db
            .get_production(production_id)
            .await?
            .ok_or(Error::NotFound("production"))?;

        let roles = self.db.creative_roles_of_production(production_id).await?;

        let mut result = Vec::with_capacity(roles.len());
        for role in roles {
            let adults = self.db.adults_of_creative_role(role.id).await?;
            result.push(CreativeRoleWithAdults { role, adults });
        }

        Ok(result)
    }

    pub async fn list_adults(&self, production_id: i64) -> Result<Vec<entities::adult::Model>> {
        self.db
            .get_production(production_id)
            .await?
            .ok_or(Error::NotFound("production"))?;

        Ok(self.db.adults_of_production(production_id).await?)
    }

    pub async fn create_adult(
        &self,
        production_id: i64,
        name: String,
    ) -> Result<entities::adult::Model> {
        self.db
            .get_production(production_id)
            .await?
            .ok_or(Error::NotFound("production"))?;

        let new_adult = entities::adult::ActiveModel {
            name: Set(name),
            production_id: Set(production_id),
            ..Default::default()
        };

        let model = new_adult.insert(&self.db.conn).await?;
        log::info!("Adult created: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    pub async fn create_creative_role(
        &self,
        production_id: i64,
        name: String,
    ) -> Result<entities::creative_role::Model> {
        self.db
            .get_production(production_id)
            .await?
            .ok_or(Error::NotFound("production"))?;

        let new_role = entities::creative_role::ActiveModel {
            name: Set(name),
            production_id: Set(production_id),
            ..Default::default()
        };

        let model = new_role.insert(&self.db.conn).await?;
        log::info!("Creative role created: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    /// Same contract as renaming a cast role: blank means leave unchanged.
    pub async fn rename_creative_role(&self, id: i64, new_name: String) -> Result<()> {
        if new_name.trim().is_empty() {
            return Ok(());
        }

        let role = entities::creative_role::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or(Error::NotFound("creative role"))?;

        let mut active: entities::creative_role::ActiveModel = role.into();
        active.name = Set(new_name);
        active.update(&self.db.conn).await?;

        Ok(())
    }

    /// Replace the adults filling a creative role with exactly the given set.
    pub async fn set_creative_role_members(&self, role_id: i64, adult_ids: &[i64]) -> Result<()> {
        let requested: BTreeSet<i64> = adult_ids.iter().copied().collect();

        self.db
            .conn
            .transaction::<_, (), Error>(move |txn| {
                Box::pin(async move {
                    entities::creative_role::Entity::find_by_id(role_id)
                        .one(txn)
                        .await?
                        .ok_or(Error::NotFound("creative role"))?;

                    let existing: Vec<i64> = entities::adult::Entity::find()
                        .filter(entities::adult::Column::Id.is_in(requested))
                        .all(txn)
                        .await?
                        .into_iter()
                        .map(|a| a.id)
                        .collect();

                    entities::creative_assignment::Entity::delete_many()
                        .filter(entities::creative_assignment::Column::RoleId.eq(role_id))
                        .exec(txn)
                        .await?;

                    for adult_id in existing {
                        let assignment = entities::creative_assignment::ActiveModel {
                            role_id: Set(role_id),
                            adult_id: Set(adult_id),
                        };
                        assignment.insert(txn).await?;
                    }

                    Ok(())
                })
            })
            .await?;

        Ok(())
    }

    /// Remove a creative role and its assignments. Unknown ids are a no-op.
    pub async fn delete_creative_role(&self, id: i64) -> Result<()> {
        self.db
            .conn
            .transaction::<_, (), Error>(move |txn| {
                Box::pin(async move {
                    entities::creative_assignment::Entity::delete_many()
                        .filter(entities::creative_assignment::Column::RoleId.eq(id))
                        .exec(txn)
                        .await?;
                    entities::creative_role::Entity::delete_many()
                        .filter(entities::creative_role::Column::Id.eq(id))
                        .exec(txn)
                        .await?;

                    Ok(())
                })
            })
            .await?;

        log::info!("Creative role {id} deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::production::ProductionService;
    use crate::test_utils::test_db;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_create_and_list_team() {
        let db = test_db().await;
        let production = ProductionService::new(db.clone()).create().await.unwrap();
        let service = TeamService::new(db.clone());

        let adult = service
            .create_adult(production.id, "Abdullah".into())
            .await
            .unwrap();
        let role = service
            .create_creative_role(production.id, "Technology Lead".into())
            .await
            .unwrap();
        service
            .set_creative_role_members(role.id, &[adult.id])
            .await
            .unwrap();

        let team = service.list_team(production.id).await.unwrap();
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].role.name, "Technology Lead");
        assert_eq!(team[0].adults.len(), 1);
        assert_eq!(team[0].adults[0].name, "Abdullah");
    }

    #[tokio::test]
    async fn test_list_team_unknown_production() {
        let db = test_db().await;
        let service = TeamService::new(db);

        let err = service.list_team(5).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_set_creative_role_members_replaces() {
        let db = test_db().await;
        let production = ProductionService::new(db.clone()).create().await.unwrap();
        let service = TeamService::new(db.clone());

        let first = service.create_adult(production.id, "First".into()).await.unwrap();
        let second = service.create_adult(production.id, "Second".into()).await.unwrap();
        let role = service
            .create_creative_role(production.id, "Director".into())
            .await
            .unwrap();

        service
            .set_creative_role_members(role.id, &[first.id])
            .await
            .unwrap();
        service
            .set_creative_role_members(role.id, &[second.id, second.id])
            .await
            .unwrap();

        let adults = db.adults_of_creative_role(role.id).await.unwrap();
        assert_eq!(adults.len(), 1);
        assert_eq!(adults[0].id, second.id);
    }

    #[tokio::test]
    async fn test_rename_creative_role() {
        let db = test_db().await;
        let production = ProductionService::new(db.clone()).create().await.unwrap();
        let service = TeamService::new(db.clone());

        let role = service
            .create_creative_role(production.id, "Set Design".into())
            .await
            .unwrap();

        service.rename_creative_role(role.id, "".into()).await.unwrap();
        let team = service.list_team(production.id).await.unwrap();
        assert_eq!(team[0].role.name, "Set Design");

        service
            .rename_creative_role(role.id, "Stage Design".into())
            .await
            .unwrap();
        let team = service.list_team(production.id).await.unwrap();
        assert_eq!(team[0].role.name, "Stage Design");
    }

    #[tokio::test]
    async fn test_delete_creative_role_cascades() {
        let db = test_db().await;
        let production = ProductionService::new(db.clone()).create().await.unwrap();
        let service = TeamService::new(db.clone());

        let adult = service.create_adult(production.id, "A".into()).await.unwrap();
        let role = service
            .create_creative_role(production.id, "Props".into())
            .await
            .unwrap();
        service
            .set_creative_role_members(role.id, &[adult.id])
            .await
            .unwrap();

        service.delete_creative_role(role.id).await.unwrap();

        assert_eq!(
            entities::creative_assignment::Entity::find().count(&db.conn).await.unwrap(),
            0
        );
        assert_eq!(
            entities::creative_role::Entity::find().count(&db.conn).await.unwrap(),
            0
        );
        // The adult itself stays
        assert_eq!(entities::adult::Entity::find().count(&db.conn).await.unwrap(), 1);

        service.delete_creative_role(role.id).await.unwrap();
    }
}
