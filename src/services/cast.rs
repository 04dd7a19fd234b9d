use std::collections::BTreeSet;
use std::sync::Arc;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};

use crate::database::Database;
use crate::entities;
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct RoleWithStudents {
    pub role: entities::role::Model,
    pub students: Vec<entities::student::Model>,
}

pub struct CastService {
    db: Arc<Database>,
}

impl CastService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list_roles(&self, production_id: i64) -> Result<Vec<RoleWithStudents>> {
        self.db
            .get_production(production_id)
            .await?
            .ok_or(Error::NotFound("production"))?;

        let roles = self.db.roles_of_production(production_id).await?;

        let mut result = Vec::with_capacity(roles.len());
        for role in roles {
            let students = self.db.students_of_role(role.id).await?;
            result.push(RoleWithStudents { role, students });
        }

        Ok(result)
    }

    pub async fn list_students(&self) -> Result<Vec<entities::student::Model>> {
        Ok(self.db.list_students().await?)
    }

    /// The pool offered for cast-role assignment; crew students are excluded.
    pub async fn list_cast_pool(&self) -> Result<Vec<entities::student::Model>> {
        Ok(self.db.list_cast_students().await?)
    }

    pub async fn list_crew(&self) -> Result<Vec<entities::student::Model>> {
        Ok(self.db.list_crew_students().await?)
    }

    pub async fn create_role(
        &self,
        production_id: i64,
        name: String,
        is_group: bool,
    ) -> Result<entities::role::Model> {
        self.db
            .get_production(production_id)
            .await?
            .ok_or(Error::NotFound("production"))?;

        let new_role = entities::role::ActiveModel {
            name: Set(name),
            production_id: Set(production_id),
            is_group: Set(is_group),
            ..Default::default()
        };

        let model = new_role.insert(&self.db.conn).await?;
        log::info!("Role created: '{}' (ID: {})", model.name, model.id);
        Ok(model)
    }

    /// An empty name is a no-op, not an error; forms post every field on
    /// every save and a blank box means "leave it alone".
    pub async fn rename_role(&self, id: i64, new_name: String) -> Result<()> {
        if new_name.trim().is_empty() {
            return Ok(());
        }

        let role = entities::role::Entity::find_by_id(id)
            .one(&self.db.conn)
            .await?
            .ok_or(Error::NotFound("role"))?;

        let mut active: entities::role::ActiveModel = role.into();
        active.name = Set(new_name);
        active.update(&self.db.conn).await?;

        Ok(())
    }

    /// Remove a role together with its student assignments and any song
    /// assignments pointing at it. Unknown ids are a no-op.
    pub async fn delete_role(&self, id: i64) -> Result<()> {
        self.db
            .conn
            .transaction::<_, (), Error>(move |txn| {
                Box::pin(async move {
                    entities::role_assignment::Entity::delete_many()
                        .filter(entities::role_assignment::Column::RoleId.eq(id))
                        .exec(txn)
                        .await?;
                    entities::song_assignment::Entity::delete_many()
                        .filter(entities::song_assignment::Column::RoleId.eq(id))
                        .exec(txn)
                        .await?;
                    entities::role::Entity::delete_many()
                        .filter(entities::role::Column::Id.eq(id))
                        .exec(txn)
                        .await?;

                    Ok(())
                })
            })
            .await?;

        log::info!("Role {id} deleted");
        Ok(())
    }

    /// Replace the full membership of a role with exactly the given student
    /// set. Duplicate ids collapse and ids of unknown students are dropped.
    pub async fn set_role_members(&self, role_id: i64, student_ids: &[i64]) -> Result<()> {
        let requested: BTreeSet<i64> = student_ids.iter().copied().collect();

        self.db
            .conn
            .transaction::<_, (), Error>(move |txn| {
                Box::pin(async move {
                    entities::role::Entity::find_by_id(role_id)
                        .one(txn)
                        .await?
                        .ok_or(Error::NotFound("role"))?;

                    let existing: Vec<i64> = entities::student::Entity::find()
                        .filter(entities::student::Column::Id.is_in(requested))
                        .all(txn)
                        .await?
                        .into_iter()
                        .map(|s| s.id)
                        .collect();

                    entities::role_assignment::Entity::delete_many()
                        .filter(entities::role_assignment::Column::RoleId.eq(role_id))
                        .exec(txn)
                        .await?;

                    for student_id in existing {
                        let assignment = entities::role_assignment::ActiveModel {
                            role_id: Set(role_id),
                            student_id: Set(student_id),
                        };
                        assignment.insert(txn).await?;
                    }

                    Ok(())
                })
            })
            .await?;

        Ok(())
    }

    /// Global crew assignment: exactly the given students become crew, every
    /// other student goes back to the cast pool.
    pub async fn set_crew_membership(&self, student_ids: &[i64]) -> Result<()> {
        let crew: BTreeSet<i64> = student_ids.iter().copied().collect();

        self.db
            .conn
            .transaction::<_, (), Error>(move |txn| {
                Box::pin(async move {
                    entities::student::Entity::update_many()
                        .col_expr(entities::student::Column::IsCrew, Expr::value(true))
                        .filter(entities::student::Column::Id.is_in(crew.clone()))
                        .exec(txn)
                        .await?;
                    entities::student::Entity::update_many()
                        .col_expr(entities::student::Column::IsCrew, Expr::value(false))
                        .filter(entities::student::Column::Id.is_not_in(crew))
                        .exec(txn)
                        .await?;

                    Ok(())
                })
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::production::ProductionService;
    use crate::services::song::SongService;
    use crate::test_utils::{insert_student, test_db};
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_list_roles_unknown_production() {
        let db = test_db().await;
        let service = CastService::new(db);

        let err = service.list_roles(1).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_role_and_list() {
        let db = test_db().await;
        let production = ProductionService::new(db.clone()).create().await.unwrap();
        let service = CastService::new(db.clone());
        let student = insert_student(&db, "Lead Actor", false).await;

        let role = service
            .create_role(production.id, "Lead".into(), false)
            .await
            .unwrap();
        service.set_role_members(role.id, &[student.id]).await.unwrap();

        let roles = service.list_roles(production.id).await.unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].role.name, "Lead");
        let member_ids: Vec<i64> = roles[0].students.iter().map(|s| s.id).collect();
        assert_eq!(member_ids, vec![student.id]);
    }

    #[tokio::test]
    async fn test_create_role_unknown_production() {
        let db = test_db().await;
        let service = CastService::new(db);

        let err = service.create_role(77, "Lead".into(), false).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_set_role_members_replaces_and_dedupes() {
        let db = test_db().await;
        let production = ProductionService::new(db.clone()).create().await.unwrap();
        let service = CastService::new(db.clone());

        let a = insert_student(&db, "A", false).await;
        let b = insert_student(&db, "B", false).await;
        let c = insert_student(&db, "C", false).await;
        let role = service
            .create_role(production.id, "Ensemble".into(), true)
            .await
            .unwrap();

        service.set_role_members(role.id, &[a.id, b.id]).await.unwrap();
        // Duplicates collapse; prior membership is fully replaced
        service
            .set_role_members(role.id, &[b.id, c.id, c.id, b.id])
            .await
            .unwrap();

        let students = db.students_of_role(role.id).await.unwrap();
        let ids: Vec<i64> = students.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![b.id, c.id]);
    }

    #[tokio::test]
    async fn test_set_role_members_drops_unknown_students() {
        let db = test_db().await;
        let production = ProductionService::new(db.clone()).create().await.unwrap();
        let service = CastService::new(db.clone());

        let a = insert_student(&db, "A", false).await;
        let role = service
            .create_role(production.id, "Lead".into(), false)
            .await
            .unwrap();

        service.set_role_members(role.id, &[a.id, 9999]).await.unwrap();

        let students = db.students_of_role(role.id).await.unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, a.id);
    }

    #[tokio::test]
    async fn test_rename_role_empty_name_is_noop() {
        let db = test_db().await;
        let production = ProductionService::new(db.clone()).create().await.unwrap();
        let service = CastService::new(db.clone());

        let role = service
            .create_role(production.id, "Ariel".into(), false)
            .await
            .unwrap();

        service.rename_role(role.id, "".into()).await.unwrap();
        service.rename_role(role.id, "  ".into()).await.unwrap();
        let roles = service.list_roles(production.id).await.unwrap();
        assert_eq!(roles[0].role.name, "Ariel");

        service.rename_role(role.id, "Ursula".into()).await.unwrap();
        let roles = service.list_roles(production.id).await.unwrap();
        assert_eq!(roles[0].role.name, "Ursula");
    }

    #[tokio::test]
    async fn test_delete_role_cascades_assignments() {
        let db = test_db().await;
        let production = ProductionService::new(db.clone()).create().await.unwrap();
        let service = CastService::new(db.clone());
        let songs = SongService::new(db.clone());

        let student = insert_student(&db, "A", false).await;
        let role = service
            .create_role(production.id, "Lead".into(), false)
            .await
            .unwrap();
        service.set_role_members(role.id, &[student.id]).await.unwrap();
        let song = songs
            .create_song(production.id, "Opening".into(), None, None, &[role.id])
            .await
            .unwrap();

        service.delete_role(role.id).await.unwrap();

        assert_eq!(
            entities::role_assignment::Entity::find().count(&db.conn).await.unwrap(),
            0
        );
        let singers = db.singers_of_song(song.id).await.unwrap();
        assert!(singers.is_empty());

        // Tolerant of already-deleted ids
        service.delete_role(role.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_set_crew_membership_is_global() {
        let db = test_db().await;
        let service = CastService::new(db.clone());

        let a = insert_student(&db, "A", false).await;
        let b = insert_student(&db, "B", true).await;
        let c = insert_student(&db, "C", false).await;

        service.set_crew_membership(&[a.id, c.id]).await.unwrap();

        let crew: Vec<i64> = service.list_crew().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(crew, vec![a.id, c.id]);
        let pool: Vec<i64> = service
            .list_cast_pool()
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(pool, vec![b.id]);
    }

    #[tokio::test]
    async fn test_set_crew_membership_empty_clears_all() {
        let db = test_db().await;
        let service = CastService::new(db.clone());

        insert_student(&db, "A", true).await;
        insert_student(&db, "B", true).await;

        service.set_crew_membership(&[]).await.unwrap();

        assert!(service.list_crew().await.unwrap().is_empty());
        assert_eq!(service.list_cast_pool().await.unwrap().len(), 2);
    }
}
