use color_eyre::{Result, eyre::Context};
use migration::MigratorTrait;
use sea_orm::{
    ColumnTrait, ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder,
};
use std::path::Path;
use std::time::Duration;

use crate::entities;

pub struct Database {
    pub conn: DatabaseConnection,
}

impl Database {
    /// Open or create a database at the given path
    pub async fn open(path: &Path) -> Result<Self> {
        log::debug!("Opening database at: {}", path.display());

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create database directory: {}",
                parent.display()
            ))?;
        }

        let url = format!("sqlite://{}?mode=rwc", path.display());
        Self::connect(&url).await
    }

    /// Connect to a database by connection string and bring the schema up to
    /// date
    pub async fn connect(url: &str) -> Result<Self> {
        let mut opt = ConnectOptions::new(url.to_owned());
        opt.max_connections(100)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(8))
            .max_lifetime(Duration::from_secs(8))
            .sqlx_logging(false);

        let conn = SeaDatabase::connect(opt)
            .await
            .context(format!("Failed to open database: {url}"))?;

        conn.execute_unprepared("PRAGMA foreign_keys = ON")
            .await
            .context("Failed to enable foreign keys")?;

        log::debug!("Running database migrations");
        migration::Migrator::up(&conn, None)
            .await
            .context("Failed to run database migrations")?;

        log::info!("Database ready at: {url}");
        Ok(Database { conn })
    }

    // ========== Production Methods ==========

    pub async fn get_production(
        &self,
        id: i64,
    ) -> std::result::Result<Option<entities::production::Model>, sea_orm::DbErr> {
        entities::production::Entity::find_by_id(id)
            .one(&self.conn)
            .await
    }

    pub async fn list_productions(
        &self,
    ) -> std::result::Result<Vec<entities::production::Model>, sea_orm::DbErr> {
        entities::production::Entity::find()
            .order_by_asc(entities::production::Column::Id)
            .all(&self.conn)
            .await
    }

    // ========== Per-Production Listings ==========

    pub async fn roles_of_production(
        &self,
        production_id: i64,
    ) -> std::result::Result<Vec<entities::role::Model>, sea_orm::DbErr> {
        entities::role::Entity::find()
            .filter(entities::role::Column::ProductionId.eq(production_id))
            .order_by_asc(entities::role::Column::Id)
            .all(&self.conn)
            .await
    }

    pub async fn songs_of_production(
        &self,
        production_id: i64,
    ) -> std::result::Result<Vec<entities::song::Model>, sea_orm::DbErr> {
        entities::song::Entity::find()
            .filter(entities::song::Column::ProductionId.eq(production_id))
            .order_by_asc(entities::song::Column::Id)
            .all(&self.conn)
            .await
    }

    pub async fn creative_roles_of_production(
        &self,
        production_id: i64,
    ) -> std::result::Result<Vec<entities::creative_role::Model>, sea_orm::DbErr> {
        entities::creative_role::Entity::find()
            .filter(entities::creative_role::Column::ProductionId.eq(production_id))
            .order_by_asc(entities::creative_role::Column::Id)
            .all(&self.conn)
            .await
    }

    pub async fn adults_of_production(
        &self,
        production_id: i64,
    ) -> std::result::Result<Vec<entities::adult::Model>, sea_orm::DbErr> {
        entities::adult::Entity::find()
            .filter(entities::adult::Column::ProductionId.eq(production_id))
            .order_by_asc(entities::adult::Column::Id)
            .all(&self.conn)
            .await
    }

    // ========== Student Methods ==========

    pub async fn list_students(
        &self,
    ) -> std::result::Result<Vec<entities::student::Model>, sea_orm::DbErr> {
        entities::student::Entity::find()
            .order_by_asc(entities::student::Column::Id)
            .all(&self.conn)
            .await
    }

    /// Students available for cast roles (crew members are excluded from the
    /// assignment pool)
    pub async fn list_cast_students(
        &self,
    ) -> std::result::Result<Vec<entities::student::Model>, sea_orm::DbErr> {
        entities::student::Entity::find()
            .filter(entities::student::Column::IsCrew.eq(false))
            .order_by_asc(entities::student::Column::Id)
            .all(&self.conn)
            .await
    }

    pub async fn list_crew_students(
        &self,
    ) -> std::result::Result<Vec<entities::student::Model>, sea_orm::DbErr> {
        entities::student::Entity::find()
            .filter(entities::student::Column::IsCrew.eq(true))
            .order_by_asc(entities::student::Column::Id)
            .all(&self.conn)
            .await
    }

    // ========== Junction Table Accessors ==========

    /// Get all students assigned to a cast role
    pub async fn students_of_role(
        &self,
        role_id: i64,
    ) -> std::result::Result<Vec<entities::student::Model>, sea_orm::DbErr> {
        let assignments = entities::role_assignment::Entity::find()
            .filter(entities::role_assignment::Column::RoleId.eq(role_id))
            .all(&self.conn)
            .await?;

        let mut result = Vec::new();
        for assignment in assignments {
            let student = entities::student::Entity::find_by_id(assignment.student_id)
                .one(&self.conn)
                .await?;
            if let Some(student) = student {
                result.push(student);
            }
        }

        result.sort_by_key(|s| s.id);
        Ok(result)
    }

    /// Get all adults filling a creative-team role
    pub async fn adults_of_creative_role(
        &self,
        role_id: i64,
    ) -> std::result::Result<Vec<entities::adult::Model>, sea_orm::DbErr> {
        let assignments = entities::creative_assignment::Entity::find()
            .filter(entities::creative_assignment::Column::RoleId.eq(role_id))
            .all(&self.conn)
            .await?;

        let mut result = Vec::new();
        for assignment in assignments {
            let adult = entities::adult::Entity::find_by_id(assignment.adult_id)
                .one(&self.conn)
                .await?;
            if let Some(adult) = adult {
                result.push(adult);
            }
        }

        result.sort_by_key(|a| a.id);
        Ok(result)
    }

    /// Get all cast roles singing a song
    pub async fn singers_of_song(
        &self,
        song_id: i64,
    ) -> std::result::Result<Vec<entities::role::Model>, sea_orm::DbErr> {
        let assignments = entities::song_assignment::Entity::find()
            .filter(entities::song_assignment::Column::SongId.eq(song_id))
            .all(&self.conn)
            .await?;

        let mut result = Vec::new();
        for assignment in assignments {
            let role = entities::role::Entity::find_by_id(assignment.role_id)
                .one(&self.conn)
                .await?;
            if let Some(role) = role {
                result.push(role);
            }
        }

        result.sort_by_key(|r| r.id);
        Ok(result)
    }
}
