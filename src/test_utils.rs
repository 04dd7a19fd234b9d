use std::sync::Arc;

use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database as SeaDatabase, Set};

use crate::database::Database;
use crate::entities;

pub async fn test_db() -> Arc<Database> {
    let conn = SeaDatabase::connect("sqlite::memory:?mode=rwc")
        .await
        .unwrap();

    // Enable foreign keys
    conn.execute_unprepared("PRAGMA foreign_keys = ON")
        .await
        .unwrap();

    migration::Migrator::up(&conn, None).await.unwrap();

    Arc::new(Database { conn })
}

pub async fn insert_student(db: &Database, name: &str, is_crew: bool) -> entities::student::Model {
    let student = entities::student::ActiveModel {
        name: Set(name.to_owned()),
        sex: Set(Some("F".to_owned())),
        year: Set(Some("Senior".to_owned())),
        is_crew: Set(is_crew),
        ..Default::default()
    };
    student.insert(&db.conn).await.unwrap()
}
