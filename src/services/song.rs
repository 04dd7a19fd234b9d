use std::collections::BTreeSet;
use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};

use crate::database::Database;
use crate::entities;
use crate::error::{Error, Result};

/// Act number given to a song created without one.
const DEFAULT_ACT_ON_CREATE: i32 = 10;
/// Act number given to a song whose edit form left the field blank.
const DEFAULT_ACT_ON_UPDATE: i32 = 20;

pub struct SongWithSingers {
    pub song: entities::song::Model,
    pub singers: Vec<entities::role::Model>,
}

pub struct SongService {
    db: Arc<Database>,
}

impl SongService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list_songs(&self, production_id: i64) -> Result<Vec<SongWithSingers>> {
        self.db
            .get_production(production_id)
            .await?
            .ok_or(Error::NotFound("production"))?;

        let songs = self.db.songs_of_production(production_id).await?;

        let mut result = Vec::with_capacity(songs.len());
        for song in songs {
            let singers = self.db.singers_of_song(song.id).await?;
            result.push(SongWithSingers { song, singers });
        }

        Ok(result)
    }

    /// Create a song and its singer assignments in one transaction. An absent
    /// or non-numeric act falls back to the creation default.
    pub async fn create_song(
        &self,
        production_id: i64,
        title: String,
        act: Option<String>,
        intermission_message: Option<String>,
        singer_role_ids: &[i64],
    ) -> Result<entities::song::Model> {
        let act = act
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .unwrap_or(DEFAULT_ACT_ON_CREATE);
        let requested: BTreeSet<i64> = singer_role_ids.iter().copied().collect();

        let model = self
            .db
            .conn
            .transaction::<_, entities::song::Model, Error>(move |txn| {
                Box::pin(async move {
                    entities::production::Entity::find_by_id(production_id)
                        .one(txn)
                        .await?
                        .ok_or(Error::NotFound("production"))?;

                    let new_song = entities::song::ActiveModel {
                        title: Set(title),
                        act: Set(act),
                        intermission_message: Set(intermission_message.unwrap_or_default()),
                        production_id: Set(production_id),
                        ..Default::default()
                    };
                    let song = new_song.insert(txn).await?;

                    insert_singers(txn, song.id, requested).await?;

                    Ok(song)
                })
            })
            .await?;

        log::info!("Song created: '{}' (ID: {})", model.title, model.id);
        Ok(model)
    }

    /// Apply the song edit form. A blank act means the update default; a
    /// non-numeric act is a validation error and leaves the row untouched.
    /// The singer set is fully replaced.
    pub async fn update_song(
        &self,
        id: i64,
        title: String,
        act: Option<String>,
        intermission_message: Option<String>,
        singer_role_ids: &[i64],
    ) -> Result<entities::song::Model> {
        let act = match act.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_ACT_ON_UPDATE,
            Some(raw) => raw
                .parse::<i32>()
                .map_err(|_| Error::validation("act", format!("`{raw}` is not a number")))?,
        };
        let requested: BTreeSet<i64> = singer_role_ids.iter().copied().collect();

        let model = self
            .db
            .conn
            .transaction::<_, entities::song::Model, Error>(move |txn| {
                Box::pin(async move {
                    let song = entities::song::Entity::find_by_id(id)
                        .one(txn)
                        .await?
                        .ok_or(Error::NotFound("song"))?;

                    let mut active: entities::song::ActiveModel = song.into();
                    active.title = Set(title);
                    active.act = Set(act);
                    active.intermission_message = Set(intermission_message.unwrap_or_default());
                    let song = active.update(txn).await?;

                    entities::song_assignment::Entity::delete_many()
                        .filter(entities::song_assignment::Column::SongId.eq(id))
                        .exec(txn)
                        .await?;
                    insert_singers(txn, song.id, requested).await?;

                    Ok(song)
                })
            })
            .await?;

        log::info!("Song updated: '{}' (ID: {})", model.title, model.id);
        Ok(model)
    }

    /// Remove a song and its singer assignments. Unknown ids are a no-op.
    pub async fn delete_song(&self, id: i64) -> Result<()> {
        self.db
            .conn
            .transaction::<_, (), Error>(move |txn| {
                Box::pin(async move {
                    entities::song_assignment::Entity::delete_many()
                        .filter(entities::song_assignment::Column::SongId.eq(id))
                        .exec(txn)
                        .await?;
                    entities::song::Entity::delete_many()
                        .filter(entities::song::Column::Id.eq(id))
                        .exec(txn)
                        .await?;

                    Ok(())
                })
            })
            .await?;

        log::info!("Song {id} deleted");
        Ok(())
    }
}

/// Insert one assignment per requested role, skipping ids with no role row.
async fn insert_singers(
    txn: &sea_orm::DatabaseTransaction,
    song_id: i64,
    requested: BTreeSet<i64>,
) -> Result<()> {
    let existing: Vec<i64> = entities::role::Entity::find()
        .filter(entities::role::Column::Id.is_in(requested))
        .all(txn)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect();

    for role_id in existing {
        let assignment = entities::song_assignment::ActiveModel {
            song_id: Set(song_id),
            role_id: Set(role_id),
        };
        assignment.insert(txn).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cast::CastService;
    use crate::services::production::ProductionService;
    use crate::test_utils::test_db;
    use sea_orm::PaginatorTrait;

    async fn setup() -> (
        std::sync::Arc<crate::database::Database>,
        entities::production::Model,
        entities::role::Model,
    ) {
        let db = test_db().await;
        let production = ProductionService::new(db.clone()).create().await.unwrap();
        let role = CastService::new(db.clone())
            .create_role(production.id, "Ariel".into(), false)
            .await
            .unwrap();
        (db, production, role)
    }

    #[tokio::test]
    async fn test_create_song_with_act() {
        let (db, production, role) = setup().await;
        let service = SongService::new(db.clone());

        let song = service
            .create_song(
                production.id,
                "The World Above".into(),
                Some("1".into()),
                None,
                &[role.id],
            )
            .await
            .unwrap();

        assert_eq!(song.act, 1);
        assert_eq!(song.intermission_message, "");
        let singers = db.singers_of_song(song.id).await.unwrap();
        assert_eq!(singers.len(), 1);
        assert_eq!(singers[0].id, role.id);
    }

    #[tokio::test]
    async fn test_create_song_act_defaults_to_ten() {
        let (db, production, _) = setup().await;
        let service = SongService::new(db);

        let omitted = service
            .create_song(production.id, "Opening".into(), None, None, &[])
            .await
            .unwrap();
        assert_eq!(omitted.act, 10);

        let non_numeric = service
            .create_song(production.id, "Finale".into(), Some("two".into()), None, &[])
            .await
            .unwrap();
        assert_eq!(non_numeric.act, 10);
    }

    #[tokio::test]
    async fn test_create_song_unknown_production() {
        let db = test_db().await;
        let service = SongService::new(db);

        let err = service
            .create_song(123, "Song".into(), None, None, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_song_blank_act_defaults_to_twenty() {
        let (db, production, role) = setup().await;
        let service = SongService::new(db);

        let song = service
            .create_song(production.id, "Song".into(), Some("1".into()), None, &[role.id])
            .await
            .unwrap();

        let updated = service
            .update_song(song.id, "Song".into(), Some("".into()), None, &[role.id])
            .await
            .unwrap();
        assert_eq!(updated.act, 20);

        let updated = service
            .update_song(song.id, "Song".into(), None, None, &[role.id])
            .await
            .unwrap();
        assert_eq!(updated.act, 20);
    }

    #[tokio::test]
    async fn test_update_song_non_numeric_act_fails() {
        let (db, production, role) = setup().await;
        let service = SongService::new(db.clone());

        let song = service
            .create_song(production.id, "Song".into(), Some("3".into()), None, &[role.id])
            .await
            .unwrap();

        let err = service
            .update_song(song.id, "Song".into(), Some("abc".into()), None, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "act", .. }));

        // Prior act and singers are untouched by the failed update
        let songs = service.list_songs(production.id).await.unwrap();
        assert_eq!(songs[0].song.act, 3);
        assert_eq!(songs[0].singers.len(), 1);
    }

    #[tokio::test]
    async fn test_update_song_replaces_singers() {
        let (db, production, role) = setup().await;
        let service = SongService::new(db.clone());
        let other = CastService::new(db.clone())
            .create_role(production.id, "Ursula".into(), false)
            .await
            .unwrap();

        let song = service
            .create_song(production.id, "Duet".into(), Some("1".into()), None, &[role.id])
            .await
            .unwrap();

        service
            .update_song(song.id, "Duet".into(), Some("1".into()), None, &[other.id])
            .await
            .unwrap();

        let singers = db.singers_of_song(song.id).await.unwrap();
        assert_eq!(singers.len(), 1);
        assert_eq!(singers[0].id, other.id);
    }

    #[tokio::test]
    async fn test_update_intermission_message_missing_is_empty() {
        let (db, production, _) = setup().await;
        let service = SongService::new(db);

        let song = service
            .create_song(
                production.id,
                "Entr'acte".into(),
                Some("2".into()),
                Some("15 minute intermission".into()),
                &[],
            )
            .await
            .unwrap();
        assert_eq!(song.intermission_message, "15 minute intermission");

        let updated = service
            .update_song(song.id, "Entr'acte".into(), Some("2".into()), None, &[])
            .await
            .unwrap();
        assert_eq!(updated.intermission_message, "");
    }

    #[tokio::test]
    async fn test_delete_song_cascades_assignments() {
        let (db, production, role) = setup().await;
        let service = SongService::new(db.clone());

        let song = service
            .create_song(production.id, "Song".into(), None, None, &[role.id])
            .await
            .unwrap();

        service.delete_song(song.id).await.unwrap();

        assert_eq!(entities::song::Entity::find().count(&db.conn).await.unwrap(), 0);
        assert_eq!(
            entities::song_assignment::Entity::find().count(&db.conn).await.unwrap(),
            0
        );

        service.delete_song(song.id).await.unwrap();
    }
}
