use sea_orm::entity::prelude::*;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "song")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub act: i32,
    pub intermission_message: String,
    pub production_id: i64,

    #[sea_orm(belongs_to, from = "production_id", to = "id")]
    pub production: BelongsTo<super::production::Entity>,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        super::song_assignment::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::song_assignment::Relation::Song.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
