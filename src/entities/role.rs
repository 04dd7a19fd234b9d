use sea_orm::entity::prelude::*;

/// A cast part within a production, playable by one or more students when
/// `is_group` is set.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub production_id: i64,
    pub is_group: bool,

    #[sea_orm(belongs_to, from = "production_id", to = "id")]
    pub production: BelongsTo<super::production::Entity>,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        super::role_assignment::Relation::Student.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::role_assignment::Relation::Role.def().rev())
    }
}

impl Related<super::song::Entity> for Entity {
    fn to() -> RelationDef {
        super::song_assignment::Relation::Song.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::song_assignment::Relation::Role.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
