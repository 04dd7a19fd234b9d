use sea_orm::entity::prelude::*;

/// A backstage/production-team function, filled by one or more adults.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "creative_role")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub production_id: i64,

    #[sea_orm(belongs_to, from = "production_id", to = "id")]
    pub production: BelongsTo<super::production::Entity>,
}

impl Related<super::adult::Entity> for Entity {
    fn to() -> RelationDef {
        super::creative_assignment::Relation::Adult.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::creative_assignment::Relation::CreativeRole.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
