use sea_orm::entity::prelude::*;

/// Which adults fill which creative-team role.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "creative_assignment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub role_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub adult_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::creative_role::Entity",
        from = "Column::RoleId",
        to = "super::creative_role::Column::Id",
        on_delete = "Cascade"
    )]
    CreativeRole,
    #[sea_orm(
        belongs_to = "super::adult::Entity",
        from = "Column::AdultId",
        to = "super::adult::Column::Id",
        on_delete = "Cascade"
    )]
    Adult,
}

impl ActiveModelBehavior for ActiveModel {}
