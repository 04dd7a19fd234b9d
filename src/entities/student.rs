use sea_orm::entity::prelude::*;

/// A student is not scoped to a production; the crew flag is global too.
/// Crew students are excluded from the cast-role assignment pool.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub sex: Option<String>,
    pub year: Option<String>,
    pub is_crew: bool,
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        super::role_assignment::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::role_assignment::Relation::Student.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
