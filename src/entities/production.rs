use sea_orm::entity::prelude::*;

/// One staged run of a musical. Root scope for roles, songs, adults and the
/// creative team; children are removed together with their production.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "production")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub subtitle: Option<String>,
    pub image: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub location: Option<String>,
    pub price: f64,
    pub notes: Option<String>,
    pub thanks: Option<String>,
    /// At most one production carries this flag at a time; the service layer
    /// clears and sets it in one transaction.
    pub is_active: bool,
}

impl ActiveModelBehavior for ActiveModel {}
