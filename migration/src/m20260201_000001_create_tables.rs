use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create production table
        manager
            .create_table(
                Table::create()
                    .table(Production::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Production::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Production::Title).string().not_null())
                    .col(ColumnDef::new(Production::Subtitle).string())
                    .col(ColumnDef::new(Production::Image).string())
                    .col(ColumnDef::new(Production::StartDate).date())
                    .col(ColumnDef::new(Production::EndDate).date())
                    .col(ColumnDef::new(Production::Location).string())
                    .col(
                        ColumnDef::new(Production::Price)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Production::Notes).string())
                    .col(ColumnDef::new(Production::Thanks).string())
                    .col(
                        ColumnDef::new(Production::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Students::Sex).string_len(1))
                    .col(ColumnDef::new(Students::Year).string_len(15))
                    .col(
                        ColumnDef::new(Students::IsCrew)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Create role table
        manager
            .create_table(
                Table::create()
                    .table(Role::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Role::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Role::Name).string().not_null())
                    .col(ColumnDef::new(Role::ProductionId).integer().not_null())
                    .col(
                        ColumnDef::new(Role::IsGroup)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_production_id")
                            .from(Role::Table, Role::ProductionId)
                            .to(Production::Table, Production::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create role_assignment junction table
        manager
            .create_table(
                Table::create()
                    .table(RoleAssignment::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RoleAssignment::RoleId).integer().not_null())
                    .col(
                        ColumnDef::new(RoleAssignment::StudentId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(RoleAssignment::RoleId)
                            .col(RoleAssignment::StudentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_assignment_role_id")
                            .from(RoleAssignment::Table, RoleAssignment::RoleId)
                            .to(Role::Table, Role::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_assignment_student_id")
                            .from(RoleAssignment::Table, RoleAssignment::StudentId)
                            .to(Students::Table, Students::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create creative_role table
        manager
            .create_table(
                Table::create()
                    .table(CreativeRole::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreativeRole::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CreativeRole::Name).string().not_null())
                    .col(
                        ColumnDef::new(CreativeRole::ProductionId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_creative_role_production_id")
                            .from(CreativeRole::Table, CreativeRole::ProductionId)
                            .to(Production::Table, Production::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create adult table
        manager
            .create_table(
                Table::create()
                    .table(Adult::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Adult::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Adult::Name).string().not_null())
                    .col(ColumnDef::new(Adult::ProductionId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_adult_production_id")
                            .from(Adult::Table, Adult::ProductionId)
                            .to(Production::Table, Production::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create creative_assignment junction table
        manager
            .create_table(
                Table::create()
                    .table(CreativeAssignment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CreativeAssignment::RoleId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CreativeAssignment::AdultId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CreativeAssignment::RoleId)
                            .col(CreativeAssignment::AdultId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_creative_assignment_role_id")
                            .from(CreativeAssignment::Table, CreativeAssignment::RoleId)
                            .to(CreativeRole::Table, CreativeRole::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_creative_assignment_adult_id")
                            .from(CreativeAssignment::Table, CreativeAssignment::AdultId)
                            .to(Adult::Table, Adult::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create song table
        manager
            .create_table(
                Table::create()
                    .table(Song::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Song::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Song::Title).string().not_null())
                    .col(ColumnDef::new(Song::Act).integer().not_null())
                    .col(
                        ColumnDef::new(Song::IntermissionMessage)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Song::ProductionId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_song_production_id")
                            .from(Song::Table, Song::ProductionId)
                            .to(Production::Table, Production::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create song_assignment junction table
        manager
            .create_table(
                Table::create()
                    .table(SongAssignment::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SongAssignment::SongId).integer().not_null())
                    .col(ColumnDef::new(SongAssignment::RoleId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(SongAssignment::SongId)
                            .col(SongAssignment::RoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_song_assignment_song_id")
                            .from(SongAssignment::Table, SongAssignment::SongId)
                            .to(Song::Table, Song::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_song_assignment_role_id")
                            .from(SongAssignment::Table, SongAssignment::RoleId)
                            .to(Role::Table, Role::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SongAssignment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Song::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreativeAssignment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Adult::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CreativeRole::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoleAssignment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Role::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Production::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Production {
    Table,
    Id,
    Title,
    Subtitle,
    Image,
    StartDate,
    EndDate,
    Location,
    Price,
    Notes,
    Thanks,
    IsActive,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    Name,
    Sex,
    Year,
    IsCrew,
}

#[derive(DeriveIden)]
enum Role {
    Table,
    Id,
    Name,
    ProductionId,
    IsGroup,
}

#[derive(DeriveIden)]
enum RoleAssignment {
    Table,
    RoleId,
    StudentId,
}

#[derive(DeriveIden)]
enum CreativeRole {
    Table,
    Id,
    Name,
    ProductionId,
}

#[derive(DeriveIden)]
enum Adult {
    Table,
    Id,
    Name,
    ProductionId,
}

#[derive(DeriveIden)]
enum CreativeAssignment {
    Table,
    RoleId,
    AdultId,
}

#[derive(DeriveIden)]
enum Song {
    Table,
    Id,
    Title,
    Act,
    IntermissionMessage,
    ProductionId,
}

#[derive(DeriveIden)]
enum SongAssignment {
    Table,
    SongId,
    RoleId,
}
