use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // =====================================================
        // Create topic_tags join table
        // =====================================================
        manager
            .create_table(
                Table::create()
                    .table(TopicTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TopicTags::TopicId).uuid().not_null())
                    .col(ColumnDef::new(TopicTags::TagId).uuid().not_null())
                    .col(
                        ColumnDef::new(TopicTags::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Composite primary key
                    .primary_key(
                        Index::create()
                            .col(TopicTags::TopicId)
                            .col(TopicTags::TagId),
                    )
                    // FK → topics
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_topic_tags_topic_id")
                            .from(TopicTags::Table, TopicTags::TopicId)
                            .to(Topics::Table, Topics::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    // FK → tags
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_topic_tags_tag_id")
                            .from(TopicTags::Table, TopicTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Fast lookup: all topics for a tag
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_topic_tags_tag_id
                ON topic_tags (tag_id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP INDEX IF EXISTS idx_topic_tags_tag_id;
                "#,
            )
            .await?;

        manager
            .drop_table(Table::drop().table(TopicTags::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TopicTags {
    Table,
    TopicId,
    TagId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Topics {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
}
