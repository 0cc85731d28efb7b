use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE session_assist.conversation_status AS ENUM (
                    'active',
                    'closed',
                    'completed'
                )",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TABLE session_assist.conversations (
                    session_id TEXT PRIMARY KEY,
                    start_time TIMESTAMPTZ NOT NULL DEFAULT now(),
                    last_update TIMESTAMPTZ NOT NULL DEFAULT now(),
                    status session_assist.conversation_status NOT NULL DEFAULT 'active',
                    channel TEXT NOT NULL DEFAULT 'dialogflow',
                    turns JSONB NOT NULL DEFAULT '[]'::jsonb,
                    latest_suggestions JSONB,
                    suggestions_updated TIMESTAMPTZ,
                    metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
                    has_audio BOOLEAN NOT NULL DEFAULT false,
                    audio_file_url TEXT,
                    audio_transcript TEXT,
                    audio_transcribed_at TIMESTAMPTZ,
                    CONSTRAINT turns_is_array CHECK (jsonb_typeof(turns) = 'array')
                )",
            )
            .await?;

        // The dashboard lists the most recent sessions first
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX conversations_start_time_idx
                    ON session_assist.conversations (start_time DESC)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS session_assist.conversations")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS session_assist.conversation_status")
            .await?;

        Ok(())
    }
}
