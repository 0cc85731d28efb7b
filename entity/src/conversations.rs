//! SeaORM Entity for the conversations table.
//! One row per educational session, keyed by the agent platform's session id.

use crate::conversation_status::ConversationStatus;
use crate::suggestion::Suggestion;
use crate::turn::Turns;
use crate::SessionId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = entity::conversations::Model)]
#[sea_orm(schema_name = "session_assist", table_name = "conversations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: SessionId,

    #[schema(value_type = String, format = DateTime)]
    pub start_time: DateTimeWithTimeZone,

    #[schema(value_type = String, format = DateTime)]
    pub last_update: DateTimeWithTimeZone,

    pub status: ConversationStatus,

    /// Free-form label of the interface the session came in through
    pub channel: String,

    #[sea_orm(column_type = "JsonBinary")]
    #[schema(value_type = Vec<crate::turn::Turn>)]
    pub turns: Turns,

    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub latest_suggestions: Option<Suggestion>,

    #[schema(value_type = Option<String>, format = DateTime)]
    pub suggestions_updated: Option<DateTimeWithTimeZone>,

    /// Opaque mapping captured from the first turn's parameters
    #[sea_orm(column_type = "JsonBinary")]
    #[schema(value_type = Object)]
    pub metadata: Json,

    pub has_audio: bool,

    pub audio_file_url: Option<String>,

    /// Speaker-labelled transcript of the session recording
    #[sea_orm(column_type = "Text", nullable)]
    pub audio_transcript: Option<String>,

    #[schema(value_type = Option<String>, format = DateTime)]
    pub audio_transcribed_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
