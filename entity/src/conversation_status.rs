use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle status of a conversation document.
#[derive(
    Debug,
    Clone,
    Eq,
    PartialEq,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "conversation_status"
)]
pub enum ConversationStatus {
    /// Session is still receiving turns
    #[sea_orm(string_value = "active")]
    #[default]
    Active,
    /// Session was closed by the agent platform
    #[sea_orm(string_value = "closed")]
    Closed,
    /// Session was reconstructed from a finished audio recording
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl std::fmt::Display for ConversationStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationStatus::Active => write!(fmt, "active"),
            ConversationStatus::Closed => write!(fmt, "closed"),
            ConversationStatus::Completed => write!(fmt, "completed"),
        }
    }
}
