//! Read and write operations for the conversations table.

use super::error::Error;
use crate::validate_session_id;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use entity::conversation_status::ConversationStatus;
use entity::conversations::{ActiveModel, Column, Entity, Model};
use entity::suggestion::Suggestion;
use entity::turn::{Turn, Turns};
use log::*;
use sea_orm::{
    entity::prelude::*, sea_query::OnConflict, ActiveValue::Set, ConnectionTrait,
    DatabaseConnection, QueryOrder, QuerySelect, TransactionTrait,
};
use serde_json::{Map, Value};

/// Values used only when an append has to create the conversation first.
#[derive(Debug, Clone)]
pub struct ConversationSeed {
    pub channel: String,
    pub metadata: Map<String, Value>,
}

/// A speaker-labelled transcript of a session's audio recording.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTranscript {
    pub file_url: String,
    pub transcript: String,
}

/// Finds a conversation by session id.
pub async fn find_by_id(db: &DatabaseConnection, session_id: &str) -> Result<Option<Model>, Error> {
    validate_session_id(session_id)?;
    Ok(Entity::find_by_id(session_id.to_string()).one(db).await?)
}

/// Returns up to `limit` conversations, most recently started first.
pub async fn find_recent(db: &DatabaseConnection, limit: u64) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_desc(Column::StartTime)
        .limit(limit)
        .all(db)
        .await?)
}

/// Appends `turn` to the session's conversation, creating the conversation when it
/// doesn't exist yet.
///
/// Creation and append happen in one transaction that holds the row lock between
/// reading `turns` and writing them back, so concurrent appends to the same session
/// are serialized and neither turn is lost.
pub async fn append_turn(
    db: &DatabaseConnection,
    session_id: &str,
    turn: Turn,
    seed: ConversationSeed,
) -> Result<Model, Error> {
    validate_session_id(session_id)?;

    let txn = db.begin().await?;
    let now: DateTime<FixedOffset> = Utc::now().into();

    let inserted = insert_if_absent(&txn, session_id, now, seed).await?;
    if inserted > 0 {
        info!("Created conversation for session: {session_id}");
    }

    let existing = Entity::find_by_id(session_id.to_string())
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(Error::not_found)?;

    let last_update = next_last_update(existing.last_update, now);
    let mut turns: Turns = existing.turns.clone();
    turns.push(turn);
    let turn_count = turns.len();

    let mut active_model: ActiveModel = existing.into();
    active_model.turns = Set(turns);
    active_model.last_update = Set(last_update);

    let updated = active_model.update(&txn).await?;
    txn.commit().await?;

    debug!("Stored turn {turn_count} for session: {session_id}");
    Ok(updated)
}

/// Overwrites the session's latest suggestion. The previous value is discarded.
pub async fn update_latest_suggestions(
    db: &DatabaseConnection,
    session_id: &str,
    suggestion: Suggestion,
) -> Result<Model, Error> {
    validate_session_id(session_id)?;

    let existing = Entity::find_by_id(session_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| {
            debug!("Conversation {session_id} not found, can't store suggestion");
            Error::not_found()
        })?;

    let mut active_model: ActiveModel = existing.into();
    active_model.latest_suggestions = Set(Some(suggestion));
    active_model.suggestions_updated = Set(Some(Utc::now().into()));

    Ok(active_model.update(db).await?)
}

/// Records the session's audio transcript. A conversation that only exists as a
/// recording is created as a completed audio session with no turns.
pub async fn upsert_audio_transcript(
    db: &DatabaseConnection,
    session_id: &str,
    audio: AudioTranscript,
) -> Result<Model, Error> {
    validate_session_id(session_id)?;

    let now: DateTime<FixedOffset> = Utc::now().into();

    match Entity::find_by_id(session_id.to_string()).one(db).await? {
        Some(existing) => {
            debug!("Attaching audio transcript to existing conversation: {session_id}");

            let mut active_model: ActiveModel = existing.into();
            active_model.has_audio = Set(true);
            active_model.audio_file_url = Set(Some(audio.file_url));
            active_model.audio_transcript = Set(Some(audio.transcript));
            active_model.audio_transcribed_at = Set(Some(now));

            Ok(active_model.update(db).await?)
        }
        None => {
            info!("Creating audio-only conversation: {session_id}");

            let active_model = ActiveModel {
                session_id: Set(session_id.to_string()),
                start_time: Set(now),
                last_update: Set(now),
                status: Set(ConversationStatus::Completed),
                channel: Set(entity::AUDIO_CHANNEL.to_string()),
                turns: Set(Turns::default()),
                latest_suggestions: Set(None),
                suggestions_updated: Set(None),
                metadata: Set(Value::Object(Map::new())),
                has_audio: Set(true),
                audio_file_url: Set(Some(audio.file_url)),
                audio_transcript: Set(Some(audio.transcript)),
                audio_transcribed_at: Set(Some(now)),
            };

            Ok(active_model.insert(db).await?)
        }
    }
}

async fn insert_if_absent<C: ConnectionTrait>(
    conn: &C,
    session_id: &str,
    now: DateTime<FixedOffset>,
    seed: ConversationSeed,
) -> Result<u64, Error> {
    let active_model = ActiveModel {
        session_id: Set(session_id.to_string()),
        start_time: Set(now),
        last_update: Set(now),
        status: Set(ConversationStatus::Active),
        channel: Set(seed.channel),
        turns: Set(Turns::default()),
        latest_suggestions: Set(None),
        suggestions_updated: Set(None),
        metadata: Set(Value::Object(seed.metadata)),
        has_audio: Set(false),
        audio_file_url: Set(None),
        audio_transcript: Set(None),
        audio_transcribed_at: Set(None),
    };

    Ok(Entity::insert(active_model)
        .on_conflict(
            OnConflict::column(Column::SessionId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?)
}

/// `last_update` must move forward on every append even when two appends land within
/// the clock's resolution.
pub fn next_last_update(
    previous: DateTime<FixedOffset>,
    now: DateTime<FixedOffset>,
) -> DateTime<FixedOffset> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
