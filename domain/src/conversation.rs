//! Conversation persistence behind an injectable store, plus the transcript
//! renderings built from a stored conversation.

use crate::conversations::Model;
use crate::error::Error;
use crate::suggestion::Suggestion;
use crate::turn::Turn;
use async_trait::async_trait;
use entity_api::conversation as ConversationApi;
use log::*;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;

pub use entity_api::conversation::{AudioTranscript, ConversationSeed};

/// Storage operations the webhook and dashboard endpoints need.
///
/// `append_turn` creates the conversation from `seed` when it's missing. For a single
/// session the create and the append are observed as one step, and two appends racing
/// on the same session both land.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn find(&self, session_id: &str) -> Result<Option<Model>, Error>;

    async fn append_turn(
        &self,
        session_id: &str,
        turn: Turn,
        seed: ConversationSeed,
    ) -> Result<Model, Error>;

    /// Overwrites the latest suggestion of an existing conversation.
    async fn save_suggestion(&self, session_id: &str, suggestion: Suggestion)
        -> Result<Model, Error>;

    /// Most recently started conversations first.
    async fn list_recent(&self, limit: u64) -> Result<Vec<Model>, Error>;

    async fn attach_audio_transcript(
        &self,
        session_id: &str,
        audio: AudioTranscript,
    ) -> Result<Model, Error>;
}

/// Postgres backed store.
pub struct DbConversationStore {
    db: Arc<DatabaseConnection>,
}

impl DbConversationStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConversationStore for DbConversationStore {
    async fn find(&self, session_id: &str) -> Result<Option<Model>, Error> {
        Ok(ConversationApi::find_by_id(&self.db, session_id).await?)
    }

    async fn append_turn(
        &self,
        session_id: &str,
        turn: Turn,
        seed: ConversationSeed,
    ) -> Result<Model, Error> {
        Ok(ConversationApi::append_turn(&self.db, session_id, turn, seed).await?)
    }

    async fn save_suggestion(
        &self,
        session_id: &str,
        suggestion: Suggestion,
    ) -> Result<Model, Error> {
        Ok(ConversationApi::update_latest_suggestions(&self.db, session_id, suggestion).await?)
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Model>, Error> {
        Ok(ConversationApi::find_recent(&self.db, limit).await?)
    }

    async fn attach_audio_transcript(
        &self,
        session_id: &str,
        audio: AudioTranscript,
    ) -> Result<Model, Error> {
        Ok(ConversationApi::upsert_audio_transcript(&self.db, session_id, audio).await?)
    }
}

/// One line of a rendered transcript as the dashboard displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptMessage {
    pub role: String,
    pub speaker: String,
    pub text: String,
}

impl TranscriptMessage {
    fn student(text: &str) -> Self {
        Self {
            role: "student".to_string(),
            speaker: "Student".to_string(),
            text: text.to_string(),
        }
    }

    fn instructor(text: &str) -> Self {
        Self {
            role: "instructor".to_string(),
            speaker: "Instructor".to_string(),
            text: text.to_string(),
        }
    }
}

/// Flattens turns into "Student: ..." / "Instructor: ..." lines, oldest first.
pub fn render_history(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(Turn::transcript_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reads a speaker-labelled transcript back into messages. Blank lines, lines without
/// a known label and labels with no text after them are skipped.
pub fn parse_audio_transcript(transcript: &str) -> Vec<TranscriptMessage> {
    transcript
        .lines()
        .filter_map(|line| {
            if let Some(text) = line.strip_prefix("Instructor:") {
                non_empty(text).map(TranscriptMessage::instructor)
            } else if let Some(text) = line.strip_prefix("Student:") {
                non_empty(text).map(TranscriptMessage::student)
            } else {
                None
            }
        })
        .collect()
}

fn non_empty(text: &str) -> Option<&str> {
    let text = text.trim();
    (!text.is_empty()).then_some(text)
}

/// Everything said in a session: the recording's transcript first, then the agent turns.
pub fn transcript_messages(conversation: &Model) -> Vec<TranscriptMessage> {
    let mut messages = conversation
        .audio_transcript
        .as_deref()
        .map(parse_audio_transcript)
        .unwrap_or_default();

    messages.extend(conversation.turns.iter().filter_map(|turn| {
        let text = non_empty(&turn.text)?;
        Some(match turn.speaker {
            crate::speaker::Speaker::Customer => TranscriptMessage::student(text),
            crate::speaker::Speaker::Instructor => TranscriptMessage::instructor(text),
        })
    }));

    messages
}

/// Loads a conversation that callers expect to exist.
pub async fn find_existing(
    store: &dyn ConversationStore,
    session_id: &str,
) -> Result<Model, Error> {
    store.find(session_id).await?.ok_or_else(|| {
        debug!("Conversation {session_id} not found");
        Error::from(entity_api::error::Error {
            source: None,
            error_kind: entity_api::error::EntityApiErrorKind::RecordNotFound,
        })
    })
}

#[cfg(any(test, feature = "mock"))]
pub use in_memory::InMemoryConversationStore;

#[cfg(any(test, feature = "mock"))]
mod in_memory {
    use super::*;
    use crate::conversation_status::ConversationStatus;
    use crate::turn::Turns;
    use chrono::{DateTime, FixedOffset, Utc};
    use serde_json::{Map, Value};
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// Process-local store for tests. The mutex is the per-session serialization point.
    #[derive(Default)]
    pub struct InMemoryConversationStore {
        conversations: Mutex<HashMap<String, Model>>,
    }

    impl InMemoryConversationStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seeds a conversation directly, bypassing the append path.
        pub async fn insert(&self, conversation: Model) {
            self.conversations
                .lock()
                .await
                .insert(conversation.session_id.clone(), conversation);
        }
    }

    fn not_found() -> Error {
        Error::from(entity_api::error::Error {
            source: None,
            error_kind: entity_api::error::EntityApiErrorKind::RecordNotFound,
        })
    }

    fn empty_conversation(
        session_id: &str,
        now: DateTime<FixedOffset>,
        status: ConversationStatus,
        channel: String,
        metadata: Map<String, Value>,
    ) -> Model {
        Model {
            session_id: session_id.to_string(),
            start_time: now,
            last_update: now,
            status,
            channel,
            turns: Turns::default(),
            latest_suggestions: None,
            suggestions_updated: None,
            metadata: Value::Object(metadata),
            has_audio: false,
            audio_file_url: None,
            audio_transcript: None,
            audio_transcribed_at: None,
        }
    }

    #[async_trait]
    impl ConversationStore for InMemoryConversationStore {
        async fn find(&self, session_id: &str) -> Result<Option<Model>, Error> {
            entity_api::validate_session_id(session_id)?;
            Ok(self.conversations.lock().await.get(session_id).cloned())
        }

        async fn append_turn(
            &self,
            session_id: &str,
            turn: Turn,
            seed: ConversationSeed,
        ) -> Result<Model, Error> {
            entity_api::validate_session_id(session_id)?;

            let now: DateTime<FixedOffset> = Utc::now().into();
            let mut conversations = self.conversations.lock().await;
            let conversation = conversations.entry(session_id.to_string()).or_insert_with(|| {
                empty_conversation(
                    session_id,
                    now,
                    ConversationStatus::Active,
                    seed.channel,
                    seed.metadata,
                )
            });

            conversation.turns.push(turn);
            conversation.last_update =
                ConversationApi::next_last_update(conversation.last_update, now);

            Ok(conversation.clone())
        }

        async fn save_suggestion(
            &self,
            session_id: &str,
            suggestion: Suggestion,
        ) -> Result<Model, Error> {
            let mut conversations = self.conversations.lock().await;
            let conversation = conversations.get_mut(session_id).ok_or_else(not_found)?;

            conversation.latest_suggestions = Some(suggestion);
            conversation.suggestions_updated = Some(Utc::now().into());

            Ok(conversation.clone())
        }

        async fn list_recent(&self, limit: u64) -> Result<Vec<Model>, Error> {
            let mut conversations: Vec<Model> =
                self.conversations.lock().await.values().cloned().collect();
            conversations.sort_by(|a, b| b.start_time.cmp(&a.start_time));
            conversations.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
            Ok(conversations)
        }

        async fn attach_audio_transcript(
            &self,
            session_id: &str,
            audio: AudioTranscript,
        ) -> Result<Model, Error> {
            entity_api::validate_session_id(session_id)?;

            let now: DateTime<FixedOffset> = Utc::now().into();
            let mut conversations = self.conversations.lock().await;
            let conversation = conversations.entry(session_id.to_string()).or_insert_with(|| {
                empty_conversation(
                    session_id,
                    now,
                    ConversationStatus::Completed,
                    entity_api::AUDIO_CHANNEL.to_string(),
                    Map::new(),
                )
            });

            conversation.has_audio = true;
            conversation.audio_file_url = Some(audio.file_url);
            conversation.audio_transcript = Some(audio.transcript);
            conversation.audio_transcribed_at = Some(now);

            Ok(conversation.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speaker::Speaker;
    use serde_json::Map;

    fn seed() -> ConversationSeed {
        ConversationSeed {
            channel: entity_api::DEFAULT_CHANNEL.to_string(),
            metadata: Map::new(),
        }
    }

    fn student_turn(text: &str) -> Turn {
        Turn::from_customer(text, "No Intent", "Unknown Page", 0.0, Map::new())
    }

    #[tokio::test]
    async fn first_append_creates_the_conversation() -> Result<(), Error> {
        let store = InMemoryConversationStore::new();
        let turn = student_turn("What is a qubit?");

        let conversation = store.append_turn("abc123", turn.clone(), seed()).await?;

        assert_eq!(conversation.turns.len(), 1);
        assert_eq!(conversation.turns.0[0], turn);
        assert_eq!(conversation.channel, entity_api::DEFAULT_CHANNEL);
        assert_eq!(
            conversation.status,
            crate::conversation_status::ConversationStatus::Active
        );
        Ok(())
    }

    #[tokio::test]
    async fn second_append_keeps_the_first_turn_and_advances_last_update() -> Result<(), Error> {
        let store = InMemoryConversationStore::new();
        let first = student_turn("What is a qubit?");

        let before = store.append_turn("abc123", first.clone(), seed()).await?;
        let after = store
            .append_turn("abc123", student_turn("And superposition?"), seed())
            .await?;

        assert_eq!(after.turns.len(), 2);
        assert_eq!(after.turns.0[0], first);
        assert!(after.last_update > before.last_update);
        assert_eq!(after.start_time, before.start_time);
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_appends_to_one_session_are_all_kept() -> Result<(), Error> {
        let store = Arc::new(InMemoryConversationStore::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .append_turn("race", student_turn(&format!("turn {i}")), seed())
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.expect("task panicked")?;
        }

        let conversation = store.find("race").await?.expect("conversation exists");
        assert_eq!(conversation.turns.len(), 8);
        Ok(())
    }

    #[tokio::test]
    async fn saving_a_suggestion_for_an_unknown_session_fails() {
        let store = InMemoryConversationStore::new();

        let result = store.save_suggestion("missing", Suggestion::fallback()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn audio_only_sessions_are_created_completed() -> Result<(), Error> {
        let store = InMemoryConversationStore::new();
        let audio = AudioTranscript {
            file_url: "gs://bucket/lesson.wav".to_string(),
            transcript: "Student: hi".to_string(),
        };

        let conversation = store.attach_audio_transcript("lesson", audio).await?;

        assert!(conversation.has_audio);
        assert!(conversation.turns.is_empty());
        assert_eq!(conversation.channel, entity_api::AUDIO_CHANNEL);
        assert_eq!(
            conversation.status,
            crate::conversation_status::ConversationStatus::Completed
        );
        Ok(())
    }

    #[test]
    fn history_uses_student_and_instructor_labels() {
        let mut answer = student_turn("A qubit holds 0 and 1 at once.");
        answer.speaker = Speaker::Instructor;
        let turns = vec![student_turn("What is a qubit?"), answer];

        assert_eq!(
            render_history(&turns),
            "Student: What is a qubit?\nInstructor: A qubit holds 0 and 1 at once."
        );
        assert_eq!(render_history(&[]), "");
    }

    #[test]
    fn audio_transcript_parsing_skips_unlabelled_lines() {
        let transcript = "Instructor: Welcome back\n\nStudent:   What is entanglement? \nnoise\nStudent:\nTeacher: ignored";

        let messages = parse_audio_transcript(transcript);

        assert_eq!(
            messages,
            vec![
                TranscriptMessage::instructor("Welcome back"),
                TranscriptMessage::student("What is entanglement?"),
            ]
        );
    }
}
