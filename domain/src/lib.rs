//! This module re-exports various items from the `entity_api` crate.
//!
//! The purpose of this re-export is to ensure that consumers of the `domain` crate do not need to
//! directly depend on the `entity_api` crate. By re-exporting these items, we provide a clear and
//! consistent interface for working with conversations within the domain layer, while the
//! underlying persistence details remain in the `entity_api` crate.
pub use entity_api::{
    conversation_status, conversations, speaker, turn, SessionId, AUDIO_CHANNEL, DEFAULT_CHANNEL,
};

// The AI abstractions are part of the domain's public surface; `web` wires providers
// into the workflows without depending on `tutor_ai` itself.
pub use tutor_ai::traits::{annotation as annotation_provider, generation as generation_provider};

pub mod audio_transcript;
pub mod conversation;
pub mod emails;
pub mod error;
pub mod image_analysis;
pub mod suggestion;
pub mod summary;
pub mod tutor;
pub mod video;
pub mod webhook;

pub mod gateway;

pub use tutor_ai::types::{annotation::Annotation, transcription::DiarizedWord};
pub use tutor_ai::Error as ProviderError;
