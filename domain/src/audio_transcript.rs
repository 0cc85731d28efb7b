//! Shapes diarized speech-to-text output into a speaker-labelled transcript and
//! attaches it to the session.

use crate::conversation::{AudioTranscript, ConversationStore};
use crate::conversations::Model;
use crate::error::Error;
use log::*;
use tutor_ai::types::transcription::{DiarizedWord, STUDENT_SPEAKER_TAG};

fn speaker_label(speaker_tag: u32) -> &'static str {
    if speaker_tag == STUDENT_SPEAKER_TAG {
        "Student"
    } else {
        "Instructor"
    }
}

/// Groups consecutive words from the same speaker into one "Speaker: words" line.
pub fn render_diarized(words: &[DiarizedWord]) -> String {
    let mut runs: Vec<(u32, Vec<&str>)> = Vec::new();

    for word in words {
        let text = word.word.trim();
        if text.is_empty() {
            continue;
        }

        let same_speaker = matches!(runs.last(), Some((tag, _)) if *tag == word.speaker_tag);
        if same_speaker {
            if let Some((_, run)) = runs.last_mut() {
                run.push(text);
            }
        } else {
            runs.push((word.speaker_tag, vec![text]));
        }
    }

    runs.iter()
        .map(|(tag, run)| format!("{}: {}", speaker_label(*tag), run.join(" ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// What a transcription job hands back: diarized words when the recogniser could
/// separate speakers, otherwise plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognisedSpeech {
    Diarized(Vec<DiarizedWord>),
    Plain(String),
}

pub async fn attach(
    store: &dyn ConversationStore,
    session_id: &str,
    audio_file_url: &str,
    speech: RecognisedSpeech,
) -> Result<Model, Error> {
    let transcript = match speech {
        RecognisedSpeech::Diarized(words) => render_diarized(&words),
        RecognisedSpeech::Plain(text) => text.trim().to_string(),
    };

    info!(
        "Attaching {} character audio transcript to session: {session_id}",
        transcript.chars().count()
    );

    store
        .attach_audio_transcript(
            session_id,
            AudioTranscript {
                file_url: audio_file_url.to_string(),
                transcript,
            },
        )
        .await
}
