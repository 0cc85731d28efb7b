pub mod annotation;
pub mod generation;
pub mod transcription;
