//! The chat tutor: one student message in, one short friendly answer out.

use crate::error::Error;
use log::*;
use tutor_ai::traits::generation::Provider;
use tutor_ai::types::generation::{is_valid_model_name, Request};

pub const TUTOR_SYSTEM_INSTRUCTION: &str = "You are Gami, an educational AI tutor. Help students learn in a friendly way. Keep responses concise (2-4 sentences).";

pub async fn reply(
    provider: &dyn Provider,
    message: &str,
    model: &str,
    max_attempts: u32,
) -> Result<String, Error> {
    let message = message.trim();
    if message.is_empty() || !is_valid_model_name(model) {
        return Err(Error::invalid());
    }

    debug!("Tutor chat with {model}: {message}");
    let request = Request::new(model, message).with_system_instruction(TUTOR_SYSTEM_INSTRUCTION);

    Ok(tutor_ai::generate_with_retry(provider, &request, max_attempts).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_ai::traits::generation::MockProvider;

    #[tokio::test]
    async fn blank_messages_are_rejected_without_calling_the_model() {
        let mut provider = MockProvider::new();
        provider.expect_generate().never();

        assert!(reply(&provider, "   ", "gemini-2.5-flash", 2).await.is_err());
    }

    #[tokio::test]
    async fn unsafe_model_names_are_rejected_without_calling_the_model() {
        let mut provider = MockProvider::new();
        provider.expect_generate().never();

        assert!(reply(&provider, "Hi", "flash/../../x", 2).await.is_err());
    }

    #[tokio::test]
    async fn replies_use_the_tutor_persona() {
        let mut provider = MockProvider::new();
        provider.expect_provider_id().return_const("mock");
        provider
            .expect_generate()
            .withf(|request| {
                request.prompt == "What is entanglement?"
                    && request.system_instruction.as_deref() == Some(TUTOR_SYSTEM_INSTRUCTION)
            })
            .times(1)
            .returning(|_| Ok("Two particles share one state.".to_string()));

        let answer = reply(&provider, " What is entanglement? ", "gemini-2.5-flash", 2)
            .await
            .unwrap();

        assert_eq!(answer, "Two particles share one state.");
    }
}
