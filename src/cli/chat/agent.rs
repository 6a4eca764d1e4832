use std::io::Write;
use std::time::Instant;

use eyre::{Result, WrapErr};
use tracing::{debug, info};

use super::conversation_state::ConversationState;
use super::Memory;
use crate::ollama_client::ChatModel;

/// Run one turn: send the state's messages to the model and print the reply.
///
/// With [`Memory::Stateful`] the reply is appended to `state` as an
/// assistant message. Model failures are returned unchanged in kind; the
/// caller treats them as fatal.
pub async fn process(
    model: &dyn ChatModel,
    state: &mut ConversationState,
    memory: Memory,
    output: &mut dyn Write,
    trace_turns: bool,
) -> Result<String> {
    let started = Instant::now();

    let response = model
        .generate(state.get_messages())
        .await
        .wrap_err("Failed to get a reply from the model")?;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    if trace_turns {
        info!(messages = state.len(), elapsed_ms, "model turn");
    } else {
        debug!(messages = state.len(), elapsed_ms, "model turn");
    }

    if memory == Memory::Stateful {
        state.add_assistant_message(&response);
    }

    writeln!(output, "\nAI: {}", response)?;
    output.flush()?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::cli::chat::conversation_state::Message;
    use crate::ollama_client::ModelError;
    use crate::test_buffer::TestBuffer;

    struct EchoModel;

    #[async_trait]
    impl ChatModel for EchoModel {
        async fn generate(&self, messages: &[Message]) -> Result<String, ModelError> {
            Ok(format!("echo {}", messages.len()))
        }
    }

    struct DownModel;

    #[async_trait]
    impl ChatModel for DownModel {
        async fn generate(&self, _messages: &[Message]) -> Result<String, ModelError> {
            Err(ModelError::Api("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn stateful_turn_appends_reply() {
        let mut state = ConversationState::new();
        state.add_user_message("hi");
        let mut out = TestBuffer::new();

        let reply = process(&EchoModel, &mut state, Memory::Stateful, &mut out, false)
            .await
            .unwrap();

        assert_eq!(reply, "echo 1");
        assert_eq!(
            state.get_messages(),
            &[Message::User("hi".into()), Message::Assistant("echo 1".into())]
        );
        assert_eq!(out.contents(), "\nAI: echo 1\n");
    }

    #[tokio::test]
    async fn stateless_turn_leaves_state_alone() {
        let mut state = ConversationState::new();
        state.add_user_message("hi");
        let mut out = TestBuffer::new();

        process(&EchoModel, &mut state, Memory::Stateless, &mut out, true)
            .await
            .unwrap();

        assert_eq!(state.len(), 1);
        assert_eq!(out.contents(), "\nAI: echo 1\n");
    }

    #[tokio::test]
    async fn model_failure_prints_nothing() {
        let mut state = ConversationState::new();
        state.add_user_message("hi");
        let mut out = TestBuffer::new();

        let err = process(&DownModel, &mut state, Memory::Stateful, &mut out, false)
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("connection refused"));
        assert_eq!(state.len(), 1);
        assert!(out.contents().is_empty());
    }
}
