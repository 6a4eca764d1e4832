pub mod agent;
pub mod conversation_state;
pub mod input_source;
pub mod prompt;
pub mod transcript;

use std::io::Write;
use std::process::ExitCode;

use conversation_state::ConversationState;
use eyre::Result;
use input_source::InputSource;
use prompt::{generate_prompt, is_exit_sentinel};
use tracing::{debug, info};

use crate::config::ChatConfig;
use crate::ollama_client::ChatModel;

/// Whether a session keeps its history between turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Memory {
    /// Each turn sends only the current user message.
    Stateless,
    /// History accumulates and is written to the transcript on exit.
    Stateful,
}

pub struct ChatContext {
    output: Box<dyn Write>,
    input: InputSource,
    memory: Memory,
    conversation_state: ConversationState,
    model: Box<dyn ChatModel>,
    config: ChatConfig,
}

impl ChatContext {
    pub fn new(
        output: Box<dyn Write>,
        input: InputSource,
        memory: Memory,
        model: Box<dyn ChatModel>,
        config: ChatConfig,
    ) -> Self {
        Self {
            output,
            input,
            memory,
            conversation_state: ConversationState::new(),
            model,
            config,
        }
    }

    pub fn conversation_state(&self) -> &ConversationState {
        &self.conversation_state
    }

    pub async fn run(&mut self) -> Result<ExitCode> {
        info!("Starting {:?} chat session with {}", self.memory, self.config.model);

        self.run_interactive().await?;

        if self.memory == Memory::Stateful {
            let path = &self.config.transcript_path;
            transcript::write_transcript(path, &self.conversation_state)?;
            writeln!(self.output, "Conversation saved to {}", path.display())?;
        }

        Ok(ExitCode::SUCCESS)
    }

    async fn run_interactive(&mut self) -> Result<()> {
        let prompt_text = generate_prompt(None);

        while let Some(line) = self.input.read_line(&prompt_text)? {
            if is_exit_sentinel(&line) {
                debug!("Exit requested");
                break;
            }

            self.handle_input(&line).await?;
        }

        Ok(())
    }

    async fn handle_input(&mut self, input: &str) -> Result<()> {
        if self.memory == Memory::Stateless {
            self.conversation_state.clear();
        }
        self.conversation_state.add_user_message(input);

        agent::process(
            self.model.as_ref(),
            &mut self.conversation_state,
            self.memory,
            self.output.as_mut(),
            self.config.tracing.enabled,
        )
        .await?;

        Ok(())
    }
}
