use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use eyre::{Result, WrapErr};
use tracing::info;

use super::conversation_state::{ConversationState, Message};

const HEADER: &str = "Your Conversation Log:\n\n";
const FOOTER: &str = "End of Conversation";

/// Render the log: header, one entry per message, footer.
///
/// User messages end with a newline; assistant messages end with a blank
/// line so each exchange reads as a block. Content is written as-is.
pub fn render(state: &ConversationState) -> String {
    let mut log = String::from(HEADER);

    for message in state.get_messages() {
        match message {
            Message::User(content) => {
                log.push_str("You: ");
                log.push_str(content);
                log.push('\n');
            }
            Message::Assistant(content) => {
                log.push_str("AI: ");
                log.push_str(content);
                log.push_str("\n\n");
            }
        }
    }

    log.push_str(FOOTER);
    log
}

/// Write the log to `path`, replacing whatever was there.
pub fn write_transcript(path: &Path, state: &ConversationState) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("Failed to create transcript {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(render(state).as_bytes())
        .and_then(|_| writer.flush())
        .wrap_err_with(|| format!("Failed to write transcript {}", path.display()))?;

    info!(
        "Wrote {} messages to {}",
        state.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn hi_hello() -> ConversationState {
        let mut state = ConversationState::new();
        state.add_user_message("hi");
        state.add_assistant_message("hello");
        state
    }

    #[test]
    fn renders_single_exchange_exactly() {
        assert_eq!(
            render(&hi_hello()),
            "Your Conversation Log:\n\nYou: hi\nAI: hello\n\nEnd of Conversation"
        );
    }

    #[test]
    fn renders_empty_session() {
        assert_eq!(
            render(&ConversationState::new()),
            "Your Conversation Log:\n\nEnd of Conversation"
        );
    }

    #[test]
    fn content_is_not_escaped() {
        let mut state = ConversationState::new();
        state.add_user_message("line one\nYou: fake");
        assert_eq!(
            render(&state),
            "Your Conversation Log:\n\nYou: line one\nYou: fake\nEnd of Conversation"
        );
    }

    #[test]
    fn write_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logging.txt");
        fs::write(&path, "x".repeat(4096)).unwrap();

        write_transcript(&path, &hi_hello()).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Your Conversation Log:\n\nYou: hi\nAI: hello\n\nEnd of Conversation"
        );
    }

    #[test]
    fn write_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("logging.txt");

        let err = write_transcript(&path, &hi_hello()).unwrap_err();
        assert!(err.to_string().contains("Failed to create transcript"));
    }
}
