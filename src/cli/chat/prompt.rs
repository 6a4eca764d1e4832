use rustyline::{Config, Editor, Result};

pub const USER_PROMPT: &str = "You: ";

/// Typing this (any case, surrounding whitespace ignored) ends the session.
pub const EXIT_SENTINEL: &str = "exit()";

pub fn generate_prompt(custom_prompt: Option<&str>) -> String {
    custom_prompt.unwrap_or(USER_PROMPT).to_string()
}

pub fn is_exit_sentinel(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(EXIT_SENTINEL)
}

pub fn rl() -> Result<Editor<()>> {
    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(false)
        .build();
    Editor::with_config(config)
}
