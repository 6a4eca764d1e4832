/// One turn of text tagged with the role that authored it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    User(String),
    Assistant(String),
}

impl Message {
    /// Role name as the model API expects it.
    pub fn role(&self) -> &'static str {
        match self {
            Message::User(_) => "user",
            Message::Assistant(_) => "assistant",
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::User(content) | Message::Assistant(content) => content,
        }
    }
}

/// Ordered message history for a session. Insertion order is turn order;
/// role alternation is never checked.
#[derive(Debug, Default)]
pub struct ConversationState {
    messages: Vec<Message>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn add_user_message(&mut self, message: &str) {
        self.messages.push(Message::User(message.to_string()));
    }

    pub fn add_assistant_message(&mut self, message: &str) {
        self.messages.push(Message::Assistant(message.to_string()));
    }

    pub fn get_messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
