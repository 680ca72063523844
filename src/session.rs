//! Chat session over a transcribed recording.

use crate::api::model::ModelClient;
use crate::defaults::CHAT_CONTEXT_PROMPT;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Who authored a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Model,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

/// Conversation transcript, seeded with the recording's content so the
/// model can answer questions about it.
///
/// Turns are only recorded after a successful exchange: a failed API call
/// leaves the history exactly as it was.
pub struct ChatSession {
    turns: Vec<ChatTurn>,
}

impl ChatSession {
    /// Start a session about `transcription`.
    pub fn new(transcription: &str) -> Self {
        Self {
            turns: vec![ChatTurn {
                role: Role::User,
                text: format!("{}\n\n{}", CHAT_CONTEXT_PROMPT, transcription),
            }],
        }
    }

    /// The full history, context turn included.
    pub fn history(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Number of user/model exchanges so far (excludes the context turn).
    pub fn exchanges(&self) -> usize {
        (self.turns.len() - 1) / 2
    }

    /// Send `message` with the session history and record the exchange.
    ///
    /// On error nothing is recorded and the history stays untouched.
    pub async fn ask(&mut self, client: &dyn ModelClient, message: &str) -> Result<String> {
        let reply = client.chat(&self.turns, message).await?;
        self.turns.push(ChatTurn {
            role: Role::User,
            text: message.to_string(),
        });
        self.turns.push(ChatTurn {
            role: Role::Model,
            text: reply.clone(),
        });
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::MockModelClient;

    #[test]
    fn new_session_seeds_context_turn() {
        let session = ChatSession::new("the talk was about rust");

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].role, Role::User);
        assert!(session.history()[0].text.contains("the talk was about rust"));
        assert_eq!(session.exchanges(), 0);
    }

    #[tokio::test]
    async fn ask_records_both_sides_of_the_exchange() {
        let client = MockModelClient::new().with_reply("it was about ownership");
        let mut session = ChatSession::new("transcript");

        let reply = session.ask(&client, "what was it about?").await.unwrap();

        assert_eq!(reply, "it was about ownership");
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.history()[1].role, Role::User);
        assert_eq!(session.history()[1].text, "what was it about?");
        assert_eq!(session.history()[2].role, Role::Model);
        assert_eq!(session.exchanges(), 1);
    }

    #[tokio::test]
    async fn failed_ask_leaves_history_untouched() {
        let client = MockModelClient::new().with_chat_failure();
        let mut session = ChatSession::new("transcript");

        let result = session.ask(&client, "hello?").await;

        assert!(result.is_err());
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.exchanges(), 0);
    }

    #[test]
    fn turns_round_trip_through_json() {
        let turn = ChatTurn {
            role: Role::Model,
            text: "hi".to_string(),
        };
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"model\""));
        let back: ChatTurn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, turn);
    }
}
