use crate::error::TranscriptError;
use crate::traits::{ChatMessage, Role};
use serde::Serialize;
use std::collections::VecDeque;

/// The append-only transcript of a session.
///
/// Serializes as a plain JSON array of messages. Restoring goes through
/// [`Conversation::from_messages`] or [`Conversation::from_json`], both of
/// which check that every tool call is answered exactly once, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<ChatMessage>) -> Result<Self, TranscriptError> {
        validate(&messages)?;
        Ok(Self { messages })
    }

    pub fn from_json(json: &str) -> Result<Self, TranscriptError> {
        let messages: Vec<ChatMessage> = serde_json::from_str(json)?;
        Self::from_messages(messages)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn last_assistant(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }

    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.messages
    }

    pub(crate) fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}

fn validate(messages: &[ChatMessage]) -> Result<(), TranscriptError> {
    let mut open: VecDeque<&str> = VecDeque::new();

    for (index, message) in messages.iter().enumerate() {
        if message.role == Role::Tool {
            let id = message
                .tool_call_id
                .as_deref()
                .ok_or(TranscriptError::MissingToolCallId { index })?;

            match open.pop_front() {
                Some(expected) if expected == id => {}
                Some(expected) => {
                    return Err(TranscriptError::OutOfOrderToolReply {
                        index,
                        id: id.to_string(),
                        expected: expected.to_string(),
                    });
                }
                None => {
                    return Err(TranscriptError::OrphanToolReply {
                        index,
                        id: id.to_string(),
                    });
                }
            }
            continue;
        }

        if let Some(id) = open.front() {
            return Err(TranscriptError::UnansweredToolCall {
                index,
                id: id.to_string(),
            });
        }

        if message.tool_calls.is_some() && message.role != Role::Assistant {
            return Err(TranscriptError::MisplacedToolCalls { index });
        }

        open.extend(message.requested_tool_calls().iter().map(|c| c.id.as_str()));
    }

    match open.front() {
        Some(id) => Err(TranscriptError::UnansweredToolCall {
            index: messages.len(),
            id: id.to_string(),
        }),
        None => Ok(()),
    }
}
