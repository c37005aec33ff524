//! Scripted provider for tests and offline runs
//!
//! Replies are consumed from a queue; once the queue is empty the provider
//! keeps answering with its default reply.

use crate::error::{Error, FailureKind, Result};
use crate::transform::TextTransform;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One scripted reply
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Return the input text unchanged
    Echo,
    /// Return this text
    Text(String),
    /// Fail with this kind of error
    Fail(FailureKind),
}

/// A provider that answers from a script and records its calls
pub struct ScriptedProvider {
    name: String,
    queue: Mutex<VecDeque<Reply>>,
    default_reply: Reply,
    calls: AtomicUsize,
    instructions: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    /// A provider that echoes its input
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_default(name, Reply::Echo)
    }

    /// A provider that always fails with `kind`
    #[must_use]
    pub fn failing(name: impl Into<String>, kind: FailureKind) -> Self {
        Self::with_default(name, Reply::Fail(kind))
    }

    /// A provider that always returns `text`
    #[must_use]
    pub fn replying(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::with_default(name, Reply::Text(text.into()))
    }

    fn with_default(name: impl Into<String>, default_reply: Reply) -> Self {
        Self {
            name: name.into(),
            queue: Mutex::new(VecDeque::new()),
            default_reply,
            calls: AtomicUsize::new(0),
            instructions: Mutex::new(Vec::new()),
        }
    }

    /// Queue a text reply
    #[must_use]
    pub fn then_reply(self, text: impl Into<String>) -> Self {
        self.push(Reply::Text(text.into()));
        self
    }

    /// Queue a failure
    #[must_use]
    pub fn then_fail(self, kind: FailureKind) -> Self {
        self.push(Reply::Fail(kind));
        self
    }

    /// Add a reply to the queue
    pub fn push(&self, reply: Reply) {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
    }

    /// Number of `transform` calls so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Instructions received, in call order
    #[must_use]
    pub fn instructions(&self) -> Vec<String> {
        self.instructions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl TextTransform for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn transform(&self, text: &str, instruction: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.instructions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(instruction.to_string());

        let reply = self
            .queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());

        match reply {
            Reply::Echo => Ok(text.to_string()),
            Reply::Text(t) => Ok(t),
            Reply::Fail(kind) => Err(Error::of_kind(kind, &self.name)),
        }
    }
}
