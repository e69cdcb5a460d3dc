//! Scripted completion client for tests.
//!
//! Responses are queued per schema name. The last queued response for a
//! schema repeats once the queue is down to one entry, so a single scripted
//! answer serves any number of calls. Every request is recorded.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{CompletionClient, CompletionRequest};
use crate::error::LlmError;

#[derive(Debug, Clone)]
enum Scripted {
    Respond(Value),
    Fail(String),
}

#[derive(Debug, Default)]
pub struct ScriptedCompletion {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `output` as the next answer for `schema_name`.
    #[must_use]
    pub fn with_response(self, schema_name: &str, output: Value) -> Self {
        self.push(schema_name, Scripted::Respond(output));
        self
    }

    /// Queue a server error as the next answer for `schema_name`.
    #[must_use]
    pub fn with_failure(self, schema_name: &str, message: &str) -> Self {
        self.push(schema_name, Scripted::Fail(message.to_string()));
        self
    }

    fn push(&self, schema_name: &str, entry: Scripted) {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(schema_name.to_string())
            .or_default()
            .push_back(entry);
    }

    /// Every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Requests bound to `schema_name`.
    pub fn calls_for(&self, schema_name: &str) -> Vec<CompletionRequest> {
        self.calls()
            .into_iter()
            .filter(|c| c.schema_name == schema_name)
            .collect()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, LlmError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let next = {
            let mut scripts = self.scripts.lock().unwrap_or_else(PoisonError::into_inner);
            scripts.get_mut(&request.schema_name).and_then(|queue| {
                if queue.len() > 1 {
                    queue.pop_front()
                } else {
                    queue.front().cloned()
                }
            })
        };

        match next {
            Some(Scripted::Respond(value)) => Ok(value),
            Some(Scripted::Fail(message)) => Err(LlmError::Api {
                status: 500,
                message,
            }),
            None => Err(LlmError::Api {
                status: 404,
                message: format!("no scripted response for {}", request.schema_name),
            }),
        }
    }
}
