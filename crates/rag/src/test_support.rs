//! Shared test doubles for pipeline tests.

use crate::types::Category;
use crate::vector::{IndexMatch, VectorIndex};
use lexrag_core::{AppError, AppResult};
use lexrag_llm::{ChatMessage, LlmClient};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted LLM client: returns queued replies in order and records every
/// chat call. An exhausted script yields a provider error.
pub struct MockLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub chat_calls: Mutex<Vec<Vec<ChatMessage>>>,
    fail_embed: bool,
}

impl MockLlm {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            chat_calls: Mutex::new(Vec::new()),
            fail_embed: false,
        }
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
        self
    }

    pub fn reply_err(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn failing_embed(mut self) -> Self {
        self.fail_embed = true;
        self
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlm {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        _temperature: f32,
        _max_tokens: u32,
    ) -> AppResult<String> {
        self.chat_calls.lock().unwrap().push(messages.to_vec());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(AppError::Provider(message)),
            None => Err(AppError::Provider("mock: no scripted reply".to_string())),
        }
    }

    async fn embed(&self, _text: &str) -> AppResult<Vec<f32>> {
        if self.fail_embed {
            return Err(AppError::Provider("mock: embed failure".to_string()));
        }
        Ok(vec![0.1; lexrag_llm::LOCAL_EMBEDDING_DIM])
    }
}

/// Scripted vector index: fixed matches or a hard failure, recording the
/// category filter of the last query.
pub struct MockIndex {
    matches: Vec<IndexMatch>,
    fail: bool,
    pub last_filter: Mutex<Option<Option<Category>>>,
}

impl MockIndex {
    pub fn with_matches(matches: Vec<IndexMatch>) -> Self {
        Self {
            matches,
            fail: false,
            last_filter: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            matches: Vec::new(),
            fail: true,
            last_filter: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl VectorIndex for MockIndex {
    async fn query(
        &self,
        _vector: &[f32],
        _top_k: usize,
        category: Option<Category>,
    ) -> AppResult<Vec<IndexMatch>> {
        *self.last_filter.lock().unwrap() = Some(category);
        if self.fail {
            return Err(AppError::Index("mock: index unreachable".to_string()));
        }
        Ok(self.matches.clone())
    }
}

/// Build an index match with default citation fields.
pub fn index_match(score: f32, text: &str) -> IndexMatch {
    IndexMatch {
        score,
        text: text.to_string(),
        law: "D.S. 003-97-TR".to_string(),
        article: "Artículo 38".to_string(),
    }
}
