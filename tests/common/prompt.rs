//! Password prompt that answers from a script instead of a terminal

use async_trait::async_trait;
use booklist::PasswordPrompt;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued answers; an exhausted script behaves like a declined prompt.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Option<String>>>,
    asked: Mutex<usize>,
    errors: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answers with `password`.
    pub fn answering(password: &str, times: usize) -> Self {
        let prompt = Self::new();
        for _ in 0..times {
            prompt.push(Some(password));
        }
        prompt
    }

    pub fn push(&self, answer: Option<&str>) {
        self.answers
            .lock()
            .unwrap()
            .push_back(answer.map(str::to_string));
    }

    pub fn times_asked(&self) -> usize {
        *self.asked.lock().unwrap()
    }

    pub fn reported_errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

#[async_trait]
impl PasswordPrompt for ScriptedPrompt {
    async fn request_password(&self) -> Option<String> {
        *self.asked.lock().unwrap() += 1;
        self.answers.lock().unwrap().pop_front().flatten()
    }

    fn report_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}
