//! Blocking-style user prompts expressed as cancellable request/response steps.

use std::{cell::RefCell, collections::VecDeque, future::Future, pin::Pin, rc::Rc};

/// Object-safe boxed future used by [`DialogService`].
pub type DialogFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service that asks the user for a value or a confirmation.
pub trait DialogService {
    /// Asks for a line of text. `None` means the user cancelled.
    fn prompt<'a>(&'a self, message: &'a str) -> DialogFuture<'a, Option<String>>;

    /// Asks the user to confirm an action.
    fn confirm<'a>(&'a self, message: &'a str) -> DialogFuture<'a, bool>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Dialog service for hosts without interactive prompts; every question is cancelled.
pub struct NoopDialogService;

impl DialogService for NoopDialogService {
    fn prompt<'a>(&'a self, _message: &'a str) -> DialogFuture<'a, Option<String>> {
        Box::pin(async { None })
    }

    fn confirm<'a>(&'a self, _message: &'a str) -> DialogFuture<'a, bool> {
        Box::pin(async { false })
    }
}

#[derive(Debug, Default)]
struct ScriptedAnswers {
    prompts: VecDeque<Option<String>>,
    confirms: VecDeque<bool>,
    asked: Vec<String>,
}

#[derive(Debug, Clone, Default)]
/// Dialog service answering from queued scripted responses.
///
/// Unscripted prompts are cancelled and unscripted confirmations are declined.
pub struct ScriptedDialogService {
    inner: Rc<RefCell<ScriptedAnswers>>,
}

impl ScriptedDialogService {
    /// Queues the answer for the next prompt.
    pub fn answer_prompt(&self, answer: Option<&str>) -> &Self {
        self.inner
            .borrow_mut()
            .prompts
            .push_back(answer.map(str::to_string));
        self
    }

    /// Queues the answer for the next confirmation.
    pub fn answer_confirm(&self, accept: bool) -> &Self {
        self.inner.borrow_mut().confirms.push_back(accept);
        self
    }

    /// Returns every question asked so far.
    pub fn asked(&self) -> Vec<String> {
        self.inner.borrow().asked.clone()
    }
}

impl DialogService for ScriptedDialogService {
    fn prompt<'a>(&'a self, message: &'a str) -> DialogFuture<'a, Option<String>> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.asked.push(message.to_string());
            inner.prompts.pop_front().flatten()
        })
    }

    fn confirm<'a>(&'a self, message: &'a str) -> DialogFuture<'a, bool> {
        Box::pin(async move {
            let mut inner = self.inner.borrow_mut();
            inner.asked.push(message.to_string());
            inner.confirms.pop_front().unwrap_or(false)
        })
    }
}
