use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::DispatchError;
use crate::filters::Filter;
use crate::prelude::UResult;
use crate::types::{CallbackQuery, Message};

/// Application logic invoked for a matching message update.
///
/// `B` is the bot handle handed to every invocation; the bundled client is
/// [`crate::api::BotApi`], tests substitute their own.
#[async_trait]
pub trait MessageHandler<B>: Send + Sync
where
    B: Send + Sync,
{
    async fn handle(&self, bot: Arc<B>, message: Message) -> UResult;
}

/// Application logic invoked for a matching callback query.
#[async_trait]
pub trait CallbackHandler<B>: Send + Sync
where
    B: Send + Sync,
{
    async fn handle(&self, bot: Arc<B>, query: CallbackQuery) -> UResult;
}

#[async_trait]
impl<B, F, Fut> MessageHandler<B> for F
where
    B: Send + Sync + 'static,
    F: Fn(Arc<B>, Message) -> Fut + Send + Sync,
    Fut: Future<Output = UResult> + Send + 'static,
{
    async fn handle(&self, bot: Arc<B>, message: Message) -> UResult {
        self(bot, message).await
    }
}

#[async_trait]
impl<B, F, Fut> CallbackHandler<B> for F
where
    B: Send + Sync + 'static,
    F: Fn(Arc<B>, CallbackQuery) -> Fut + Send + Sync,
    Fut: Future<Output = UResult> + Send + 'static,
{
    async fn handle(&self, bot: Arc<B>, query: CallbackQuery) -> UResult {
        self(bot, query).await
    }
}

pub(crate) struct MessageEntry<B> {
    pub filter: Filter,
    pub function: Arc<dyn MessageHandler<B>>,
}

pub(crate) struct CallbackEntry<B> {
    pub filter: Filter,
    pub function: Arc<dyn CallbackHandler<B>>,
}

/// Ordered collections of (filter, handler) pairs, one per payload kind.
///
/// Registration is append-only and happens before dispatch starts; the
/// registration order is the evaluation order, and every match fires.
pub struct HandlerRegistry<B> {
    message_handlers: Vec<MessageEntry<B>>,
    callback_handlers: Vec<CallbackEntry<B>>,
}

impl<B> Default for HandlerRegistry<B> {
    fn default() -> Self {
        HandlerRegistry {
            message_handlers: Vec::new(),
            callback_handlers: Vec::new(),
        }
    }
}

impl<B> HandlerRegistry<B>
where
    B: Send + Sync,
{
    pub fn new() -> Self {
        Default::default()
    }

    /// Append a message handler. Rejects an absent function, leaving the
    /// registry untouched; this is the only checked registration error.
    pub fn register_message(
        &mut self,
        function: Option<Arc<dyn MessageHandler<B>>>,
        filter: Filter,
    ) -> Result<(), DispatchError> {
        match function {
            Some(function) => {
                self.message_handlers.push(MessageEntry { filter, function });
                Ok(())
            }
            None => Err(DispatchError::InvalidHandler),
        }
    }

    /// Append a callback handler. Same contract as [`Self::register_message`].
    pub fn register_callback(
        &mut self,
        function: Option<Arc<dyn CallbackHandler<B>>>,
        filter: Filter,
    ) -> Result<(), DispatchError> {
        match function {
            Some(function) => {
                self.callback_handlers.push(CallbackEntry { filter, function });
                Ok(())
            }
            None => Err(DispatchError::InvalidHandler),
        }
    }

    pub fn message_handler_count(&self) -> usize {
        self.message_handlers.len()
    }

    pub fn callback_handler_count(&self) -> usize {
        self.callback_handlers.len()
    }

    pub(crate) fn message_handlers(&self) -> &[MessageEntry<B>] {
        &self.message_handlers
    }

    pub(crate) fn callback_handlers(&self) -> &[CallbackEntry<B>] {
        &self.callback_handlers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn noop(_bot: Arc<()>, _message: Message) -> UResult {
        Ok(())
    }

    #[test]
    fn registration_preserves_order() {
        let mut registry: HandlerRegistry<()> = HandlerRegistry::new();
        registry
            .register_message(Some(Arc::new(noop)), Filter::command("start"))
            .unwrap();
        registry
            .register_message(Some(Arc::new(noop)), Filter::All)
            .unwrap();

        let filters: Vec<_> = registry
            .message_handlers()
            .iter()
            .map(|entry| entry.filter.clone())
            .collect();
        assert_eq!(filters, vec![Filter::command("start"), Filter::All]);
    }

    #[test]
    fn absent_function_is_rejected_without_side_effects() {
        let mut registry: HandlerRegistry<()> = HandlerRegistry::new();
        let result = registry.register_message(None, Filter::All);
        assert!(matches!(result, Err(DispatchError::InvalidHandler)));
        assert_eq!(registry.message_handler_count(), 0);

        let result = registry.register_callback(None, Filter::All);
        assert!(matches!(result, Err(DispatchError::InvalidHandler)));
        assert_eq!(registry.callback_handler_count(), 0);
    }

    #[tokio::test]
    async fn closures_and_async_fns_both_register() {
        let mut registry: HandlerRegistry<()> = HandlerRegistry::new();
        registry
            .register_message(Some(Arc::new(noop)), Filter::All)
            .unwrap();
        registry
            .register_callback(
                Some(Arc::new(|_bot: Arc<()>, _query: CallbackQuery| async move {
                    Ok(())
                })),
                Filter::callback_data("^ping$"),
            )
            .unwrap();
        assert_eq!(registry.message_handler_count(), 1);
        assert_eq!(registry.callback_handler_count(), 1);

        let message: Message = serde_json::from_value(json!({
            "message_id": 1,
            "date": 0,
            "chat": {"id": 1, "type": "private"}
        }))
        .unwrap();
        let entry = &registry.message_handlers()[0];
        entry
            .function
            .handle(Arc::new(()), message)
            .await
            .unwrap();
    }
}
