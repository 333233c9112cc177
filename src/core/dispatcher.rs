use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use slog::Logger;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::core::handler::{CallbackHandler, HandlerRegistry, MessageHandler};
use crate::core::poller::{PollOptions, UpdatePoller, UpdatesProvider};
use crate::errors::DispatchError;
use crate::filters::Filter;
use crate::prelude::*;
use crate::types::{CallbackQuery, Message, Update};

/// Composition of the poller and the handler registry.
///
/// Handlers are registered before [`Dispatcher::start`] spawns the poll
/// loop; from then on the dispatcher is shared behind an `Arc` and every
/// filter match runs as its own fire-and-forget task.
pub struct Dispatcher<B> {
    bot: Arc<B>,
    poller: UpdatePoller<B>,
    registry: HandlerRegistry<B>,
    running: AtomicBool,
    shutdown: Notify,
    logger: Logger,
}

/// Builder type for configuring and instantiating a dispatcher
pub struct DispatcherBuilder<B> {
    bot: Option<Arc<B>>,
    logger: Option<Logger>,
    options: PollOptions,
}

impl<B> Default for DispatcherBuilder<B> {
    fn default() -> Self {
        DispatcherBuilder {
            bot: None,
            logger: None,
            options: PollOptions::default(),
        }
    }
}

impl<B> DispatcherBuilder<B>
where
    B: UpdatesProvider,
{
    /// Set the bot handle, which doubles as the updates provider
    pub fn bot(self, bot: Arc<B>) -> Self {
        Self {
            bot: Some(bot),
            ..self
        }
    }

    /// Set the dispatcher's logger
    pub fn logger(self, logger: Logger) -> Self {
        Self {
            logger: Some(logger),
            ..self
        }
    }

    /// Override the default long-polling settings
    pub fn poll_options(self, options: PollOptions) -> Self {
        Self { options, ..self }
    }

    /// Finalize the instantiation of a dispatcher
    pub fn build(self) -> Dispatcher<B> {
        let bot = self
            .bot
            .expect("Did not provide a bot handle for DispatcherBuilder");
        let logger = self
            .logger
            .expect("Did not provide a logger for DispatcherBuilder");
        Dispatcher {
            poller: UpdatePoller::new(bot.clone(), self.options, logger.clone()),
            registry: HandlerRegistry::new(),
            running: AtomicBool::new(false),
            shutdown: Notify::new(),
            bot,
            logger,
        }
    }
}

impl<B> Dispatcher<B>
where
    B: UpdatesProvider + 'static,
{
    /// Instantiate a new dispatcher through its builder
    pub fn new() -> DispatcherBuilder<B> {
        Default::default()
    }

    /// Register a handler for message-shaped payloads. Fails with
    /// [`DispatchError::InvalidHandler`] iff the function is absent.
    pub fn add_message_handler(
        &mut self,
        function: Option<Arc<dyn MessageHandler<B>>>,
        filter: Filter,
    ) -> Result<(), DispatchError> {
        self.registry.register_message(function, filter)
    }

    /// Register a handler for callback-shaped payloads. Same contract as
    /// [`Self::add_message_handler`].
    pub fn add_callback_handler(
        &mut self,
        function: Option<Arc<dyn CallbackHandler<B>>>,
        filter: Filter,
    ) -> Result<(), DispatchError> {
        self.registry.register_callback(function, filter)
    }

    pub fn registry(&self) -> &HandlerRegistry<B> {
        &self.registry
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawn the poll loop. The loop stops on [`Self::stop`] at the next
    /// iteration boundary, or terminates with an error when a fetch fails.
    /// Calling `start` twice on a running dispatcher is unspecified.
    pub fn start(self: &Arc<Self>) -> JoinHandle<Result<(), DispatchError>> {
        self.running.store(true, Ordering::SeqCst);
        info!(self.logger, "starting update poll loop";
            "offset" => self.poller.offset(),
        );
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.poll_loop().await })
    }

    /// Request the poll loop to stop and wake every
    /// [`Self::run_until_stopped`] waiter. An in-flight fetch call and any
    /// running handlers are not interrupted.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.shutdown.notify_waiters();
        info!(self.logger, "dispatcher stop requested");
    }

    /// Park the caller until the dispatcher stops running, either through
    /// [`Self::stop`] or because polling terminated on a fetch failure.
    pub async fn run_until_stopped(&self) {
        loop {
            let stopped = self.shutdown.notified();
            if !self.is_running() {
                return;
            }
            stopped.await;
        }
    }

    /// Start polling and block until stopped.
    pub async fn run(self: &Arc<Self>) {
        let _poll_task = self.start();
        self.run_until_stopped().await;
        self.stop();
    }

    async fn poll_loop(&self) -> Result<(), DispatchError> {
        while self.is_running() {
            let updates = match self.poller.next_batch().await {
                Ok(updates) => updates,
                Err(why) => {
                    crit!(self.logger, "update fetch failed, polling terminated";
                        "reason" => why.to_string(),
                    );
                    self.running.store(false, Ordering::SeqCst);
                    self.shutdown.notify_waiters();
                    return Err(why);
                }
            };
            for update in updates {
                let update_id = update.update_id;
                self.dispatch_update(update);
                self.poller.advance_past(update_id);
            }
        }
        Ok(())
    }

    /// Route one update to every matching handler of its payload kind.
    ///
    /// Each match is spawned as an independent task receiving the bot
    /// handle and an owned clone of the payload; this method never waits
    /// for any of them. An update carrying neither payload kind is dropped
    /// without error. Handler outcomes, failures included, are invisible
    /// here: one handler must not stall delivery to the others.
    pub fn dispatch_update(&self, update: Update) {
        if let Some(message) = update.message {
            self.dispatch_message(message);
        }
        if let Some(query) = update.callback_query {
            self.dispatch_callback(query);
        }
    }

    fn dispatch_message(&self, message: Message) {
        for entry in self.registry.message_handlers() {
            if entry.filter.check_message(&message) {
                let bot = self.bot.clone();
                let function = entry.function.clone();
                let message = message.clone();
                tokio::spawn(async move {
                    let _ = function.handle(bot, message).await;
                });
            }
        }
    }

    fn dispatch_callback(&self, query: CallbackQuery) {
        for entry in self.registry.callback_handlers() {
            if entry.filter.check_callback(&query) {
                let bot = self.bot.clone();
                let function = entry.function.clone();
                let query = query.clone();
                tokio::spawn(async move {
                    let _ = function.handle(bot, query).await;
                });
            }
        }
    }
}
