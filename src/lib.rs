//! polligram — a long-polling update dispatcher for Telegram bots.
//!
//! The crate polls `getUpdates`, classifies every incoming update against the
//! registered [`filters::Filter`]s and spawns an independent task for each
//! handler whose filter matches. The poll loop itself never waits on a
//! handler.
//!
//! ```no_run
//! use polligram::prelude::*;
//! use std::sync::Arc;
//!
//! async fn echo(bot: Arc<BotApi>, message: Message) -> UResult {
//!     if let Some(ref text) = message.text {
//!         bot.send_message(message.chat.id, text, None).await?;
//!     }
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> UResult {
//!     let logger = configure_term_root();
//!     let bot = Arc::new(
//!         BotApi::new()
//!             .token(&std::env::var("POLLIGRAM_TG_TOKEN")?)
//!             .logger(logger.clone())
//!             .build()?,
//!     );
//!     let mut dispatcher = Dispatcher::new()
//!         .bot(bot)
//!         .logger(logger)
//!         .build();
//!     dispatcher.add_message_handler(Some(Arc::new(echo)), Filter::All)?;
//!
//!     let dispatcher = Arc::new(dispatcher);
//!     dispatcher.start();
//!     dispatcher.run_until_stopped().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod core;
pub mod errors;
pub mod filters;
pub mod logger;
pub mod prelude;
pub mod types;
