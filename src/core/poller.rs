use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use slog::Logger;

use crate::errors::DispatchError;
use crate::prelude::*;
use crate::types::Update;

/// The narrow long-polling seam between the dispatcher and the transport.
///
/// Implemented by the bundled [`crate::api::BotApi`]; tests substitute
/// scripted doubles. The returned sequence is ordered by non-decreasing
/// `update_id`, which the remote service guarantees.
#[async_trait]
pub trait UpdatesProvider: Send + Sync {
    async fn fetch_updates(
        &self,
        offset: i64,
        limit: Option<i64>,
        timeout_secs: i64,
        allowed_updates: Option<&[String]>,
    ) -> UResult<Vec<Update>>;
}

/// Settings handed to every fetch round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptions {
    /// Long-poll timeout in seconds; the remote holds the connection open
    /// this long when no updates are pending.
    pub timeout_secs: i64,
    /// Maximum updates per batch; `None` leaves the server default.
    pub limit: Option<i64>,
    /// Update kinds to subscribe to; `None` means no restriction.
    pub allowed_updates: Option<Vec<String>>,
}

impl Default for PollOptions {
    fn default() -> Self {
        PollOptions {
            timeout_secs: 30,
            limit: None,
            allowed_updates: None,
        }
    }
}

/// Owner of the acknowledgement cursor.
///
/// The cursor starts at -1 ("no prior cursor") and is advanced past each
/// update as it is handed off for dispatch, so a batch interrupted midway
/// still makes forward progress on the next fetch.
pub struct UpdatePoller<B> {
    provider: Arc<B>,
    offset: AtomicI64,
    options: PollOptions,
    logger: Logger,
}

impl<B> UpdatePoller<B>
where
    B: UpdatesProvider,
{
    pub fn new(provider: Arc<B>, options: PollOptions, logger: Logger) -> Self {
        UpdatePoller {
            provider,
            offset: AtomicI64::new(-1),
            options,
            logger,
        }
    }

    /// Smallest update id not yet acknowledged as consumed.
    pub fn offset(&self) -> i64 {
        self.offset.load(Ordering::SeqCst)
    }

    /// Acknowledge one consumed update. `fetch_max` keeps the cursor
    /// monotone even against replayed or out-of-order ids.
    pub fn advance_past(&self, update_id: i64) {
        self.offset.fetch_max(update_id + 1, Ordering::SeqCst);
    }

    /// One network round trip. Zero updates is a normal outcome of an
    /// expired long poll, not an error.
    pub async fn next_batch(&self) -> Result<Vec<Update>, DispatchError> {
        let offset = self.offset();
        match self
            .provider
            .fetch_updates(
                offset,
                self.options.limit,
                self.options.timeout_secs,
                self.options.allowed_updates.as_deref(),
            )
            .await
        {
            Ok(updates) => {
                debug!(self.logger, "fetched update batch";
                    "count" => updates.len(),
                    "offset" => offset,
                );
                Ok(updates)
            }
            Err(why) => Err(DispatchError::FetchFailure(why)),
        }
    }
}
