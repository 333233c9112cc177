//! Thin HTTP binding to the Telegram Bot API.
//!
//! Only the handful of methods the dispatcher and the demo bots need are
//! wrapped; everything else can go through [`BotApi::call`] directly.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use slog::Logger;

use crate::core::UpdatesProvider;
use crate::errors::ApiError;
use crate::logger::configure_discard_root;
use crate::prelude::UResult;
use crate::types::{InlineKeyboardMarkup, Message, Update, User};

pub const DEFAULT_API_ROOT: &str = "https://api.telegram.org";

/// The client waits out the server-side long poll plus a margin for
/// transport latency before giving up on a request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Remote method call envelope: `result` is present iff `ok` is true,
/// the error pair iff it is false.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i64>,
    description: Option<String>,
}

/// HTTP client bound to a single bot token
pub struct BotApi {
    client: reqwest::Client,
    base_url: String,
    logger: Logger,
}

/// Builder type for configuring and instantiating an API client
#[derive(Default)]
pub struct BotApiBuilder {
    token: Option<String>,
    api_root: Option<String>,
    logger: Option<Logger>,
}

impl BotApiBuilder {
    /// Set the bot token issued by BotFather
    pub fn token(self, token: &str) -> Self {
        Self {
            token: Some(token.to_owned()),
            ..self
        }
    }

    /// Point the client at a non-default server, e.g. a local
    /// Bot API instance
    pub fn api_root(self, api_root: &str) -> Self {
        Self {
            api_root: Some(api_root.to_owned()),
            ..self
        }
    }

    /// Set the client's logger
    pub fn logger(self, logger: Logger) -> Self {
        Self {
            logger: Some(logger),
            ..self
        }
    }

    /// Finalize the instantiation of an API client
    pub fn build(self) -> UResult<BotApi> {
        let token = self.token.ok_or("Did not provide a token for BotApiBuilder")?;
        let api_root = self
            .api_root
            .unwrap_or_else(|| DEFAULT_API_ROOT.to_owned());
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(BotApi {
            client,
            base_url: format!("{}/bot{}", api_root, token),
            logger: self.logger.unwrap_or_else(configure_discard_root),
        })
    }
}

/// Parameters of a `getUpdates` call
#[derive(Debug, Default, Serialize)]
pub struct GetUpdatesOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_updates: Option<Vec<String>>,
}

/// Optional parameters of a `sendMessage` call
#[derive(Debug, Default, Serialize)]
pub struct SendMessageOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(flatten)]
    opts: &'a SendMessageOpts,
}

#[derive(Serialize)]
struct AnswerCallbackQueryRequest<'a> {
    callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    show_alert: bool,
}

impl BotApi {
    /// Instantiate a new API client through its builder
    pub fn new() -> BotApiBuilder {
        Default::default()
    }

    /// Invoke an arbitrary remote method and unwrap its envelope
    pub async fn call<P, T>(&self, method: &'static str, params: &P) -> Result<T, ApiError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(params)
            .send()
            .await
            .map_err(|source| ApiError::Transport { method, source })?;
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|source| ApiError::Decode { method, source })?;
        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                error_code,
                description,
                ..
            } => {
                let code = error_code.unwrap_or_default();
                let description = description.unwrap_or_default();
                slog::warn!(self.logger, "remote method rejected";
                    "method" => method,
                    "code" => code,
                );
                Err(ApiError::Rejected {
                    method,
                    code,
                    description,
                })
            }
        }
    }

    pub async fn get_me(&self) -> Result<User, ApiError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    pub async fn get_updates(&self, opts: &GetUpdatesOpts) -> Result<Vec<Update>, ApiError> {
        self.call("getUpdates", opts).await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        opts: Option<&SendMessageOpts>,
    ) -> Result<Message, ApiError> {
        static NO_OPTS: SendMessageOpts = SendMessageOpts {
            parse_mode: None,
            reply_to_message_id: None,
            reply_markup: None,
        };
        let request = SendMessageRequest {
            chat_id,
            text,
            opts: opts.unwrap_or(&NO_OPTS),
        };
        self.call("sendMessage", &request).await
    }

    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<bool, ApiError> {
        let request = AnswerCallbackQueryRequest {
            callback_query_id,
            text,
            show_alert,
        };
        self.call("answerCallbackQuery", &request).await
    }
}

#[async_trait]
impl UpdatesProvider for BotApi {
    async fn fetch_updates(
        &self,
        offset: i64,
        limit: Option<i64>,
        timeout_secs: i64,
        allowed_updates: Option<&[String]>,
    ) -> UResult<Vec<Update>> {
        let opts = GetUpdatesOpts {
            offset: Some(offset),
            limit,
            timeout: Some(timeout_secs),
            allowed_updates: allowed_updates.map(<[String]>::to_vec),
        };
        let updates = self.get_updates(&opts).await?;
        Ok(updates)
    }
}
