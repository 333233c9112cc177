/// Universal return type with a parametrizable payload
pub type UResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use crate::api::BotApi;
pub use crate::core::*;
pub use crate::errors::{ApiError, DispatchError};
pub use crate::filters::Filter;
pub use crate::logger::*;
pub use crate::types::*;
pub use slog::{crit, debug, error, info, o, warn};
