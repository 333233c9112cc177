use thiserror::Error;

/// Errors surfaced by the dispatcher itself.
///
/// Handler errors are deliberately absent: a failing handler is invisible to
/// the dispatch loop and must report through its own channels.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// An absent handler function was passed to a registration call.
    #[error("cannot register an absent handler function")]
    InvalidHandler,

    /// The long-polling fetch failed; the poll loop terminates with this.
    #[error("update fetch failed")]
    FetchFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors produced by the bundled Bot API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport failure while calling {method}")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not decode the {method} response")]
    Decode {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The remote answered with `ok = false`.
    #[error("{method} rejected by the api (code {code}): {description}")]
    Rejected {
        method: &'static str,
        code: i64,
        description: String,
    },
}
