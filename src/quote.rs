//! The daily-quote service: a read-only HTTP endpoint returning a JSON
//! object with `from` and `hitokoto` fields. The fetch is best-effort; the
//! caller swallows failures and leaves the page's quote slot unchanged.

use std::fmt;

use serde::Deserialize;
use url::Url;

/// A quote as returned by the service.
#[derive(Clone, Debug, Deserialize)]
pub struct Quote {
    /// The source the quote is from.
    pub from: String,

    /// The quote text.
    pub hitokoto: String,
}

impl Quote {
    /// Renders the quote the way the page displays it: `「source」text`.
    pub fn display_text(&self) -> String {
        format!("「{}」{}", self.from, self.hitokoto)
    }
}

/// The seam between the filter controller and the quote backend. Tests
/// substitute a canned implementation here.
pub trait QuoteService {
    /// Fetches today's quote. No retry.
    fn daily_quote(&self) -> Result<Quote>;
}

/// The production [`QuoteService`]: a blocking GET against the configured
/// endpoint.
pub struct HttpQuoteService {
    endpoint: Url,
    client: reqwest::blocking::Client,
}

impl HttpQuoteService {
    /// Builds a service against `endpoint` (e.g. `https://v1.hitokoto.cn/`).
    pub fn new(endpoint: Url) -> HttpQuoteService {
        HttpQuoteService {
            endpoint,
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl QuoteService for HttpQuoteService {
    fn daily_quote(&self) -> Result<Quote> {
        let quote = self
            .client
            .get(self.endpoint.clone())
            .send()?
            .error_for_status()?
            .json()?;
        Ok(quote)
    }
}

/// The result of a quote fetch.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failed quote fetch.
#[derive(Debug)]
pub enum Error {
    /// Returned when the HTTP request or JSON decoding fails.
    Http(reqwest::Error),

    /// Returned by non-HTTP service implementations.
    Unavailable(String),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Http(err) => err.fmt(f),
            Error::Unavailable(reason) => reason.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Http(err) => Some(err),
            Error::Unavailable(_) => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    /// Converts a [`reqwest::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator in the HTTP implementation.
    fn from(err: reqwest::Error) -> Error {
        Error::Http(err)
    }
}
