//! Client side of Hemicycle: HTTP transport, response cache, retry policy,
//! stale-response guard, and the sentiment queries built on top of them.

pub mod cache;
pub mod config;
pub mod error;
pub mod retry;
pub mod service;
pub mod transport;
pub mod view;

pub use cache::{CacheStats, ResponseCache};
pub use config::{ClientConfig, EndpointClass};
pub use error::ClientError;
pub use retry::{RetryPolicy, with_retry};
pub use service::{
    CategorySentimentReport, OverallSentiment, PartySentimentReport, PartyStanding,
    SentimentService,
};
pub use transport::{ApiRequest, HttpTransport, Method, Transport};
pub use view::{ErrorState, Ticket, ViewSlot, ViewState};
