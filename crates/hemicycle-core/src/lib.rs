//! Core types shared across Hemicycle: parliamentary records, payload
//! normalisation, and query filters.

pub mod model;
pub mod normalize;
pub mod query;

pub use model::{
    ActivityCounts, Bill, BillSentimentSummary, CategoryBreakdown, MemberSummary, PartyProfile,
    PartyShare, RefreshAck, SentimentSummary, Session, Speaker, SpeakerRef, Statement,
    TimelinePoint, parse_timestamp,
};
pub use normalize::{NormalizedList, decode_items, decode_list, normalize};
pub use query::{ListingQuery, Query, SentimentFilters, TimeRange, cache_key, canonical_json};
