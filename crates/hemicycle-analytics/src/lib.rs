//! Sentiment analytics: grouped statistics, rankings, breakdowns, and the
//! score-to-colour scale used by every presentation surface.

pub mod aggregate;
pub mod scale;

pub use aggregate::{
    Dimension, Granularity, GroupStats, KeywordStat, aggregate, category_breakdowns, display_pct,
    enrich_profile, filter_statements, group_by, keyword_frequencies, party_shares, rank,
    recent_statements, summarize, timeline, top_members,
};
pub use scale::{NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD, Rgb, Sentiment, classify, color_of};
