//! Sentiment queries over the parliamentary backend.
//!
//! Every fetch goes through the shared [`ResponseCache`]; payloads are
//! normalised before they are cached and decoded after, so a shape mismatch
//! yields empty data instead of an error. Composite views issue their
//! sub-fetches concurrently and fail as a whole if any of them fails.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::try_join;
use hemicycle_analytics::{
    Dimension, GroupStats, KeywordStat, category_breakdowns, enrich_profile, filter_statements,
    group_by, keyword_frequencies, party_shares, rank, summarize, timeline,
};
use hemicycle_core::{
    ActivityCounts, Bill, BillSentimentSummary, CategoryBreakdown, ListingQuery, PartyProfile,
    Query, RefreshAck, SentimentFilters, SentimentSummary, Session, Speaker, Statement,
    TimeRange, TimelinePoint, cache_key, decode_items, decode_list, normalize,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::{
    ApiRequest, ClientConfig, ClientError, EndpointClass, HttpTransport, ResponseCache, Transport,
    with_retry,
};

const SESSIONS: &str = "/api/sessions/";
const BILLS: &str = "/api/bills/";
const SPEAKERS: &str = "/api/speakers/";
const PARTIES: &str = "/api/parties/";
const STATEMENTS: &str = "/api/statements/";
const CATEGORIES: &str = "/api/categories/";
const OVERALL: &str = "/api/analytics/overall/";
const REFRESH: &str = "/api/refresh/";

/// Keywords listed in the category report.
pub const KEYWORD_LIMIT: usize = 10;
/// Categories listed on the landing page.
pub const TOP_CATEGORIES: usize = 5;

fn bill_path(id: &str) -> String {
    format!("{BILLS}{}/", id.trim())
}

// ── View models ──

/// One party's position in the ranking.
#[derive(Debug, Clone, Serialize)]
pub struct PartyStanding {
    /// 1-based.
    pub rank: usize,
    pub stats: GroupStats,
    pub profile: PartyProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartySentimentReport {
    pub time_range: TimeRange,
    pub generated_at: DateTime<Utc>,
    /// Statements left after filtering.
    pub statement_count: usize,
    pub parties: Vec<PartyStanding>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySentimentReport {
    pub time_range: TimeRange,
    pub summary: SentimentSummary,
    pub categories: Vec<CategoryBreakdown>,
    pub keywords: Vec<KeywordStat>,
}

/// Landing-page overview.
#[derive(Debug, Clone, Serialize)]
pub struct OverallSentiment {
    pub time_range: TimeRange,
    pub activity: ActivityCounts,
    pub summary: SentimentSummary,
    pub party_ranking: Vec<GroupStats>,
    pub top_categories: Vec<GroupStats>,
    pub timeline: Vec<TimelinePoint>,
}

// ── Service ──

pub struct SentimentService {
    transport: Arc<dyn Transport>,
    cache: Arc<ResponseCache>,
    config: ClientConfig,
}

impl SentimentService {
    /// HTTP-backed service with a fresh cache sized from `config`.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::from_config(&config)?;
        let cache = Arc::new(ResponseCache::new(config.cache_capacity));
        Ok(Self::with_transport(config, Arc::new(transport), cache))
    }

    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        cache: Arc<ResponseCache>,
    ) -> Self {
        Self {
            transport,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn fetch_list(
        &self,
        path: &str,
        class: EndpointClass,
        query: &Query,
    ) -> Result<Vec<Value>, ClientError> {
        let key = cache_key(path, query);
        if let Some(items) = self.cache.get(&key, self.config.ttl_for(class)) {
            debug!(key = %key, "cache hit");
            return Ok(items);
        }
        let payload = self
            .transport
            .request(&ApiRequest::get(path, query.clone()))
            .await?;
        let items = normalize(&payload).items;
        debug!(key = %key, items = items.len(), "cached response");
        self.cache.put(key, items.clone());
        Ok(items)
    }

    async fn fetch_records<T: DeserializeOwned>(
        &self,
        path: &str,
        class: EndpointClass,
        query: &Query,
    ) -> Result<Vec<T>, ClientError> {
        let items = self.fetch_list(path, class, query).await?;
        Ok(decode_items(&items))
    }

    /// First decodable record, or the default when there is none.
    async fn fetch_one<T: DeserializeOwned + Default>(
        &self,
        path: &str,
        class: EndpointClass,
        query: &Query,
    ) -> Result<T, ClientError> {
        let records: Vec<T> = self.fetch_records(path, class, query).await?;
        Ok(records.into_iter().next().unwrap_or_default())
    }

    // ── Sentiment views ──

    /// Parties ranked by sentiment under `filters`, with enriched profiles.
    pub async fn fetch_party_sentiment(
        &self,
        filters: &SentimentFilters,
    ) -> Result<PartySentimentReport, ClientError> {
        let query = filters.to_query();
        let unfiltered = Query::new();
        let (statements, profiles) = try_join!(
            self.fetch_records::<Statement>(STATEMENTS, EndpointClass::Statements, &query),
            self.fetch_records::<PartyProfile>(PARTIES, EndpointClass::Reference, &unfiltered),
        )?;
        let report = build_party_report(&statements, &profiles, filters, Utc::now());
        info!(
            time_range = %filters.time_range,
            statements = report.statement_count,
            parties = report.parties.len(),
            "party sentiment ready"
        );
        Ok(report)
    }

    /// Category breakdowns, overall summary, and keyword ranking under `filters`.
    pub async fn fetch_category_sentiment(
        &self,
        filters: &SentimentFilters,
    ) -> Result<CategorySentimentReport, ClientError> {
        let statements: Vec<Statement> = self
            .fetch_records(STATEMENTS, EndpointClass::Statements, &filters.to_query())
            .await?;
        let report = build_category_report(&statements, filters, Utc::now());
        info!(
            time_range = %filters.time_range,
            categories = report.categories.len(),
            "category sentiment ready"
        );
        Ok(report)
    }

    /// Summary, party split, and timeline for one bill.
    pub async fn fetch_bill_sentiment(
        &self,
        id: &str,
    ) -> Result<BillSentimentSummary, ClientError> {
        let id = id.trim();
        let path = bill_path(id);
        let unfiltered = Query::new();
        let by_bill = Query::new().with("bill", id);
        let (bills, statements) = try_join!(
            self.fetch_records::<Bill>(&path, EndpointClass::Listing, &unfiltered),
            self.fetch_records::<Statement>(STATEMENTS, EndpointClass::Statements, &by_bill),
        )?;
        let bill = bills.into_iter().next().unwrap_or_else(|| Bill {
            id: id.to_string(),
            title: String::new(),
            number: None,
            status: None,
            date: None,
        });
        Ok(build_bill_summary(bill, &statements))
    }

    /// Landing-page overview. Retried with backoff, since a failure leaves
    /// the page empty.
    pub async fn fetch_overall_sentiment(
        &self,
        time_range: TimeRange,
    ) -> Result<OverallSentiment, ClientError> {
        let query = Query::new().with("time_range", time_range);
        let query = &query;
        // Sub-fetches that succeeded stay cached, so a retry only repeats
        // the one that failed.
        with_retry(self.config.retry, move || async move {
            let (activity, statements) = try_join!(
                self.fetch_one::<ActivityCounts>(OVERALL, EndpointClass::Analytics, query),
                self.fetch_records::<Statement>(STATEMENTS, EndpointClass::Statements, query),
            )?;
            Ok::<_, ClientError>(build_overview(
                activity,
                &statements,
                time_range,
                Utc::now(),
            ))
        })
        .await
    }

    // ── Listings ──

    pub async fn fetch_sessions(
        &self,
        listing: &ListingQuery,
    ) -> Result<Vec<Session>, ClientError> {
        self.fetch_records(SESSIONS, EndpointClass::Listing, &listing.to_query())
            .await
    }

    pub async fn fetch_bills(&self, listing: &ListingQuery) -> Result<Vec<Bill>, ClientError> {
        self.fetch_records(BILLS, EndpointClass::Listing, &listing.to_query())
            .await
    }

    pub async fn fetch_speakers(
        &self,
        listing: &ListingQuery,
    ) -> Result<Vec<Speaker>, ClientError> {
        self.fetch_records(SPEAKERS, EndpointClass::Listing, &listing.to_query())
            .await
    }

    pub async fn fetch_parties(&self) -> Result<Vec<PartyProfile>, ClientError> {
        self.fetch_records(PARTIES, EndpointClass::Reference, &Query::new())
            .await
    }

    /// Category names known to the backend.
    pub async fn fetch_categories(&self) -> Result<Vec<String>, ClientError> {
        let items = self
            .fetch_list(CATEGORIES, EndpointClass::Reference, &Query::new())
            .await?;
        Ok(items.iter().filter_map(category_name).collect())
    }

    /// Statements matching `filters`, filtered again locally.
    pub async fn fetch_statements(
        &self,
        filters: &SentimentFilters,
    ) -> Result<Vec<Statement>, ClientError> {
        let statements: Vec<Statement> = self
            .fetch_records(STATEMENTS, EndpointClass::Statements, &filters.to_query())
            .await?;
        Ok(filter_statements(&statements, filters, Utc::now())
            .into_iter()
            .cloned()
            .collect())
    }

    // ── Refresh ──

    /// Ask the backend to re-ingest, then drop every cached response.
    ///
    /// The backend acknowledges immediately; ingestion runs on its side.
    pub async fn trigger_refresh(&self, force: bool) -> Result<RefreshAck, ClientError> {
        let payload = self
            .transport
            .request(&ApiRequest::post(REFRESH, json!({ "force": force })))
            .await?;
        let ack = decode_list::<RefreshAck>(&payload)
            .items
            .into_iter()
            .next()
            .unwrap_or_default();
        self.cache.clear();
        info!(force, status = %ack.status, "refresh acknowledged, cache cleared");
        Ok(ack)
    }
}

fn category_name(item: &Value) -> Option<String> {
    let name = match item {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("name").and_then(Value::as_str)?,
        _ => return None,
    };
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

// ── Builders ──

fn build_party_report(
    statements: &[Statement],
    profiles: &[PartyProfile],
    filters: &SentimentFilters,
    now: DateTime<Utc>,
) -> PartySentimentReport {
    let filtered = filter_statements(statements, filters, now);
    let mut groups = group_by(filtered.iter().copied(), Dimension::Party);
    rank(&mut groups);

    let parties = groups
        .into_iter()
        .enumerate()
        .map(|(i, stats)| {
            let members: Vec<&Statement> = filtered
                .iter()
                .copied()
                .filter(|s| s.party.as_deref() == Some(stats.key.as_str()))
                .collect();
            let profile = profiles
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(&stats.key) || p.id == stats.key)
                .cloned()
                .unwrap_or_default();
            let profile = enrich_profile(profile, &stats, &members);
            PartyStanding {
                rank: i + 1,
                stats,
                profile,
            }
        })
        .collect();

    PartySentimentReport {
        time_range: filters.time_range,
        generated_at: now,
        statement_count: filtered.len(),
        parties,
    }
}

fn build_category_report(
    statements: &[Statement],
    filters: &SentimentFilters,
    now: DateTime<Utc>,
) -> CategorySentimentReport {
    let filtered = filter_statements(statements, filters, now);
    CategorySentimentReport {
        time_range: filters.time_range,
        summary: summarize(filtered.iter().copied()),
        categories: category_breakdowns(filtered.iter().copied()),
        keywords: keyword_frequencies(filtered.iter().copied(), KEYWORD_LIMIT),
    }
}

fn build_bill_summary(bill: Bill, statements: &[Statement]) -> BillSentimentSummary {
    // Backends that ignore the `bill` query parameter send everything.
    let own: Vec<&Statement> = statements
        .iter()
        .filter(|s| s.bill.as_deref().is_none_or(|b| b == bill.id))
        .collect();
    BillSentimentSummary {
        sentiment_summary: summarize(own.iter().copied()),
        party_breakdown: party_shares(own.iter().copied()),
        sentiment_timeline: timeline(own.iter().copied()),
        bill,
    }
}

fn build_overview(
    activity: ActivityCounts,
    statements: &[Statement],
    time_range: TimeRange,
    now: DateTime<Utc>,
) -> OverallSentiment {
    let filtered = filter_statements(statements, &SentimentFilters::new(time_range), now);
    let mut party_ranking = group_by(filtered.iter().copied(), Dimension::Party);
    rank(&mut party_ranking);
    let mut top_categories = group_by(filtered.iter().copied(), Dimension::Category);
    rank(&mut top_categories);
    top_categories.truncate(TOP_CATEGORIES);

    OverallSentiment {
        time_range,
        activity,
        summary: summarize(filtered.iter().copied()),
        party_ranking,
        top_categories,
        timeline: timeline(filtered.iter().copied()),
    }
}
