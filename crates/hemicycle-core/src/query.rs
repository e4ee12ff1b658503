//! Query parameters, filter sets, and cache-key derivation.
//!
//! A [`Query`] keeps its parameters in a `BTreeMap`, so two filter sets built
//! in a different order serialise identically. [`cache_key`] relies on that.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Relative window applied to statement timestamps before aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    All,
    Year,
    Month,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Year => "year",
            Self::Month => "month",
        }
    }

    /// Window length in days, `None` for [`TimeRange::All`].
    pub fn days(&self) -> Option<i64> {
        match self {
            Self::All => None,
            Self::Year => Some(365),
            Self::Month => Some(30),
        }
    }

    /// Earliest admissible timestamp relative to `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.days().map(|d| now - Duration::days(d))
    }

    /// Whether a timestamp falls inside the window.
    ///
    /// Undated records only pass the unbounded window.
    pub fn contains(&self, ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match (self.cutoff(now), ts) {
            (None, _) => true,
            (Some(cutoff), Some(ts)) => ts >= cutoff && ts <= now,
            (Some(_), None) => false,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "year" => Ok(Self::Year),
            "month" => Ok(Self::Month),
            other => Err(format!("unknown time range '{other}' (expected all, year, month)")),
        }
    }
}

/// Ordered query-string parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Query {
    params: BTreeMap<String, String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.params.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameters in key order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Flatten a JSON filter object into parameters.
    ///
    /// Nulls are skipped, strings are taken verbatim, and any other value is
    /// stored as its canonical JSON text.
    pub fn from_json(filters: &Value) -> Self {
        let mut query = Self::new();
        if let Value::Object(map) = filters {
            for (k, v) in map {
                match v {
                    Value::Null => {}
                    Value::String(s) => query.set(k.as_str(), s),
                    other => query.set(k.as_str(), canonical_json(other)),
                }
            }
        }
        query
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (k, v) in iter {
            query.set(k, v);
        }
        query
    }
}

/// Deterministic cache key for an endpoint and its parameters.
///
/// The parameters are rendered as canonical JSON, so no value can smuggle in
/// a separator and pass for two parameters:
/// `/api/statements/?{"category":"economy","time_range":"year"}`
pub fn cache_key(endpoint: &str, query: &Query) -> String {
    if query.is_empty() {
        return endpoint.to_string();
    }
    let params: serde_json::Map<String, Value> = query
        .pairs()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();
    format!("{endpoint}?{}", canonical_json(&Value::Object(params)))
}

/// JSON text with object keys sorted at every depth.
pub fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|k| format!("{}:{}", Value::String(k.clone()), canonical_json(&map[k])))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}

// ── Typed filter sets ──

/// Filters accepted by the sentiment queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentFilters {
    #[serde(default)]
    pub time_range: TimeRange,
    pub party: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub bill: Option<String>,
    /// Inclusive `YYYY-MM-DD` bounds passed through to the backend.
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
}

impl SentimentFilters {
    pub fn new(time_range: TimeRange) -> Self {
        Self {
            time_range,
            ..Default::default()
        }
    }

    pub fn to_query(&self) -> Query {
        Query::new()
            .with("time_range", self.time_range)
            .with_opt("party", self.party.as_deref())
            .with_opt("category", self.category.as_deref())
            .with_opt("subcategory", self.subcategory.as_deref())
            .with_opt("bill", self.bill.as_deref())
            .with_opt("date_from", self.date_from.as_deref())
            .with_opt("date_to", self.date_to.as_deref())
            .with_opt("search", self.search.as_deref())
    }
}

/// Free-text search and paging for listing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl ListingQuery {
    pub fn to_query(&self) -> Query {
        Query::new()
            .with_opt("search", self.search.as_deref())
            .with_opt("page", self.page)
            .with_opt("page_size", self.page_size)
            .with_opt("date_from", self.date_from.as_deref())
            .with_opt("date_to", self.date_to.as_deref())
    }
}
