//! Parliamentary records consumed from the backend and the sentiment
//! summaries derived from them.
//!
//! Backend records are decoded leniently: identifiers may arrive as numbers
//! or strings, references as bare ids or nested objects, and timestamps as
//! RFC 3339 or plain dates. Summary types are produced locally and use plain
//! derives.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Who made a statement. Either half may be missing in a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerRef {
    pub id: Option<String>,
    pub name: String,
}

impl SpeakerRef {
    /// Stable grouping key: the id when known, else the name.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    /// Display label: the name when known, else the id.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_deref().unwrap_or("")
        } else {
            &self.name
        }
    }
}

/// A single scored utterance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StatementWire")]
pub struct Statement {
    pub id: String,
    pub speaker: SpeakerRef,
    pub party: Option<String>,
    pub text: String,
    pub sentiment_score: f64,
    pub session: Option<String>,
    pub bill: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub keywords: Vec<String>,
    /// When the statement was made.
    pub date: Option<DateTime<Utc>>,
}

/// Every field name a statement payload has been seen with.
///
/// Endpoints often send both a foreign key and its display name
/// (`party` + `party_name`); the display name wins.
#[derive(Deserialize)]
struct StatementWire {
    #[serde(deserialize_with = "lenient::id")]
    id: String,
    #[serde(default, deserialize_with = "lenient::speaker")]
    speaker: SpeakerRef,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    speaker_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    party: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    party_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    text: String,
    #[serde(default, deserialize_with = "lenient::text")]
    content: String,
    #[serde(default, deserialize_with = "lenient::opt_score")]
    sentiment_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_score")]
    sentiment: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    session: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    bill: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    category_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    subcategory: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    subcategory_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    keywords: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    timestamp: Option<DateTime<Utc>>,
}

impl TryFrom<StatementWire> for Statement {
    type Error = String;

    fn try_from(w: StatementWire) -> Result<Self, Self::Error> {
        let sentiment_score = w
            .sentiment_score
            .or(w.sentiment)
            .ok_or_else(|| format!("statement {} has no sentiment score", w.id))?;
        let mut speaker = w.speaker;
        if let Some(name) = w.speaker_name {
            speaker.name = name;
        }
        Ok(Self {
            id: w.id,
            speaker,
            party: w.party_name.or(w.party),
            text: if w.text.is_empty() { w.content } else { w.text },
            sentiment_score,
            session: w.session,
            bill: w.bill,
            category: w.category_name.or(w.category),
            subcategory: w.subcategory_name.or(w.subcategory),
            keywords: w.keywords,
            date: w.date.or(w.timestamp),
        })
    }
}

/// A party member ranked by sentiment within their party.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "MemberSummaryWire")]
pub struct MemberSummary {
    pub id: String,
    pub name: String,
    pub statement_count: u64,
    pub avg_sentiment: f64,
}

#[derive(Deserialize)]
struct MemberSummaryWire {
    #[serde(default, deserialize_with = "lenient::id_or_default")]
    id: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    statement_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    statements_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_score")]
    avg_sentiment: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_score")]
    average_sentiment: Option<f64>,
}

impl From<MemberSummaryWire> for MemberSummary {
    fn from(w: MemberSummaryWire) -> Self {
        Self {
            id: w.id,
            name: w.full_name.or(w.name).unwrap_or_default(),
            statement_count: w.statement_count.or(w.statements_count).unwrap_or(0),
            avg_sentiment: w.avg_sentiment.or(w.average_sentiment).unwrap_or(0.0),
        }
    }
}

/// Party profile as served by `/api/parties/`, optionally enriched locally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "PartyProfileWire")]
pub struct PartyProfile {
    pub id: String,
    pub name: String,
    pub member_count: u64,
    pub avg_sentiment: f64,
    pub total_statements: u64,
    pub approved_bills: u64,
    pub rejected_bills: u64,
    pub top_members: Vec<MemberSummary>,
    pub recent_statements: Vec<Statement>,
}

/// Party payloads carry `name` and `party_name`, or both; the display name wins.
#[derive(Deserialize)]
struct PartyProfileWire {
    #[serde(default, deserialize_with = "lenient::id_or_default")]
    id: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    party_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    member_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    members_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_score")]
    avg_sentiment: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_score")]
    average_sentiment: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    total_statements: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    statements_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::count")]
    approved_bills: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    rejected_bills: u64,
    #[serde(default, deserialize_with = "lenient::records")]
    top_members: Vec<MemberSummary>,
    #[serde(default, deserialize_with = "lenient::records")]
    recent_statements: Vec<Statement>,
}

impl From<PartyProfileWire> for PartyProfile {
    fn from(w: PartyProfileWire) -> Self {
        Self {
            id: w.id,
            name: w.party_name.or(w.name).unwrap_or_default(),
            member_count: w.member_count.or(w.members_count).unwrap_or(0),
            avg_sentiment: w.avg_sentiment.or(w.average_sentiment).unwrap_or(0.0),
            total_statements: w.total_statements.or(w.statements_count).unwrap_or(0),
            approved_bills: w.approved_bills,
            rejected_bills: w.rejected_bills,
            top_members: w.top_members,
            recent_statements: w.recent_statements,
        }
    }
}

/// One party's slice of a statement population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyShare {
    pub party: String,
    pub statement_count: usize,
    pub avg_sentiment: f64,
    /// Share of the enclosing population's statements, 0–100.
    pub share_pct: f64,
}

/// Totals, class split, and mean for a set of statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub total: usize,
    pub positive_count: usize,
    pub neutral_count: usize,
    pub negative_count: usize,
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
    pub avg_sentiment: f64,
}

/// Sentiment for one category, with one level of subcategories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub name: String,
    pub avg_sentiment: f64,
    pub statement_count: usize,
    pub positive_count: usize,
    pub neutral_count: usize,
    pub negative_count: usize,
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
    pub subcategory_breakdown: Vec<CategoryBreakdown>,
    pub party_breakdown: Vec<PartyShare>,
}

/// Statements made on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub statement_count: usize,
    pub avg_sentiment: f64,
}

/// Everything the bill view needs.
#[derive(Debug, Clone, Serialize)]
pub struct BillSentimentSummary {
    pub bill: Bill,
    pub sentiment_summary: SentimentSummary,
    pub party_breakdown: Vec<PartyShare>,
    /// Ordered by date ascending.
    pub sentiment_timeline: Vec<TimelinePoint>,
}

// ── Listing records ──

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SessionWire")]
pub struct Session {
    pub id: String,
    pub title: String,
    pub number: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct SessionWire {
    #[serde(deserialize_with = "lenient::id")]
    id: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    date: Option<DateTime<Utc>>,
}

impl From<SessionWire> for Session {
    fn from(w: SessionWire) -> Self {
        Self {
            id: w.id,
            title: w.title.or(w.name).unwrap_or_default(),
            number: w.number,
            date: w.date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "BillWire")]
pub struct Bill {
    pub id: String,
    pub title: String,
    pub number: Option<String>,
    pub status: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct BillWire {
    #[serde(deserialize_with = "lenient::id")]
    id: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_id")]
    number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    date: Option<DateTime<Utc>>,
}

impl From<BillWire> for Bill {
    fn from(w: BillWire) -> Self {
        Self {
            id: w.id,
            title: w.title.or(w.name).unwrap_or_default(),
            number: w.number,
            status: w.status,
            date: w.date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SpeakerWire")]
pub struct Speaker {
    pub id: String,
    pub name: String,
    pub party: Option<String>,
    pub party_name: Option<String>,
    pub statement_count: u64,
    pub avg_sentiment: Option<f64>,
}

#[derive(Deserialize)]
struct SpeakerWire {
    #[serde(deserialize_with = "lenient::id")]
    id: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    party: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    party_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    statement_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    statements_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_score")]
    avg_sentiment: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_score")]
    average_sentiment: Option<f64>,
}

impl From<SpeakerWire> for Speaker {
    fn from(w: SpeakerWire) -> Self {
        Self {
            id: w.id,
            name: w.full_name.or(w.name).unwrap_or_default(),
            party: w.party,
            party_name: w.party_name,
            statement_count: w.statement_count.or(w.statements_count).unwrap_or(0),
            avg_sentiment: w.avg_sentiment.or(w.average_sentiment),
        }
    }
}

impl Speaker {
    /// Party display name, falling back to the raw reference.
    pub fn party_label(&self) -> Option<&str> {
        self.party_name.as_deref().or(self.party.as_deref())
    }
}

/// Activity counters served by `/api/analytics/overall/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ActivityCountsWire")]
pub struct ActivityCounts {
    pub sessions: u64,
    pub bills: u64,
    pub speakers: u64,
    pub statements: u64,
}

#[derive(Deserialize)]
struct ActivityCountsWire {
    #[serde(default, deserialize_with = "lenient::opt_count")]
    sessions: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    total_sessions: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    bills: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    total_bills: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    speakers: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    total_speakers: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    statements: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_count")]
    total_statements: Option<u64>,
}

impl From<ActivityCountsWire> for ActivityCounts {
    fn from(w: ActivityCountsWire) -> Self {
        Self {
            sessions: w.sessions.or(w.total_sessions).unwrap_or(0),
            bills: w.bills.or(w.total_bills).unwrap_or(0),
            speakers: w.speakers.or(w.total_speakers).unwrap_or(0),
            statements: w.statements.or(w.total_statements).unwrap_or(0),
        }
    }
}

/// Acknowledgement of a refresh request. Ingestion itself happens out of band.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RefreshAckWire")]
pub struct RefreshAck {
    pub status: String,
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct RefreshAckWire {
    #[serde(default, deserialize_with = "lenient::text")]
    status: String,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_label")]
    detail: Option<String>,
}

impl From<RefreshAckWire> for RefreshAck {
    fn from(w: RefreshAckWire) -> Self {
        Self {
            status: w.status,
            message: w.message.or(w.detail),
        }
    }
}

/// Parse an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS`, or a plain date.
///
/// Naive values are taken as UTC; plain dates as midnight UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Field deserialisers that accept every shape the backend has been seen to emit.
mod lenient {
    use chrono::{DateTime, Utc};
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::SpeakerRef;

    fn scalar_string(v: &Value) -> Option<String> {
        match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn object_label(map: &serde_json::Map<String, Value>) -> Option<String> {
        ["name", "title", "full_name", "label"]
            .iter()
            .find_map(|k| map.get(*k).and_then(scalar_string))
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let v = Value::deserialize(d)?;
        scalar_string(&v).ok_or_else(|| D::Error::custom(format!("expected an id, got {v}")))
    }

    pub fn id_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(scalar_string(&Value::deserialize(d)?).unwrap_or_default())
    }

    /// Bare id, or an object carrying an `id`.
    pub fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Object(map) => map.get("id").and_then(scalar_string),
            other => scalar_string(&other),
        })
    }

    /// Bare label, or an object carrying a name-like field.
    pub fn opt_label<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Object(map) => object_label(&map),
            other => scalar_string(&other),
        })
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }

    /// Like [`text`], but absent, null, and empty values stay `None` so a
    /// sibling field can fill in.
    pub fn opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn speaker<'de, D: Deserializer<'de>>(d: D) -> Result<SpeakerRef, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(name) => SpeakerRef {
                id: None,
                name: name.trim().to_string(),
            },
            Value::Number(n) => SpeakerRef {
                id: Some(n.to_string()),
                name: String::new(),
            },
            Value::Object(map) => SpeakerRef {
                id: map.get("id").and_then(scalar_string),
                name: object_label(&map).unwrap_or_default(),
            },
            _ => SpeakerRef::default(),
        })
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(opt_count(d)?.unwrap_or(0))
    }

    pub fn opt_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    pub fn opt_score<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .filter(|f: &f64| f.is_finite()))
    }

    /// Array of strings, array of `{name|word}` objects, or a comma-separated string.
    pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(map) => object_label(map)
                        .or_else(|| map.get("word").and_then(scalar_string)),
                    other => scalar_string(other),
                })
                .collect(),
            Value::String(s) => s
                .split(',')
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn opt_timestamp<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => super::parse_timestamp(&s),
            _ => None,
        })
    }

    /// Nested record list, normalised and decoded item by item.
    pub fn records<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let v = Value::deserialize(d)?;
        Ok(crate::normalize::decode_list(&v).items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn statement_with_nested_references() {
        let s: Statement = serde_json::from_value(json!({
            "id": 17,
            "speaker": {"id": 4, "name": "Anna Nowak"},
            "party": {"id": 2, "name": "Green"},
            "text": "We support this bill.",
            "sentiment_score": 0.62,
            "session": {"id": 9, "title": "Sitting 9"},
            "bill": 31,
            "keywords": ["climate", {"word": "energy"}],
            "date": "2026-03-04"
        }))
        .unwrap();
        assert_eq!(s.id, "17");
        assert_eq!(s.speaker.id.as_deref(), Some("4"));
        assert_eq!(s.speaker.name, "Anna Nowak");
        assert_eq!(s.party.as_deref(), Some("Green"));
        assert_eq!(s.session.as_deref(), Some("9"));
        assert_eq!(s.bill.as_deref(), Some("31"));
        assert_eq!(s.keywords, vec!["climate", "energy"]);
        let date = s.date.unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2026, 3, 4));
    }

    #[test]
    fn statement_with_flat_aliases() {
        let s: Statement = serde_json::from_value(json!({
            "id": "a1",
            "speaker": "J. Smith",
            "party_name": "Labour",
            "content": "No.",
            "sentiment": -0.4,
            "keywords": "tax, budget,",
            "timestamp": "2026-01-02T10:30:00Z"
        }))
        .unwrap();
        assert_eq!(s.speaker.key(), "J. Smith");
        assert_eq!(s.party.as_deref(), Some("Labour"));
        assert_eq!(s.text, "No.");
        assert_eq!(s.sentiment_score, -0.4);
        assert_eq!(s.keywords, vec!["tax", "budget"]);
        assert_eq!(s.date.unwrap().hour(), 10);
        assert!(s.bill.is_none());
    }

    #[test]
    fn statement_without_score_is_rejected() {
        let r: Result<Statement, _> = serde_json::from_value(json!({"id": 1, "text": "x"}));
        assert!(r.is_err());
    }

    #[test]
    fn party_profile_tolerates_partial_payload() {
        let p: PartyProfile = serde_json::from_value(json!({
            "id": 3,
            "name": "Centre",
            "members_count": "41",
            "average_sentiment": null,
            "top_members": [{"id": 1, "full_name": "A", "statements_count": 5}, "junk"],
            "recent_statements": {"results": [{"id": 1, "sentiment_score": 0.1}]}
        }))
        .unwrap();
        assert_eq!(p.id, "3");
        assert_eq!(p.member_count, 41);
        assert_eq!(p.avg_sentiment, 0.0);
        assert_eq!(p.top_members.len(), 1);
        assert_eq!(p.top_members[0].statement_count, 5);
        assert_eq!(p.recent_statements.len(), 1);
    }

    #[test]
    fn party_profile_with_both_name_fields() {
        let p: PartyProfile = serde_json::from_value(json!({
            "id": 1,
            "name": "Green",
            "party_name": "Green Party",
            "member_count": 12,
            "members_count": 11,
            "average_sentiment": 0.25,
            "statements_count": 80,
            "approved_bills": 3
        }))
        .unwrap();
        assert_eq!(p.name, "Green Party");
        assert_eq!(p.member_count, 12);
        assert_eq!(p.avg_sentiment, 0.25);
        assert_eq!(p.total_statements, 80);
        assert_eq!(p.approved_bills, 3);

        let only_short: PartyProfile =
            serde_json::from_value(json!({"name": "Green", "party_name": ""})).unwrap();
        assert_eq!(only_short.name, "Green");
    }

    #[test]
    fn listing_records_with_both_field_spellings() {
        let m: MemberSummary = serde_json::from_value(json!({
            "id": 4,
            "name": "Nowak",
            "full_name": "Anna Nowak",
            "statement_count": 9,
            "statements_count": 2,
            "avg_sentiment": 0.5,
            "average_sentiment": 0.1
        }))
        .unwrap();
        assert_eq!(m.name, "Anna Nowak");
        assert_eq!(m.statement_count, 9);
        assert_eq!(m.avg_sentiment, 0.5);

        let s: Speaker = serde_json::from_value(json!({
            "id": 4,
            "name": "Nowak",
            "full_name": "Anna Nowak",
            "party": 2,
            "party_name": "Green",
            "statements_count": 7,
            "average_sentiment": "0.3"
        }))
        .unwrap();
        assert_eq!(s.name, "Anna Nowak");
        assert_eq!(s.party_label(), Some("Green"));
        assert_eq!(s.statement_count, 7);
        assert_eq!(s.avg_sentiment, Some(0.3));

        let session: Session =
            serde_json::from_value(json!({"id": 9, "title": "Sitting 9", "name": "s9"})).unwrap();
        assert_eq!(session.title, "Sitting 9");
        let bill: Bill = serde_json::from_value(json!({"id": 31, "name": "Budget Act"})).unwrap();
        assert_eq!(bill.title, "Budget Act");

        let c: ActivityCounts =
            serde_json::from_value(json!({"sessions": 5, "total_sessions": 6})).unwrap();
        assert_eq!(c.sessions, 5);

        let ack: RefreshAck = serde_json::from_value(json!({
            "status": "accepted",
            "message": "queued",
            "detail": "ingest job 12"
        }))
        .unwrap();
        assert_eq!(ack.message.as_deref(), Some("queued"));
    }

    #[test]
    fn speaker_ref_key_and_label() {
        let both = SpeakerRef {
            id: Some("7".into()),
            name: "Ewa".into(),
        };
        assert_eq!(both.key(), "7");
        assert_eq!(both.label(), "Ewa");
        let id_only = SpeakerRef {
            id: Some("7".into()),
            name: String::new(),
        };
        assert_eq!(id_only.label(), "7");
    }

    #[test]
    fn parse_timestamp_formats() {
        assert!(parse_timestamp("2026-02-21T10:00:00+01:00").is_some());
        assert!(parse_timestamp("2026-02-21T10:00:00.123").is_some());
        assert!(parse_timestamp("2026-02-21 10:00:00").is_some());
        assert_eq!(
            parse_timestamp("2026-02-21").unwrap().to_rfc3339(),
            "2026-02-21T00:00:00+00:00"
        );
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn activity_counts_aliases() {
        let c: ActivityCounts = serde_json::from_value(json!({
            "total_sessions": 12,
            "total_bills": 40,
            "speakers": 300,
            "total_statements": 9000.0
        }))
        .unwrap();
        assert_eq!(
            c,
            ActivityCounts {
                sessions: 12,
                bills: 40,
                speakers: 300,
                statements: 9000
            }
        );
    }
}
