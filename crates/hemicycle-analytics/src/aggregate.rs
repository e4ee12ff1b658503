//! Grouped sentiment statistics over normalised statements.
//!
//! Statements are filtered first ([`filter_statements`]), then partitioned by
//! a [`Dimension`]. Each partition yields a [`GroupStats`] with its mean score
//! and positive/neutral/negative split, classified with the thresholds in
//! [`crate::scale`]. Partitions are only created for keys that occur, so no
//! group ever has zero members.
//!
//! Percentages are kept raw (unrounded); use [`display_pct`] when printing.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use hemicycle_core::{
    CategoryBreakdown, MemberSummary, PartyProfile, PartyShare, SentimentFilters,
    SentimentSummary, Statement, TimelinePoint, parse_timestamp,
};
use serde::{Deserialize, Serialize};

use crate::scale::Sentiment;

/// Members listed on a party profile when the backend supplies none.
pub const TOP_MEMBERS: usize = 5;
/// Statements listed on a party profile when the backend supplies none.
pub const RECENT_STATEMENTS: usize = 5;

/// Time-bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Month,
}

/// What to partition statements by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Party,
    Category,
    Subcategory,
    Speaker,
    TimeBucket(Granularity),
}

impl Dimension {
    /// Grouping key of a statement; `None` leaves it out of this dimension.
    pub fn key_of(&self, s: &Statement) -> Option<String> {
        match self {
            Self::Party => s.party.clone(),
            Self::Category => s.category.clone(),
            Self::Subcategory => s.subcategory.clone(),
            Self::Speaker => {
                let key = s.speaker.key();
                (!key.is_empty()).then(|| key.to_string())
            }
            Self::TimeBucket(Granularity::Day) => {
                s.date.map(|d| d.date_naive().format("%Y-%m-%d").to_string())
            }
            Self::TimeBucket(Granularity::Month) => {
                s.date.map(|d| d.date_naive().format("%Y-%m").to_string())
            }
        }
    }
}

/// Statistics for one partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub key: String,
    pub count: usize,
    pub avg_sentiment: f64,
    pub positive_count: usize,
    pub neutral_count: usize,
    pub negative_count: usize,
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
}

impl GroupStats {
    pub fn sentiment(&self) -> Sentiment {
        Sentiment::classify(self.avg_sentiment)
    }
}

/// Keyword occurrence across statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordStat {
    pub keyword: String,
    pub count: usize,
    pub avg_sentiment: f64,
}

/// Running totals for one partition.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    count: usize,
    sum: f64,
    positive: usize,
    neutral: usize,
    negative: usize,
}

impl Tally {
    fn push(&mut self, score: f64) {
        self.count += 1;
        self.sum += score;
        match Sentiment::classify(score) {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    fn pct(&self, n: usize) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            n as f64 / self.count as f64 * 100.0
        }
    }

    fn stats(&self, key: String) -> GroupStats {
        GroupStats {
            key,
            count: self.count,
            avg_sentiment: self.mean(),
            positive_count: self.positive,
            neutral_count: self.neutral,
            negative_count: self.negative,
            positive_pct: self.pct(self.positive),
            neutral_pct: self.pct(self.neutral),
            negative_pct: self.pct(self.negative),
        }
    }

    fn summary(&self) -> SentimentSummary {
        SentimentSummary {
            total: self.count,
            positive_count: self.positive,
            neutral_count: self.neutral,
            negative_count: self.negative,
            positive_pct: self.pct(self.positive),
            neutral_pct: self.pct(self.neutral),
            negative_pct: self.pct(self.negative),
            avg_sentiment: self.mean(),
        }
    }
}

/// Round a raw percentage to one decimal for display.
pub fn display_pct(pct: f64) -> f64 {
    (pct * 10.0).round() / 10.0
}

// ── Filtering ──

/// Keep the statements matching every set filter.
///
/// `time_range` is evaluated against `now`; `date_from`/`date_to` are
/// inclusive calendar dates. Free-text `search` is left to the backend.
pub fn filter_statements<'a>(
    statements: &'a [Statement],
    filters: &SentimentFilters,
    now: DateTime<Utc>,
) -> Vec<&'a Statement> {
    let date_from = filters.date_from.as_deref().and_then(parse_timestamp);
    let date_to = filters
        .date_to
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());

    statements
        .iter()
        .filter(|s| filters.time_range.contains(s.date, now))
        .filter(|s| matches_opt(&filters.party, &s.party))
        .filter(|s| matches_opt(&filters.category, &s.category))
        .filter(|s| matches_opt(&filters.subcategory, &s.subcategory))
        .filter(|s| matches_opt(&filters.bill, &s.bill))
        .filter(|s| match (date_from, s.date) {
            (Some(from), Some(ts)) => ts >= from,
            (Some(_), None) => false,
            (None, _) => true,
        })
        .filter(|s| match (date_to, s.date) {
            (Some(to), Some(ts)) => ts.date_naive() <= to,
            (Some(_), None) => false,
            (None, _) => true,
        })
        .collect()
}

fn matches_opt(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match wanted {
        None => true,
        Some(w) => actual
            .as_deref()
            .is_some_and(|a| a.eq_ignore_ascii_case(w.trim())),
    }
}

// ── Grouping and ranking ──

/// Partition statements by `dimension`, ordered by key.
pub fn group_by<'a, I>(statements: I, dimension: Dimension) -> Vec<GroupStats>
where
    I: IntoIterator<Item = &'a Statement>,
{
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
    for s in statements {
        if let Some(key) = dimension.key_of(s) {
            tallies.entry(key).or_default().push(s.sentiment_score);
        }
    }
    tallies
        .into_iter()
        .map(|(key, tally)| tally.stats(key))
        .collect()
}

/// Sort by mean sentiment descending, then count descending, then key.
pub fn rank(groups: &mut [GroupStats]) {
    groups.sort_by(|a, b| {
        b.avg_sentiment
            .total_cmp(&a.avg_sentiment)
            .then(b.count.cmp(&a.count))
            .then_with(|| a.key.cmp(&b.key))
    });
}

/// Filter, group, and rank in one step.
pub fn aggregate(
    statements: &[Statement],
    dimension: Dimension,
    filters: &SentimentFilters,
    now: DateTime<Utc>,
) -> Vec<GroupStats> {
    let filtered = filter_statements(statements, filters, now);
    let mut groups = group_by(filtered, dimension);
    rank(&mut groups);
    groups
}

/// Totals over all statements, regardless of grouping keys.
pub fn summarize<'a, I>(statements: I) -> SentimentSummary
where
    I: IntoIterator<Item = &'a Statement>,
{
    let mut tally = Tally::default();
    for s in statements {
        tally.push(s.sentiment_score);
    }
    tally.summary()
}

/// Per-day counts and means, oldest first. Undated statements are skipped.
pub fn timeline<'a, I>(statements: I) -> Vec<TimelinePoint>
where
    I: IntoIterator<Item = &'a Statement>,
{
    let mut days: BTreeMap<NaiveDate, Tally> = BTreeMap::new();
    for s in statements {
        if let Some(ts) = s.date {
            days.entry(ts.date_naive()).or_default().push(s.sentiment_score);
        }
    }
    days.into_iter()
        .map(|(date, tally)| TimelinePoint {
            date,
            statement_count: tally.count,
            avg_sentiment: tally.mean(),
        })
        .collect()
}

/// Each party's share of the statements, largest first.
///
/// `share_pct` is relative to every statement passed in, including ones
/// without a party.
pub fn party_shares<'a, I>(statements: I) -> Vec<PartyShare>
where
    I: IntoIterator<Item = &'a Statement>,
{
    let mut total = 0usize;
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
    for s in statements {
        total += 1;
        if let Some(party) = &s.party {
            tallies.entry(party.clone()).or_default().push(s.sentiment_score);
        }
    }
    let mut shares: Vec<PartyShare> = tallies
        .into_iter()
        .map(|(party, tally)| PartyShare {
            party,
            statement_count: tally.count,
            avg_sentiment: tally.mean(),
            share_pct: tally.count as f64 / total as f64 * 100.0,
        })
        .collect();
    shares.sort_by(|a, b| {
        b.statement_count
            .cmp(&a.statement_count)
            .then_with(|| a.party.cmp(&b.party))
    });
    shares
}

// ── Category breakdowns ──

fn breakdown(name: String, tally: &Tally, members: &[&Statement]) -> CategoryBreakdown {
    let stats = tally.stats(name);
    CategoryBreakdown {
        name: stats.key,
        avg_sentiment: stats.avg_sentiment,
        statement_count: stats.count,
        positive_count: stats.positive_count,
        neutral_count: stats.neutral_count,
        negative_count: stats.negative_count,
        positive_pct: stats.positive_pct,
        neutral_pct: stats.neutral_pct,
        negative_pct: stats.negative_pct,
        subcategory_breakdown: Vec::new(),
        party_breakdown: party_shares(members.iter().copied()),
    }
}

fn sort_breakdowns(items: &mut [CategoryBreakdown]) {
    items.sort_by(|a, b| {
        b.avg_sentiment
            .total_cmp(&a.avg_sentiment)
            .then(b.statement_count.cmp(&a.statement_count))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// One breakdown per category, each with its subcategories and party split.
///
/// Ranked like [`rank`]; statements without a category are skipped.
pub fn category_breakdowns<'a, I>(statements: I) -> Vec<CategoryBreakdown>
where
    I: IntoIterator<Item = &'a Statement>,
{
    let mut by_category: BTreeMap<String, Vec<&Statement>> = BTreeMap::new();
    for s in statements {
        if let Some(cat) = &s.category {
            by_category.entry(cat.clone()).or_default().push(s);
        }
    }

    let mut out: Vec<CategoryBreakdown> = by_category
        .into_iter()
        .map(|(name, members)| {
            let mut tally = Tally::default();
            let mut by_sub: BTreeMap<String, Vec<&Statement>> = BTreeMap::new();
            for &s in &members {
                tally.push(s.sentiment_score);
                if let Some(sub) = &s.subcategory {
                    by_sub.entry(sub.clone()).or_default().push(s);
                }
            }

            let mut subs: Vec<CategoryBreakdown> = by_sub
                .into_iter()
                .map(|(sub, sub_members)| {
                    let mut sub_tally = Tally::default();
                    for s in &sub_members {
                        sub_tally.push(s.sentiment_score);
                    }
                    breakdown(sub, &sub_tally, &sub_members)
                })
                .collect();
            sort_breakdowns(&mut subs);

            let mut cat = breakdown(name, &tally, &members);
            cat.subcategory_breakdown = subs;
            cat
        })
        .collect();
    sort_breakdowns(&mut out);
    out
}

// ── Party profiles ──

/// Highest-scoring speakers among the given statements.
pub fn top_members<'a, I>(statements: I, limit: usize) -> Vec<MemberSummary>
where
    I: IntoIterator<Item = &'a Statement>,
{
    let mut names: HashMap<String, String> = HashMap::new();
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
    for s in statements {
        let key = s.speaker.key();
        if key.is_empty() {
            continue;
        }
        names
            .entry(key.to_string())
            .or_insert_with(|| s.speaker.label().to_string());
        tallies.entry(key.to_string()).or_default().push(s.sentiment_score);
    }

    let mut groups: Vec<GroupStats> = tallies
        .into_iter()
        .map(|(key, tally)| tally.stats(key))
        .collect();
    rank(&mut groups);

    groups
        .into_iter()
        .take(limit)
        .map(|g| MemberSummary {
            name: names.remove(&g.key).unwrap_or_default(),
            id: g.key,
            statement_count: g.count as u64,
            avg_sentiment: g.avg_sentiment,
        })
        .collect()
}

/// Most recent dated statements, newest first.
pub fn recent_statements<'a, I>(statements: I, limit: usize) -> Vec<Statement>
where
    I: IntoIterator<Item = &'a Statement>,
{
    let mut dated: Vec<&Statement> = statements.into_iter().filter(|s| s.date.is_some()).collect();
    dated.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
    dated.into_iter().take(limit).cloned().collect()
}

/// Overlay locally computed figures onto a backend party profile.
///
/// `avg_sentiment` and `total_statements` always reflect `stats`, so they
/// honour the active filters. Member and statement lists are only filled
/// when the backend left them empty.
pub fn enrich_profile(
    mut profile: PartyProfile,
    stats: &GroupStats,
    party_statements: &[&Statement],
) -> PartyProfile {
    if profile.name.is_empty() {
        profile.name = stats.key.clone();
    }
    profile.avg_sentiment = stats.avg_sentiment;
    profile.total_statements = stats.count as u64;
    if profile.top_members.is_empty() {
        profile.top_members = top_members(party_statements.iter().copied(), TOP_MEMBERS);
    }
    if profile.recent_statements.is_empty() {
        profile.recent_statements =
            recent_statements(party_statements.iter().copied(), RECENT_STATEMENTS);
    }
    profile
}

// ── Keywords ──

/// Most frequent keywords, ties broken alphabetically. Case-insensitive.
pub fn keyword_frequencies<'a, I>(statements: I, limit: usize) -> Vec<KeywordStat>
where
    I: IntoIterator<Item = &'a Statement>,
{
    let mut tallies: HashMap<String, Tally> = HashMap::new();
    for s in statements {
        for kw in &s.keywords {
            let kw = kw.trim().to_lowercase();
            if !kw.is_empty() {
                tallies.entry(kw).or_default().push(s.sentiment_score);
            }
        }
    }
    let mut stats: Vec<KeywordStat> = tallies
        .into_iter()
        .map(|(keyword, tally)| KeywordStat {
            keyword,
            count: tally.count,
            avg_sentiment: tally.mean(),
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
    stats.truncate(limit);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use hemicycle_core::{SpeakerRef, TimeRange};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn stmt(id: &str, party: &str, score: f64) -> Statement {
        Statement {
            id: id.into(),
            speaker: SpeakerRef {
                id: Some(format!("sp-{id}")),
                name: format!("Speaker {id}"),
            },
            party: Some(party.into()),
            text: String::new(),
            sentiment_score: score,
            session: None,
            bill: None,
            category: None,
            subcategory: None,
            keywords: Vec::new(),
            date: Some(now() - Duration::days(1)),
        }
    }

    fn with_category(mut s: Statement, cat: &str, sub: Option<&str>) -> Statement {
        s.category = Some(cat.into());
        s.subcategory = sub.map(Into::into);
        s
    }

    fn days_ago(mut s: Statement, days: i64) -> Statement {
        s.date = Some(now() - Duration::days(days));
        s
    }

    #[test]
    fn summary_of_mixed_scores() {
        let statements = vec![
            stmt("1", "A", 0.5),
            stmt("2", "A", 0.5),
            stmt("3", "A", -0.5),
            stmt("4", "A", 0.0),
        ];
        let groups = group_by(&statements, Dimension::Party);
        assert_eq!(groups.len(), 1);
        let g = &groups[0];
        assert_eq!(g.count, 4);
        assert!((g.avg_sentiment - 0.125).abs() < 1e-12);
        assert_eq!(g.positive_count, 2);
        assert_eq!(g.negative_count, 1);
        assert_eq!(g.neutral_count, 1);
        assert_eq!(g.positive_pct, 50.0);
        assert_eq!(g.negative_pct, 25.0);

        let summary = summarize(&statements);
        assert_eq!(summary.total, 4);
        assert!((summary.avg_sentiment - 0.125).abs() < 1e-12);
        assert_eq!(summary.positive_pct, 50.0);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        let none: Vec<Statement> = Vec::new();
        assert!(group_by(&none, Dimension::Party).is_empty());
        let summary = summarize(&none);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.avg_sentiment, 0.0);
        assert_eq!(summary.positive_pct, 0.0);
    }

    #[test]
    fn threshold_scores_count_as_neutral() {
        let statements = vec![stmt("1", "A", 0.3), stmt("2", "A", -0.3)];
        let g = &group_by(&statements, Dimension::Party)[0];
        assert_eq!(g.neutral_count, 2);
        assert_eq!(g.positive_count + g.negative_count, 0);
    }

    #[test]
    fn statements_without_key_are_left_out() {
        let mut orphan = stmt("1", "A", 0.9);
        orphan.party = None;
        let statements = vec![orphan, stmt("2", "B", 0.1)];
        let groups = group_by(&statements, Dimension::Party);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "B");
    }

    #[test]
    fn ranking_breaks_ties_by_count_then_key() {
        let statements = vec![
            stmt("1", "C", 0.4),
            stmt("2", "B", 0.4),
            stmt("3", "B", 0.4),
            stmt("4", "A", 0.4),
            stmt("5", "D", 0.9),
            stmt("6", "E", -0.2),
        ];
        let mut groups = group_by(&statements, Dimension::Party);
        rank(&mut groups);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["D", "B", "A", "C", "E"]);
    }

    #[test]
    fn time_buckets() {
        let statements = vec![
            days_ago(stmt("1", "A", 0.2), 1),
            days_ago(stmt("2", "A", 0.4), 1),
            days_ago(stmt("3", "A", -0.4), 40),
        ];
        let days = group_by(&statements, Dimension::TimeBucket(Granularity::Day));
        assert_eq!(days.len(), 2);
        assert_eq!(days[1].key, "2026-10-17");
        assert_eq!(days[1].count, 2);

        let months = group_by(&statements, Dimension::TimeBucket(Granularity::Month));
        let keys: Vec<&str> = months.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["2026-09", "2026-10"]);
    }

    #[test]
    fn filter_applies_time_range_and_dimensions() {
        let statements = vec![
            with_category(days_ago(stmt("1", "A", 0.5), 10), "economy", None),
            with_category(days_ago(stmt("2", "A", 0.5), 200), "economy", None),
            with_category(days_ago(stmt("3", "B", 0.5), 500), "economy", None),
            with_category(days_ago(stmt("4", "B", 0.5), 10), "health", None),
        ];
        let filters = SentimentFilters {
            time_range: TimeRange::Year,
            category: Some("Economy".into()),
            ..Default::default()
        };
        let ids: Vec<&str> = filter_statements(&statements, &filters, now())
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);

        let month = SentimentFilters::new(TimeRange::Month);
        assert_eq!(filter_statements(&statements, &month, now()).len(), 2);
    }

    #[test]
    fn filter_date_bounds_are_inclusive() {
        let statements = vec![
            days_ago(stmt("1", "A", 0.1), 1),
            days_ago(stmt("2", "A", 0.1), 5),
            days_ago(stmt("3", "A", 0.1), 9),
        ];
        let filters = SentimentFilters {
            date_from: Some("2026-10-09".into()),
            date_to: Some("2026-10-13".into()),
            ..Default::default()
        };
        let ids: Vec<&str> = filter_statements(&statements, &filters, now())
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn aggregate_ranks_filtered_groups_and_percentages_sum_to_100() {
        let statements = vec![
            days_ago(stmt("1", "A", 0.9), 3),
            days_ago(stmt("2", "A", -0.9), 3),
            days_ago(stmt("3", "A", 0.1), 3),
            days_ago(stmt("4", "B", 0.6), 3),
            days_ago(stmt("5", "B", 0.7), 400),
            days_ago(stmt("6", "C", -0.8), 3),
        ];
        let groups = aggregate(
            &statements,
            Dimension::Party,
            &SentimentFilters::new(TimeRange::Year),
            now(),
        );
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["B", "A", "C"]);
        assert_eq!(groups[0].count, 1);
        for g in &groups {
            let total = g.positive_pct + g.neutral_pct + g.negative_pct;
            assert!((total - 100.0).abs() < 1e-9, "{}: {total}", g.key);
        }
    }

    #[test]
    fn timeline_is_ordered_by_date() {
        let statements = vec![
            days_ago(stmt("1", "A", 0.5), 1),
            days_ago(stmt("2", "A", -0.5), 3),
            days_ago(stmt("3", "A", 0.1), 3),
        ];
        let points = timeline(&statements);
        assert_eq!(points.len(), 2);
        assert!(points[0].date < points[1].date);
        assert_eq!(points[0].statement_count, 2);
        assert!((points[0].avg_sentiment - (-0.2)).abs() < 1e-12);
    }

    #[test]
    fn party_shares_cover_population() {
        let mut orphan = stmt("4", "x", 0.0);
        orphan.party = None;
        let statements = vec![
            stmt("1", "A", 0.5),
            stmt("2", "A", 0.3),
            stmt("3", "B", -0.5),
            orphan,
        ];
        let shares = party_shares(&statements);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].party, "A");
        assert_eq!(shares[0].share_pct, 50.0);
        assert!((shares[0].avg_sentiment - 0.4).abs() < 1e-12);
        assert_eq!(shares[1].share_pct, 25.0);
    }

    #[test]
    fn category_breakdown_nests_one_level() {
        let statements = vec![
            with_category(stmt("1", "A", 0.8), "economy", Some("tax")),
            with_category(stmt("2", "B", -0.8), "economy", Some("tax")),
            with_category(stmt("3", "A", 0.6), "economy", Some("trade")),
            with_category(stmt("4", "A", 0.9), "health", None),
            stmt("5", "A", 0.0),
        ];
        let cats = category_breakdowns(&statements);
        assert_eq!(cats.len(), 2);
        assert_eq!(cats[0].name, "health");
        assert!(cats[0].subcategory_breakdown.is_empty());

        let economy = &cats[1];
        assert_eq!(economy.statement_count, 3);
        assert_eq!(economy.positive_count, 2);
        let subs: Vec<&str> = economy
            .subcategory_breakdown
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(subs, vec!["trade", "tax"]);
        assert!(economy.subcategory_breakdown[1].subcategory_breakdown.is_empty());
        assert_eq!(economy.subcategory_breakdown[1].party_breakdown.len(), 2);
        assert_eq!(economy.party_breakdown[0].party, "A");
    }

    #[test]
    fn top_members_ranked_and_limited() {
        let mut a = stmt("1", "A", 0.9);
        a.speaker = SpeakerRef {
            id: Some("s1".into()),
            name: "Alice".into(),
        };
        let mut b = stmt("2", "A", 0.2);
        b.speaker = SpeakerRef {
            id: Some("s2".into()),
            name: "Bob".into(),
        };
        let mut b2 = b.clone();
        b2.id = "3".into();
        let statements = vec![a, b, b2];
        let members = top_members(&statements, 1);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, "s1");
        assert_eq!(members[0].name, "Alice");
        assert_eq!(top_members(&statements, 5)[1].statement_count, 2);
    }

    #[test]
    fn recent_statements_newest_first() {
        let mut undated = stmt("u", "A", 0.0);
        undated.date = None;
        let statements = vec![
            days_ago(stmt("old", "A", 0.0), 30),
            undated,
            days_ago(stmt("new", "A", 0.0), 1),
        ];
        let ids: Vec<String> = recent_statements(&statements, 5)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn enrich_profile_keeps_backend_lists() {
        let statements = vec![stmt("1", "A", 0.8), stmt("2", "A", 0.4)];
        let refs: Vec<&Statement> = statements.iter().collect();
        let stats = group_by(&statements, Dimension::Party).remove(0);

        let bare = enrich_profile(PartyProfile::default(), &stats, &refs);
        assert_eq!(bare.name, "A");
        assert_eq!(bare.total_statements, 2);
        assert!((bare.avg_sentiment - 0.6).abs() < 1e-12);
        assert_eq!(bare.top_members.len(), 2);
        assert_eq!(bare.recent_statements.len(), 2);

        let served = PartyProfile {
            name: "Alpha".into(),
            avg_sentiment: -1.0,
            top_members: vec![MemberSummary::default()],
            ..Default::default()
        };
        let merged = enrich_profile(served, &stats, &refs);
        assert_eq!(merged.name, "Alpha");
        assert!((merged.avg_sentiment - 0.6).abs() < 1e-12);
        assert_eq!(merged.top_members.len(), 1);
    }

    #[test]
    fn keyword_frequencies_case_insensitive() {
        let mut a = stmt("1", "A", 0.5);
        a.keywords = vec!["Tax".into(), "budget".into()];
        let mut b = stmt("2", "A", -0.5);
        b.keywords = vec!["tax ".into()];
        let stats = keyword_frequencies(&[a, b], 10);
        assert_eq!(stats[0].keyword, "tax");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].avg_sentiment, 0.0);
        assert_eq!(stats[1].keyword, "budget");
    }

    #[test]
    fn display_pct_rounds_one_decimal() {
        assert_eq!(display_pct(33.333333), 33.3);
        assert_eq!(display_pct(66.66666), 66.7);
        assert_eq!(display_pct(50.0), 50.0);
    }
}
