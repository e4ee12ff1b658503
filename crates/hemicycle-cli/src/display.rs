//! Terminal rendering for sentiment views.
//!
//! Each view prints as titled sections of `{:<26}`-aligned rows. Scores are
//! tinted along the red-to-green gradient when stdout is a terminal.

use std::io::IsTerminal;

use hemicycle_analytics::{GroupStats, KeywordStat, Sentiment, color_of, display_pct};
use hemicycle_client::{CategorySentimentReport, ErrorState, OverallSentiment, PartySentimentReport};
use hemicycle_core::{
    Bill, BillSentimentSummary, CategoryBreakdown, PartyShare, RefreshAck, SentimentSummary,
    Session, Speaker, TimelinePoint,
};

const MAX_ROWS: usize = 15;

// ── Public API ──

pub fn print_overview(view: &OverallSentiment) {
    println!("=== Parliamentary sentiment ({}) ===", view.time_range);
    println!();

    println!("Activity");
    row("sessions", view.activity.sessions);
    row("bills", view.activity.bills);
    row("speakers", view.activity.speakers);
    row("statements", view.activity.statements);
    println!();

    print_summary(&view.summary);
    print_groups("Party ranking", &view.party_ranking);
    print_groups("Top categories", &view.top_categories);
    print_timeline(&view.timeline);
}

pub fn print_party_report(report: &PartySentimentReport) {
    println!(
        "=== Party sentiment ({}, {} statements) ===",
        report.time_range, report.statement_count
    );
    println!();
    if report.parties.is_empty() {
        println!("  no statements match");
        return;
    }

    for standing in &report.parties {
        let p = &standing.profile;
        println!("#{} {}", standing.rank, p.name);
        row("sentiment", score_cell(standing.stats.avg_sentiment));
        row("statements", standing.stats.count);
        row("split", split_cell(&standing.stats));
        if p.member_count > 0 {
            row("members", p.member_count);
        }
        if p.approved_bills > 0 || p.rejected_bills > 0 {
            row(
                "bills approved/rejected",
                format!("{}/{}", p.approved_bills, p.rejected_bills),
            );
        }
        if !p.top_members.is_empty() {
            println!("  top members");
            for m in &p.top_members {
                println!(
                    "    {:<24} {} ({} statements)",
                    m.name,
                    score_cell(m.avg_sentiment),
                    m.statement_count
                );
            }
        }
        if !p.recent_statements.is_empty() {
            println!("  recent statements");
            for s in &p.recent_statements {
                let date = s
                    .date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                println!(
                    "    {:<10} {} {}",
                    date,
                    score_cell(s.sentiment_score),
                    truncate(&s.text, 60)
                );
            }
        }
        println!();
    }
}

pub fn print_category_report(report: &CategorySentimentReport) {
    println!("=== Category sentiment ({}) ===", report.time_range);
    println!();
    print_summary(&report.summary);

    for c in &report.categories {
        print_category(c);
    }
    print_keywords(&report.keywords);
}

pub fn print_bill(summary: &BillSentimentSummary) {
    let bill = &summary.bill;
    match (&bill.number, bill.title.is_empty()) {
        (Some(n), false) => println!("=== Bill {n}: {} ===", bill.title),
        (_, false) => println!("=== {} ===", bill.title),
        _ => println!("=== Bill {} ===", bill.id),
    }
    if let Some(status) = &bill.status {
        println!("{status}");
    }
    println!();

    print_summary(&summary.sentiment_summary);
    print_shares("By party", &summary.party_breakdown);
    print_timeline(&summary.sentiment_timeline);
}

pub fn print_sessions(sessions: &[Session]) {
    println!("Sessions ({})", sessions.len());
    for s in sessions {
        let date = s
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!("  {:<8} {:<10} {}", s.id, date, s.title);
    }
}

pub fn print_bills(bills: &[Bill]) {
    println!("Bills ({})", bills.len());
    for b in bills {
        println!(
            "  {:<8} {:<12} {}",
            b.id,
            b.status.as_deref().unwrap_or("-"),
            b.title
        );
    }
}

pub fn print_speakers(speakers: &[Speaker]) {
    println!("Speakers ({})", speakers.len());
    for s in speakers {
        let score = s.avg_sentiment.map(score_cell).unwrap_or_default();
        println!(
            "  {:<8} {:<26} {:<12} {}",
            s.id,
            s.name,
            s.party_label().unwrap_or("-"),
            score
        );
    }
}

pub fn print_refresh(ack: &RefreshAck) {
    let status = if ack.status.is_empty() {
        "accepted"
    } else {
        ack.status.as_str()
    };
    println!("Refresh {status}");
    if let Some(message) = &ack.message {
        println!("  {message}");
    }
}

/// Hint shown under a failed view.
pub fn print_failure(error: &ErrorState) {
    if let Some(status) = error.status {
        eprintln!("backend answered HTTP {status}");
    }
    if error.retryable {
        eprintln!("run the command again to retry");
    }
}

// ── Section rendering ──

fn row(label: &str, value: impl std::fmt::Display) {
    println!("  {:<26} {}", label, value);
}

fn print_summary(summary: &SentimentSummary) {
    println!("Sentiment");
    row("statements", summary.total);
    if summary.total == 0 {
        println!();
        return;
    }
    row("average", score_cell(summary.avg_sentiment));
    row(
        "positive",
        format!("{} ({}%)", summary.positive_count, display_pct(summary.positive_pct)),
    );
    row(
        "neutral",
        format!("{} ({}%)", summary.neutral_count, display_pct(summary.neutral_pct)),
    );
    row(
        "negative",
        format!("{} ({}%)", summary.negative_count, display_pct(summary.negative_pct)),
    );
    println!();
}

fn print_groups(header: &str, groups: &[GroupStats]) {
    if groups.is_empty() {
        return;
    }
    println!("{header}");
    for g in groups.iter().take(MAX_ROWS) {
        println!(
            "  {:<26} {}  n={:<5} {}",
            g.key,
            score_cell(g.avg_sentiment),
            g.count,
            split_cell(g)
        );
    }
    if groups.len() > MAX_ROWS {
        println!("    ... and {} more", groups.len() - MAX_ROWS);
    }
    println!();
}

fn print_category(c: &CategoryBreakdown) {
    println!("{}", c.name);
    row("sentiment", score_cell(c.avg_sentiment));
    row("statements", c.statement_count);
    row("split", pct_split(c.positive_pct, c.neutral_pct, c.negative_pct));
    for sub in &c.subcategory_breakdown {
        println!(
            "    {:<24} {}  n={}",
            sub.name,
            score_cell(sub.avg_sentiment),
            sub.statement_count
        );
    }
    if !c.party_breakdown.is_empty() {
        let parties: Vec<String> = c
            .party_breakdown
            .iter()
            .map(|p| format!("{} {}%", p.party, display_pct(p.share_pct)))
            .collect();
        row("parties", parties.join(", "));
    }
    println!();
}

fn print_shares(header: &str, shares: &[PartyShare]) {
    if shares.is_empty() {
        return;
    }
    println!("{header}");
    for s in shares {
        println!(
            "  {:<26} {}  {} statements ({}%)",
            s.party,
            score_cell(s.avg_sentiment),
            s.statement_count,
            display_pct(s.share_pct)
        );
    }
    println!();
}

fn print_timeline(points: &[TimelinePoint]) {
    if points.is_empty() {
        return;
    }
    println!("Timeline");
    let skipped = points.len().saturating_sub(MAX_ROWS);
    if skipped > 0 {
        println!("    ... {skipped} earlier days");
    }
    for p in &points[skipped..] {
        println!(
            "  {:<26} {}  n={}",
            p.date.format("%Y-%m-%d").to_string(),
            score_cell(p.avg_sentiment),
            p.statement_count
        );
    }
    println!();
}

fn print_keywords(keywords: &[KeywordStat]) {
    if keywords.is_empty() {
        return;
    }
    println!("Keywords");
    for k in keywords {
        println!(
            "  {:<26} {:>4}  {}",
            k.keyword,
            k.count,
            score_cell(k.avg_sentiment)
        );
    }
    println!();
}

// ── Cells ──

fn score_cell(score: f64) -> String {
    format_score(score, std::io::stdout().is_terminal())
}

/// `+0.42 positive`, tinted with the gradient colour when `color` is set.
fn format_score(score: f64, color: bool) -> String {
    let text = format!("{:+.2} {}", score, Sentiment::classify(score).as_str());
    if !color {
        return text;
    }
    let c = color_of(score);
    format!("\x1b[38;2;{};{};{}m{}\x1b[0m", c.r, c.g, c.b, text)
}

fn split_cell(g: &GroupStats) -> String {
    pct_split(g.positive_pct, g.neutral_pct, g.negative_pct)
}

fn pct_split(positive: f64, neutral: f64, negative: f64) -> String {
    format!(
        "+{}% ={}% -{}%",
        display_pct(positive),
        display_pct(neutral),
        display_pct(negative)
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
