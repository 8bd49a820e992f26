//! Ranked report and its CSV / markdown renderings.

use std::fmt::Write as _;
use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;
use trendradar_core::{ForumPost, Keyword, Record};

/// CSV export columns, in order.
pub const CSV_COLUMNS: [&str; 6] = [
    "keyword",
    "marketplace_listing_text",
    "marketplace_url",
    "mention_count",
    "score",
    "suggestion",
];

/// Shown in place of marketplace text when the lookup failed.
pub const UNAVAILABLE_TEXT: &str = "N/A";

/// Result of one scan: ranked records plus the seed's matching forum posts.
#[derive(Debug, Clone, Serialize)]
pub struct RankedReport {
    pub seed: Keyword,
    pub generated_at: DateTime<Utc>,
    /// Sorted by score, highest first.
    pub records: Vec<Record>,
    pub posts: Vec<ForumPost>,
    /// Records whose marketplace lookup was unavailable.
    pub marketplace_failures: usize,
}

impl RankedReport {
    /// `records` must already be ranked.
    #[must_use]
    pub fn new(seed: Keyword, records: Vec<Record>, posts: Vec<ForumPost>) -> Self {
        let marketplace_failures = records
            .iter()
            .filter(|r| !r.marketplace.is_available())
            .count();
        Self {
            seed,
            generated_at: Utc::now(),
            records,
            posts,
            marketplace_failures,
        }
    }

    /// Aggregate warning for the presentation layer, if any source failed.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        (self.marketplace_failures > 0).then(|| {
            format!(
                "{} of {} marketplace lookups failed; their scores assume a saturated market",
                self.marketplace_failures,
                self.records.len()
            )
        })
    }

    /// Writes the CSV export (header + one row per record, in rank order).
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from `w`.
    pub fn write_csv<W: Write>(&self, mut w: W) -> io::Result<()> {
        let header: Vec<String> = CSV_COLUMNS.iter().map(|c| (*c).to_string()).collect();
        write_row(&mut w, &header)?;
        for record in &self.records {
            write_row(&mut w, &csv_row(record))?;
        }
        w.flush()
    }

    /// Renders the report as a markdown document.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Niche report: {}", self.seed);
        let _ = writeln!(
            out,
            "\n_Generated {}_\n",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        );

        if self.records.is_empty() {
            out.push_str("No autocomplete suggestions found for this seed.\n");
        } else {
            out.push_str("| # | Keyword | Marketplace listings | Forum mentions | Score | Suggestion |\n");
            out.push_str("|---|---------|----------------------|----------------|-------|------------|\n");
            for (rank, record) in self.records.iter().enumerate() {
                let listings = match &record.marketplace_url {
                    Some(url) => format!("[{}]({url})", md_cell(listing_text(record))),
                    None => md_cell(listing_text(record)),
                };
                let _ = writeln!(
                    out,
                    "| {} | {} | {} | {} | {} | {} |",
                    rank + 1,
                    md_cell(record.keyword.as_str()),
                    listings,
                    record.mention_count,
                    record.score,
                    md_cell(&record.suggestion),
                );
            }
        }

        if let Some(warning) = self.warning() {
            let _ = writeln!(out, "\n> ⚠️ {warning}");
        }

        let _ = writeln!(out, "\n## Forum posts matching \"{}\"\n", self.seed);
        if self.posts.is_empty() {
            out.push_str("No matching posts.\n");
        } else {
            for post in &self.posts {
                let _ = writeln!(out, "- [{}]({})", md_link_text(&post.title), post.url);
            }
        }

        out
    }
}

fn listing_text(record: &Record) -> &str {
    record.marketplace.text().unwrap_or(UNAVAILABLE_TEXT)
}

fn csv_row(record: &Record) -> Vec<String> {
    vec![
        record.keyword.to_string(),
        listing_text(record).to_string(),
        record.marketplace_url.clone().unwrap_or_default(),
        record.mention_count.to_string(),
        record.score.to_string(),
        record.suggestion.clone(),
    ]
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(w: &mut W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if first {
            first = false;
        } else {
            w.write_all(b",")?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\n")
}

fn md_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}

fn md_link_text(text: &str) -> String {
    md_cell(text).replace('[', "\\[").replace(']', "\\]")
}
