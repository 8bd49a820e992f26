//! End-to-end tests for enrichment, ranking and scanning with in-memory
//! sources. Source latency is simulated with `tokio::time::sleep` so records
//! complete out of input order.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use trendradar_core::{
    AutocompleteSource, ForumPost, ForumSource, Keyword, MarketplaceListing, MarketplaceSource,
    SourceResult,
};
use trendradar_pipeline::{enrich, run_scan, suggest, ScanOptions, Sources};

/// Marketplace fake: keywords in `texts` succeed, everything else is unavailable.
/// Tracks how many lookups are running at once.
#[derive(Default)]
struct FakeMarketplace {
    texts: HashMap<String, String>,
    delays_ms: HashMap<String, u64>,
    default_delay_ms: u64,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

impl FakeMarketplace {
    fn with_texts(pairs: &[(&str, &str)]) -> Self {
        Self {
            texts: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl MarketplaceSource for FakeMarketplace {
    async fn lookup(&self, keyword: &str) -> MarketplaceListing {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .delays_ms
            .get(keyword)
            .copied()
            .unwrap_or(self.default_delay_ms);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let search_url = Some(format!("https://market.test/search?q={keyword}"));
        match self.texts.get(keyword) {
            Some(text) => MarketplaceListing {
                result: SourceResult::Success {
                    text: text.clone(),
                    url: search_url.clone(),
                },
                search_url,
            },
            None => MarketplaceListing::unavailable(search_url),
        }
    }
}

/// Forum fake: fixed mention counts, 0 for unknown keywords (the failure default).
#[derive(Default)]
struct FakeForum {
    mentions: HashMap<String, u32>,
    posts: Vec<ForumPost>,
}

#[async_trait]
impl ForumSource for FakeForum {
    async fn count_mentions(&self, keyword: &str) -> u32 {
        self.mentions.get(keyword).copied().unwrap_or(0)
    }

    async fn search_posts(&self, _keyword: &str) -> Vec<ForumPost> {
        self.posts.clone()
    }
}

struct FakeAutocomplete(Vec<String>);

#[async_trait]
impl AutocompleteSource for FakeAutocomplete {
    async fn suggest(&self, _seed: &str) -> Vec<String> {
        self.0.clone()
    }
}

fn keywords(names: &[&str]) -> Vec<Keyword> {
    names.iter().map(|n| Keyword::parse(n).unwrap()).collect()
}

#[tokio::test]
async fn every_keyword_gets_a_record_when_all_sources_fail() {
    let names: Vec<String> = (0..25).map(|i| format!("keyword {i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let input = keywords(&refs);

    let marketplace = FakeMarketplace::default();
    let forum = FakeForum::default();

    let records = enrich(&input, &marketplace, &forum, 3).await;

    assert_eq!(records.len(), input.len());
    let positions: HashSet<usize> = records.iter().map(|r| r.position).collect();
    assert_eq!(positions, (0..25).collect::<HashSet<_>>());
    for record in &records {
        assert_eq!(record.keyword, input[record.position]);
        assert_eq!(record.marketplace, SourceResult::Unavailable);
        assert_eq!(record.mention_count, 0);
        assert_eq!(record.score, 0);
        assert!(record.marketplace_url.is_some());
        assert!(!record.suggestion.is_empty());
    }
}

#[tokio::test]
async fn concurrency_never_exceeds_pool_width() {
    let names: Vec<String> = (0..12).map(|i| format!("kw{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let input = keywords(&refs);

    let marketplace = FakeMarketplace {
        default_delay_ms: 20,
        ..FakeMarketplace::default()
    };
    let forum = FakeForum::default();

    let records = enrich(&input, &marketplace, &forum, 4).await;

    assert_eq!(records.len(), 12);
    assert_eq!(marketplace.calls.load(Ordering::SeqCst), 12);
    assert_eq!(marketplace.max_in_flight.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn zero_width_is_treated_as_one() {
    let input = keywords(&["a", "b", "c"]);
    let marketplace = FakeMarketplace {
        default_delay_ms: 5,
        ..FakeMarketplace::default()
    };
    let forum = FakeForum::default();

    let records = enrich(&input, &marketplace, &forum, 0).await;

    assert_eq!(records.len(), 3);
    assert_eq!(marketplace.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_input_yields_no_records() {
    let marketplace = FakeMarketplace::default();
    let forum = FakeForum::default();
    let records = enrich(&[], &marketplace, &forum, 10).await;
    assert!(records.is_empty());
    assert_eq!(marketplace.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn records_carry_scores_and_suggestions() {
    let input = keywords(&["daily habit checklist"]);
    let marketplace = FakeMarketplace::with_texts(&[("daily habit checklist", "50 results")]);
    let forum = FakeForum {
        mentions: HashMap::from([("daily habit checklist".to_string(), 3)]),
        ..FakeForum::default()
    };

    let records = enrich(&input, &marketplace, &forum, 2).await;

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.score, 980);
    assert_eq!(record.mention_count, 3);
    assert_eq!(record.suggestion, suggest("daily habit checklist"));
    assert_eq!(
        record.marketplace,
        SourceResult::Success {
            text: "50 results".to_string(),
            url: Some("https://market.test/search?q=daily habit checklist".to_string()),
        }
    );
}

#[tokio::test]
async fn scan_ranks_by_score_with_stable_ties() {
    let autocomplete = FakeAutocomplete(vec!["k1".into(), "k2".into(), "k3".into()]);
    let mut marketplace = FakeMarketplace::with_texts(&[("k1", "1,234 listings"), ("k2", "50 results")]);
    // k3 finishes first, k1 last: completion order is the reverse of input order.
    marketplace.delays_ms = HashMap::from([
        ("k1".to_string(), 30),
        ("k2".to_string(), 15),
        ("k3".to_string(), 0),
    ]);
    let forum = FakeForum {
        mentions: HashMap::from([
            ("k1".to_string(), 5),
            ("k2".to_string(), 3),
            ("k3".to_string(), 5),
        ]),
        posts: vec![ForumPost {
            title: "k posts".to_string(),
            url: "https://reddit.com/r/k/comments/1/".to_string(),
        }],
    };

    let seed = Keyword::parse("k").unwrap();
    let report = run_scan(
        &seed,
        ScanOptions::default(),
        Sources {
            autocomplete: &autocomplete,
            marketplace: &marketplace,
            forum: &forum,
        },
    )
    .await;

    let order: Vec<(&str, i64)> = report
        .records
        .iter()
        .map(|r| (r.keyword.as_str(), r.score))
        .collect();
    assert_eq!(order, [("k2", 980), ("k1", 50), ("k3", 50)]);
    assert_eq!(report.marketplace_failures, 1);
    assert_eq!(report.posts.len(), 1);
    assert_eq!(report.seed, seed);
}

#[tokio::test]
async fn scan_truncates_to_max_suggestions() {
    let autocomplete = FakeAutocomplete((0..20).map(|i| format!("s{i}")).collect());
    let marketplace = FakeMarketplace::default();
    let forum = FakeForum::default();

    let report = run_scan(
        &Keyword::parse("s").unwrap(),
        ScanOptions {
            max_suggestions: 5,
            concurrency: 2,
        },
        Sources {
            autocomplete: &autocomplete,
            marketplace: &marketplace,
            forum: &forum,
        },
    )
    .await;

    let names: Vec<&str> = report.records.iter().map(|r| r.keyword.as_str()).collect();
    // All scores tie at 0, so rank order is input order.
    assert_eq!(names, ["s0", "s1", "s2", "s3", "s4"]);
    assert_eq!(marketplace.calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn scan_with_no_suggestions_still_lists_posts() {
    let autocomplete = FakeAutocomplete(Vec::new());
    let marketplace = FakeMarketplace::default();
    let forum = FakeForum {
        posts: vec![ForumPost {
            title: "seed thread".to_string(),
            url: "https://reddit.com/r/s/comments/9/".to_string(),
        }],
        ..FakeForum::default()
    };

    let report = run_scan(
        &Keyword::parse("seed").unwrap(),
        ScanOptions::default(),
        Sources {
            autocomplete: &autocomplete,
            marketplace: &marketplace,
            forum: &forum,
        },
    )
    .await;

    assert!(report.records.is_empty());
    assert_eq!(report.marketplace_failures, 0);
    assert_eq!(report.posts.len(), 1);
    assert_eq!(marketplace.calls.load(Ordering::SeqCst), 0);
}
