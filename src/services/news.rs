//! News wire: headline impact classification, recency filtering and ranking.

use crate::services::market_data::AssetClass;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

const HIGH_IMPACT: &[&str] = &[
    "fed", "rate", "inflation", "cpi", "fomc", "crash", "surge", "record", "plunge", "crisis",
    "war", "ban", "sec", "lawsuit", "approval", "stimulus", "debt", "default",
];

const MEDIUM_IMPACT: &[&str] = &[
    "earnings", "forecast", "support", "resistance", "upgrade", "downgrade", "momentum",
    "volume", "partnership", "launch", "merger", "acquisition", "profit",
];

const HEADLINE_TEMPLATES: &[&str] = &[
    "Central bank officials hint at a rate pause as inflation cools.",
    "Institutional outflows detected in {SYMBOL} derivatives markets.",
    "Breakout above key moving averages draws momentum traders into {SYMBOL}.",
    "Analysts raise {CATEGORY} forecast on easing supply chains.",
    "Regulator outlines new custody framework for digital assets.",
    "Risk-off sentiment builds ahead of the CPI release.",
    "Overnight funding markets stabilize as liquidity fears fade.",
    "{SYMBOL} correlation with equities reaches a three-month high.",
    "Hedge funds add short exposure to {SYMBOL} as volatility climbs.",
    "Weekly recap: {CATEGORY} valuations drift on cooling trade data.",
];

const SOURCES: &[&str] = &[
    "Bloomberg",
    "Reuters",
    "Financial Times",
    "WSJ Markets",
    "CNBC",
    "CoinDesk",
    "The Block",
    "Barron's",
];

/// Headlines older than this never reach a prompt.
pub const MAX_HEADLINE_AGE_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Impact::Low => "Low",
            Impact::Medium => "Medium",
            Impact::High => "High",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub source: String,
    pub headline: String,
    pub impact: Impact,
    pub published_at: DateTime<Utc>,
}

impl NewsItem {
    pub fn new(source: &str, headline: &str, published_at: DateTime<Utc>) -> Self {
        Self {
            source: source.to_string(),
            headline: headline.to_string(),
            impact: classify_impact(headline),
            published_at,
        }
    }
}

/// Impact of a headline from keyword lists, matched on whole words (plural `s` allowed).
pub fn classify_impact(text: &str) -> Impact {
    let lower = text.to_ascii_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let mentions = |keywords: &[&str]| {
        words.iter().any(|word| {
            keywords
                .iter()
                .any(|k| *word == *k || word.strip_suffix('s') == Some(*k))
        })
    };

    if mentions(HIGH_IMPACT) {
        Impact::High
    } else if mentions(MEDIUM_IMPACT) {
        Impact::Medium
    } else {
        Impact::Low
    }
}

/// Drop stale items, then order by impact (high first) and recency (newest first).
pub fn rank_headlines(items: Vec<NewsItem>, now: DateTime<Utc>) -> Vec<NewsItem> {
    let cutoff = now - Duration::hours(MAX_HEADLINE_AGE_HOURS);
    let mut items: Vec<NewsItem> = items
        .into_iter()
        .filter(|item| item.published_at > cutoff)
        .collect();
    items.sort_by(|a, b| {
        b.impact
            .cmp(&a.impact)
            .then_with(|| b.published_at.cmp(&a.published_at))
    });
    items
}

/// Source of recent headlines for a symbol. Best effort: no headlines is a valid answer.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn headlines(&self, symbol: &str) -> Vec<NewsItem>;
}

/// Seeded wire of templated headlines scattered over the last hour.
pub struct SimulatedNewsWire {
    seed: Option<u64>,
    count: usize,
}

impl SimulatedNewsWire {
    pub fn new(seed: Option<u64>, count: usize) -> Self {
        Self { seed, count }
    }

    pub fn generate(&self, symbol: &str, now: DateTime<Utc>) -> Vec<NewsItem> {
        let seed = self.seed.unwrap_or_else(|| {
            let mut hasher = DefaultHasher::new();
            symbol.hash(&mut hasher);
            hasher.finish()
        });
        let mut rng = StdRng::seed_from_u64(seed);
        let category = AssetClass::of(symbol).label();

        (0..self.count)
            .map(|_| {
                let template = HEADLINE_TEMPLATES[rng.gen_range(0..HEADLINE_TEMPLATES.len())];
                let headline = template
                    .replace("{SYMBOL}", symbol)
                    .replace("{CATEGORY}", category);
                let source = SOURCES[rng.gen_range(0..SOURCES.len())];
                let age = Duration::minutes(rng.gen_range(0..60));
                NewsItem::new(source, &headline, now - age)
            })
            .collect()
    }
}

#[async_trait]
impl NewsProvider for SimulatedNewsWire {
    async fn headlines(&self, symbol: &str) -> Vec<NewsItem> {
        self.generate(symbol, Utc::now())
    }
}
