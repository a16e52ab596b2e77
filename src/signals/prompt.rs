//! Prompt asking a language model to explain a quantitative signal.

use crate::models::indicators::IndicatorSet;
use crate::services::news::NewsItem;
use crate::signals::aggregation::BaseSignal;

const ANALYST_BRIEF: &str = "You are the Chief AI & Quantitative Research Lead for InvestMal AI, \
an institutional-grade market intelligence platform. Explain the quantitative signal below in \
a concise, professional, risk-aware register. Describe the market structure (trending or \
ranging), the volatility regime and any disagreement between indicators. Do not mention \
leverage or specific price targets. Answer in at most three short paragraphs.";

const NEWS_BRIEF: &str = "Where the headlines below bear on the asset, relate them to the \
technical picture; ignore those that do not.";

pub fn build_rationale_prompt(
    symbol: &str,
    timeframe: &str,
    indicators: &IndicatorSet,
    base: &BaseSignal,
    headlines: &[NewsItem],
) -> String {
    let mut prompt = String::with_capacity(1024);
    prompt.push_str(ANALYST_BRIEF);
    prompt.push_str("\n\n");

    prompt.push_str(&format!("Asset: {symbol}\n"));
    prompt.push_str(&format!("Timeframe: {timeframe}\n"));
    match indicators.price {
        Some(price) => prompt.push_str(&format!("Current Price: {price:.2}\n")),
        None => prompt.push_str("Current Price: unavailable\n"),
    }

    prompt.push_str("\nIndicators:\n");
    if indicators.is_empty() {
        prompt.push_str("- none (insufficient history)\n");
    }
    for (name, indicator) in indicators.iter() {
        prompt.push_str(&format!("- {name}: {}\n", indicator.describe()));
    }

    prompt.push_str("\nIndicator votes:\n");
    for vote in &base.votes {
        prompt.push_str(&format!("- {}: {}\n", vote.indicator, vote.direction));
    }

    if !headlines.is_empty() {
        prompt.push_str("\nRecent Wire Headlines:\n");
        for item in headlines {
            prompt.push_str(&format!(
                "- [{}] {} ({} impact)\n",
                item.source, item.headline, item.impact
            ));
        }
        prompt.push_str(NEWS_BRIEF);
        prompt.push('\n');
    }

    prompt.push_str(&format!(
        "\nQuantitative signal: {} with {:.0}% indicator agreement.\n",
        base.direction,
        base.confidence * 100.0
    ));

    prompt
}
