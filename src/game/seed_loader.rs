//! Seed data loaders for data-driven catalog initialization
//!
//! This module provides functions to load seed data from JSON files in
//! data/seeds/. This approach allows operators to customize the default quest,
//! scheme, and market-price catalogs without recompiling.

use crate::game::errors::GameError;
use crate::game::types::{
    MarketPriceRecord, PriceTrend, QuestDifficulty, QuestRecord, SchemeRecord,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn parse_error(path: &Path, err: serde_json::Error) -> GameError {
    GameError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("Failed to parse {}: {}", path.display(), err),
    ))
}

/// Load quests from data/seeds/quests.json
pub fn load_quests_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<QuestRecord>, GameError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let quests: Vec<QuestSeed> =
        serde_json::from_str(&contents).map_err(|e| parse_error(path, e))?;

    let records = quests
        .into_iter()
        .map(|seed| {
            let mut quest = QuestRecord::new(
                &seed.title,
                &seed.description,
                &seed.category,
                seed.difficulty,
            )
            .with_rewards(seed.coin_reward, seed.xp_reward);
            if let Some(ref badge) = seed.badge_reward {
                quest = quest.with_badge(badge);
            }
            for step in &seed.steps {
                quest = quest.with_step(step);
            }
            if !seed.is_active {
                quest = quest.deactivated();
            }
            quest
        })
        .collect();

    Ok(records)
}

/// Load schemes from data/seeds/schemes.json
pub fn load_schemes_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<SchemeRecord>, GameError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let schemes: Vec<SchemeSeed> =
        serde_json::from_str(&contents).map_err(|e| parse_error(path, e))?;

    let records = schemes
        .into_iter()
        .map(|seed| {
            let mut scheme =
                SchemeRecord::new(&seed.name, &seed.description, &seed.category, &seed.benefits);
            for criterion in &seed.eligibility_criteria {
                scheme = scheme.with_eligibility(criterion);
            }
            for step in &seed.application_steps {
                scheme = scheme.with_application_step(step);
            }
            for document in &seed.documents_required {
                scheme = scheme.with_document(document);
            }
            scheme
        })
        .collect();

    Ok(records)
}

/// Load market prices from data/seeds/market_prices.json. Quotes without an
/// explicit date are stamped with the load time.
pub fn load_market_prices_from_json<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<MarketPriceRecord>, GameError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let prices: Vec<MarketPriceSeed> =
        serde_json::from_str(&contents).map_err(|e| parse_error(path, e))?;

    let records = prices
        .into_iter()
        .map(|seed| {
            let mut price = MarketPriceRecord::new(
                &seed.crop,
                seed.price,
                &seed.mandi,
                &seed.district,
                &seed.state,
            );
            if let Some(ref variety) = seed.variety {
                price = price.with_variety(variety);
            }
            if let Some(ref unit) = seed.unit {
                price = price.with_unit(unit);
            }
            if let Some(trend) = seed.trend {
                price = price.with_trend(trend);
            }
            if let Some(date) = seed.date {
                price = price.with_date(date);
            }
            price
        })
        .collect();

    Ok(records)
}

// ============================================================================
// Seed data structures that match JSON format
// ============================================================================

fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
struct QuestSeed {
    title: String,
    description: String,
    category: String,
    difficulty: QuestDifficulty,
    coin_reward: u32,
    xp_reward: u32,
    #[serde(default)]
    badge_reward: Option<String>,
    steps: Vec<String>,
    #[serde(default = "default_active")]
    is_active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct SchemeSeed {
    name: String,
    description: String,
    category: String,
    #[serde(default)]
    eligibility_criteria: Vec<String>,
    benefits: String,
    #[serde(default)]
    application_steps: Vec<String>,
    #[serde(default)]
    documents_required: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MarketPriceSeed {
    crop: String,
    #[serde(default)]
    variety: Option<String>,
    price: u32,
    #[serde(default)]
    unit: Option<String>,
    mandi: String,
    district: String,
    state: String,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
    #[serde(default)]
    trend: Option<PriceTrend>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_nonexistent_file_errors() {
        let result = load_quests_from_json("nonexistent.json");
        assert!(result.is_err());
    }

    #[test]
    fn quest_seed_parses_with_optional_badge() {
        let json = r#"[
            {
                "title": "Plant Marigold Border",
                "description": "Plant marigold flowers around crop fields.",
                "category": "Pest Control",
                "difficulty": "easy",
                "coin_reward": 100,
                "xp_reward": 8,
                "steps": ["Purchase marigold seeds", "Sow seeds around field perimeter"]
            }
        ]"#;
        let seeds: Vec<QuestSeed> = serde_json::from_str(json).unwrap();
        assert_eq!(seeds.len(), 1);
        assert!(seeds[0].badge_reward.is_none());
        assert!(seeds[0].is_active);
        assert_eq!(seeds[0].difficulty, QuestDifficulty::Easy);
    }

    #[test]
    fn market_price_seed_defaults_unit_and_date() {
        let json = r#"[
            {
                "crop": "Wheat",
                "variety": "Premium",
                "price": 2350,
                "mandi": "Wardha Mandi",
                "district": "Wardha",
                "state": "Maharashtra",
                "trend": "up"
            }
        ]"#;
        let seeds: Vec<MarketPriceSeed> = serde_json::from_str(json).unwrap();
        assert_eq!(seeds[0].trend, Some(PriceTrend::Up));
        assert!(seeds[0].date.is_none());
        assert!(seeds[0].unit.is_none());
    }
}
