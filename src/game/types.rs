use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub const USER_SCHEMA_VERSION: u8 = 1;
pub const FARM_SCHEMA_VERSION: u8 = 1;
pub const QUEST_SCHEMA_VERSION: u8 = 1;
pub const USER_QUEST_SCHEMA_VERSION: u8 = 1;
pub const PROGRESS_SCHEMA_VERSION: u8 = 1;
pub const SCHEME_SCHEMA_VERSION: u8 = 1;
pub const USER_SCHEME_SCHEMA_VERSION: u8 = 1;
pub const MARKET_PRICE_SCHEMA_VERSION: u8 = 1;

/// Relative difficulty of a quest as shown in the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestDifficulty {
    Easy,
    Medium,
    High,
}

/// Lifecycle state of a user's attempt at a quest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Lifecycle state of a scheme application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SchemeStatus {
    NotStarted,
    InProgress,
    Approved,
    Rejected,
}

/// Direction of a market quote relative to the previous one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    Up,
    Down,
    Stable,
}

fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// A farmer's account. Owns exactly one [`FarmRecord`] and one
/// [`ProgressRecord`]; the progress record is created together with the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub mobile_number: String,
    pub age_group: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl UserRecord {
    pub fn new(name: &str, mobile_number: &str, age_group: &str, language: &str) -> Self {
        Self {
            id: new_record_id(),
            name: name.to_string(),
            mobile_number: mobile_number.to_string(),
            age_group: age_group.to_string(),
            language: language.to_string(),
            created_at: Utc::now(),
            schema_version: USER_SCHEMA_VERSION,
        }
    }
}

/// Location and agronomy details for a user's farm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FarmRecord {
    pub id: String,
    pub user_id: String,
    pub state: String,
    pub district: String,
    pub taluk: String,
    pub gram_panchayat: String,
    pub village: String,
    pub farm_size: String,
    pub soil_type: String,
    pub primary_crops: Vec<String>,
    pub water_source: String,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl FarmRecord {
    pub fn new(
        user_id: &str,
        state: &str,
        district: &str,
        taluk: &str,
        gram_panchayat: &str,
        village: &str,
    ) -> Self {
        Self {
            id: new_record_id(),
            user_id: user_id.to_string(),
            state: state.to_string(),
            district: district.to_string(),
            taluk: taluk.to_string(),
            gram_panchayat: gram_panchayat.to_string(),
            village: village.to_string(),
            farm_size: String::new(),
            soil_type: String::new(),
            primary_crops: Vec::new(),
            water_source: String::new(),
            created_at: Utc::now(),
            schema_version: FARM_SCHEMA_VERSION,
        }
    }

    pub fn with_farm_size(mut self, farm_size: &str) -> Self {
        self.farm_size = farm_size.to_string();
        self
    }

    pub fn with_soil_type(mut self, soil_type: &str) -> Self {
        self.soil_type = soil_type.to_string();
        self
    }

    pub fn with_primary_crops<I, S>(mut self, crops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_crops = crops.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_water_source(mut self, water_source: &str) -> Self {
        self.water_source = water_source.to_string();
        self
    }
}

/// Catalog entry defining a quest and its fixed rewards. Static reference
/// data; immutable after seeding except for the activation flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: QuestDifficulty,
    pub coin_reward: u32,
    pub xp_reward: u32,
    #[serde(default)]
    pub badge_reward: Option<String>,
    pub steps: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl QuestRecord {
    pub fn new(title: &str, description: &str, category: &str, difficulty: QuestDifficulty) -> Self {
        Self {
            id: new_record_id(),
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            difficulty,
            coin_reward: 0,
            xp_reward: 0,
            badge_reward: None,
            steps: Vec::new(),
            is_active: true,
            created_at: Utc::now(),
            schema_version: QUEST_SCHEMA_VERSION,
        }
    }

    pub fn with_rewards(mut self, coins: u32, xp: u32) -> Self {
        self.coin_reward = coins;
        self.xp_reward = xp;
        self
    }

    pub fn with_badge(mut self, badge: &str) -> Self {
        self.badge_reward = Some(badge.to_string());
        self
    }

    pub fn with_step(mut self, step: &str) -> Self {
        self.steps.push(step.to_string());
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// A user's attempt at a quest. At most one record exists per
/// (user, quest) pair; `progress` always has one entry per quest step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserQuestRecord {
    pub id: String,
    pub user_id: String,
    pub quest_id: String,
    pub status: QuestStatus,
    pub progress: Vec<bool>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl UserQuestRecord {
    pub fn new(user_id: &str, quest_id: &str, step_count: usize) -> Self {
        Self {
            id: new_record_id(),
            user_id: user_id.to_string(),
            quest_id: quest_id.to_string(),
            status: QuestStatus::InProgress,
            progress: vec![false; step_count],
            completed_at: None,
            created_at: Utc::now(),
            schema_version: USER_QUEST_SCHEMA_VERSION,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == QuestStatus::InProgress
    }

    pub fn is_completed(&self) -> bool {
        self.status == QuestStatus::Completed
    }

    pub fn steps_done(&self) -> usize {
        self.progress.iter().filter(|done| **done).count()
    }

    /// Completion requires at least 75% of steps marked done.
    pub fn meets_step_threshold(&self) -> bool {
        !self.progress.is_empty() && self.steps_done() * 4 >= self.progress.len() * 3
    }

    pub fn mark_completed(&mut self) {
        self.status = QuestStatus::Completed;
        self.completed_at = Some(Utc::now());
    }
}

/// Cumulative gamification state for one user. One record per user, keyed by
/// the owning user id; mutated only by the reward accrual path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub id: String,
    pub user_id: String,
    pub level: u32,
    pub total_xp: u32,
    pub total_coins: u32,
    pub sustainability_score: u32,
    pub badges: Vec<String>,
    pub completed_quests: u32,
    pub schema_version: u8,
}

impl ProgressRecord {
    pub fn new(user_id: &str) -> Self {
        Self {
            id: new_record_id(),
            user_id: user_id.to_string(),
            level: 1,
            total_xp: 0,
            total_coins: 0,
            sustainability_score: 0,
            badges: Vec::new(),
            completed_quests: 0,
            schema_version: PROGRESS_SCHEMA_VERSION,
        }
    }

    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges.iter().any(|b| b == badge)
    }

    /// Fold one completed quest's rewards into the totals. Badges keep set
    /// semantics: an already-held badge name is not appended again.
    pub fn apply_quest_rewards(&mut self, quest: &QuestRecord) {
        self.total_xp = self.total_xp.saturating_add(quest.xp_reward);
        self.total_coins = self.total_coins.saturating_add(quest.coin_reward);
        self.completed_quests = self.completed_quests.saturating_add(1);
        self.sustainability_score = self.sustainability_score.saturating_add(quest.xp_reward / 2);
        if let Some(ref badge) = quest.badge_reward {
            if !self.has_badge(badge) {
                self.badges.push(badge.clone());
            }
        }
    }
}

/// Catalog entry for a government scheme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemeRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub eligibility_criteria: Vec<String>,
    pub benefits: String,
    pub application_steps: Vec<String>,
    pub documents_required: Vec<String>,
    pub is_active: bool,
    pub schema_version: u8,
}

impl SchemeRecord {
    pub fn new(name: &str, description: &str, category: &str, benefits: &str) -> Self {
        Self {
            id: new_record_id(),
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            eligibility_criteria: Vec::new(),
            benefits: benefits.to_string(),
            application_steps: Vec::new(),
            documents_required: Vec::new(),
            is_active: true,
            schema_version: SCHEME_SCHEMA_VERSION,
        }
    }

    pub fn with_eligibility(mut self, criterion: &str) -> Self {
        self.eligibility_criteria.push(criterion.to_string());
        self
    }

    pub fn with_application_step(mut self, step: &str) -> Self {
        self.application_steps.push(step.to_string());
        self
    }

    pub fn with_document(mut self, document: &str) -> Self {
        self.documents_required.push(document.to_string());
        self
    }
}

/// A user's application against a scheme. At most one per (user, scheme).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSchemeRecord {
    pub id: String,
    pub user_id: String,
    pub scheme_id: String,
    pub status: SchemeStatus,
    #[serde(default)]
    pub application_data: HashMap<String, String>,
    #[serde(default)]
    pub applied_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    pub schema_version: u8,
}

impl UserSchemeRecord {
    pub fn new(user_id: &str, scheme_id: &str) -> Self {
        Self {
            id: new_record_id(),
            user_id: user_id.to_string(),
            scheme_id: scheme_id.to_string(),
            status: SchemeStatus::InProgress,
            application_data: HashMap::new(),
            applied_at: Some(Utc::now()),
            approved_at: None,
            schema_version: USER_SCHEME_SCHEMA_VERSION,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == SchemeStatus::InProgress
    }

    pub fn mark_approved(&mut self) {
        self.status = SchemeStatus::Approved;
        self.approved_at = Some(Utc::now());
    }

    pub fn mark_rejected(&mut self) {
        self.status = SchemeStatus::Rejected;
    }
}

/// An immutable timestamped market quote. Append-only reference data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketPriceRecord {
    pub id: String,
    pub crop: String,
    #[serde(default)]
    pub variety: Option<String>,
    pub price: u32,
    pub unit: String,
    pub mandi: String,
    pub district: String,
    pub state: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub trend: Option<PriceTrend>,
    pub schema_version: u8,
}

impl MarketPriceRecord {
    pub fn new(crop: &str, price: u32, mandi: &str, district: &str, state: &str) -> Self {
        Self {
            id: new_record_id(),
            crop: crop.to_string(),
            variety: None,
            price,
            unit: "quintal".to_string(),
            mandi: mandi.to_string(),
            district: district.to_string(),
            state: state.to_string(),
            date: Utc::now(),
            trend: None,
            schema_version: MARKET_PRICE_SCHEMA_VERSION,
        }
    }

    pub fn with_variety(mut self, variety: &str) -> Self {
        self.variety = Some(variety.to_string());
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    pub fn with_trend(mut self, trend: PriceTrend) -> Self {
        self.trend = Some(trend);
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }
}
