use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use sled::IVec;

use crate::game::errors::GameError;
use crate::game::seed_loader;
use crate::game::types::{
    FarmRecord, MarketPriceRecord, ProgressRecord, QuestRecord, SchemeRecord, UserQuestRecord,
    UserRecord, UserSchemeRecord, FARM_SCHEMA_VERSION, MARKET_PRICE_SCHEMA_VERSION,
    PROGRESS_SCHEMA_VERSION, QUEST_SCHEMA_VERSION, SCHEME_SCHEMA_VERSION,
    USER_QUEST_SCHEMA_VERSION, USER_SCHEMA_VERSION, USER_SCHEME_SCHEMA_VERSION,
};

const TREE_USERS: &str = "users";
const TREE_FARMS: &str = "farms";
const TREE_QUESTS: &str = "quests";
const TREE_USER_QUESTS: &str = "user_quests";
const TREE_PROGRESS: &str = "progress";
const TREE_SCHEMES: &str = "schemes";
const TREE_USER_SCHEMES: &str = "user_schemes";
const TREE_MARKET_PRICES: &str = "market_prices";

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct GameStoreBuilder {
    path: PathBuf,
    seed_dir: Option<PathBuf>,
}

impl GameStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seed_dir: None,
        }
    }

    /// Seed the quest/scheme/market-price catalogs from JSON files in `dir`
    /// during initialization (only when the catalogs are still empty).
    pub fn with_seed_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.seed_dir = Some(dir.into());
        self
    }

    pub fn open(self) -> Result<GameStore, GameError> {
        GameStore::open_with_options(self.path, self.seed_dir.as_deref())
    }
}

/// Sled-backed persistence for all KrishiQuest entities: one tree per entity,
/// bincode-encoded records, schema version checked on every read.
///
/// The progress tree is keyed by the *owning user id* rather than the record
/// id, which makes "one progress record per user" structural.
pub struct GameStore {
    _db: sled::Db,
    users: sled::Tree,
    farms: sled::Tree,
    quests: sled::Tree,
    user_quests: sled::Tree,
    progress: sled::Tree,
    schemes: sled::Tree,
    user_schemes: sled::Tree,
    market_prices: sled::Tree,
    /// Per-user accrual locks so two quest completions racing for the same
    /// user cannot lose a progress update.
    accrual_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

/// Record counts per collection, for the `status` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub users: usize,
    pub farms: usize,
    pub quests: usize,
    pub user_quests: usize,
    pub schemes: usize,
    pub user_schemes: usize,
    pub market_prices: usize,
}

impl GameStore {
    /// Open (or create) the store rooted at `path` without seeding.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        Self::open_with_options(path, None)
    }

    fn open_with_options<P: AsRef<Path>>(
        path: P,
        seed_dir: Option<&Path>,
    ) -> Result<Self, GameError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let store = Self {
            users: db.open_tree(TREE_USERS)?,
            farms: db.open_tree(TREE_FARMS)?,
            quests: db.open_tree(TREE_QUESTS)?,
            user_quests: db.open_tree(TREE_USER_QUESTS)?,
            progress: db.open_tree(TREE_PROGRESS)?,
            schemes: db.open_tree(TREE_SCHEMES)?,
            user_schemes: db.open_tree(TREE_USER_SCHEMES)?,
            market_prices: db.open_tree(TREE_MARKET_PRICES)?,
            _db: db,
            accrual_locks: Mutex::new(HashMap::new()),
        };

        if let Some(dir) = seed_dir {
            store.seed_catalogs_if_needed(dir)?;
        }

        Ok(store)
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, GameError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, GameError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    fn check_schema(
        entity: &'static str,
        expected: u8,
        found: u8,
    ) -> Result<(), GameError> {
        if found != expected {
            return Err(GameError::SchemaMismatch {
                entity,
                expected,
                found,
            });
        }
        Ok(())
    }

    /// Obtain the accrual lock for one user, creating it on first use.
    pub fn accrual_lock(&self, user_id: &str) -> Result<Arc<Mutex<()>>, GameError> {
        let mut registry = self
            .accrual_locks
            .lock()
            .map_err(|_| GameError::Internal("accrual lock registry poisoned".to_string()))?;
        Ok(registry
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    // === Users ===

    /// Create a user together with its progress record. The pair is written
    /// in one flush so a user can never be observed without progress.
    pub fn create_user(&self, user: UserRecord) -> Result<UserRecord, GameError> {
        if self.find_user_by_mobile(&user.mobile_number)?.is_some() {
            return Err(GameError::Conflict(format!(
                "mobile number already registered: {}",
                user.mobile_number
            )));
        }
        let progress = ProgressRecord::new(&user.id);
        self.users
            .insert(user.id.as_bytes(), Self::serialize(&user)?)?;
        self.progress
            .insert(user.id.as_bytes(), Self::serialize(&progress)?)?;
        self.users.flush()?;
        self.progress.flush()?;
        Ok(user)
    }

    pub fn put_user(&self, user: UserRecord) -> Result<(), GameError> {
        self.users
            .insert(user.id.as_bytes(), Self::serialize(&user)?)?;
        self.users.flush()?;
        Ok(())
    }

    pub fn get_user(&self, id: &str) -> Result<UserRecord, GameError> {
        let Some(bytes) = self.users.get(id.as_bytes())? else {
            return Err(GameError::NotFound(format!("user: {}", id)));
        };
        let record: UserRecord = Self::deserialize(bytes)?;
        Self::check_schema("user", USER_SCHEMA_VERSION, record.schema_version)?;
        Ok(record)
    }

    pub fn find_user_by_mobile(&self, mobile: &str) -> Result<Option<UserRecord>, GameError> {
        for entry in self.users.iter() {
            let (_, bytes) = entry?;
            let record: UserRecord = Self::deserialize(bytes)?;
            if record.mobile_number == mobile {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// All users ordered by creation time (ties broken by id) so projections
    /// that promise insertion-order stability have a deterministic base.
    pub fn list_users(&self) -> Result<Vec<UserRecord>, GameError> {
        let mut users = Vec::new();
        for entry in self.users.iter() {
            let (_, bytes) = entry?;
            users.push(Self::deserialize::<UserRecord>(bytes)?);
        }
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    // === Farms ===

    /// Create a farm for an existing user. A user owns at most one farm.
    pub fn create_farm(&self, farm: FarmRecord) -> Result<FarmRecord, GameError> {
        self.get_user(&farm.user_id)?;
        if self.find_farm_by_user(&farm.user_id)?.is_some() {
            return Err(GameError::Conflict(format!(
                "user already has a farm: {}",
                farm.user_id
            )));
        }
        self.farms
            .insert(farm.id.as_bytes(), Self::serialize(&farm)?)?;
        self.farms.flush()?;
        Ok(farm)
    }

    pub fn get_farm(&self, id: &str) -> Result<FarmRecord, GameError> {
        let Some(bytes) = self.farms.get(id.as_bytes())? else {
            return Err(GameError::NotFound(format!("farm: {}", id)));
        };
        let record: FarmRecord = Self::deserialize(bytes)?;
        Self::check_schema("farm", FARM_SCHEMA_VERSION, record.schema_version)?;
        Ok(record)
    }

    pub fn find_farm_by_user(&self, user_id: &str) -> Result<Option<FarmRecord>, GameError> {
        for entry in self.farms.iter() {
            let (_, bytes) = entry?;
            let record: FarmRecord = Self::deserialize(bytes)?;
            if record.user_id == user_id {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    // === Quests ===

    pub fn put_quest(&self, quest: QuestRecord) -> Result<(), GameError> {
        self.quests
            .insert(quest.id.as_bytes(), Self::serialize(&quest)?)?;
        self.quests.flush()?;
        Ok(())
    }

    pub fn get_quest(&self, id: &str) -> Result<QuestRecord, GameError> {
        let Some(bytes) = self.quests.get(id.as_bytes())? else {
            return Err(GameError::NotFound(format!("quest: {}", id)));
        };
        let record: QuestRecord = Self::deserialize(bytes)?;
        Self::check_schema("quest", QUEST_SCHEMA_VERSION, record.schema_version)?;
        Ok(record)
    }

    /// Active quests, optionally filtered by category, in catalog order.
    pub fn list_quests(&self, category: Option<&str>) -> Result<Vec<QuestRecord>, GameError> {
        let mut quests = Vec::new();
        for entry in self.quests.iter() {
            let (_, bytes) = entry?;
            let record: QuestRecord = Self::deserialize(bytes)?;
            if !record.is_active {
                continue;
            }
            if let Some(cat) = category {
                if record.category != cat {
                    continue;
                }
            }
            quests.push(record);
        }
        quests.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(quests)
    }

    // === User quests ===

    pub fn put_user_quest(&self, user_quest: UserQuestRecord) -> Result<(), GameError> {
        self.user_quests
            .insert(user_quest.id.as_bytes(), Self::serialize(&user_quest)?)?;
        self.user_quests.flush()?;
        Ok(())
    }

    pub fn get_user_quest(&self, id: &str) -> Result<UserQuestRecord, GameError> {
        let Some(bytes) = self.user_quests.get(id.as_bytes())? else {
            return Err(GameError::NotFound(format!("user quest: {}", id)));
        };
        let record: UserQuestRecord = Self::deserialize(bytes)?;
        Self::check_schema(
            "user_quest",
            USER_QUEST_SCHEMA_VERSION,
            record.schema_version,
        )?;
        Ok(record)
    }

    pub fn list_user_quests(&self, user_id: &str) -> Result<Vec<UserQuestRecord>, GameError> {
        let mut records = Vec::new();
        for entry in self.user_quests.iter() {
            let (_, bytes) = entry?;
            let record: UserQuestRecord = Self::deserialize(bytes)?;
            if record.user_id == user_id {
                records.push(record);
            }
        }
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    pub fn find_user_quest(
        &self,
        user_id: &str,
        quest_id: &str,
    ) -> Result<Option<UserQuestRecord>, GameError> {
        for entry in self.user_quests.iter() {
            let (_, bytes) = entry?;
            let record: UserQuestRecord = Self::deserialize(bytes)?;
            if record.user_id == user_id && record.quest_id == quest_id {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    // === Progress ===

    pub fn put_progress(&self, progress: ProgressRecord) -> Result<(), GameError> {
        self.progress
            .insert(progress.user_id.as_bytes(), Self::serialize(&progress)?)?;
        self.progress.flush()?;
        Ok(())
    }

    pub fn get_progress(&self, user_id: &str) -> Result<ProgressRecord, GameError> {
        let Some(bytes) = self.progress.get(user_id.as_bytes())? else {
            return Err(GameError::NotFound(format!("progress for user: {}", user_id)));
        };
        let record: ProgressRecord = Self::deserialize(bytes)?;
        Self::check_schema("progress", PROGRESS_SCHEMA_VERSION, record.schema_version)?;
        Ok(record)
    }

    // === Schemes ===

    pub fn put_scheme(&self, scheme: SchemeRecord) -> Result<(), GameError> {
        self.schemes
            .insert(scheme.id.as_bytes(), Self::serialize(&scheme)?)?;
        self.schemes.flush()?;
        Ok(())
    }

    pub fn get_scheme(&self, id: &str) -> Result<SchemeRecord, GameError> {
        let Some(bytes) = self.schemes.get(id.as_bytes())? else {
            return Err(GameError::NotFound(format!("scheme: {}", id)));
        };
        let record: SchemeRecord = Self::deserialize(bytes)?;
        Self::check_schema("scheme", SCHEME_SCHEMA_VERSION, record.schema_version)?;
        Ok(record)
    }

    /// Active schemes, optionally filtered by category.
    pub fn list_schemes(&self, category: Option<&str>) -> Result<Vec<SchemeRecord>, GameError> {
        let mut schemes = Vec::new();
        for entry in self.schemes.iter() {
            let (_, bytes) = entry?;
            let record: SchemeRecord = Self::deserialize(bytes)?;
            if !record.is_active {
                continue;
            }
            if let Some(cat) = category {
                if record.category != cat {
                    continue;
                }
            }
            schemes.push(record);
        }
        schemes.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(schemes)
    }

    // === User schemes ===

    pub fn put_user_scheme(&self, user_scheme: UserSchemeRecord) -> Result<(), GameError> {
        self.user_schemes
            .insert(user_scheme.id.as_bytes(), Self::serialize(&user_scheme)?)?;
        self.user_schemes.flush()?;
        Ok(())
    }

    pub fn get_user_scheme(&self, id: &str) -> Result<UserSchemeRecord, GameError> {
        let Some(bytes) = self.user_schemes.get(id.as_bytes())? else {
            return Err(GameError::NotFound(format!("user scheme: {}", id)));
        };
        let record: UserSchemeRecord = Self::deserialize(bytes)?;
        Self::check_schema(
            "user_scheme",
            USER_SCHEME_SCHEMA_VERSION,
            record.schema_version,
        )?;
        Ok(record)
    }

    pub fn list_user_schemes(&self, user_id: &str) -> Result<Vec<UserSchemeRecord>, GameError> {
        let mut records = Vec::new();
        for entry in self.user_schemes.iter() {
            let (_, bytes) = entry?;
            let record: UserSchemeRecord = Self::deserialize(bytes)?;
            if record.user_id == user_id {
                records.push(record);
            }
        }
        records.sort_by(|a, b| a.applied_at.cmp(&b.applied_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    pub fn find_user_scheme(
        &self,
        user_id: &str,
        scheme_id: &str,
    ) -> Result<Option<UserSchemeRecord>, GameError> {
        for entry in self.user_schemes.iter() {
            let (_, bytes) = entry?;
            let record: UserSchemeRecord = Self::deserialize(bytes)?;
            if record.user_id == user_id && record.scheme_id == scheme_id {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    // === Market prices ===

    pub fn put_market_price(&self, price: MarketPriceRecord) -> Result<(), GameError> {
        self.market_prices
            .insert(price.id.as_bytes(), Self::serialize(&price)?)?;
        self.market_prices.flush()?;
        Ok(())
    }

    /// All quotes, optionally restricted to one district, oldest first.
    pub fn list_market_prices(
        &self,
        district: Option<&str>,
    ) -> Result<Vec<MarketPriceRecord>, GameError> {
        let mut prices = Vec::new();
        for entry in self.market_prices.iter() {
            let (_, bytes) = entry?;
            let record: MarketPriceRecord = Self::deserialize(bytes)?;
            Self::check_schema(
                "market_price",
                MARKET_PRICE_SCHEMA_VERSION,
                record.schema_version,
            )?;
            if let Some(d) = district {
                if record.district != d {
                    continue;
                }
            }
            prices.push(record);
        }
        prices.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(prices)
    }

    /// Quotes for one crop, newest first (stable for equal dates).
    pub fn latest_prices_by_crop(
        &self,
        crop: &str,
    ) -> Result<Vec<MarketPriceRecord>, GameError> {
        let mut prices = self.list_market_prices(None)?;
        prices.retain(|p| p.crop == crop);
        prices.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(prices)
    }

    // === Seeding ===

    /// Populate the quest/scheme/market-price catalogs from `seed_dir` when
    /// the corresponding tree is empty. Reopening an already-seeded store is
    /// a no-op; returns the number of records inserted.
    pub fn seed_catalogs_if_needed(&self, seed_dir: &Path) -> Result<usize, GameError> {
        let mut inserted = 0usize;

        if self.quests.is_empty() {
            for quest in seed_loader::load_quests_from_json(seed_dir.join("quests.json"))? {
                self.put_quest(quest)?;
                inserted += 1;
            }
        }
        if self.schemes.is_empty() {
            for scheme in seed_loader::load_schemes_from_json(seed_dir.join("schemes.json"))? {
                self.put_scheme(scheme)?;
                inserted += 1;
            }
        }
        if self.market_prices.is_empty() {
            for price in
                seed_loader::load_market_prices_from_json(seed_dir.join("market_prices.json"))?
            {
                self.put_market_price(price)?;
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            users: self.users.len(),
            farms: self.farms.len(),
            quests: self.quests.len(),
            user_quests: self.user_quests.len(),
            schemes: self.schemes.len(),
            user_schemes: self.user_schemes.len(),
            market_prices: self.market_prices.len(),
        }
    }
}
