//! Test utilities & fixtures shared by the integration suites.

use std::path::{Path, PathBuf};

use krishiquest::game::types::{QuestDifficulty, QuestRecord, UserRecord};
use krishiquest::game::{GameStore, GameStoreBuilder};
use tempfile::TempDir;

/// Return the path to the seed catalogs shipped with the repository.
#[allow(dead_code)] // Not every suite seeds catalogs.
pub fn seed_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("seeds")
}

/// Open a throwaway store in a temp dir. The TempDir must stay alive for the
/// duration of the test.
pub fn open_store() -> (TempDir, GameStore) {
    let dir = TempDir::new().expect("tempdir");
    let store = GameStoreBuilder::new(dir.path()).open().expect("store");
    (dir, store)
}

/// Open a throwaway store seeded from the repository catalogs.
#[allow(dead_code)] // Not every suite seeds catalogs.
pub fn open_seeded_store() -> (TempDir, GameStore) {
    let dir = TempDir::new().expect("tempdir");
    let store = GameStoreBuilder::new(dir.path())
        .with_seed_dir(seed_root())
        .open()
        .expect("store");
    (dir, store)
}

#[allow(dead_code)]
pub fn create_user(store: &GameStore, name: &str, mobile: &str) -> UserRecord {
    store
        .create_user(UserRecord::new(name, mobile, "31-45", "hi"))
        .expect("create user")
}

/// A four-step quest mirroring the Jeevamrutha catalog entry.
#[allow(dead_code)]
pub fn put_compost_quest(store: &GameStore) -> QuestRecord {
    let quest = QuestRecord::new(
        "Prepare Jeevamrutha",
        "Create organic liquid fertilizer using cow dung, cow urine, jaggery, and gram flour.",
        "Soil Health",
        QuestDifficulty::Medium,
    )
    .with_rewards(150, 10)
    .with_badge("Compost Master")
    .with_step("Watch preparation video")
    .with_step("Gather ingredients (cow dung, cow urine, jaggery, gram flour)")
    .with_step("Mix and ferment for 7 days")
    .with_step("Upload completion photo");
    store.put_quest(quest.clone()).expect("put quest");
    quest
}
