//! Minimal metrics scaffolding: process-wide counters for the domain
//! operations, surfaced by the `status` command and the /api/status endpoint.
use std::sync::atomic::{AtomicU64, Ordering};

static USERS_CREATED: AtomicU64 = AtomicU64::new(0);
static QUESTS_STARTED: AtomicU64 = AtomicU64::new(0);
static QUESTS_COMPLETED: AtomicU64 = AtomicU64::new(0);
static SCHEMES_APPLIED: AtomicU64 = AtomicU64::new(0);

pub fn inc_users_created() {
    USERS_CREATED.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_quests_started() {
    QUESTS_STARTED.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_quests_completed() {
    QUESTS_COMPLETED.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_schemes_applied() {
    SCHEMES_APPLIED.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct Snapshot {
    pub users_created: u64,
    pub quests_started: u64,
    pub quests_completed: u64,
    pub schemes_applied: u64,
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        users_created: USERS_CREATED.load(Ordering::Relaxed),
        quests_started: QUESTS_STARTED.load(Ordering::Relaxed),
        quests_completed: QUESTS_COMPLETED.load(Ordering::Relaxed),
        schemes_applied: SCHEMES_APPLIED.load(Ordering::Relaxed),
    }
}
