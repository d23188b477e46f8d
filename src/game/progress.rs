//! Reward accrual against a user's progress record.
//!
//! Progress is created together with the user, so a missing record at accrual
//! time means a structural invariant is broken; it is surfaced as
//! [`GameError::InconsistentState`] rather than silently skipped.

use log::error;

use crate::game::errors::GameError;
use crate::game::store::GameStore;
use crate::game::types::{ProgressRecord, QuestRecord};

/// Fold `quest`'s rewards into the owning user's progress and persist the
/// result. Callers must hold the user's accrual lock (see
/// [`GameStore::accrual_lock`]) for the read-modify-write to be safe under
/// concurrent completions.
pub fn apply_quest_rewards(
    store: &GameStore,
    user_id: &str,
    quest: &QuestRecord,
) -> Result<ProgressRecord, GameError> {
    let mut progress = match store.get_progress(user_id) {
        Ok(progress) => progress,
        Err(GameError::NotFound(_)) => {
            error!(
                "progress record missing for user {} during accrual; user/progress creation invariant is broken",
                user_id
            );
            return Err(GameError::InconsistentState(format!(
                "progress missing for user: {}",
                user_id
            )));
        }
        Err(err) => return Err(err),
    };

    progress.apply_quest_rewards(quest);
    store.put_progress(progress.clone())?;
    Ok(progress)
}
