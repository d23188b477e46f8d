/// Quest lifecycle management: starting quests, tracking per-step progress,
/// and the guarded completion transition that accrues rewards.
use log::{debug, info};

use crate::game::errors::GameError;
use crate::game::progress;
use crate::game::store::GameStore;
use crate::game::types::{QuestStatus, UserQuestRecord};
use crate::logutil::escape_log;
use crate::metrics;

/// Start a quest for a user. The attempt record is created in `in_progress`
/// with a zeroed step vector sized to the quest's step count. At most one
/// attempt may exist per (user, quest) pair; duplicates are rejected.
pub fn start_quest(
    store: &GameStore,
    user_id: &str,
    quest_id: &str,
) -> Result<UserQuestRecord, GameError> {
    store.get_user(user_id)?;
    let quest = store.get_quest(quest_id)?;
    if !quest.is_active {
        return Err(GameError::Validation(format!(
            "quest is not active: {}",
            quest_id
        )));
    }
    if store.find_user_quest(user_id, quest_id)?.is_some() {
        return Err(GameError::Conflict(format!(
            "quest already started for this user: {}",
            quest_id
        )));
    }

    let user_quest = UserQuestRecord::new(user_id, quest_id, quest.steps.len());
    store.put_user_quest(user_quest.clone())?;
    metrics::inc_quests_started();
    info!(
        "user {} started quest '{}' ({} steps)",
        user_id,
        escape_log(&quest.title),
        quest.steps.len()
    );
    Ok(user_quest)
}

/// Mark one step of an in-progress quest attempt done (or not done). The
/// progress vector keeps its length; out-of-range indexes are rejected, as is
/// touching a completed attempt.
pub fn set_step_progress(
    store: &GameStore,
    user_quest_id: &str,
    step_index: usize,
    done: bool,
) -> Result<UserQuestRecord, GameError> {
    let mut user_quest = store.get_user_quest(user_quest_id)?;
    if user_quest.is_completed() {
        return Err(GameError::Conflict(format!(
            "quest attempt already completed: {}",
            user_quest_id
        )));
    }
    crate::validation::validate_step_index(step_index, user_quest.progress.len())?;

    user_quest.progress[step_index] = done;
    if user_quest.status == QuestStatus::NotStarted {
        user_quest.status = QuestStatus::InProgress;
    }
    store.put_user_quest(user_quest.clone())?;
    debug!(
        "user quest {} step {} set to {} ({}/{} done)",
        user_quest_id,
        step_index,
        done,
        user_quest.steps_done(),
        user_quest.progress.len()
    );
    Ok(user_quest)
}

/// Complete a quest attempt and accrue its rewards.
///
/// Completion is a guarded transition: only an `in_progress` attempt with at
/// least 75% of its steps done may complete, so re-completion can never
/// double-count rewards. The attempt update and progress accrual run under
/// the owning user's accrual lock.
pub fn complete_quest(
    store: &GameStore,
    user_quest_id: &str,
) -> Result<UserQuestRecord, GameError> {
    let user_quest = store.get_user_quest(user_quest_id)?;
    let quest = store.get_quest(&user_quest.quest_id)?;

    let lock = store.accrual_lock(&user_quest.user_id)?;
    let _guard = lock
        .lock()
        .map_err(|_| GameError::Internal("accrual lock poisoned".to_string()))?;

    // Re-read under the lock: a racing completion may have won.
    let mut user_quest = store.get_user_quest(user_quest_id)?;
    if !user_quest.is_in_progress() {
        return Err(GameError::Conflict(format!(
            "quest attempt is not in progress: {}",
            user_quest_id
        )));
    }
    if !user_quest.meets_step_threshold() {
        return Err(GameError::Conflict(format!(
            "quest attempt has only {}/{} steps done; 75% required",
            user_quest.steps_done(),
            user_quest.progress.len()
        )));
    }

    user_quest.mark_completed();
    store.put_user_quest(user_quest.clone())?;
    progress::apply_quest_rewards(store, &user_quest.user_id, &quest)?;
    metrics::inc_quests_completed();
    info!(
        "user {} completed quest '{}' (+{} coins, +{} xp)",
        user_quest.user_id,
        escape_log(&quest.title),
        quest.coin_reward,
        quest.xp_reward
    );
    Ok(user_quest)
}
