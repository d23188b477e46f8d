/// Government-scheme application lifecycle: applying, and the approve/reject
/// decision on a pending application.
use log::info;

use crate::game::errors::GameError;
use crate::game::store::GameStore;
use crate::game::types::UserSchemeRecord;
use crate::logutil::escape_log;
use crate::metrics;

/// Decision on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeDecision {
    Approve,
    Reject,
}

/// Apply for a scheme. The application starts in `in_progress` with
/// `applied_at` stamped. At most one application per (user, scheme) pair.
pub fn apply_for_scheme(
    store: &GameStore,
    user_id: &str,
    scheme_id: &str,
) -> Result<UserSchemeRecord, GameError> {
    store.get_user(user_id)?;
    let scheme = store.get_scheme(scheme_id)?;
    if !scheme.is_active {
        return Err(GameError::Validation(format!(
            "scheme is not active: {}",
            scheme_id
        )));
    }
    if store.find_user_scheme(user_id, scheme_id)?.is_some() {
        return Err(GameError::Conflict(format!(
            "scheme already applied for by this user: {}",
            scheme_id
        )));
    }

    let user_scheme = UserSchemeRecord::new(user_id, scheme_id);
    store.put_user_scheme(user_scheme.clone())?;
    metrics::inc_schemes_applied();
    info!(
        "user {} applied for scheme '{}'",
        user_id,
        escape_log(&scheme.name)
    );
    Ok(user_scheme)
}

/// Decide a pending application: `in_progress` may move to `approved`
/// (stamping `approved_at`) or `rejected`. Any other transition is a conflict.
pub fn decide_application(
    store: &GameStore,
    user_scheme_id: &str,
    decision: SchemeDecision,
) -> Result<UserSchemeRecord, GameError> {
    let mut user_scheme = store.get_user_scheme(user_scheme_id)?;
    if !user_scheme.is_pending() {
        return Err(GameError::Conflict(format!(
            "application is not pending: {}",
            user_scheme_id
        )));
    }

    match decision {
        SchemeDecision::Approve => user_scheme.mark_approved(),
        SchemeDecision::Reject => user_scheme.mark_rejected(),
    }
    store.put_user_scheme(user_scheme.clone())?;
    info!(
        "application {} decided: {:?}",
        user_scheme_id, user_scheme.status
    );
    Ok(user_scheme)
}
