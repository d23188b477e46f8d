/// Leaderboard projection: joins users, progress, and farms, then ranks by
/// sustainability score.
use serde::Serialize;

use crate::game::errors::GameError;
use crate::game::store::GameStore;
use crate::game::types::{ProgressRecord, UserRecord};

/// One ranked row: the user together with their progress.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeaderboardEntry {
    pub user: UserRecord,
    pub progress: ProgressRecord,
}

/// Produce the ranking, optionally restricted to a gram panchayat and/or
/// district (matched exactly against the user's farm).
///
/// Sorted descending by sustainability score; ties keep user creation order
/// (stable sort over the store's creation-ordered user listing). Users
/// without a farm are excluded only when a locality filter is supplied. An
/// empty result is a valid outcome.
pub fn leaderboard(
    store: &GameStore,
    gram_panchayat: Option<&str>,
    district: Option<&str>,
) -> Result<Vec<LeaderboardEntry>, GameError> {
    let mut entries = Vec::new();

    for user in store.list_users()? {
        let progress = match store.get_progress(&user.id) {
            Ok(progress) => progress,
            Err(GameError::NotFound(_)) => continue,
            Err(err) => return Err(err),
        };

        if gram_panchayat.is_some() || district.is_some() {
            let Some(farm) = store.find_farm_by_user(&user.id)? else {
                continue;
            };
            if let Some(gp) = gram_panchayat {
                if farm.gram_panchayat != gp {
                    continue;
                }
            }
            if let Some(d) = district {
                if farm.district != d {
                    continue;
                }
            }
        }

        entries.push(LeaderboardEntry { user, progress });
    }

    entries.sort_by(|a, b| {
        b.progress
            .sustainability_score
            .cmp(&a.progress.sustainability_score)
    });
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::store::GameStoreBuilder;
    use crate::game::types::{FarmRecord, UserRecord};
    use tempfile::TempDir;

    fn open_store() -> (TempDir, GameStore) {
        let dir = TempDir::new().expect("tempdir");
        let store = GameStoreBuilder::new(dir.path()).open().expect("store");
        (dir, store)
    }

    fn user_with_score(
        store: &GameStore,
        name: &str,
        mobile: &str,
        district: Option<&str>,
        score: u32,
    ) -> String {
        let user = store
            .create_user(UserRecord::new(name, mobile, "31-45", "hi"))
            .expect("user");
        if let Some(d) = district {
            let farm = FarmRecord::new(&user.id, "Maharashtra", d, "Taluk", "Panchayat", "Village")
                .with_farm_size("1-2 acres")
                .with_soil_type("Black Cotton Soil")
                .with_primary_crops(["Cotton"])
                .with_water_source("Borewell");
            store.create_farm(farm).expect("farm");
        }
        let mut progress = store.get_progress(&user.id).expect("progress");
        progress.sustainability_score = score;
        store.put_progress(progress).expect("put progress");
        user.id
    }

    #[test]
    fn global_ranking_sorts_descending() {
        let (_dir, store) = open_store();
        user_with_score(&store, "Low", "9000000001", None, 10);
        user_with_score(&store, "High", "9000000002", None, 90);
        user_with_score(&store, "Mid", "9000000003", None, 40);

        let board = leaderboard(&store, None, None).unwrap();
        let scores: Vec<u32> = board
            .iter()
            .map(|e| e.progress.sustainability_score)
            .collect();
        assert_eq!(scores, vec![90, 40, 10]);
    }

    #[test]
    fn district_filter_excludes_other_districts() {
        let (_dir, store) = open_store();
        user_with_score(&store, "Wardha farmer", "9000000001", Some("Wardha"), 40);
        user_with_score(&store, "Nagpur farmer", "9000000002", Some("Nagpur"), 90);

        let board = leaderboard(&store, None, Some("Wardha")).unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].user.name, "Wardha farmer");
        assert_eq!(board[0].progress.sustainability_score, 40);
    }

    #[test]
    fn farmless_users_drop_out_only_under_locality_filter() {
        let (_dir, store) = open_store();
        user_with_score(&store, "No farm", "9000000001", None, 50);
        user_with_score(&store, "Wardha farmer", "9000000002", Some("Wardha"), 30);

        let global = leaderboard(&store, None, None).unwrap();
        assert_eq!(global.len(), 2);

        let filtered = leaderboard(&store, None, Some("Wardha")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].user.name, "Wardha farmer");
    }

    #[test]
    fn gram_panchayat_filter_matches_exactly() {
        let (_dir, store) = open_store();
        let id = user_with_score(&store, "Farmer", "9000000001", Some("Wardha"), 20);
        let farm = store.find_farm_by_user(&id).unwrap().unwrap();
        assert_eq!(farm.gram_panchayat, "Panchayat");

        assert_eq!(leaderboard(&store, Some("Panchayat"), None).unwrap().len(), 1);
        assert!(leaderboard(&store, Some("panchayat"), None).unwrap().is_empty());
        assert!(leaderboard(&store, Some("Other"), None).unwrap().is_empty());
    }

    #[test]
    fn ties_keep_creation_order() {
        let (_dir, store) = open_store();
        user_with_score(&store, "First", "9000000001", None, 25);
        user_with_score(&store, "Second", "9000000002", None, 25);

        let board = leaderboard(&store, None, None).unwrap();
        assert_eq!(board[0].user.name, "First");
        assert_eq!(board[1].user.name, "Second");
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let (_dir, store) = open_store();
        let board = leaderboard(&store, None, Some("Akola")).unwrap();
        assert!(board.is_empty());
    }
}
