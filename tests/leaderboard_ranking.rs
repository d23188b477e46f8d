/// Integration tests for the leaderboard projection: ranking order, locality
/// filters through the farm join, and edge cases.
use krishiquest::game::leaderboard::leaderboard;
use krishiquest::game::types::FarmRecord;
use krishiquest::game::GameStore;

mod common;

fn farmer(store: &GameStore, name: &str, mobile: &str, district: &str, gp: &str, score: u32) {
    let user = common::create_user(store, name, mobile);
    let farm = FarmRecord::new(&user.id, "Maharashtra", district, "Arvi", gp, "Pimpalkhuta")
        .with_farm_size("1-2 acres")
        .with_soil_type("Black Cotton Soil")
        .with_primary_crops(["Cotton"])
        .with_water_source("Borewell");
    store.create_farm(farm).expect("farm");
    let mut progress = store.get_progress(&user.id).expect("progress");
    progress.sustainability_score = score;
    store.put_progress(progress).expect("put progress");
}

#[test]
fn global_ranking_is_descending_with_progress_for_every_row() {
    let (_dir, store) = common::open_store();
    farmer(&store, "Asha", "9000000001", "Wardha", "Pimpalkhuta", 40);
    farmer(&store, "Baban", "9000000002", "Nagpur", "Khapri", 90);
    farmer(&store, "Chitra", "9000000003", "Wardha", "Salod", 60);

    let board = leaderboard(&store, None, None).unwrap();
    assert_eq!(board.len(), 3);
    let scores: Vec<u32> = board
        .iter()
        .map(|e| e.progress.sustainability_score)
        .collect();
    assert_eq!(scores, vec![90, 60, 40]);
    for entry in &board {
        assert_eq!(entry.progress.user_id, entry.user.id);
    }
}

#[test]
fn district_filter_returns_only_matching_farms() {
    let (_dir, store) = common::open_store();
    farmer(&store, "Wardha farmer", "9000000001", "Wardha", "Pimpalkhuta", 40);
    farmer(&store, "Nagpur farmer", "9000000002", "Nagpur", "Khapri", 90);

    let board = leaderboard(&store, None, Some("Wardha")).unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].user.name, "Wardha farmer");
}

#[test]
fn combined_filters_require_both_matches() {
    let (_dir, store) = common::open_store();
    farmer(&store, "A", "9000000001", "Wardha", "Pimpalkhuta", 10);
    farmer(&store, "B", "9000000002", "Wardha", "Salod", 20);

    let board = leaderboard(&store, Some("Salod"), Some("Wardha")).unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].user.name, "B");

    let none = leaderboard(&store, Some("Salod"), Some("Nagpur")).unwrap();
    assert!(none.is_empty());
}

#[test]
fn user_without_farm_appears_only_in_global_ranking() {
    let (_dir, store) = common::open_store();
    let user = common::create_user(&store, "No farm", "9000000001");
    let mut progress = store.get_progress(&user.id).unwrap();
    progress.sustainability_score = 99;
    store.put_progress(progress).unwrap();
    farmer(&store, "Farmer", "9000000002", "Wardha", "Pimpalkhuta", 1);

    let global = leaderboard(&store, None, None).unwrap();
    assert_eq!(global.len(), 2);
    assert_eq!(global[0].user.name, "No farm");

    let filtered = leaderboard(&store, None, Some("Wardha")).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].user.name, "Farmer");
}
