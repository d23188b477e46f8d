/// Integration tests for the quest lifecycle: starting, step tracking, the
/// guarded completion transition, and reward accrual against user progress.
use krishiquest::game::quest::{complete_quest, set_step_progress, start_quest};
use krishiquest::game::types::{QuestDifficulty, QuestRecord, QuestStatus};
use krishiquest::game::GameError;

mod common;

#[test]
fn full_lifecycle_accrues_expected_progress() {
    let (_dir, store) = common::open_store();
    let user = common::create_user(&store, "Ravi", "9876543210");
    let quest = common::put_compost_quest(&store);

    let attempt = start_quest(&store, &user.id, &quest.id).unwrap();
    assert_eq!(attempt.status, QuestStatus::InProgress);
    assert_eq!(attempt.progress, vec![false; 4]);

    for step in 0..4 {
        set_step_progress(&store, &attempt.id, step, true).unwrap();
    }
    let completed = complete_quest(&store, &attempt.id).unwrap();
    assert!(completed.completed_at.is_some());

    // Expected accrual for xp=10, coins=150, badge="Compost Master"
    let progress = store.get_progress(&user.id).unwrap();
    assert_eq!(progress.total_xp, 10);
    assert_eq!(progress.total_coins, 150);
    assert_eq!(progress.sustainability_score, 5);
    assert_eq!(progress.completed_quests, 1);
    assert_eq!(progress.badges, vec!["Compost Master".to_string()]);
}

#[test]
fn second_quest_without_badge_extends_totals_only() {
    let (_dir, store) = common::open_store();
    let user = common::create_user(&store, "Ravi", "9876543210");
    let first = common::put_compost_quest(&store);
    let second = QuestRecord::new(
        "Mulch the Vegetable Beds",
        "Cover beds with crop residue to retain moisture.",
        "Soil Health",
        QuestDifficulty::Easy,
    )
    .with_rewards(100, 8)
    .with_step("Collect crop residue")
    .with_step("Spread mulch across beds");
    store.put_quest(second.clone()).unwrap();

    for quest in [&first, &second] {
        let attempt = start_quest(&store, &user.id, &quest.id).unwrap();
        for step in 0..quest.steps.len() {
            set_step_progress(&store, &attempt.id, step, true).unwrap();
        }
        complete_quest(&store, &attempt.id).unwrap();
    }

    let progress = store.get_progress(&user.id).unwrap();
    assert_eq!(progress.total_xp, 18);
    assert_eq!(progress.total_coins, 250);
    assert_eq!(progress.sustainability_score, 9);
    assert_eq!(progress.completed_quests, 2);
    assert_eq!(progress.badges, vec!["Compost Master".to_string()]);
}

#[test]
fn totals_never_decrease_across_completions() {
    let (_dir, store) = common::open_store();
    let user = common::create_user(&store, "Ravi", "9876543210");

    let mut last_xp = 0;
    let mut last_coins = 0;
    for i in 0..3 {
        let quest = QuestRecord::new(
            &format!("Quest {}", i),
            "d",
            "Soil Health",
            QuestDifficulty::Easy,
        )
        .with_rewards(50 + i, 5)
        .with_step("only step");
        store.put_quest(quest.clone()).unwrap();

        let attempt = start_quest(&store, &user.id, &quest.id).unwrap();
        set_step_progress(&store, &attempt.id, 0, true).unwrap();
        complete_quest(&store, &attempt.id).unwrap();

        let progress = store.get_progress(&user.id).unwrap();
        assert!(progress.total_xp >= last_xp);
        assert!(progress.total_coins >= last_coins);
        last_xp = progress.total_xp;
        last_coins = progress.total_coins;
    }
}

#[test]
fn duplicate_badge_award_keeps_set_semantics() {
    let (_dir, store) = common::open_store();
    let user = common::create_user(&store, "Ravi", "9876543210");

    for i in 0..2 {
        let quest = QuestRecord::new(
            &format!("Compost round {}", i),
            "d",
            "Soil Health",
            QuestDifficulty::Easy,
        )
        .with_rewards(10, 2)
        .with_badge("Compost Master")
        .with_step("only step");
        store.put_quest(quest.clone()).unwrap();
        let attempt = start_quest(&store, &user.id, &quest.id).unwrap();
        set_step_progress(&store, &attempt.id, 0, true).unwrap();
        complete_quest(&store, &attempt.id).unwrap();
    }

    let progress = store.get_progress(&user.id).unwrap();
    assert_eq!(progress.completed_quests, 2);
    assert_eq!(
        progress.badges,
        vec!["Compost Master".to_string()],
        "same badge from two quests must appear once"
    );
}

#[test]
fn starting_twice_is_rejected_and_leaves_one_attempt() {
    let (_dir, store) = common::open_store();
    let user = common::create_user(&store, "Ravi", "9876543210");
    let quest = common::put_compost_quest(&store);

    start_quest(&store, &user.id, &quest.id).unwrap();
    let err = start_quest(&store, &user.id, &quest.id).expect_err("duplicate start");
    assert!(matches!(err, GameError::Conflict(_)));
    assert_eq!(store.list_user_quests(&user.id).unwrap().len(), 1);
}

#[test]
fn completion_gate_blocks_until_three_of_four_steps() {
    let (_dir, store) = common::open_store();
    let user = common::create_user(&store, "Ravi", "9876543210");
    let quest = common::put_compost_quest(&store);
    let attempt = start_quest(&store, &user.id, &quest.id).unwrap();

    set_step_progress(&store, &attempt.id, 0, true).unwrap();
    set_step_progress(&store, &attempt.id, 1, true).unwrap();
    assert!(complete_quest(&store, &attempt.id).is_err(), "50% blocked");

    set_step_progress(&store, &attempt.id, 2, true).unwrap();
    complete_quest(&store, &attempt.id).expect("75% allowed");
}

#[test]
fn racing_completions_accrue_exactly_once() {
    let (_dir, store) = common::open_store();
    let store = std::sync::Arc::new(store);
    let user = common::create_user(&store, "Ravi", "9876543210");
    let quest = common::put_compost_quest(&store);
    let attempt = start_quest(&store, &user.id, &quest.id).unwrap();
    for step in 0..4 {
        set_step_progress(&store, &attempt.id, step, true).unwrap();
    }

    let mut handles = Vec::new();
    for _ in 0..4 {
        let store = store.clone();
        let attempt_id = attempt.id.clone();
        handles.push(std::thread::spawn(move || {
            complete_quest(&store, &attempt_id).is_ok()
        }));
    }
    let successes = handles
        .into_iter()
        .map(|h| h.join().expect("thread"))
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1, "exactly one racer may win the transition");

    let progress = store.get_progress(&user.id).unwrap();
    assert_eq!(progress.total_xp, 10);
    assert_eq!(progress.completed_quests, 1);
}
