//! Item buffer behavior against a scripted flashcard source.

mod common;

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use cloze_core::{Difficulty, Item, ReviewOutcome};
use cloze_session::{ItemBuffer, SessionError};
use common::fixtures::{ids, item, items, response, response_with_difficulty};
use common::ScriptedSource;
use pretty_assertions::assert_eq;

fn sorted(mut words: Vec<String>) -> Vec<String> {
    words.sort();
    words
}

#[tokio::test]
async fn first_take_waits_for_fetch() {
    let source = ScriptedSource::new(vec![Ok(response(items(1, &["a", "b", "c", "d", "e"])))]);
    let mut buffer = ItemBuffer::new(source.clone(), Difficulty::default()).with_batch_size(20);

    let first = buffer.take().await.unwrap().unwrap();

    assert_eq!(first.sentence.id, 1);
    assert_eq!(ids(buffer.items()), vec![2, 3, 4, 5]);
    assert!(!buffer.is_fetching());

    let requests = source.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].limit, 20);
    assert!(requests[0].exclude.is_empty());
}

#[tokio::test]
async fn refills_in_background_when_running_low() {
    let source = ScriptedSource::new(vec![
        Ok(response(items(1, &["a", "b", "c", "d"]))),
        Ok(response(items(10, &["b", "e", "f"]))),
    ]);
    let mut buffer = ItemBuffer::new(source.clone(), Difficulty::default());

    assert_eq!(buffer.take().await.unwrap().unwrap().sentence.id, 1);
    assert_eq!(buffer.take().await.unwrap().unwrap().sentence.id, 2);
    assert!(!buffer.is_fetching());

    // Two left: the refill starts, but the buffered item comes back at once.
    assert_eq!(buffer.take().await.unwrap().unwrap().sentence.id, 3);
    assert!(buffer.is_fetching());

    buffer.wait_for_fetch().await.unwrap();

    // "b" is still waiting for its review, so the server's copy is dropped.
    assert_eq!(ids(buffer.items()), vec![4, 11, 12]);

    let requests = source.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(sorted(requests[1].exclude.clone()), vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn only_one_fetch_at_a_time() {
    let source = ScriptedSource::new(vec![Ok(response(items(1, &["a", "b"])))]);
    let mut buffer = ItemBuffer::new(source.clone(), Difficulty::default());

    buffer.take().await.unwrap();
    // One item left, so this take starts a refill.
    buffer.take().await.unwrap();
    assert!(buffer.is_fetching());
    // Nothing buffered: waits on the outstanding refill instead of starting another.
    assert_eq!(buffer.take().await.unwrap(), None);

    assert_eq!(source.request_count(), 2);
}

#[tokio::test]
async fn pending_reviews_ride_along_with_fetch() {
    let source = ScriptedSource::new(vec![]);
    let mut buffer = ItemBuffer::new(source.clone(), Difficulty::default());
    for item in items(1, &["a", "b", "c"]) {
        buffer.add(item);
    }

    let taken = buffer.take().await.unwrap().unwrap();
    let review = ReviewOutcome::new("a", true, false, Utc::now());
    buffer.record_outcome(review.clone());
    assert_eq!(taken.sentence.id, 1);
    assert!(!buffer.is_fetching());

    buffer.take().await.unwrap();
    assert!(buffer.pending_reviews().is_empty());
    buffer.wait_for_fetch().await.unwrap();

    let requests = source.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].reviews, vec![review]);
    assert_eq!(sorted(requests[0].exclude.clone()), vec!["b", "c"]);
}

#[tokio::test]
async fn failed_fetch_propagates_and_keeps_reviews() {
    let source = ScriptedSource::new(vec![Err(SessionError::Network("connection refused".into()))]);
    let mut buffer = ItemBuffer::new(source.clone(), Difficulty::default());
    let review = ReviewOutcome::new("casa", false, true, Utc::now());
    buffer.record_outcome(review.clone());

    let err = buffer.take().await.unwrap_err();
    assert!(matches!(err, SessionError::Network(_)));
    assert_eq!(buffer.pending_reviews(), &[review.clone()]);
    assert!(!buffer.is_fetching());

    // The next take retries with the same reviews.
    assert_eq!(buffer.take().await.unwrap(), None);
    let requests = source.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].reviews, vec![review]);
    assert!(buffer.pending_reviews().is_empty());
}

#[tokio::test]
async fn failed_background_fetch_is_retried() {
    let source = ScriptedSource::new(vec![
        Ok(response(items(1, &["a", "b", "c", "d"]))),
        Err(SessionError::Backend {
            status: 500,
            message: "Internal Server Error".into(),
        }),
        Ok(response(items(10, &["e", "f"]))),
    ]);
    let mut buffer = ItemBuffer::new(source.clone(), Difficulty::default());

    for _ in 0..3 {
        buffer.take().await.unwrap();
    }
    while source.request_count() < 2 {
        tokio::task::yield_now().await;
    }

    // The failure is only logged; this take starts a new refill.
    assert_eq!(buffer.take().await.unwrap().unwrap().sentence.id, 4);
    assert!(buffer.is_fetching());
    buffer.wait_for_fetch().await.unwrap();

    assert_eq!(source.request_count(), 3);
    assert_eq!(ids(buffer.items()), vec![10, 11]);
}

#[tokio::test]
async fn cancelled_take_keeps_fetch_and_reviews() {
    let source = ScriptedSource::slow(
        vec![Ok(response(items(1, &["perro"])))],
        Duration::from_millis(200),
    );
    let mut buffer = ItemBuffer::new(source.clone(), Difficulty::default());
    let review = ReviewOutcome::new("casa", true, false, Utc::now());
    buffer.record_outcome(review.clone());

    let cancelled = tokio::time::timeout(Duration::from_millis(20), buffer.take()).await;
    assert!(cancelled.is_err());
    assert!(buffer.is_fetching());
    assert_eq!(buffer.unsent_reviews(), 1);

    // The next take waits on the same request instead of sending another.
    let item = buffer.take().await.unwrap().unwrap();
    assert_eq!(item.sentence.id, 1);
    assert_eq!(buffer.unsent_reviews(), 0);

    let requests = source.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].reviews, vec![review]);
}

#[tokio::test]
async fn aborted_fetch_gives_reviews_back() {
    let source = ScriptedSource::slow(vec![], Duration::from_secs(5));
    let mut buffer = ItemBuffer::new(source.clone(), Difficulty::default());
    let review = ReviewOutcome::new("casa", true, false, Utc::now());
    buffer.record_outcome(review.clone());

    let cancelled = tokio::time::timeout(Duration::from_millis(20), buffer.take()).await;
    assert!(cancelled.is_err());

    buffer.abort_fetch();

    assert!(!buffer.is_fetching());
    assert_eq!(buffer.pending_reviews(), &[review]);
}

#[tokio::test]
async fn stale_snapshot_does_not_undo_level_change() {
    let source = ScriptedSource::new(vec![Ok(response_with_difficulty(
        items(10, &["x"]),
        Difficulty {
            level: 3,
            incorrect: 3,
            ..Default::default()
        },
    ))]);
    let start = Difficulty {
        level: 3,
        incorrect: 3,
        ..Default::default()
    };
    let mut buffer = ItemBuffer::new(source.clone(), start);
    buffer.add(item(1, &["a"]));
    buffer.add(item(2, &["b"]));

    // Two buffered: starts a background fetch sent with level 3.
    buffer.take().await.unwrap();
    assert!(buffer.is_fetching());

    assert!(buffer.record_outcome(ReviewOutcome::new("a", false, true, Utc::now())));
    assert_eq!(buffer.difficulty().level, 2);

    buffer.wait_for_fetch().await.unwrap();

    assert_eq!(buffer.difficulty().level, 2);
    assert_eq!(buffer.difficulty().incorrect, 0);
    assert_eq!(ids(buffer.items()), vec![2, 10]);
}

#[tokio::test]
async fn server_difficulty_replaces_local_state() {
    let snapshot = Difficulty {
        level: 4,
        correct: 2,
        incorrect: 1,
        min: 2,
        max: Some(6),
    };
    let source = ScriptedSource::new(vec![Ok(response_with_difficulty(
        items(1, &["a"]),
        snapshot.clone(),
    ))]);
    let mut buffer = ItemBuffer::new(source.clone(), Difficulty::default());

    buffer.take().await.unwrap();

    assert_eq!(buffer.difficulty(), &snapshot);
}

#[tokio::test]
async fn level_change_evicts_items_for_old_level() {
    let source = ScriptedSource::new(vec![]);
    let start = Difficulty {
        level: 3,
        incorrect: 3,
        ..Default::default()
    };
    let mut buffer = ItemBuffer::new(source.clone(), start);
    for item in items(1, &["a", "b", "c", "d", "e", "f"]) {
        buffer.add(item);
    }

    let taken = buffer.take().await.unwrap().unwrap();
    let changed = buffer.record_outcome(ReviewOutcome::new("a", false, true, Utc::now()));

    assert_eq!(taken.sentence.id, 1);
    assert!(changed);
    assert_eq!(buffer.difficulty().level, 2);
    assert_eq!(buffer.difficulty().incorrect, 0);
    assert_eq!(ids(buffer.items()), vec![2, 3, 4]);
    for word in ["a", "e", "f"] {
        assert!(!buffer.is_occupied(word), "{word} should be free");
    }
    assert!(buffer.add(item(20, &["e"])));
}

/// Random mix of adds, takes, reviews and skips. The words of buffered and
/// unresolved items never overlap.
#[tokio::test]
async fn buffered_words_stay_unique() {
    const WORDS: [&str; 6] = ["uno", "dos", "tres", "cuatro", "cinco", "seis"];

    let source = ScriptedSource::new(vec![]);
    let mut buffer = ItemBuffer::new(source.clone(), Difficulty::default());
    let mut held: Vec<Item> = Vec::new();
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (seed >> 33) as usize
    };

    for step in 0..500 {
        match next() % 4 {
            0 => {
                let first = next() % WORDS.len();
                let second = (first + 1 + next() % (WORDS.len() - 1)) % WORDS.len();
                let words = if next() % 2 == 0 {
                    vec![WORDS[first]]
                } else {
                    vec![WORDS[first], WORDS[second]]
                };
                buffer.add(item(step, &words));
            }
            1 => {
                if let Some(item) = buffer.take().await.unwrap() {
                    held.push(item);
                }
            }
            2 if !held.is_empty() => {
                let item = held.swap_remove(next() % held.len());
                for word in item.dedup_keys() {
                    let correct = next() % 3 > 0;
                    buffer.record_outcome(ReviewOutcome::new(word, correct, true, Utc::now()));
                }
            }
            3 if !held.is_empty() => {
                let item = held.swap_remove(next() % held.len());
                buffer.release(&item);
            }
            _ => {}
        }

        let mut seen = HashSet::new();
        for word in buffer.items().chain(&held).flat_map(Item::dedup_keys) {
            assert!(seen.insert(word), "step {step}: {word} appears twice");
            assert!(buffer.is_occupied(word), "step {step}: {word} not tracked");
        }
    }
}
