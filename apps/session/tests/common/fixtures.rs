//! Test fixtures for building flashcards and server responses.

use cloze_core::{Answer, Difficulty, Item, Part, Sentence, Translation};
use cloze_session::FetchResponse;

/// Item with one blank per word. Every word is new to the learner.
pub fn item(id: i64, words: &[&str]) -> Item {
    let mut parts = vec![Part::text("Sentence ")];
    for word in words {
        parts.push(Part::blank(
            *word,
            vec![Answer::new(*word, word.to_lowercase()).unseen()],
        ));
        parts.push(Part::text(" "));
    }
    Item {
        sentence: Sentence {
            id,
            parts,
            tatoeba_id: None,
        },
        translation: Translation {
            text: format!("Translation {id}"),
            tatoeba_id: None,
        },
    }
}

/// One single-blank item per word, numbered from `first_id`.
pub fn items(first_id: i64, words: &[&str]) -> Vec<Item> {
    words
        .iter()
        .enumerate()
        .map(|(i, word)| item(first_id + i as i64, &[word]))
        .collect()
}

/// Item whose only blank has no acceptable answers.
pub fn broken_item(id: i64) -> Item {
    let mut item = item(id, &["roto"]);
    item.sentence.parts[1].answers = Some(vec![]);
    item
}

pub fn response(items: Vec<Item>) -> FetchResponse {
    FetchResponse {
        items,
        difficulty: None,
    }
}

pub fn response_with_difficulty(items: Vec<Item>, difficulty: Difficulty) -> FetchResponse {
    FetchResponse {
        items,
        difficulty: Some(difficulty),
    }
}

pub fn ids<'a>(items: impl IntoIterator<Item = &'a Item>) -> Vec<i64> {
    items.into_iter().map(|item| item.sentence.id).collect()
}
