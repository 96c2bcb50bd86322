//! Answer matching for cloze blanks.

use crate::error::{ContractError, Result};
use crate::settings::EvaluatorSettings;
use crate::types::{Answer, Status};

/// Result of grading a typed answer against a blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation<'a> {
    pub status: Status,
    /// Answer matched exactly. Only set when the status is correct.
    pub matched: Option<&'a Answer>,
}

/// Characters stripped from both ends besides whitespace: soft hyphen,
/// zero-width space, zero-width no-break space and no-break space.
fn is_padding(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\u{00AD}' | '\u{200B}' | '\u{FEFF}' | '\u{00A0}')
}

/// Trim surrounding whitespace and invisible characters, then lower-case.
///
/// Interior characters are left alone.
pub fn normalize(word: &str) -> String {
    word.trim_matches(is_padding).to_lowercase()
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rows instead of the full matrix
    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Number of typos in `guess`. Case-insensitive, but diacritics count.
pub fn edit_distance(guess: &str, answer: &str) -> usize {
    levenshtein_distance(&normalize(guess), &normalize(answer))
}

/// Grade a typed answer.
///
/// - Correct if it matches any acceptable answer exactly
/// - Almost if it's within a few typos of the preferred (first) answer
/// - Incorrect otherwise
///
/// On incorrect the caller should clear the input and show the preferred
/// answer as a hint.
pub fn evaluate<'a>(
    typed: &str,
    answers: &'a [Answer],
    settings: &EvaluatorSettings,
) -> Result<Evaluation<'a>> {
    let preferred = answers.first().ok_or(ContractError::NoAnswers)?;

    if let Some(answer) = answers.iter().find(|answer| edit_distance(typed, &answer.text) == 0) {
        return Ok(Evaluation {
            status: Status::Correct,
            matched: Some(answer),
        });
    }

    // Only allow typos in the preferred answer.
    let near_miss = edit_distance(typed, &preferred.text) <= settings.max_typos;
    let status = if settings.allows_almost() && near_miss {
        Status::Almost
    } else {
        Status::Incorrect
    };
    Ok(Evaluation { status, matched: None })
}
