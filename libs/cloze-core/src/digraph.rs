//! Digraph input for letters with diacritics.
//!
//! Typing `\'a` gives `á`, `\~n` gives `ñ`, `\:u` gives `ü` and `\ss` gives
//! `ß`. The two characters after the backslash may also be typed in reverse.

fn digraph(first: char, second: char) -> Option<char> {
    let c = match (first, second) {
        ('\'', 'a') => 'á',
        ('\'', 'e') => 'é',
        ('\'', 'i') => 'í',
        ('\'', 'o') => 'ó',
        ('\'', 'u') => 'ú',
        ('\'', 'A') => 'Á',
        ('\'', 'E') => 'É',
        ('\'', 'I') => 'Í',
        ('\'', 'O') => 'Ó',
        ('\'', 'U') => 'Ú',
        ('~', 'n') => 'ñ',
        ('~', 'N') => 'Ñ',
        (':', 'a') => 'ä',
        (':', 'e') => 'ë',
        (':', 'i') => 'ï',
        (':', 'o') => 'ö',
        (':', 'u') => 'ü',
        (':', 'A') => 'Ä',
        (':', 'E') => 'Ë',
        (':', 'I') => 'Ï',
        (':', 'O') => 'Ö',
        (':', 'U') => 'Ü',
        ('s', 's') => 'ß',
        _ => return None,
    };
    Some(c)
}

/// Replace every `\xy` digraph in `text`. Unknown digraphs are kept as typed.
pub fn substitute_digraphs(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());

    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\\' && i + 2 < chars.len() {
            let (a, b) = (chars[i + 1], chars[i + 2]);
            if let Some(c) = digraph(a, b).or_else(|| digraph(b, a)) {
                result.push(c);
                i += 3;
                continue;
            }
        }
        result.push(chars[i]);
        i += 1;
    }
    result
}
