//! Classification of interactive input lines.

/// What a single line of user input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Empty or whitespace-only line: take a new timestamp.
    Blank,
    /// `<integer> <word>`: annotate the record at `index` with `text`.
    Indexed { index: i64, text: String },
    /// Anything else: annotate the most recent record with the whole line.
    Free { text: String },
}

/// Classifies a raw input line.
///
/// Surrounding whitespace is ignored. A leading base-10 integer only counts
/// as an index when whitespace and another word follow it, and only that
/// next word becomes the annotation; later words on the line are dropped.
pub fn classify(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Blank;
    }

    if let Some((head, rest)) = line.split_once(char::is_whitespace) {
        if let (Ok(index), Some(word)) = (head.parse::<i64>(), rest.split_whitespace().next()) {
            return Input::Indexed {
                index,
                text: word.to_string(),
            };
        }
    }

    Input::Free {
        text: line.to_string(),
    }
}
