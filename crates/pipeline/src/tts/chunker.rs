//! Split text into TTS-sized chunks

/// Sentence and clause boundaries, Devanagari danda included
const PUNCTUATION: &[char] = &['।', '॥', '.', '?', '!', ';', ',', ':'];

/// Split `text` into chunks of at most `max_chars` characters
///
/// Prefers punctuation boundaries, then whitespace, and only cuts inside a
/// word when a single word is longer than `max_chars`. Neighbouring short
/// pieces are packed together. Returns no chunks for blank text.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for piece in clause_pieces(text) {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }

        if char_len(piece) <= max_chars {
            pack(&mut chunks, &mut current, piece, max_chars);
            continue;
        }

        for word in piece.split_whitespace() {
            if char_len(word) <= max_chars {
                pack(&mut chunks, &mut current, word, max_chars);
            } else {
                for slice in hard_split(word, max_chars) {
                    pack(&mut chunks, &mut current, &slice, max_chars);
                }
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Pieces ending at (and including) each punctuation mark
fn clause_pieces(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if PUNCTUATION.contains(&c) {
            let end = i + c.len_utf8();
            pieces.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn hard_split(word: &str, max_chars: usize) -> Vec<String> {
    word.chars()
        .collect::<Vec<_>>()
        .chunks(max_chars)
        .map(|c| c.iter().collect())
        .collect()
}

/// Append `part` to the open chunk, or close it and start a new one
fn pack(chunks: &mut Vec<String>, current: &mut String, part: &str, max_chars: usize) {
    if current.is_empty() {
        current.push_str(part);
    } else if char_len(current) + 1 + char_len(part) <= max_chars {
        current.push(' ');
        current.push_str(part);
    } else {
        chunks.push(std::mem::take(current));
        current.push_str(part);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn without_spaces(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(split_text("नमस्ते, कैसे हैं आप?", 100), vec!["नमस्ते, कैसे हैं आप?"]);
    }

    #[test]
    fn test_blank_text_has_no_chunks() {
        assert!(split_text("", 100).is_empty());
        assert!(split_text("   \n\t", 100).is_empty());
    }

    #[test]
    fn test_splits_on_danda() {
        let text = "मैं ठीक हूँ। आप कैसे हैं? धन्यवाद।";
        let chunks = split_text(text, 15);

        assert_eq!(chunks, vec!["मैं ठीक हूँ।", "आप कैसे हैं?", "धन्यवाद।"]);
    }

    #[test]
    fn test_chunks_respect_limit_and_keep_text() {
        let text = "भारत एक विशाल देश है जिसमें अनेक भाषाएँ बोली जाती हैं। \
                    हिंदी सबसे अधिक बोली जाने वाली भाषा है, और इसकी लिपि देवनागरी है। \
                    यह वाक्य बिना किसी विराम चिह्न के बहुत लंबा चलता है ताकि शब्दों पर विभाजन की जाँच हो सके";

        for max in [10, 25, 50, 100] {
            let chunks = split_text(text, max);
            assert!(chunks.iter().all(|c| c.chars().count() <= max), "max {}", max);
            assert!(chunks.iter().all(|c| !c.trim().is_empty()));
            assert_eq!(without_spaces(&chunks.concat()), without_spaces(text));
        }
    }

    #[test]
    fn test_long_word_is_hard_split() {
        let word = "क".repeat(250);
        let chunks = split_text(&word, 100);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 100);
        assert_eq!(chunks[2].chars().count(), 50);
    }
}
