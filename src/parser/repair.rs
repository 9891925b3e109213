//! Best-effort cleanup of free-text fields damaged by an earlier editing
//! pipeline: whole-text duplication, a restarted phrase at the end, a repeated
//! tail, or a sentence cut off after a conjunction.
//!
//! Every step only ever keeps a prefix of the word sequence, so the output is
//! never longer than the input. The pass is repeated until nothing changes,
//! which makes `repair_text` idempotent.

/// Shortest restarted phrase the trailing-phrase step will cut.
const MIN_PHRASE_WORDS: usize = 3;

/// Window used by the repeated-tail step.
const TAIL_WORDS: usize = 5;

/// Texts at or below this many characters are never trimmed for a dangling word.
const DANGLING_MIN_CHARS: usize = 40;

const DANGLING_MARKERS: &[&str] = &[
    "what", "but", "the", "and", "or", "if", "so", "a", "an", "because",
];

#[must_use]
pub fn repair_text(input: &str) -> String {
    let mut current = repair_pass(input);
    loop {
        let next = repair_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn repair_pass(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();

    let words = &words[..exact_halves_len(&words)];
    let words = &words[..trailing_phrase_len(words)];
    let words = &words[..repeated_tail_len(words)];
    let words = &words[..dangling_len(words)];

    words.join(" ")
}

fn exact_halves_len(words: &[&str]) -> usize {
    let n = words.len();
    if n >= 2 && n % 2 == 0 && words[..n / 2] == words[n / 2..] {
        n / 2
    } else {
        n
    }
}

/// Scans from roughly 30% of the way in; the first suffix that restates the
/// opening of the text marks where the duplicate starts.
fn trailing_phrase_len(words: &[&str]) -> usize {
    let n = words.len();
    if n < MIN_PHRASE_WORDS * 2 {
        return n;
    }

    let start = (n * 3).div_ceil(10).max(1);
    (start..=n - MIN_PHRASE_WORDS)
        .find(|&i| words.starts_with(&words[i..]))
        .unwrap_or(n)
}

/// Cuts at the end of the first occurrence of the last few words.
fn repeated_tail_len(words: &[&str]) -> usize {
    let n = words.len();
    if n <= TAIL_WORDS {
        return n;
    }

    let tail = &words[n - TAIL_WORDS..];
    words
        .windows(TAIL_WORDS)
        .position(|window| window == tail)
        .filter(|&first| first < n - TAIL_WORDS)
        .map_or(n, |first| first + TAIL_WORDS)
}

fn dangling_len(words: &[&str]) -> usize {
    let n = words.len();
    let Some(last) = words.last() else {
        return n;
    };

    if !DANGLING_MARKERS.contains(&last.to_lowercase().as_str()) {
        return n;
    }

    let chars = words.iter().map(|w| w.chars().count()).sum::<usize>() + n - 1;
    if chars <= DANGLING_MIN_CHARS {
        return n;
    }

    words[..n - 1]
        .iter()
        .rposition(|w| ends_sentence(w))
        .map_or(n - 1, |boundary| boundary + 1)
}

fn ends_sentence(word: &str) -> bool {
    word.trim_end_matches(['"', '\'', ')', '\u{201d}', '\u{2019}'])
        .ends_with(['.', '!', '?'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_halves() {
        assert_eq!(repair_text("Alpha Beta Alpha Beta"), "Alpha Beta");
        assert_eq!(repair_text("Alpha Alpha Alpha Alpha"), "Alpha");
    }

    #[test]
    fn test_trailing_phrase_restart() {
        assert_eq!(
            repair_text("A storm knocks out the grid. Neighbours must share. A storm knocks out"),
            "A storm knocks out the grid. Neighbours must share."
        );
    }

    #[test]
    fn test_repeated_tail() {
        assert_eq!(
            repair_text(
                "The crew restores power to the hospital and then the crew restores power to the hospital"
            ),
            "The crew restores power to the hospital"
        );
    }

    #[test]
    fn test_dangling_conjunction_drops_fragment() {
        assert_eq!(
            repair_text("The system will fail when power drops. This is tested further. But"),
            "The system will fail when power drops. This is tested further."
        );
    }

    #[test]
    fn test_dangling_without_sentence_boundary_drops_word() {
        assert_eq!(
            repair_text("Neighbours pool their generators to keep the clinic running and"),
            "Neighbours pool their generators to keep the clinic running"
        );
    }

    #[test]
    fn test_short_text_keeps_dangling_word() {
        assert_eq!(repair_text("Now What"), "Now What");
    }

    #[test]
    fn test_whitespace_normalized() {
        assert_eq!(
            repair_text("  Water\n\nruns  out\tby Friday.  "),
            "Water runs out by Friday."
        );
    }

    #[test]
    fn test_clean_text_untouched() {
        let clean = "When the pumps stop, the city has three days of water. Who decides who drinks?";
        assert_eq!(repair_text(clean), clean);
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "Alpha Beta Alpha Beta",
            "Alpha Alpha Alpha Alpha Alpha Alpha Alpha Alpha",
            "A storm knocks out the grid. Neighbours must share. A storm knocks out",
            "The system will fail when power drops. This is tested further. But",
            "one two three four five six seven one two three four five six seven eight",
            "Neighbours pool their generators to keep the clinic running and the",
            "",
            "   ",
            "Just one line\nand another",
        ];
        for sample in samples {
            let once = repair_text(sample);
            assert_eq!(repair_text(&once), once, "not idempotent for {sample:?}");
            assert!(once.len() <= sample.len(), "grew for {sample:?}");
        }
    }

    /// Every word sequence up to `MAX_WORDS` long over a vocabulary that
    /// triggers each step: sentence ends, dangling markers, and words long
    /// enough to pass the dangling length threshold.
    #[test]
    fn test_idempotent_over_generated_sequences() {
        const VOCABULARY: &[&str] = &["Alpha", "beta.", "and", "the", "Neighbourhoods"];
        const MAX_WORDS: u32 = 6;

        let base = VOCABULARY.len();
        for len in 0..=MAX_WORDS {
            for mut code in 0..base.pow(len) {
                let mut words = Vec::with_capacity(len as usize);
                for _ in 0..len {
                    words.push(VOCABULARY[code % base]);
                    code /= base;
                }
                let input = words.join(if len % 2 == 0 { " " } else { "  \n" });

                let once = repair_text(&input);
                assert_eq!(repair_text(&once), once, "not idempotent for {input:?}");
                assert!(once.len() <= input.len(), "grew for {input:?}");

                let kept: Vec<&str> = once.split_whitespace().collect();
                assert!(words.starts_with(&kept), "not a word prefix for {input:?}");
            }
        }
    }
}
