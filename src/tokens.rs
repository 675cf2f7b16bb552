//! Token cost estimation.
//!
//! A deliberately simple heuristic: one token per four characters, floored at 1
//! for any non-empty input. This is not a tokenizer match for any particular
//! model — its only contract is determinism and monotonicity (longer text never
//! estimates lower), which is all the compression budgeting needs.

/// Estimate the token cost of `text`. Returns 0 only for empty input.
pub fn estimate(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    (text.chars().count() / 4).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_zero() {
        assert_eq!(estimate(""), 0);
    }

    #[test]
    fn short_text_floors_at_one() {
        assert_eq!(estimate("a"), 1);
        assert_eq!(estimate("abc"), 1);
    }

    #[test]
    fn four_chars_per_token() {
        assert_eq!(estimate("abcd"), 1);
        assert_eq!(estimate("abcdefgh"), 2);
        assert_eq!(estimate(&"x".repeat(400)), 100);
    }

    #[test]
    fn counts_chars_not_bytes() {
        // 8 chars, 24 bytes
        assert_eq!(estimate("éééééééé"), 2);
    }

    #[test]
    fn monotonic_under_concatenation() {
        let samples = ["", "a", "hello", "hello world, this is a longer sentence"];
        for t1 in samples {
            for t2 in samples {
                let joined = format!("{t1}{t2}");
                assert!(estimate(&joined) >= estimate(t1).max(estimate(t2)));
            }
        }
    }

    #[test]
    fn deterministic() {
        let text = "the same text always estimates the same";
        assert_eq!(estimate(text), estimate(text));
    }
}
