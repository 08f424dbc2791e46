//! Character-at-a-time reveal of the wish message, plus cursor blink timing.
//! Pure state machine; the page drives it from a 50 ms interval.

/// Reveal cadence.
pub const TYPE_TICK_MS: i32 = 50;
/// Cursor blink toggle period.
pub const CURSOR_BLINK_MS: i32 = 530;
/// How long the cursor keeps blinking after the reveal finishes.
pub const CURSOR_LINGER_MS: f64 = 2_000.0;

pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
}

impl Typewriter {
    pub fn new(message: &str) -> Self {
        Self {
            chars: message.chars().collect(),
            shown: 0,
        }
    }

    /// Reveals one more character. Returns `true` if the reveal advanced,
    /// `false` once the full message is already visible.
    pub fn advance(&mut self) -> bool {
        if self.shown < self.chars.len() {
            self.shown += 1;
            true
        } else {
            false
        }
    }

    pub fn is_done(&self) -> bool {
        self.shown == self.chars.len()
    }

    /// The currently visible prefix. Always splits on whole characters, so
    /// multi-byte text never tears.
    pub fn visible(&self) -> String {
        self.chars[..self.shown].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_one_char_per_advance() {
        let mut tw = Typewriter::new("Hi!");
        assert_eq!(tw.visible(), "");
        assert!(tw.advance());
        assert_eq!(tw.visible(), "H");
        assert!(tw.advance());
        assert!(tw.advance());
        assert_eq!(tw.visible(), "Hi!");
        assert!(tw.is_done());
    }

    #[test]
    fn done_latches_and_advance_turns_noop() {
        let mut tw = Typewriter::new("ab");
        while tw.advance() {}
        assert!(tw.is_done());
        assert!(!tw.advance());
        assert_eq!(tw.visible(), "ab");
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let mut tw = Typewriter::new("新年快乐");
        tw.advance();
        tw.advance();
        assert_eq!(tw.visible(), "新年");
    }

    #[test]
    fn full_wish_message_reveals_completely() {
        let mut tw = Typewriter::new(crate::WISH_MESSAGE);
        let mut steps = 0;
        while tw.advance() {
            steps += 1;
        }
        assert_eq!(steps, crate::WISH_MESSAGE.chars().count());
        assert_eq!(tw.visible(), crate::WISH_MESSAGE);
    }

    #[test]
    fn empty_message_is_done_immediately() {
        let tw = Typewriter::new("");
        assert!(tw.is_done());
        assert_eq!(tw.visible(), "");
    }
}
