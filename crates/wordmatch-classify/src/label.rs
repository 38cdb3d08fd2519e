use std::fmt;

/// A word identifier in the numbered recognition vocabulary.
///
/// Templates and inputs share one numbering space: input word `n` is
/// expected to be recognized as template `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordId(u32);

impl WordId {
    /// Create a word identifier from its number.
    #[must_use]
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Return the word number.
    #[must_use]
    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::WordId;

    #[test]
    fn roundtrip() {
        assert_eq!(WordId::new(7).number(), 7);
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(format!("{}", WordId::new(3)), "003");
        assert_eq!(format!("{}", WordId::new(100)), "100");
    }

    #[test]
    fn ordering() {
        assert!(WordId::new(1) < WordId::new(5));
    }
}
