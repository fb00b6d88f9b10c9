//! Prefix extraction from call numbers.

/// Extracts the character of a call number that identifies its operator.
///
/// Returning `None` means the number is too short for this extractor; the
/// matcher turns that into an `InvalidNumberFormat` error.
pub trait PrefixExtractor: Send + Sync {
    fn extract(&self, number: &str) -> Option<char>;

    /// Short description used in error messages.
    fn describe(&self) -> String;
}

/// Takes the character at a fixed offset from the start of the number.
///
/// Offsets count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedOffsetExtractor {
    offset: usize,
}

impl FixedOffsetExtractor {
    /// Offset of the operator digit in the default number format (the 4th
    /// character).
    pub const DEFAULT_OFFSET: usize = 3;

    pub fn new(offset: usize) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Default for FixedOffsetExtractor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OFFSET)
    }
}

impl PrefixExtractor for FixedOffsetExtractor {
    fn extract(&self, number: &str) -> Option<char> {
        number.chars().nth(self.offset)
    }

    fn describe(&self) -> String {
        format!(
            "prefix at offset {} (needs at least {} characters)",
            self.offset,
            self.offset + 1
        )
    }
}
