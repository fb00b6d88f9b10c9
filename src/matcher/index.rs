//! Constant-time prefix lookup with first-match semantics.

use crate::core::Operator;
use std::collections::HashMap;

/// Maps each leading prefix character to the position of the first
/// operator registered with it.
///
/// Later operators sharing a leading character are never returned, which
/// keeps lookups equivalent to a linear first-match scan.
#[derive(Debug, Clone, Default)]
pub struct PrefixIndex {
    first: HashMap<char, usize>,
}

impl PrefixIndex {
    pub fn build(operators: &[Operator]) -> Self {
        let mut first = HashMap::new();
        for (position, operator) in operators.iter().enumerate() {
            if let Some(c) = operator.leading_char() {
                first.entry(c).or_insert(position);
            }
        }
        Self { first }
    }

    pub fn lookup<'a>(&self, operators: &'a [Operator], prefix: char) -> Option<&'a Operator> {
        self.first
            .get(&prefix)
            .and_then(|&position| operators.get(position))
    }

    /// Number of distinct leading characters.
    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }
}
