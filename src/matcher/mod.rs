//! Call-to-operator matching.
//!
//! A call is owned by the first operator, in collection order, whose
//! prefix starts with the character the [`PrefixExtractor`] pulls out of
//! the call's number. Withheld numbers and numbers nobody owns map to
//! [`UNKNOWN_OPERATOR`].
//!
//! Two strategies give the same answers:
//!
//! - [`MatchStrategy::Linear`]: scan the operators for every call
//! - [`MatchStrategy::Indexed`]: precompute a [`PrefixIndex`] once per run
//!
//! # Example
//!
//! ```rust
//! use callmatch::core::{Call, Operator};
//! use callmatch::matcher::{FixedOffsetExtractor, MatchStrategy, Matcher};
//! use rust_decimal::Decimal;
//!
//! let operators = vec![Operator {
//!     id: "o1".into(),
//!     prefix: "2xx".into(),
//!     operator: "OperCo".into(),
//! }];
//! let call = Call {
//!     id: "c1".into(),
//!     date: "2024-01-05T10:00:00".into(),
//!     number: "4412345678".into(),
//!     risk_score: Decimal::new(37, 2),
//!     green_list: false,
//!     red_list: false,
//! };
//!
//! let extractor = FixedOffsetExtractor::default();
//! let matcher = Matcher::new(&operators, &extractor, MatchStrategy::Indexed);
//! assert_eq!(matcher.operator_for(&call).unwrap(), "OperCo");
//! ```

pub mod index;
pub mod prefix;

pub use index::PrefixIndex;
pub use prefix::{FixedOffsetExtractor, PrefixExtractor};

use crate::core::{Call, Operator, UNKNOWN_OPERATOR};
use crate::errors::MatchError;
use serde::{Deserialize, Serialize};

/// How operators are searched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    Linear,
    #[default]
    Indexed,
}

/// First operator whose prefix starts with `call_prefix`.
pub fn match_operator(operators: &[Operator], call_prefix: char) -> Option<&Operator> {
    operators
        .iter()
        .find(|operator| operator.leading_char() == Some(call_prefix))
}

/// Matches calls against one snapshot of the operator collection.
pub struct Matcher<'a> {
    operators: &'a [Operator],
    extractor: &'a dyn PrefixExtractor,
    index: Option<PrefixIndex>,
}

impl<'a> Matcher<'a> {
    pub fn new(
        operators: &'a [Operator],
        extractor: &'a dyn PrefixExtractor,
        strategy: MatchStrategy,
    ) -> Self {
        let index = match strategy {
            MatchStrategy::Linear => None,
            MatchStrategy::Indexed => Some(PrefixIndex::build(operators)),
        };
        Self {
            operators,
            extractor,
            index,
        }
    }

    /// Operator name owning `call`'s number.
    ///
    /// Withheld numbers short-circuit to `"Unknown"` without inspecting the
    /// operators. A number too short for the extractor is an error.
    pub fn operator_for(&self, call: &Call) -> Result<&'a str, MatchError> {
        if call.is_withheld() {
            return Ok(UNKNOWN_OPERATOR);
        }

        let prefix =
            self.extractor
                .extract(&call.number)
                .ok_or_else(|| MatchError::InvalidNumberFormat {
                    call_id: call.id.clone(),
                    number: call.number.clone(),
                    extractor: self.extractor.describe(),
                    rows: Vec::new(),
                })?;

        let found = match &self.index {
            Some(index) => index.lookup(self.operators, prefix),
            None => match_operator(self.operators, prefix),
        };
        Ok(found.map_or(UNKNOWN_OPERATOR, |operator| operator.operator.as_str()))
    }
}
