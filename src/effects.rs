//! Validation helpers built on stillwater's `Validation`.
//!
//! Field checks return a [`FieldValidation`], which accumulates every
//! problem instead of stopping at the first one. Submission items and the
//! configuration file are both validated this way so the caller sees all
//! problems of one record in a single response.
//!
//! # Example
//!
//! ```rust
//! use callmatch::effects::{combine_validations, field_failure, field_success, FieldValidation};
//!
//! let checks: Vec<FieldValidation<u8>> = vec![
//!     field_success(1),
//!     field_failure("missing field `date`"),
//!     field_failure("`redList` must be a boolean"),
//! ];
//! let combined = combine_validations(checks);
//! assert!(combined.is_failure());
//! ```

use stillwater::{NonEmptyVec, Validation};

/// Accumulated problem descriptions.
pub type Problems = NonEmptyVec<String>;

/// Validation whose failures are human-readable problem descriptions.
pub type FieldValidation<T> = Validation<T, Problems>;

/// Create a successful validation result.
pub fn field_success<T>(value: T) -> FieldValidation<T> {
    Validation::Success(value)
}

/// Create a failed validation result with a single problem.
pub fn field_failure<T>(problem: impl Into<String>) -> FieldValidation<T> {
    Validation::Failure(NonEmptyVec::new(problem.into(), Vec::new()))
}

/// Combine multiple validations, accumulating all problems.
pub fn combine_validations<T>(validations: Vec<FieldValidation<T>>) -> FieldValidation<Vec<T>> {
    let mut successes = Vec::new();
    let mut failures: Vec<String> = Vec::new();

    for v in validations {
        match v {
            Validation::Success(value) => successes.push(value),
            Validation::Failure(problems) => failures.extend(problems),
        }
    }

    match NonEmptyVec::from_vec(failures) {
        Some(problems) => Validation::Failure(problems),
        None => Validation::Success(successes),
    }
}

/// Drain a field validation into an accumulator.
///
/// Returns the value on success; on failure the problems are appended to
/// `problems` and `None` is returned, so independent fields can all be
/// checked before deciding whether the record is valid.
pub fn collect_field<T>(validation: FieldValidation<T>, problems: &mut Vec<String>) -> Option<T> {
    match validation {
        Validation::Success(value) => Some(value),
        Validation::Failure(errors) => {
            problems.extend(errors);
            None
        }
    }
}

/// Convert a validation into a `Result` carrying the problem list.
pub fn into_problems<T>(validation: FieldValidation<T>) -> Result<T, Vec<String>> {
    match validation {
        Validation::Success(value) => Ok(value),
        Validation::Failure(problems) => Err(problems.into_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_success() {
        let v = field_success(42);
        assert!(v.is_success());
        assert_eq!(into_problems(v), Ok(42));
    }

    #[test]
    fn test_field_failure() {
        let v: FieldValidation<i32> = field_failure("bad");
        assert!(v.is_failure());
        assert_eq!(into_problems(v), Err(vec!["bad".to_string()]));
    }

    #[test]
    fn test_combine_validations_all_success() {
        let result = combine_validations(vec![field_success(1), field_success(2)]);
        assert_eq!(into_problems(result), Ok(vec![1, 2]));
    }

    #[test]
    fn test_combine_validations_accumulates_problems() {
        let result = combine_validations(vec![
            field_success(1),
            field_failure("error 1"),
            field_success(3),
            field_failure("error 2"),
        ]);
        assert_eq!(
            into_problems(result),
            Err(vec!["error 1".to_string(), "error 2".to_string()])
        );
    }

    #[test]
    fn test_collect_field_keeps_going_after_failure() {
        let mut problems = Vec::new();
        let a: Option<i32> = collect_field(field_failure("first"), &mut problems);
        let b = collect_field(field_success(7), &mut problems);
        let c: Option<i32> = collect_field(field_failure("second"), &mut problems);
        assert_eq!((a, b, c), (None, Some(7), None));
        assert_eq!(problems, vec!["first", "second"]);
    }
}
