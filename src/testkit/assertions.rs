//! Assertion macros for callmatch results.
//!
//! - [`crate::assert_error_kind!`] - assert a `Result` failed with a given
//!   error kind and extract the error
//! - [`crate::assert_status!`] - assert an API response status and decode
//!   its JSON body
//!
//! ```rust
//! use callmatch::assert_error_kind;
//! use callmatch::errors::MatchError;
//!
//! let result: Result<(), MatchError> = Err(MatchError::unsupported_type(1, "fax"));
//! let err = assert_error_kind!(result, "UnsupportedTypeError");
//! assert_eq!(err.status_code(), 400);
//! ```

/// Assert that a `Result<_, MatchError>` is an error of `kind`.
#[macro_export]
macro_rules! assert_error_kind {
    ($result:expr, $kind:expr) => {
        match $result {
            Err(e) if e.kind() == $kind => e,
            Err(e) => panic!(
                "Expected {} error, got {}: {}\n  at {}:{}:{}",
                $kind,
                e.kind(),
                e,
                file!(),
                line!(),
                column!()
            ),
            Ok(value) => panic!(
                "Expected {} error, got Ok({:?})\n  at {}:{}:{}",
                $kind,
                value,
                file!(),
                line!(),
                column!()
            ),
        }
    };
}

/// Assert the status of an `ApiResponse` and return its body as JSON.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {{
        let response = &$response;
        if response.status_code != $status {
            panic!(
                "Expected status {}, got {} with body {}\n  at {}:{}:{}",
                $status,
                response.status_code,
                response.body,
                file!(),
                line!(),
                column!()
            );
        }
        match response.json_body() {
            Ok(body) => body,
            Err(e) => panic!("Response body is not JSON: {}: {}", e, response.body),
        }
    }};
}
