//! Testing infrastructure for callmatch.
//!
//! - [`TestEnv`]: a [`MatchEnv`](crate::env::MatchEnv) over in-memory
//!   stores with a fixed clock
//! - [`FailingRecordStore`] / [`FailingBlobStore`]: stores that inject
//!   collaborator failures
//! - fixture builders for calls, operators and request bodies
//! - assertion macros for error kinds and response statuses
//!
//! ```rust
//! use callmatch::pipeline::run_match;
//! use callmatch::testkit::TestEnv;
//!
//! let test = TestEnv::new();
//! let report = run_match(&test.env).unwrap();
//! assert!(report.rows.is_empty());
//! assert_eq!(test.blobs.keys(), vec![report.key]);
//! ```

pub mod assertions;
pub mod helpers;
pub mod mock_env;

pub use helpers::{batch_body, call, call_item, operator, operator_item, CallBuilder};
pub use mock_env::{fixed_now, FailingBlobStore, FailingRecordStore, TestEnv};
