//! Configuration loaded from `.callmatch.toml`.
//!
//! All sections are optional; missing values take the defaults below.
//!
//! ```toml
//! [storage]
//! data_dir = ".callmatch"
//!
//! [tables]
//! calls = "infra-smartnumbers-calls"
//! operators = "infra-smartnumbers-operators"
//!
//! [report]
//! bucket = "infra-smartnumbers-output-bucket"
//! key = "reports/{timestamp}.csv"
//!
//! [matcher]
//! prefix_offset = 3
//! strategy = "indexed"
//! ```

mod core;
mod loader;
pub mod validation;

pub use self::core::{CallmatchConfig, MatcherConfig, ReportConfig, StorageConfig, TablesConfig};
pub use loader::{
    directory_ancestors, discover_config_file, load_config, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};

/// Default config file contents written by `callmatch init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# callmatch configuration

[storage]
data_dir = ".callmatch"

[tables]
calls = "infra-smartnumbers-calls"
operators = "infra-smartnumbers-operators"

[report]
bucket = "infra-smartnumbers-output-bucket"
# "{timestamp}" is replaced by the run time (UTC, %Y%m%dT%H%M%SZ).
# Use a key without it to overwrite the same report on every run.
key = "reports/{timestamp}.csv"

[matcher]
# Character offset of the operator digit in a call number.
prefix_offset = 3
# "indexed" or "linear"; both pick the first operator in store order.
strategy = "indexed"
"#;
