//! # CLI Module
//!
//! Command-line surface of the `apigen` binary.
//!
//! ## Usage
//!
//! ```bash
//! apigen <INPUT> <OUTPUT> [--config PATH] [--auth-header H] [--auth-token T] \
//!     [--fmt] [--check] [-v] [--log-format text|json]
//! ```
//!
//! Exactly two positional arguments are required. Options:
//!
//! - `--config <FILE>` - Generator configuration (default: `apigen.toml` next to INPUT)
//! - `--auth-header <NAME>` - Credential header (env `APIGEN_AUTH_HEADER`)
//! - `--auth-token <VALUE>` - Expected credential (env `APIGEN_AUTH_TOKEN`)
//! - `--fmt` - Format the output with `rustfmt` (binary from `APIGEN_RUSTFMT_BIN`)
//! - `--check` - Verify OUTPUT is current without writing it
//! - `-v, --verbose` - Debug logging (`RUST_LOG` takes precedence)
//! - `--log-format <FORMAT>` - `text` or `json`, written to stderr
//!
//! ## Exit Status
//!
//! - `0` - generated, or up to date under `--check`
//! - `1` - generation failed, or OUTPUT is stale under `--check`
//! - `2` - invalid command line
//!
//! ## Examples
//!
//! ```bash
//! # Generate handlers next to the declarations
//! apigen src/api.rs src/api_handlers.rs --fmt
//!
//! # Fail CI when the checked-in handlers drift
//! apigen src/api.rs src/api_handlers.rs --fmt --check
//! ```

mod commands;
mod logging;


pub use commands::{execute, run_cli, Cli, Outcome};
pub use logging::{init_logging, LogFormat};
