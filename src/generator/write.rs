//! Atomic artifact output.
//!
//! The artifact is staged in a temporary file beside the destination and
//! renamed over it only once fully written (and formatted, if requested).
//! A failed run leaves any previous output untouched and no partial file
//! behind.

use std::ffi::OsStr;
use std::io::Write as _;
use std::path::Path;
use std::process::Command;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{GenerateError, Result};

/// Environment variable overriding the `rustfmt` binary.
pub const RUSTFMT_BIN_ENV: &str = "APIGEN_RUSTFMT_BIN";

/// Output options that do not affect the generated content itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Run `rustfmt` on the staged file before publishing it
    pub format: bool,
}

/// Atomically publish `contents` at `path`.
///
/// # Errors
///
/// [`GenerateError::Write`] for filesystem failures and
/// [`GenerateError::Format`] when `rustfmt` rejects the staged file.
pub fn write_artifact(path: &Path, contents: &str, options: &WriteOptions) -> Result<()> {
    let write_err = |source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    };
    let staged = stage(path, ".apigen", contents, options)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(staged.path(), std::fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }

    staged.persist(path).map_err(|e| write_err(e.error))?;
    debug!(path = %path.display(), bytes = contents.len(), "Wrote artifact");
    Ok(())
}

/// Return `contents` as [`write_artifact`] would publish them, without
/// touching `path`. Only formatting can change the bytes.
///
/// The scratch copy lives beside `path` so that `rustfmt` resolves the same
/// `rustfmt.toml` it would for the published file.
pub fn publishable_contents(
    path: &Path,
    contents: &str,
    options: &WriteOptions,
) -> Result<String> {
    if !options.format {
        return Ok(contents.to_string());
    }
    let scratch = stage(path, ".apigen-check", contents, options)?;
    std::fs::read_to_string(scratch.path()).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Directory staged files are created in: the parent of `path`.
fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Write `contents` to a temporary file next to `path`, formatted if asked.
/// The file is removed on drop unless persisted.
fn stage(
    path: &Path,
    prefix: &str,
    contents: &str,
    options: &WriteOptions,
) -> Result<NamedTempFile> {
    let write_err = |source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut staged = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(".rs")
        .tempfile_in(staging_dir(path))
        .map_err(write_err)?;
    staged.write_all(contents.as_bytes()).map_err(write_err)?;
    staged.as_file().sync_all().map_err(write_err)?;

    if options.format {
        format_output(staged.path()).map_err(|message| GenerateError::Format {
            path: path.to_path_buf(),
            message,
        })?;
    }
    Ok(staged)
}

/// Format a file in place with `rustfmt`, honouring [`RUSTFMT_BIN_ENV`].
pub fn format_output(path: &Path) -> std::result::Result<(), String> {
    let bin = std::env::var_os(RUSTFMT_BIN_ENV).unwrap_or_else(|| "rustfmt".into());
    format_with(&bin, path)
}

fn format_with(bin: &OsStr, path: &Path) -> std::result::Result<(), String> {
    let output = Command::new(bin)
        .arg("--edition")
        .arg("2021")
        .arg(path)
        .output()
        .map_err(|e| format!("failed to run {}: {e}", bin.to_string_lossy()))?;
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(format!(
        "{} exited with {}: {}",
        bin.to_string_lossy(),
        output.status,
        stderr.trim()
    ))
}
