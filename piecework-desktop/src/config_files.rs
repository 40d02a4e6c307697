//! Reading and writing JSON files: the assembly parameters file and generated output.

use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context as _;
use serde::{Serialize, de::DeserializeOwned};

/// Reads a JSON file, or if it does not exist, creates it containing `default()`.
///
/// Problems other than a missing file are logged, and the default is used instead, so that a
/// broken configuration file never prevents the program from running.
pub fn read_or_create_default_json_file<V: DeserializeOwned + Serialize>(
    description: &str,
    path: &Path,
    default: fn() -> V,
) -> V {
    match File::open(path) {
        Ok(file) => match serde_json::from_reader(BufReader::new(file)) {
            Ok(value) => {
                log::trace!(
                    "Loaded {description} from {path}",
                    path = path.to_string_lossy()
                );
                value
            }
            Err(e) => {
                log::warn!(
                    "Syntax error in {description} loaded from {path}; \
                    using default values. Error: {e}",
                    path = path.to_string_lossy(),
                );
                default()
            }
        },
        Err(open_for_read_error) if open_for_read_error.kind() == std::io::ErrorKind::NotFound => {
            log::info!(
                "No {description} file found; creating {path}",
                path = path.to_string_lossy()
            );
            let value = default();
            match write_json_file(path, &value) {
                Ok(()) => log::trace!(
                    "Wrote default {description} to {path}",
                    path = path.to_string_lossy()
                ),
                Err(write_error) => {
                    log::error!(
                        "Error while writing default {description} file {path}: {write_error:#}",
                        path = path.to_string_lossy(),
                    );
                }
            }
            value
        }
        Err(e) => {
            log::error!(
                "Error while reading {description} file {path}: {e}",
                path = path.to_string_lossy(),
            );
            default()
        }
    }
}

/// Writes `value` to `path` as pretty-printed JSON, replacing any existing file.
pub fn write_json_file<V: Serialize>(path: &Path, value: &V) -> Result<(), anyhow::Error> {
    let json_text = serde_json::to_string_pretty(value).context("failed to serialize")?;
    fs::write(path, json_text.as_bytes())
        .with_context(|| format!("failed to write {path}", path = path.to_string_lossy()))
}
