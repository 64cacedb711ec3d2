// SPDX-License-Identifier: MPL-2.0
//! Where AssetLens keeps its files and which server it talks to.
//!
//! Two directories are used: the data directory holds `session.cbor`, the
//! config directory holds `settings.toml`. Each resolves, first match wins:
//!
//! 1. an explicit override (tests and `App::with_data_dir`)
//! 2. `--data-dir` / `--config-dir`, registered with [`init_cli_overrides`]
//! 3. `ASSET_LENS_DATA_DIR` / `ASSET_LENS_CONFIG_DIR`
//! 4. the platform directory from `dirs`, with `AssetLens` appended
//!
//! The server URL follows the same idea in [`resolve_server_url`].

use std::path::PathBuf;
use std::sync::OnceLock;

const APP_NAME: &str = "AssetLens";

pub const ENV_DATA_DIR: &str = "ASSET_LENS_DATA_DIR";
pub const ENV_CONFIG_DIR: &str = "ASSET_LENS_CONFIG_DIR";
pub const ENV_SERVER_URL: &str = "ASSET_LENS_SERVER_URL";

static CLI_DATA_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// The two directories the client writes to.
#[derive(Debug, Clone, Copy)]
enum Location {
    Data,
    Config,
}

impl Location {
    fn cli(self) -> Option<PathBuf> {
        let cell = match self {
            Location::Data => &CLI_DATA_DIR,
            Location::Config => &CLI_CONFIG_DIR,
        };
        cell.get().and_then(Clone::clone)
    }

    fn env_var(self) -> &'static str {
        match self {
            Location::Data => ENV_DATA_DIR,
            Location::Config => ENV_CONFIG_DIR,
        }
    }

    fn platform(self) -> Option<PathBuf> {
        match self {
            Location::Data => dirs::data_dir(),
            Location::Config => dirs::config_dir(),
        }
    }

    fn resolve(self, override_path: Option<PathBuf>) -> Option<PathBuf> {
        override_path
            .or_else(|| self.cli())
            .or_else(|| non_empty_env(self.env_var()).map(PathBuf::from))
            .or_else(|| self.platform().map(|base| base.join(APP_NAME)))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Registers the `--data-dir` and `--config-dir` flags. Call once, before
/// anything loads the session or the settings; later calls are ignored.
pub fn init_cli_overrides(data_dir: Option<String>, config_dir: Option<String>) {
    if CLI_DATA_DIR.set(data_dir.map(PathBuf::from)).is_err() {
        log::warn!("data dir override already registered");
    }
    if CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from)).is_err() {
        log::warn!("config dir override already registered");
    }
}

/// Directory of the persisted session.
#[must_use]
pub fn get_app_data_dir() -> Option<PathBuf> {
    get_app_data_dir_with_override(None)
}

#[must_use]
pub fn get_app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    Location::Data.resolve(override_path)
}

/// Directory of `settings.toml`.
#[must_use]
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

#[must_use]
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    Location::Config.resolve(override_path)
}

/// Catalog server URL: `--server`, then `ASSET_LENS_SERVER_URL`, then the
/// configured value. Blank values are skipped.
#[must_use]
pub fn resolve_server_url(cli_url: Option<&str>, configured: &str) -> String {
    cli_url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .or_else(|| non_empty_env(ENV_SERVER_URL))
        .unwrap_or_else(|| configured.to_string())
}
