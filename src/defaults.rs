//! Default values for directus-provider configuration.
//!
//! This module provides centralized default values and environment variable
//! names, ensuring consistency between the configuration loader and tests.

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the Directus base URL.
pub const ENV_ENDPOINT: &str = "DIRECTUS_ENDPOINT";

/// Environment variable holding the static access token.
pub const ENV_TOKEN: &str = "DIRECTUS_TOKEN";

/// Environment variable overriding the request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "DIRECTUS_TIMEOUT_SECS";

/// Timeout applied to every request unless the caller's deadline is tighter.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns the default provider configuration file.
///
/// Uses the platform-appropriate configuration directory:
/// - Linux: `~/.config/directus-provider/config.yaml` (XDG Base Directory)
/// - macOS: `~/Library/Application Support/directus-provider/config.yaml`
/// - Windows: `{FOLDERID_RoamingAppData}\directus-provider\config.yaml`
///
/// Falls back to `.directus-provider.yaml` in the current directory if the
/// platform configuration directory cannot be determined.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("directus-provider").join("config.yaml"))
        .unwrap_or_else(|| PathBuf::from(".directus-provider.yaml"))
}
