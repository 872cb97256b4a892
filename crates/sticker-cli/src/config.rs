//! Configuration – reads/writes `~/.sticker/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use sticker_kernel::{AuthError, Credential, HashCost};
use sticker_types::StickerError;
use zeroize::Zeroizing;

/// Persisted server configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP port for the cockpit.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the `static/` and `images/` trees.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Identifier the robot driver reports in logs.
    #[serde(default = "default_robot_id")]
    pub robot_id: String,

    /// Operator login name.
    #[serde(default = "default_username")]
    pub username: String,

    /// Operator password in plain text.  Ignored when `password_hash` is set.
    #[serde(default = "default_password")]
    pub password: Zeroizing<String>,

    /// Pre-computed Argon2 PHC string for the operator password
    /// (see `sticker hash-password`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    /// Argon2 cost used for the stored credential and minted session tokens.
    #[serde(default)]
    pub hash_cost: HashCost,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("static_dir", &self.static_dir)
            .field("robot_id", &self.robot_id)
            .field("username", &self.username)
            .field(
                "password",
                if self.password.is_empty() { &"<not set>" } else { &"<redacted>" },
            )
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .field("hash_cost", &self.hash_cost)
            .finish()
    }
}

fn default_port() -> u16 {
    8080
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}
fn default_robot_id() -> String {
    "sticker".to_string()
}
fn default_username() -> String {
    "hello".to_string()
}
fn default_password() -> Zeroizing<String> {
    Zeroizing::new("world".to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
            robot_id: default_robot_id(),
            username: default_username(),
            password: default_password(),
            password_hash: None,
            hash_cost: HashCost::default(),
        }
    }
}

impl Config {
    /// Build the operator credential.  A configured `password_hash` wins over
    /// the plain-text `password`.
    pub fn credential(&self) -> Result<Credential, AuthError> {
        match &self.password_hash {
            Some(phc) => Credential::from_phc(self.username.clone(), phc.clone()),
            None => Credential::from_password(self.username.clone(), &self.password, &self.hash_cost),
        }
    }
}

/// Return the config path: `$STICKER_CONFIG` if set, else
/// `~/.sticker/config.toml`.
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("STICKER_CONFIG") {
        return PathBuf::from(path);
    }
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".sticker").join("config.toml")
}

/// Load the config from disk, falling back to defaults when the file does
/// not exist.  Environment overrides are applied in both cases.
///
/// A file that exists but cannot be read or parsed is an error, never a
/// silent fall back to the default credential.
pub fn load() -> Result<Config, StickerError> {
    load_at(&config_path())
}

/// [`load`] for an explicit path.
pub fn load_at(path: &Path) -> Result<Config, StickerError> {
    let mut cfg = load_from(path)?.unwrap_or_default();
    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

/// Load the config from a specific path.  Returns `None` if the file does
/// not exist.
pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, StickerError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        StickerError::Config(format!("failed to read config at {}: {e}", path.display()))
    })?;
    let cfg: Config = toml::from_str(&raw)
        .map_err(|e| StickerError::Config(format!("failed to parse config: {e}")))?;
    Ok(Some(cfg))
}

/// Apply `STICKER_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `STICKER_PORT` | `port` |
/// | `STICKER_STATIC_DIR` | `static_dir` |
/// | `STICKER_USERNAME` | `username` |
/// | `STICKER_PASSWORD` | `password` (clears `password_hash`) |
pub fn apply_env_overrides(cfg: &mut Config) {
    apply_overrides(cfg, |key| std::env::var(key).ok());
}

/// Apply overrides read through `lookup`, keyed by variable name.
pub(crate) fn apply_overrides(cfg: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("STICKER_PORT")
        && let Ok(port) = v.parse::<u16>()
    {
        cfg.port = port;
    }
    if let Some(v) = lookup("STICKER_STATIC_DIR") {
        cfg.static_dir = PathBuf::from(v);
    }
    if let Some(v) = lookup("STICKER_USERNAME") {
        cfg.username = v;
    }
    if let Some(v) = lookup("STICKER_PASSWORD") {
        cfg.password = Zeroizing::new(v);
        cfg.password_hash = None;
    }
}

/// Save the config to a specific path, creating the parent directory if
/// necessary.  The file holds a password, so it is created owner-only on Unix.
pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), StickerError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            StickerError::Config(format!("failed to create config directory: {e}"))
        })?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700)).map_err(|e| {
                StickerError::Config(format!("failed to set config directory permissions: {e}"))
            })?;
        }
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| StickerError::Config(format!("failed to serialize config: {e}")))?;
    let write_err =
        |e: std::io::Error| StickerError::Config(format!("failed to write config at {}: {e}", path.display()));
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| f.write_all(raw.as_bytes()))
            .map_err(write_err)?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw).map_err(write_err)?;
    Ok(())
}
