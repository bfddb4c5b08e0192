use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::RecordOrder;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub upload_path: Option<String>,
    pub list_path: Option<String>,
    /// Must contain `{id}`.
    pub delete_path: Option<String>,
    /// 0 disables the timeout.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub order: Option<RecordOrder>,
}

/// Platform config directory path: `<config_dir>/lectern/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lectern").join("config.toml"))
}

/// Load config by cascading CWD `.lectern.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".lectern.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Overlay value if present, base value otherwise.
fn pick<S, T>(overlay: Option<&S>, base: Option<&S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay.and_then(&field).or_else(|| base.and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bs, os) = (base.server.as_ref(), overlay.server.as_ref());
    let (bd, od) = (base.display.as_ref(), overlay.display.as_ref());
    ConfigFile {
        server: Some(ServerConfig {
            base_url: pick(os, bs, |s| s.base_url.clone()),
            upload_path: pick(os, bs, |s| s.upload_path.clone()),
            list_path: pick(os, bs, |s| s.list_path.clone()),
            delete_path: pick(os, bs, |s| s.delete_path.clone()),
            timeout_secs: pick(os, bs, |s| s.timeout_secs),
        }),
        display: Some(DisplayConfig {
            theme: pick(od, bd, |d| d.theme.clone()),
            order: pick(od, bd, |d| d.order),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_parses() {
        let cfg: ConfigFile = toml::from_str(
            r#"
            [server]
            base_url = "https://materials.example.edu"
            "#,
        )
        .unwrap();
        let server = cfg.server.unwrap();
        assert_eq!(
            server.base_url.as_deref(),
            Some("https://materials.example.edu")
        );
        assert!(server.timeout_secs.is_none());
        assert!(cfg.display.is_none());
    }

    #[test]
    fn order_uses_kebab_case() {
        let cfg: ConfigFile = toml::from_str(
            r#"
            [display]
            order = "server-reversed"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.display.unwrap().order, Some(RecordOrder::ServerReversed));
    }

    #[test]
    fn overlay_wins_and_base_fills_gaps() {
        let base: ConfigFile = toml::from_str(
            r#"
            [server]
            base_url = "http://base:8000"
            timeout_secs = 30
            [display]
            theme = "modern"
            "#,
        )
        .unwrap();
        let overlay: ConfigFile = toml::from_str(
            r#"
            [server]
            base_url = "http://overlay:9000"
            "#,
        )
        .unwrap();

        let merged = merge(base, overlay);
        let server = merged.server.unwrap();
        assert_eq!(server.base_url.as_deref(), Some("http://overlay:9000"));
        assert_eq!(server.timeout_secs, Some(30));
        assert_eq!(merged.display.unwrap().theme.as_deref(), Some("modern"));
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nlist_path = \"/files/\"\n").unwrap();

        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.server.unwrap().list_path.as_deref(), Some("/files/"));
    }

    #[test]
    fn load_from_path_missing_or_invalid_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("nope.toml")).is_none());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[server\nbase_url = ").unwrap();
        assert!(load_from_path(&bad).is_none());
    }
}
