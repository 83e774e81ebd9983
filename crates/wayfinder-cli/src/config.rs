//! User settings – reads/writes `~/.wayfinder/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use wayfinder_guidance::Language;
use wayfinder_map::{BLOCK_C_MAP, MapSource};
use wayfinder_runtime::{DEFAULT_STEP_LENGTH_M, EngineConfig};

/// Persisted settings stored in `~/.wayfinder/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Map file path or URL.  Empty means the built-in Block C map.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub map: String,

    /// Grid-floor zone map path or URL, for `/zone`.  Empty disables it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone_map: String,

    /// Speech language tag (`en-US`, `te-IN`, `hi-IN`).
    #[serde(default)]
    pub language: Language,

    /// Metres credited per detected step.
    #[serde(default = "default_step_length")]
    pub step_length_m: f32,

    #[serde(default = "default_voice")]
    pub voice_enabled: bool,
}

fn default_step_length() -> f32 {
    DEFAULT_STEP_LENGTH_M
}
fn default_voice() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map: String::new(),
            zone_map: String::new(),
            language: Language::default(),
            step_length_m: default_step_length(),
            voice_enabled: default_voice(),
        }
    }
}

impl Config {
    pub fn map_source(&self) -> MapSource {
        if self.map.trim().is_empty() {
            MapSource::Inline(BLOCK_C_MAP.to_string())
        } else {
            MapSource::parse(&self.map)
        }
    }

    pub fn zone_source(&self) -> Option<MapSource> {
        let raw = self.zone_map.trim();
        (!raw.is_empty()).then(|| MapSource::parse(raw))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            step_length_m: self.step_length_m,
            language: self.language,
            voice_enabled: self.voice_enabled,
            ..EngineConfig::default()
        }
    }
}

/// Return the path to `~/.wayfinder/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".wayfinder").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// How [`startup`] obtained its config.
#[derive(Debug, Clone, PartialEq)]
pub enum Startup {
    Loaded,
    /// No file existed; defaults were written.
    Created,
    /// No file existed and writing the defaults failed.
    Unsaved(String),
    /// The file could not be read or parsed; defaults are used.
    Fallback(String),
}

/// The config for this run.  Every path applies the `WAYFINDER_*`
/// overrides; only defaults are ever written to disk.
pub fn startup() -> (Config, Startup) {
    startup_at(&config_path())
}

pub(crate) fn startup_at(path: &PathBuf) -> (Config, Startup) {
    let (mut cfg, origin) = match load_from(path) {
        Ok(Some(cfg)) => return (cfg, Startup::Loaded),
        Ok(None) => {
            let cfg = Config::default();
            match save_to(&cfg, path) {
                Ok(()) => (cfg, Startup::Created),
                Err(e) => (cfg, Startup::Unsaved(e)),
            }
        }
        Err(e) => (Config::default(), Startup::Fallback(e)),
    };
    apply_env_overrides(&mut cfg);
    (cfg, origin)
}

/// Apply `WAYFINDER_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `WAYFINDER_MAP` | `map` |
/// | `WAYFINDER_ZONE_MAP` | `zone_map` |
/// | `WAYFINDER_LANG` | `language` |
/// | `WAYFINDER_STEP_LENGTH` | `step_length_m` (positive metres) |
/// | `WAYFINDER_VOICE` | `voice_enabled` (`on`/`off`, `true`/`false`, `1`/`0`) |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("WAYFINDER_MAP") {
        cfg.map = v;
    }
    if let Ok(v) = std::env::var("WAYFINDER_ZONE_MAP") {
        cfg.zone_map = v;
    }
    if let Ok(v) = std::env::var("WAYFINDER_LANG") {
        cfg.language = Language::from_tag(&v);
    }
    if let Ok(v) = std::env::var("WAYFINDER_STEP_LENGTH")
        && let Ok(len) = v.trim().parse::<f32>()
        && len > 0.0
    {
        cfg.step_length_m = len;
    }
    if let Ok(v) = std::env::var("WAYFINDER_VOICE")
        && let Some(on) = parse_switch(&v)
    {
        cfg.voice_enabled = on;
    }
}

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Save the config, creating `~/.wayfinder/` if necessary.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    // Tests that read or write WAYFINDER_* variables hold this.
    static ENV: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(unix)]
    #[test]
    fn config_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        save_to(&Config::default(), &path).expect("save");

        let file_mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
        let dir_mode = std::fs::metadata(path.parent().unwrap()).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    fn roundtrip_keeps_language_and_step_length() {
        let _env = env_lock();
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        let cfg = Config {
            language: Language::TeluguIn,
            step_length_m: 0.8,
            ..Config::default()
        };
        save_to(&cfg, &path).expect("save");

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("te-IN"));
        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.language, Language::TeluguIn);
        assert_eq!(loaded.step_length_m, 0.8);
        assert!(loaded.voice_enabled);
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn path_points_to_wayfinder_dir() {
        let p = config_path_for_home("/home/traveler");
        assert!(p.to_string_lossy().contains(".wayfinder"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn empty_map_means_built_in() {
        assert!(matches!(Config::default().map_source(), MapSource::Inline(_)));
        let cfg = Config {
            map: "https://maps.example.org/block_c.json".to_string(),
            ..Config::default()
        };
        assert!(matches!(cfg.map_source(), MapSource::Url(_)));
        assert!(cfg.zone_source().is_none());
        let cfg = Config {
            zone_map: " maps/block_e.json ".to_string(),
            ..Config::default()
        };
        assert!(matches!(cfg.zone_source(), Some(MapSource::Path(_))));
    }

    #[test]
    fn env_overrides() {
        let _env = env_lock();
        // SAFETY: every test touching WAYFINDER_* variables holds `ENV`.
        unsafe {
            std::env::set_var("WAYFINDER_LANG", "hi");
            std::env::set_var("WAYFINDER_STEP_LENGTH", "not-a-number");
            std::env::set_var("WAYFINDER_VOICE", "off");
            std::env::set_var("WAYFINDER_ZONE_MAP", "/srv/maps/block_e_zones.json");
        }
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.language, Language::HindiIn);
        assert_eq!(cfg.zone_map, "/srv/maps/block_e_zones.json");
        assert_eq!(cfg.step_length_m, DEFAULT_STEP_LENGTH_M);
        assert!(!cfg.voice_enabled);

        unsafe { std::env::set_var("WAYFINDER_STEP_LENGTH", "0.65") };
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.step_length_m, 0.65);
        unsafe {
            std::env::remove_var("WAYFINDER_LANG");
            std::env::remove_var("WAYFINDER_STEP_LENGTH");
            std::env::remove_var("WAYFINDER_VOICE");
            std::env::remove_var("WAYFINDER_ZONE_MAP");
        }
    }

    #[test]
    fn first_run_and_fallback_honor_env_overrides() {
        let _env = env_lock();
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        // SAFETY: every test touching WAYFINDER_* variables holds `ENV`.
        unsafe { std::env::set_var("WAYFINDER_MAP", "/srv/maps/block_e.json") };

        let (cfg, origin) = startup_at(&path);
        assert_eq!(origin, Startup::Created);
        assert_eq!(cfg.map, "/srv/maps/block_e.json");
        // The override is not persisted.
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("block_e"));

        let (cfg, origin) = startup_at(&path);
        assert_eq!(origin, Startup::Loaded);
        assert_eq!(cfg.map, "/srv/maps/block_e.json");

        std::fs::write(&path, "step_length_m = \"long\"").unwrap();
        let (cfg, origin) = startup_at(&path);
        assert!(matches!(origin, Startup::Fallback(_)));
        assert_eq!(cfg.map, "/srv/maps/block_e.json");

        unsafe { std::env::remove_var("WAYFINDER_MAP") };
    }
}
