//! Dark/light theme and its persisted preference.
//!
//! The preference lives under a single `theme` key in a small JSON key-value
//! file, the local-storage equivalent for the CLI. Other keys in that file are
//! left alone.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

pub const STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

pub struct ThemeColors {
    pub bg: &'static str,
    pub text: &'static str,
    pub key: &'static str,
    pub value: &'static str,
    pub cc: &'static str,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Dark => ThemeColors {
                bg: "#161b22",
                text: "#c9d1d9",
                key: "#ffa657",
                value: "#a5d6ff",
                cc: "#616e7f",
            },
            Theme::Light => ThemeColors {
                bg: "#ffffff",
                text: "#24292f",
                key: "#d73a49",
                value: "#0366d6",
                cc: "#6a737d",
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => bail!("unknown theme '{other}'"),
        }
    }
}

/// Theme preference backed by a JSON file.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored theme. Anything other than an explicit `dark` reads as light.
    pub fn load(&self) -> Result<Theme> {
        let entries = self.read_entries()?;
        let theme = match entries.get(STORAGE_KEY).and_then(Value::as_str) {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        };
        Ok(theme)
    }

    pub fn save(&self, theme: Theme) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(STORAGE_KEY.to_string(), Value::from(theme.as_str()));

        let json = serde_json::to_string_pretty(&Value::Object(entries))
            .context("Failed to serialize theme storage")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Flip the stored theme and persist it. Returns the new theme.
    pub fn toggle(&self) -> Result<Theme> {
        let next = self.load()?.toggled();
        self.save(next)?;
        log::info!("theme switched to {next}");
        Ok(next)
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?
        {
            Value::Object(map) => Ok(map),
            _ => bail!("{} does not hold a JSON object", self.path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_means_light() {
        let dir = TempDir::new().unwrap();
        let store = ThemeStore::new(dir.path().join("theme.json"));
        assert_eq!(store.load().unwrap(), Theme::Light);
    }

    #[test]
    fn toggle_persists_and_flips_back() {
        let dir = TempDir::new().unwrap();
        let store = ThemeStore::new(dir.path().join("theme.json"));

        assert_eq!(store.toggle().unwrap(), Theme::Dark);
        assert_eq!(store.load().unwrap(), Theme::Dark);
        assert_eq!(store.toggle().unwrap(), Theme::Light);
        assert_eq!(store.load().unwrap(), Theme::Light);
    }

    #[test]
    fn other_keys_survive_a_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, r#"{"visits": 3, "theme": "light"}"#).unwrap();

        let store = ThemeStore::new(&path);
        store.save(Theme::Dark).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["visits"], 3);
        assert_eq!(value["theme"], "dark");
    }

    #[test]
    fn unrecognised_value_reads_as_light() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("theme.json");
        fs::write(&path, r#"{"theme": "DARK"}"#).unwrap();
        assert_eq!(ThemeStore::new(&path).load().unwrap(), Theme::Light);
    }

    #[test]
    fn theme_names_parse() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().to_string(), "light");
        assert!("sepia".parse::<Theme>().is_err());
    }
}
