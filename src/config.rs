use std::collections::HashSet;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;

/// Tag names checked when no configuration says otherwise.
pub const DEFAULT_SUPPORTED_TAGS: &[&str] = &["img", "Image", "v-img"];

/// Alt text offered as the translation quick fix for template dialects.
pub const DEFAULT_TRANSLATION_PLACEHOLDER: &str = "{{ t('image.alt') }}";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Image-like tag names to check (matched case-insensitively)
    pub supported_tags: Vec<String>,
    /// Alt text inserted by the "Add translation placeholder" fix
    pub translation_placeholder: String,
    /// Fixed alt text used by automatic fixes instead of a file-name guess
    pub placeholder: Option<String>,
    /// Glob patterns for paths skipped when linting directories
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supported_tags: DEFAULT_SUPPORTED_TAGS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            translation_placeholder: DEFAULT_TRANSLATION_PLACEHOLDER.to_string(),
            placeholder: None,
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Snapshot of the supported tag set for one scan.
    pub fn supported_tags(&self) -> SupportedTags {
        SupportedTags::new(&self.supported_tags)
    }

    /// Compile the `exclude` globs. Invalid patterns are skipped with a warning.
    pub fn exclude_set(&self) -> GlobSet {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.exclude {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => log::warn!("Ignoring invalid exclude pattern '{}': {}", pattern, e),
            }
        }
        builder.build().unwrap_or_else(|e| {
            log::warn!("Failed to build exclude set: {}", e);
            GlobSet::empty()
        })
    }
}

/// Case-insensitive set of image-like tag names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedTags {
    names: HashSet<String>,
}

impl SupportedTags {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            names: names
                .iter()
                .map(|n| n.as_ref().trim().to_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, tag_name: &str) -> bool {
        self.names.contains(&tag_name.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for SupportedTags {
    fn default() -> Self {
        Self::new(DEFAULT_SUPPORTED_TAGS)
    }
}

#[derive(Default, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn supported_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.config.supported_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn translation_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.translation_placeholder = placeholder.into();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = Some(placeholder.into());
        self
    }

    pub fn exclude<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.config.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

const CANDIDATE_NAMES: &[&str] = &[".altfix.toml", "altfix.toml"];

fn parse_config_str(s: &str, path: &Path) -> io::Result<Config> {
    toml::from_str::<Config>(s).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid config {}: {e}", path.display()),
        )
    })
}

fn read_config(path: &Path) -> io::Result<Config> {
    log::debug!("Reading config from: {}", path.display());
    let s = fs::read_to_string(path)?;
    let config = parse_config_str(&s, path)?;
    log::info!("Loaded config from: {}", path.display());
    Ok(config)
}

fn find_in_tree(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        for name in CANDIDATE_NAMES {
            let p = dir.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
    }
    None
}

fn xdg_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let p = Path::new(&xdg).join("altfix").join("config.toml");
        if p.is_file() {
            return Some(p);
        }
    }
    let p = dirs::home_dir()?
        .join(".config")
        .join("altfix")
        .join("config.toml");
    p.is_file().then_some(p)
}

/// Load configuration with precedence:
/// 1) explicit path (error if unreadable/invalid)
/// 2) walk up from start_dir: .altfix.toml, altfix.toml
/// 3) XDG: $XDG_CONFIG_HOME/altfix/config.toml or ~/.config/altfix/config.toml
/// 4) default config
pub fn load(explicit: Option<&Path>, start_dir: &Path) -> io::Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let cfg = read_config(path)?;
        return Ok((cfg, Some(path.to_path_buf())));
    }

    if let Some(p) = find_in_tree(start_dir) {
        match read_config(&p) {
            Ok(cfg) => return Ok((cfg, Some(p))),
            Err(e) => log::warn!("Skipping config {}: {}", p.display(), e),
        }
    }

    if let Some(p) = xdg_config_path() {
        match read_config(&p) {
            Ok(cfg) => return Ok((cfg, Some(p))),
            Err(e) => log::warn!("Skipping config {}: {}", p.display(), e),
        }
    }

    log::debug!("No config file found, using defaults");
    Ok((Config::default(), None))
}
