//! Loading `book.toml` files.
//!
//! The file is parsed into raw structs first and then resolved into a
//! [`SiteConfig`]. Shape problems that serde cannot express (non-string
//! sidebar entries, unknown extensions, out-of-range levels) are reported as
//! validation errors naming the field.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::builtin;
use crate::error::ConfigError;
use crate::expand::{expand_env, expand_opt};
use crate::site::{
    AnchorConfig, Extension, HeadTag, Locale, MarkdownConfig, NavLink, SidebarEntry, SiteConfig,
    ThemeConfig,
};
use crate::slug::SlugStyle;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "book.toml";

/// Command-line settings that override configuration values.
///
/// Only non-`None` values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the documentation directory used for edit links.
    pub docs_dir: Option<String>,
    /// Override the edit links flag.
    pub edit_links: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawSite {
    title: Option<String>,
    description: Option<String>,
    head: Vec<RawHeadTag>,
    locales: BTreeMap<String, RawLocale>,
    markdown: RawMarkdown,
    theme: RawTheme,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHeadTag {
    tag: String,
    #[serde(default)]
    attrs: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLocale {
    lang: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawMarkdown {
    anchor: RawAnchor,
    extensions: Vec<String>,
    linkify: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawAnchor {
    level: Option<Vec<i64>>,
    slug: Option<SlugStyle>,
    permalink: Option<bool>,
    permalink_before: Option<bool>,
    permalink_symbol: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawTheme {
    nav: Vec<RawNavLink>,
    sidebar: Vec<RawSidebarEntry>,
    repo: Option<String>,
    repo_label: Option<String>,
    docs_dir: Option<String>,
    docs_branch: Option<String>,
    edit_links: Option<bool>,
    edit_link_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNavLink {
    text: String,
    link: String,
}

/// Sidebar entry as written in the file: a bare path or a table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSidebarEntry {
    Path(String),
    Entry(RawSidebarTable),
    Other(toml::Value),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSidebarTable {
    path: String,
    #[serde(default = "default_true")]
    enabled: bool,
}

/// Keys accepted in a sidebar table.
const SIDEBAR_KEYS: [&str; 2] = ["path", "enabled"];

fn default_true() -> bool {
    true
}

impl RawSite {
    /// Expand environment variable references in string fields.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand_opt(&mut self.theme.repo, "theme.repo")?;
        for (i, tag) in self.head.iter_mut().enumerate() {
            for (name, value) in &mut tag.attrs {
                *value = expand_env(value, &format!("head[{i}].attrs.{name}"))?;
            }
        }
        for (i, link) in self.theme.nav.iter_mut().enumerate() {
            link.link = expand_env(&link.link, &format!("theme.nav[{i}].link"))?;
        }
        Ok(())
    }

    /// Resolve raw values into a [`SiteConfig`], filling defaults.
    fn resolve(self) -> Result<SiteConfig, ConfigError> {
        Ok(SiteConfig {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            head: self
                .head
                .into_iter()
                .map(|raw| HeadTag {
                    tag: raw.tag,
                    attrs: raw.attrs,
                })
                .collect(),
            locales: self
                .locales
                .into_iter()
                .map(|(prefix, raw)| (prefix, Locale { lang: raw.lang }))
                .collect(),
            markdown: self.markdown.resolve()?,
            theme: self.theme.resolve()?,
        })
    }
}

impl RawMarkdown {
    fn resolve(self) -> Result<MarkdownConfig, ConfigError> {
        let extensions = self
            .extensions
            .iter()
            .enumerate()
            .map(|(i, name)| {
                name.parse::<Extension>()
                    .map_err(|message| ConfigError::invalid(format!("markdown.extensions[{i}]"), message))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MarkdownConfig {
            anchor: self.anchor.resolve()?,
            extensions,
            linkify: self.linkify.unwrap_or(false),
        })
    }
}

impl RawAnchor {
    fn resolve(self) -> Result<AnchorConfig, ConfigError> {
        let defaults = builtin::anchor();
        let level = match self.level {
            Some(levels) => levels
                .into_iter()
                .map(|l| {
                    u8::try_from(l).map_err(|_| {
                        ConfigError::invalid(
                            "markdown.anchor.level",
                            format!("heading level {l} is outside 1..=6"),
                        )
                    })
                })
                .collect::<Result<BTreeSet<_>, _>>()?,
            None => defaults.level,
        };

        Ok(AnchorConfig {
            level,
            slug: self.slug.unwrap_or(defaults.slug),
            permalink: self.permalink.unwrap_or(defaults.permalink),
            permalink_before: self.permalink_before.unwrap_or(defaults.permalink_before),
            permalink_symbol: self.permalink_symbol.unwrap_or(defaults.permalink_symbol),
        })
    }
}

impl RawTheme {
    fn resolve(self) -> Result<ThemeConfig, ConfigError> {
        let sidebar = self
            .sidebar
            .into_iter()
            .enumerate()
            .map(|(i, raw)| match raw {
                RawSidebarEntry::Path(path) => Ok(SidebarEntry::new(path)),
                RawSidebarEntry::Entry(RawSidebarTable { path, enabled }) => {
                    Ok(SidebarEntry { path, enabled })
                }
                RawSidebarEntry::Other(value) => Err(ConfigError::invalid(
                    format!("theme.sidebar[{i}]"),
                    sidebar_shape_error(&value),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ThemeConfig {
            nav: self
                .nav
                .into_iter()
                .map(|raw| NavLink {
                    text: raw.text,
                    link: raw.link,
                })
                .collect(),
            sidebar,
            repo: self.repo,
            repo_label: self.repo_label,
            docs_dir: self.docs_dir.unwrap_or_default(),
            docs_branch: self.docs_branch.unwrap_or_else(|| "master".to_owned()),
            edit_links: self.edit_links.unwrap_or(false),
            edit_link_text: self
                .edit_link_text
                .unwrap_or_else(|| "Edit this page".to_owned()),
        })
    }
}

/// Describe why a sidebar value is neither a path nor a valid table.
fn sidebar_shape_error(value: &toml::Value) -> String {
    if let Some(table) = value.as_table()
        && let Some(key) = table.keys().find(|k| !SIDEBAR_KEYS.contains(&k.as_str()))
    {
        return format!("unknown key '{key}', expected one of: {}", SIDEBAR_KEYS.join(", "));
    }
    format!(
        "expected a path string or {{ path, enabled }} table, found {}",
        value.type_str()
    )
}

impl SiteConfig {
    /// Load configuration with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `book.toml` in the current directory and its parents, falling back
    /// to the built-in book configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, the file
    /// cannot be parsed, or the resulting record fails validation.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No {CONFIG_FILENAME} found, using built-in configuration");
            builtin::site()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML, `ConfigError::EnvVar`
    /// for unset variables and `ConfigError::Validation` for invalid values.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut raw: RawSite = toml::from_str(content)?;
        raw.expand_env_vars()?;
        let config = raw.resolve()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "Loading configuration");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(docs_dir) = &settings.docs_dir {
            self.theme.docs_dir.clone_from(docs_dir);
        }
        if let Some(edit_links) = settings.edit_links {
            self.theme.edit_links = edit_links;
        }
    }

    /// Check that every enabled sidebar entry exists under `root/docs_dir`.
    ///
    /// Touches the filesystem, so it is never part of [`validate`](Self::validate).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first missing entry.
    pub fn check_sources(&self, root: &Path) -> Result<(), ConfigError> {
        let docs_root = root.join(self.theme.docs_dir.trim_matches('/'));
        for (i, entry) in self.theme.sidebar.iter().enumerate() {
            if !entry.enabled {
                continue;
            }
            let dir = docs_root.join(entry.path.trim_matches('/'));
            if !dir.is_dir() {
                return Err(ConfigError::invalid(
                    format!("theme.sidebar[{i}]"),
                    format!("no documentation directory at {}", dir.display()),
                ));
            }
        }
        Ok(())
    }
}

/// Search for the config file in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BOOK_TOML: &str = r##"
title = "実践 Laravel 入門"
description = "Laravel を利用して基本的なAPIシステムを開発します。"

[[head]]
tag = "script"
attrs = { src = "https://static.codepen.io/assets/embed/ei.js" }

[locales."/"]
lang = "ja"

[markdown]
extensions = ["playground"]
linkify = true

[markdown.anchor]
level = [1, 2, 3]
permalink = true
permalink_before = true
permalink_symbol = "#"

[theme]
nav = [{ text = "Lec Café", link = "https://leccafe.connpass.com/" }]
sidebar = [
    "/1.環境構築/",
    "/2.画面の作成/",
    "/3.データベースの利用/",
    "/4.Eloquentの利用/",
    "/5.Bladeの利用/",
    "/6.バリデーション/",
    { path = "/7.Controllerの利用/", enabled = false },
]
repo = "lec-cafe/book_laravel"
repo_label = "Github"
docs_dir = "books"
edit_links = true
edit_link_text = "ページに不明点や誤字等があれば、Github にて修正を提案してください！"
"##;

    #[test]
    fn test_file_matches_builtin() {
        let config = SiteConfig::from_toml_str(BOOK_TOML).unwrap();
        assert_eq!(config, builtin::site());
    }

    #[test]
    fn test_minimal_file_defaults() {
        let config = SiteConfig::from_toml_str(r#"title = "Book""#).unwrap();
        assert_eq!(config.title, "Book");
        assert!(config.head.is_empty());
        assert!(config.locales.is_empty());
        assert!(config.markdown.extensions.is_empty());
        assert!(!config.markdown.linkify);
        assert_eq!(config.markdown.anchor, builtin::anchor());
        assert!(!config.theme.edit_links);
        assert_eq!(config.theme.docs_branch, "master");
        assert_eq!(config.theme.edit_link_text, "Edit this page");
    }

    #[test]
    fn test_empty_file_fails_on_title() {
        let err = SiteConfig::from_toml_str("").unwrap_err();
        assert_eq!(err.field(), Some("title"));
    }

    #[test]
    fn test_non_string_sidebar_entry() {
        let toml = r#"
title = "Book"
[theme]
sidebar = ["/1.環境構築/", 42]
"#;
        let err = SiteConfig::from_toml_str(toml).unwrap_err();
        assert!(err.is_validation(), "Expected validation error, got {err:?}");
        assert_eq!(err.field(), Some("theme.sidebar[1]"));
        assert!(err.to_string().contains("integer"));
    }

    #[test]
    fn test_sidebar_table_with_bad_path_type() {
        let toml = r#"
title = "Book"
[theme]
sidebar = [{ path = 7 }]
"#;
        let err = SiteConfig::from_toml_str(toml).unwrap_err();
        assert_eq!(err.field(), Some("theme.sidebar[0]"));
        assert!(err.to_string().contains("table"));
    }

    #[test]
    fn test_sidebar_table_unknown_key() {
        let toml = r#"
title = "Book"
[theme]
sidebar = ["/1.環境構築/", { path = "/7.Controllerの利用/", enabeld = false }]
"#;
        let err = SiteConfig::from_toml_str(toml).unwrap_err();
        assert!(err.is_validation(), "Expected validation error, got {err:?}");
        assert_eq!(err.field(), Some("theme.sidebar[1]"));
        assert!(err.to_string().contains("unknown key 'enabeld'"));
    }

    #[test]
    fn test_sidebar_table_defaults_enabled() {
        let toml = r#"
title = "Book"
[theme]
sidebar = [{ path = "/guide/" }]
"#;
        let config = SiteConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.theme.sidebar, vec![SidebarEntry::new("/guide/")]);
    }

    #[test]
    fn test_unknown_extension() {
        let toml = r#"
title = "Book"
[markdown]
extensions = ["playground", "mermaid"]
"#;
        let err = SiteConfig::from_toml_str(toml).unwrap_err();
        assert_eq!(err.field(), Some("markdown.extensions[1]"));
        assert!(err.to_string().contains("mermaid"));
    }

    #[test]
    fn test_negative_anchor_level() {
        let toml = r#"
title = "Book"
[markdown.anchor]
level = [-1, 2]
"#;
        let err = SiteConfig::from_toml_str(toml).unwrap_err();
        assert_eq!(err.field(), Some("markdown.anchor.level"));
    }

    #[test]
    fn test_ascii_slug_style() {
        let toml = r#"
title = "Book"
[markdown.anchor]
slug = "ascii"
"#;
        let config = SiteConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.markdown.anchor.slug, SlugStyle::Ascii);
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let err = SiteConfig::from_toml_str("title = \"Book\"\ntitel = \"typo\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_bad_locale_key_from_file() {
        let toml = r#"
title = "Book"
[locales.en]
lang = "en"
"#;
        let err = SiteConfig::from_toml_str(toml).unwrap_err();
        assert_eq!(err.field(), Some("locales.\"en\""));
    }

    #[test]
    fn test_expand_env_in_repo() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("BOOK_FILE_TEST_REPO", "someone/fork");
        }
        let toml = r#"
title = "Book"
[theme]
repo = "${BOOK_FILE_TEST_REPO}"
edit_links = true
"#;
        let config = SiteConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.theme.repo.as_deref(), Some("someone/fork"));
        unsafe {
            std::env::remove_var("BOOK_FILE_TEST_REPO");
        }
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let err = SiteConfig::load(Some(Path::new("/nonexistent/book.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_explicit_path_with_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, BOOK_TOML).unwrap();

        let settings = CliSettings {
            docs_dir: Some("docs".to_owned()),
            edit_links: Some(false),
        };
        let config = SiteConfig::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.title, "実践 Laravel 入門");
        assert_eq!(config.theme.docs_dir, "docs");
        assert!(!config.theme.edit_links);
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("books").join("1.環境構築");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "title = \"Book\"").unwrap();

        assert_eq!(
            discover_config(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_check_sources() {
        let dir = tempfile::tempdir().unwrap();
        let config = builtin::site();
        for entry in config.theme.active_sidebar() {
            std::fs::create_dir_all(dir.path().join("books").join(entry.path.trim_matches('/')))
                .unwrap();
        }
        assert!(config.check_sources(dir.path()).is_ok());
    }

    #[test]
    fn test_check_sources_missing_chapter() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("books").join("1.環境構築")).unwrap();

        let err = builtin::site().check_sources(dir.path()).unwrap_err();
        assert_eq!(err.field(), Some("theme.sidebar[1]"));
        assert!(err.to_string().contains("2.画面の作成"));
    }
}
