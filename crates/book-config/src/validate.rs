//! Validation of the resolved configuration record.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::site::{SiteConfig, ThemeConfig};

const MAX_HEADING_LEVEL: u8 = 6;

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::invalid(field, "cannot be empty"));
    }
    Ok(())
}

/// Whether `key` is a URL path prefix such as `/` or `/en/`.
fn is_path_prefix(key: &str) -> bool {
    key.starts_with('/')
        && key.ends_with('/')
        && !key.contains("//")
        && !key.chars().any(|c| c.is_whitespace() || c == '?' || c == '#')
}

/// Loose BCP 47 check: `ja`, `en-US`, `zh-Hant-TW`.
fn is_language_tag(tag: &str) -> bool {
    let mut subtags = tag.split('-');
    let primary_ok = subtags
        .next()
        .is_some_and(|p| (2..=8).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphabetic()));
    primary_ok
        && subtags.all(|s| (1..=8).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':')
}

impl SiteConfig {
    /// Validate the record.
    ///
    /// Called by every loader before a record is handed out.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.title, "title")?;
        self.validate_head()?;
        self.validate_locales()?;
        self.validate_markdown()?;
        self.theme.validate()?;
        Ok(())
    }

    fn validate_head(&self) -> Result<(), ConfigError> {
        for (i, tag) in self.head.iter().enumerate() {
            if tag.tag.is_empty() || !tag.tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::invalid(
                    format!("head[{i}].tag"),
                    format!("'{}' is not a valid tag name", tag.tag),
                ));
            }
            if let Some(name) = tag.attrs.keys().find(|name| !is_attribute_name(name)) {
                return Err(ConfigError::invalid(
                    format!("head[{i}].attrs"),
                    format!("'{name}' is not a valid attribute name"),
                ));
            }
        }
        Ok(())
    }

    fn validate_locales(&self) -> Result<(), ConfigError> {
        for (prefix, locale) in &self.locales {
            if !is_path_prefix(prefix) {
                return Err(ConfigError::invalid(
                    format!("locales.\"{prefix}\""),
                    "locale key must be a URL path prefix starting and ending with /",
                ));
            }
            if !is_language_tag(&locale.lang) {
                return Err(ConfigError::invalid(
                    format!("locales.\"{prefix}\".lang"),
                    format!("'{}' is not a valid language tag", locale.lang),
                ));
            }
        }

        if !self.locales.is_empty() && !self.locales.contains_key("/") {
            return Err(ConfigError::invalid(
                "locales",
                "the root locale \"/\" is required when locales are configured",
            ));
        }
        Ok(())
    }

    fn validate_markdown(&self) -> Result<(), ConfigError> {
        let anchor = &self.markdown.anchor;
        if anchor.level.is_empty() {
            return Err(ConfigError::invalid(
                "markdown.anchor.level",
                "at least one heading level is required",
            ));
        }
        if let Some(level) = anchor
            .level
            .iter()
            .find(|&&l| l == 0 || l > MAX_HEADING_LEVEL)
        {
            return Err(ConfigError::invalid(
                "markdown.anchor.level",
                format!("heading level {level} is outside 1..={MAX_HEADING_LEVEL}"),
            ));
        }
        if anchor.permalink && anchor.permalink_symbol.is_empty() {
            return Err(ConfigError::invalid(
                "markdown.anchor.permalink_symbol",
                "cannot be empty when permalinks are enabled",
            ));
        }

        let mut seen = HashSet::new();
        for (i, extension) in self.markdown.extensions.iter().enumerate() {
            if !seen.insert(*extension) {
                return Err(ConfigError::invalid(
                    format!("markdown.extensions[{i}]"),
                    format!("extension '{extension}' is registered more than once"),
                ));
            }
        }
        Ok(())
    }
}

impl ThemeConfig {
    /// Validate navigation and edit-link settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, link) in self.nav.iter().enumerate() {
            require_non_empty(&link.text, &format!("theme.nav[{i}].text"))?;
            require_non_empty(&link.link, &format!("theme.nav[{i}].link"))?;
        }

        let mut seen = HashSet::new();
        for (i, entry) in self.sidebar.iter().enumerate() {
            let field = format!("theme.sidebar[{i}]");
            if !is_path_prefix(&entry.path) {
                return Err(ConfigError::invalid(
                    field,
                    format!(
                        "'{}' must be a path prefix starting and ending with /",
                        entry.path
                    ),
                ));
            }
            if !seen.insert(entry.path.as_str()) {
                return Err(ConfigError::invalid(
                    field,
                    format!("'{}' is listed more than once", entry.path),
                ));
            }
        }

        if let Some(repo) = &self.repo {
            require_non_empty(repo, "theme.repo")?;
        }
        if self.edit_links {
            if self.repo.is_none() {
                return Err(ConfigError::invalid(
                    "theme.repo",
                    "required when edit_links is enabled",
                ));
            }
            require_non_empty(&self.docs_branch, "theme.docs_branch")?;
            require_non_empty(&self.edit_link_text, "theme.edit_link_text")?;
        }
        Ok(())
    }
}
