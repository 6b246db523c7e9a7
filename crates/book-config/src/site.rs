//! Resolved site configuration record.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::slug::SlugStyle;

/// Root configuration record consumed by the build engine.
///
/// Constructed once, then only read. Pass it by reference to whatever needs it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,
    /// Site description (used for the `description` meta tag).
    pub description: String,
    /// Extra tags injected verbatim into every page `<head>`.
    pub head: Vec<HeadTag>,
    /// Locale settings keyed by URL path prefix.
    pub locales: BTreeMap<String, Locale>,
    /// Markdown processing options.
    pub markdown: MarkdownConfig,
    /// Navigation and edit-link settings.
    pub theme: ThemeConfig,
}

/// A tag injected into the page `<head>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeadTag {
    /// Tag name (e.g., "script").
    pub tag: String,
    /// Attributes, rendered in key order.
    pub attrs: BTreeMap<String, String>,
}

impl HeadTag {
    /// Create a head tag with the given attributes.
    pub fn new<K, V>(tag: impl Into<String>, attrs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            tag: tag.into(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Per-prefix locale settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Locale {
    /// Language tag (e.g., "ja").
    pub lang: String,
}

/// Markdown processing options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MarkdownConfig {
    /// Heading anchor options.
    pub anchor: AnchorConfig,
    /// Extensions registered on the markdown processor, in order.
    pub extensions: Vec<Extension>,
    /// Turn bare URLs in text into links.
    pub linkify: bool,
}

/// Heading anchor options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnchorConfig {
    /// Heading depths that receive an anchor.
    pub level: BTreeSet<u8>,
    /// Slug function for anchor ids.
    pub slug: SlugStyle,
    /// Render a permalink next to anchored headings.
    pub permalink: bool,
    /// Place the permalink before the heading text instead of after it.
    pub permalink_before: bool,
    /// Permalink text.
    pub permalink_symbol: String,
}

impl AnchorConfig {
    /// Whether headings of `level` get an anchor.
    #[must_use]
    pub fn anchors(&self, level: u8) -> bool {
        self.level.contains(&level)
    }

    /// Slug for heading text using the configured style.
    #[must_use]
    pub fn slugify(&self, text: &str) -> String {
        self.slug.apply(text)
    }
}

/// Markdown extension known to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Extension {
    /// Fenced `playground` blocks rendered as live CodePen embeds.
    Playground,
}

impl Extension {
    /// Name used in configuration files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Playground => "playground",
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Extension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "playground" => Ok(Self::Playground),
            other => Err(format!("unknown markdown extension '{other}'")),
        }
    }
}

/// Navigation and edit-link settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ThemeConfig {
    /// Top navigation links.
    pub nav: Vec<NavLink>,
    /// Sidebar entries in reading order, including disabled ones.
    pub sidebar: Vec<SidebarEntry>,
    /// Repository (`owner/name` on GitHub, or a full URL).
    pub repo: Option<String>,
    /// Label for the repository link.
    pub repo_label: Option<String>,
    /// Documentation directory relative to the repository root.
    pub docs_dir: String,
    /// Branch edit links point at.
    pub docs_branch: String,
    /// Show "edit this page" links.
    pub edit_links: bool,
    /// Text of the "edit this page" link.
    pub edit_link_text: String,
}

/// A top navigation link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    /// Link text.
    pub text: String,
    /// Link target.
    pub link: String,
}

/// A sidebar entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarEntry {
    /// Documentation path prefix (e.g., `/1.環境構築/`).
    pub path: String,
    /// Disabled entries stay in the record but are never rendered.
    pub enabled: bool,
}

impl SidebarEntry {
    /// An enabled entry.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            enabled: true,
        }
    }

    /// A disabled entry.
    pub fn disabled(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            enabled: false,
        }
    }
}

impl ThemeConfig {
    /// Enabled sidebar entries in reading order.
    pub fn active_sidebar(&self) -> impl Iterator<Item = &SidebarEntry> + '_ {
        self.sidebar.iter().filter(|entry| entry.enabled)
    }

    /// Web URL of the repository.
    #[must_use]
    pub fn repo_url(&self) -> Option<String> {
        let repo = self.repo.as_deref()?;
        if repo.starts_with("http://") || repo.starts_with("https://") {
            Some(repo.trim_end_matches('/').to_owned())
        } else {
            Some(format!("https://github.com/{}", repo.trim_matches('/')))
        }
    }

    /// "Edit this page" URL for a page path relative to `docs_dir`.
    ///
    /// Returns `None` when edit links are disabled or no repository is set.
    #[must_use]
    pub fn edit_link(&self, page: &str) -> Option<String> {
        if !self.edit_links {
            return None;
        }
        let repo_url = self.repo_url()?;
        let page = page.trim_start_matches('/');
        let docs_dir = self.docs_dir.trim_matches('/');
        let branch = &self.docs_branch;

        Some(if docs_dir.is_empty() {
            format!("{repo_url}/edit/{branch}/{page}")
        } else {
            format!("{repo_url}/edit/{branch}/{docs_dir}/{page}")
        })
    }
}
