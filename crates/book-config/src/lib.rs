//! Site configuration for the "実践 Laravel 入門" tutorial book.
//!
//! [`load_config`] returns the book's built-in [`SiteConfig`], validated.
//! [`SiteConfig::load`] reads a `book.toml` instead when one is given or can
//! be discovered in the current directory or its parents.
//!
//! The record is plain data: construct it once and pass it by reference to
//! the renderer and navigation code. Nothing here is global or mutable.
//!
//! ## Environment Variable Expansion
//!
//! When loading from a file, these fields support `${VAR}` and
//! `${VAR:-default}`:
//! - `theme.repo`
//! - `theme.nav[].link`
//! - `head[].attrs.*`

mod builtin;
mod error;
mod expand;
mod file;
mod site;
mod slug;
mod validate;

pub use error::ConfigError;
pub use file::{CONFIG_FILENAME, CliSettings};
pub use site::{
    AnchorConfig, Extension, HeadTag, Locale, MarkdownConfig, NavLink, SidebarEntry, SiteConfig,
    ThemeConfig,
};
pub use slug::{SlugStyle, slugify, slugify_ascii};

/// Build and validate the book's configuration.
///
/// Performs no I/O; every call returns an equal record.
///
/// # Errors
///
/// Returns `ConfigError::Validation` if the record is malformed.
pub fn load_config() -> Result<SiteConfig, ConfigError> {
    let config = builtin::site();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_config_is_deterministic() {
        let first = load_config().unwrap();
        let second = load_config().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.title, "実践 Laravel 入門");
        assert_eq!(
            first.description,
            "Laravel を利用して基本的なAPIシステムを開発します。"
        );
    }

    #[test]
    fn test_active_sidebar_order() {
        let config = load_config().unwrap();
        let active: Vec<_> = config
            .theme
            .active_sidebar()
            .map(|entry| entry.path.as_str())
            .collect();
        assert_eq!(
            active,
            vec![
                "/1.環境構築/",
                "/2.画面の作成/",
                "/3.データベースの利用/",
                "/4.Eloquentの利用/",
                "/5.Bladeの利用/",
                "/6.バリデーション/",
            ]
        );
    }

    #[test]
    fn test_disabled_chapter_is_kept() {
        let config = load_config().unwrap();
        assert_eq!(config.theme.sidebar.len(), 7);
        assert_eq!(
            config.theme.sidebar.last(),
            Some(&SidebarEntry::disabled("/7.Controllerの利用/"))
        );
    }

    #[test]
    fn test_single_root_locale() {
        let config = load_config().unwrap();
        assert_eq!(config.locales.len(), 1);
        assert_eq!(
            config.locales.get("/"),
            Some(&Locale {
                lang: "ja".to_owned()
            })
        );
    }

    #[test]
    fn test_markdown_settings() {
        let config = load_config().unwrap();
        let markdown = &config.markdown;
        assert_eq!(markdown.anchor.level.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(markdown.anchor.permalink);
        assert!(markdown.anchor.permalink_before);
        assert_eq!(markdown.anchor.permalink_symbol, "#");
        assert_eq!(markdown.extensions, vec![Extension::Playground]);
        assert!(markdown.linkify);
    }

    #[test]
    fn test_head_and_theme() {
        let config = load_config().unwrap();
        assert_eq!(
            config.head,
            vec![HeadTag::new(
                "script",
                [("src", "https://static.codepen.io/assets/embed/ei.js")]
            )]
        );
        assert_eq!(config.theme.nav[0].text, "Lec Café");
        assert_eq!(config.theme.repo_label.as_deref(), Some("Github"));
        assert_eq!(
            config.theme.edit_link("1.環境構築/README.md").as_deref(),
            Some("https://github.com/lec-cafe/book_laravel/edit/master/books/1.環境構築/README.md")
        );
    }

    #[test]
    fn test_serializes_to_json() {
        let config = load_config().unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["locales"]["/"]["lang"], "ja");
        assert_eq!(json["markdown"]["extensions"][0], "playground");
        assert_eq!(json["markdown"]["anchor"]["slug"], "encoded");
        assert_eq!(json["theme"]["sidebar"][6]["enabled"], false);
    }
}
