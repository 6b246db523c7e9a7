//! Built-in configuration of the Laravel tutorial book.

use std::collections::{BTreeMap, BTreeSet};

use crate::site::{
    AnchorConfig, Extension, HeadTag, Locale, MarkdownConfig, NavLink, SidebarEntry, SiteConfig,
    ThemeConfig,
};
use crate::slug::SlugStyle;

pub(crate) const TITLE: &str = "実践 Laravel 入門";
pub(crate) const DESCRIPTION: &str = "Laravel を利用して基本的なAPIシステムを開発します。";
pub(crate) const CODEPEN_EMBED_SCRIPT: &str = "https://static.codepen.io/assets/embed/ei.js";

/// Chapters in reading order. The last one is not published yet.
const CHAPTERS: [(&str, bool); 7] = [
    ("/1.環境構築/", true),
    ("/2.画面の作成/", true),
    ("/3.データベースの利用/", true),
    ("/4.Eloquentの利用/", true),
    ("/5.Bladeの利用/", true),
    ("/6.バリデーション/", true),
    ("/7.Controllerの利用/", false),
];

/// The book's site configuration.
pub(crate) fn site() -> SiteConfig {
    SiteConfig {
        title: TITLE.to_owned(),
        description: DESCRIPTION.to_owned(),
        head: head(),
        locales: locales(),
        markdown: markdown(),
        theme: theme(),
    }
}

pub(crate) fn head() -> Vec<HeadTag> {
    vec![HeadTag::new("script", [("src", CODEPEN_EMBED_SCRIPT)])]
}

pub(crate) fn locales() -> BTreeMap<String, Locale> {
    BTreeMap::from([(
        "/".to_owned(),
        Locale {
            lang: "ja".to_owned(),
        },
    )])
}

pub(crate) fn markdown() -> MarkdownConfig {
    MarkdownConfig {
        anchor: anchor(),
        extensions: vec![Extension::Playground],
        linkify: true,
    }
}

pub(crate) fn anchor() -> AnchorConfig {
    AnchorConfig {
        level: BTreeSet::from([1, 2, 3]),
        slug: SlugStyle::Encoded,
        permalink: true,
        permalink_before: true,
        permalink_symbol: "#".to_owned(),
    }
}

pub(crate) fn theme() -> ThemeConfig {
    ThemeConfig {
        nav: nav(),
        sidebar: sidebar(),
        repo: Some("lec-cafe/book_laravel".to_owned()),
        repo_label: Some("Github".to_owned()),
        docs_dir: "books".to_owned(),
        docs_branch: "master".to_owned(),
        edit_links: true,
        edit_link_text: "ページに不明点や誤字等があれば、Github にて修正を提案してください！"
            .to_owned(),
    }
}

pub(crate) fn nav() -> Vec<NavLink> {
    vec![NavLink {
        text: "Lec Café".to_owned(),
        link: "https://leccafe.connpass.com/".to_owned(),
    }]
}

pub(crate) fn sidebar() -> Vec<SidebarEntry> {
    CHAPTERS
        .iter()
        .map(|&(path, enabled)| SidebarEntry {
            path: path.to_owned(),
            enabled,
        })
        .collect()
}
