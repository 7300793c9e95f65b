//! Icon resolution, injected into the panel at construction.

use trash_proto::config::IconStyle;
use trash_proto::TrashEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    File,
    Folder,
    Trash,
    Delete,
    Refresh,
}

impl IconKind {
    pub fn for_entry(entry: &TrashEntry) -> Self {
        if entry.is_directory {
            Self::Folder
        } else {
            Self::File
        }
    }
}

pub trait IconResolver: Send {
    fn icon(&self, kind: IconKind) -> &'static str;
}

/// Single-cell unicode glyphs; safe in most terminal fonts.
pub struct UnicodeIcons;

impl IconResolver for UnicodeIcons {
    fn icon(&self, kind: IconKind) -> &'static str {
        match kind {
            IconKind::File => "▤",
            IconKind::Folder => "▸",
            IconKind::Trash => "♻",
            IconKind::Delete => "✗",
            IconKind::Refresh => "⟳",
        }
    }
}

pub struct AsciiIcons;

impl IconResolver for AsciiIcons {
    fn icon(&self, kind: IconKind) -> &'static str {
        match kind {
            IconKind::File => "-",
            IconKind::Folder => "/",
            IconKind::Trash => "T",
            IconKind::Delete => "x",
            IconKind::Refresh => "~",
        }
    }
}

pub fn resolver_for(style: IconStyle) -> Box<dyn IconResolver> {
    match style {
        IconStyle::Unicode => Box::new(UnicodeIcons),
        IconStyle::Ascii => Box::new(AsciiIcons),
    }
}
