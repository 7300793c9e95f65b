//! Client-side trash state: the last listing plus the active sort.
//!
//! Nothing here persists. Every refresh replaces the listing wholesale and the
//! sorted view is derived on demand from the stored server order.

use std::cmp::Ordering;

use tracing::warn;
use trash_proto::{TrashEntry, TrashListing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Name,
    Modified,
    Size,
}

impl SortColumn {
    pub const ALL: [SortColumn; 3] = [Self::Name, Self::Modified, Self::Size];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Modified => "Modified",
            Self::Size => "Size",
        }
    }

    /// Direction picked when switching to this column: A→Z for names,
    /// newest/largest first otherwise.
    pub fn default_direction(self) -> SortDirection {
        match self {
            Self::Name => SortDirection::Ascending,
            Self::Modified | Self::Size => SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Ascending => ord,
            Self::Descending => ord.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::Modified,
            direction: SortDirection::Descending,
        }
    }
}

#[derive(Debug, Default)]
pub struct TrashViewModel {
    listing: TrashListing,
    sort: SortState,
    loaded: bool,
}

impl TrashViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole listing.
    pub fn set_listing(&mut self, listing: TrashListing) {
        if !listing.count_matches() {
            warn!(
                "trash listing item_count={} but {} entries were sent; rendering entries",
                listing.item_count,
                listing.entries.len()
            );
        }
        self.listing = listing;
        self.loaded = true;
    }

    pub fn listing(&self) -> &TrashListing {
        &self.listing
    }

    pub fn entries(&self) -> &[TrashEntry] {
        &self.listing.entries
    }

    /// True once at least one listing has been applied.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_empty(&self) -> bool {
        self.listing.entries.is_empty()
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    /// Same column flips the direction; a new column starts at its default.
    pub fn set_sort(&mut self, column: SortColumn) {
        if self.sort.column == column {
            self.sort.direction = self.sort.direction.flipped();
        } else {
            self.sort = SortState {
                column,
                direction: column.default_direction(),
            };
        }
    }

    /// Entries in display order. The stored order is never touched, so ties
    /// keep the server's order.
    pub fn sorted_view(&self) -> Vec<&TrashEntry> {
        let mut view: Vec<&TrashEntry> = self.listing.entries.iter().collect();
        let SortState { column, direction } = self.sort;
        view.sort_by(|a, b| direction.apply(compare(a, b, column)));
        view
    }

    pub fn find(&self, trash_path: &str) -> Option<&TrashEntry> {
        self.listing
            .entries
            .iter()
            .find(|e| e.trash_path == trash_path)
    }
}

pub fn compare(a: &TrashEntry, b: &TrashEntry, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Name => locale_compare(&a.name, &b.name),
        // ISO-8601 strings of the same shape sort chronologically as text.
        SortColumn::Modified => a.deletion_timestamp.cmp(&b.deletion_timestamp),
        SortColumn::Size => a.size_bytes.cmp(&b.size_bytes),
    }
}

/// Case-insensitive ordering with lowercase ahead of uppercase on ties,
/// matching what users expect from a file browser.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

/// Lines for the per-entry detail surface.
pub fn detail_lines(entry: &TrashEntry) -> [String; 4] {
    [
        format!("Original: {}", entry.original_path),
        format!(
            "Type: {}",
            if entry.is_directory { "Folder" } else { "File" }
        ),
        format!("Size: {}", entry.size_display),
        format!(
            "Deleted: {}",
            crate::timefmt::format_absolute(&entry.deletion_timestamp)
        ),
    ]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn entry(name: &str, ts: &str, size: u64) -> TrashEntry {
        TrashEntry {
            name: name.to_string(),
            trash_path: format!("/trash/files/{}", name),
            original_path: format!("/home/u/{}", name),
            deletion_timestamp: ts.to_string(),
            size_bytes: size,
            size_display: format!("{} B", size),
            is_directory: false,
        }
    }

    pub(crate) fn listing(entries: Vec<TrashEntry>) -> TrashListing {
        TrashListing {
            item_count: entries.len(),
            total_size: entries.iter().map(|e| e.size_bytes).sum(),
            total_size_display: "n/a".into(),
            entries,
        }
    }

    fn names(vm: &TrashViewModel) -> Vec<String> {
        vm.sorted_view().iter().map(|e| e.name.clone()).collect()
    }

    fn sample() -> TrashViewModel {
        let mut vm = TrashViewModel::new();
        vm.set_listing(listing(vec![
            entry("beta.txt", "2024-03-02T10:00:00", 300),
            entry("Alpha.txt", "2024-03-03T10:00:00", 100),
            entry("gamma", "2024-03-01T10:00:00", 200),
        ]));
        vm
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let vm = sample();
        assert_eq!(vm.sort(), SortState::default());
        assert_eq!(names(&vm), ["Alpha.txt", "beta.txt", "gamma"]);
    }

    #[test]
    fn test_set_sort_defaults_per_column() {
        let mut vm = sample();
        vm.set_sort(SortColumn::Name);
        assert_eq!(vm.sort().direction, SortDirection::Ascending);
        assert_eq!(names(&vm), ["Alpha.txt", "beta.txt", "gamma"]);

        vm.set_sort(SortColumn::Size);
        assert_eq!(vm.sort().direction, SortDirection::Descending);
        assert_eq!(names(&vm), ["beta.txt", "gamma", "Alpha.txt"]);
    }

    #[test]
    fn test_same_column_flips_and_twice_restores() {
        let mut vm = sample();
        vm.set_sort(SortColumn::Size);
        let before = names(&vm);
        vm.set_sort(SortColumn::Size);
        assert_eq!(vm.sort().direction, SortDirection::Ascending);
        assert_eq!(names(&vm), ["Alpha.txt", "gamma", "beta.txt"]);
        vm.set_sort(SortColumn::Size);
        assert_eq!(names(&vm), before);
    }

    #[test]
    fn test_sorted_view_is_idempotent_and_leaves_storage() {
        let vm = sample();
        assert_eq!(names(&vm), names(&vm));
        let stored: Vec<&str> = vm.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(stored, ["beta.txt", "Alpha.txt", "gamma"]);
    }

    #[test]
    fn test_ties_keep_server_order_both_directions() {
        let mut vm = TrashViewModel::new();
        vm.set_listing(listing(vec![
            entry("a", "2024-01-01T00:00:00", 10),
            entry("b", "2024-01-01T00:00:00", 10),
            entry("c", "2024-01-01T00:00:00", 10),
        ]));
        vm.set_sort(SortColumn::Size);
        assert_eq!(names(&vm), ["a", "b", "c"]);
        vm.set_sort(SortColumn::Size);
        assert_eq!(names(&vm), ["a", "b", "c"]);
    }

    #[test]
    fn test_malformed_timestamps_sort_as_raw_text() {
        let mut vm = TrashViewModel::new();
        vm.set_listing(listing(vec![
            entry("dated", "2024-01-01T00:00:00", 1),
            entry("blank", "", 1),
            entry("junk", "not-a-date", 1),
        ]));
        // Descending raw text: "not-a-date" > "2024…" > "".
        assert_eq!(names(&vm), ["junk", "dated", "blank"]);
    }

    #[test]
    fn test_comparators_are_total_orders() {
        let vm = sample();
        for column in SortColumn::ALL {
            for a in vm.entries() {
                assert_eq!(compare(a, a, column), Ordering::Equal);
                for b in vm.entries() {
                    assert_eq!(compare(a, b, column), compare(b, a, column).reverse());
                    for c in vm.entries() {
                        if compare(a, b, column) != Ordering::Greater
                            && compare(b, c, column) != Ordering::Greater
                        {
                            assert_ne!(compare(a, c, column), Ordering::Greater);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_locale_compare_folds_case() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("Zeta", "alpha"), Ordering::Greater);
    }

    #[test]
    fn test_set_listing_replaces_wholesale() {
        let mut vm = sample();
        assert!(vm.is_loaded());
        vm.set_listing(listing(vec![entry("only", "2024-01-01T00:00:00", 1)]));
        assert_eq!(vm.entries().len(), 1);
        assert!(vm.find("/trash/files/beta.txt").is_none());

        // A mismatched aggregate is tolerated; entries win.
        let mut odd = listing(vec![]);
        odd.item_count = 4;
        vm.set_listing(odd);
        assert!(vm.is_empty());
    }

    #[test]
    fn test_detail_lines() {
        let mut e = entry("data", "", 4096);
        e.is_directory = true;
        let lines = detail_lines(&e);
        assert_eq!(lines[0], "Original: /home/u/data");
        assert_eq!(lines[1], "Type: Folder");
        assert_eq!(lines[2], "Size: 4096 B");
        assert_eq!(lines[3], "Deleted: Unknown date");
    }
}
