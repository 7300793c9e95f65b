//! Cursor + scroll bookkeeping for a list rendered in a fixed-height area.

#[derive(Debug, Default, Clone)]
pub struct ListCursor {
    pub selected: usize,
    pub scroll_offset: usize,
}

impl ListCursor {
    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = (self.selected + n).min(len - 1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Keep the cursor inside a list that may have shrunk.
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        if self.scroll_offset > self.selected {
            self.scroll_offset = self.selected;
        }
    }

    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected.saturating_sub(height - 1);
        }
    }

    /// Index of the item drawn at `row` of the viewport, if any.
    pub fn index_at_row(&self, row: usize, len: usize) -> Option<usize> {
        let target = self.scroll_offset + row;
        (target < len).then_some(target)
    }

    /// Range of item indices visible in `height` rows.
    pub fn visible_range(&self, height: usize, len: usize) -> std::ops::Range<usize> {
        let start = self.scroll_offset.min(len);
        let end = (self.scroll_offset + height).min(len);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_is_bounded() {
        let mut c = ListCursor::default();
        c.select_up(3);
        assert_eq!(c.selected, 0);
        c.select_down(10, 4);
        assert_eq!(c.selected, 3);
        c.select_down(1, 0);
        assert_eq!(c.selected, 3);
        c.clamp(2);
        assert_eq!(c.selected, 1);
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let mut c = ListCursor::default();
        c.select_last(20);
        c.ensure_visible(5);
        assert_eq!(c.scroll_offset, 15);
        assert_eq!(c.visible_range(5, 20), 15..20);
        assert_eq!(c.index_at_row(2, 20), Some(17));
        assert_eq!(c.index_at_row(9, 20), None);
        c.select_first();
        assert_eq!(c.visible_range(5, 20), 0..5);
    }
}
