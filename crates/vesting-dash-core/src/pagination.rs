use std::ops::Range;

pub const PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 15];

/// Page index and page size over an ordered sequence.
///
/// Whenever the sequence is non-empty, `page * page_size < total` holds after
/// every operation that is given the current `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(PAGE_SIZE_OPTIONS[0])
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    fn last_page(&self, total: usize) -> usize {
        self.page_count(total).saturating_sub(1)
    }

    /// Moves to `page`, clamped to the last page holding rows. Returns the
    /// page actually selected.
    pub fn set_page(&mut self, page: usize, total: usize) -> usize {
        self.page = page.min(self.last_page(total));
        self.page
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    /// Re-establishes the invariant after the sequence shrank.
    pub fn clamp_to(&mut self, total: usize) {
        self.page = self.page.min(self.last_page(total));
    }

    pub fn range(&self, total: usize) -> Range<usize> {
        let start = self.page.saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);
        start..end
    }

    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        &rows[self.range(rows.len())]
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.page < self.last_page(total)
    }

    /// `"1–5 of 12"`; `"0–0 of 0"` when empty.
    pub fn range_label(&self, total: usize) -> String {
        let range = self.range(total);
        if range.is_empty() {
            return format!("0–0 of {total}");
        }
        format!("{}–{} of {}", range.start + 1, range.end, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_change_resets_page() {
        let mut p = Pagination::default();
        p.set_page(2, 30);
        assert_eq!(p.page(), 2);
        for size in PAGE_SIZE_OPTIONS {
            p.set_page(1, 30);
            p.set_page_size(size);
            assert_eq!(p.page(), 0);
        }
    }

    #[test]
    fn set_page_is_clamped_to_last_page() {
        let mut p = Pagination::new(5);
        assert_eq!(p.set_page(10, 12), 2);
        assert!(p.page() * p.page_size() < 12);
        assert_eq!(p.set_page(3, 15), 2);
        assert_eq!(p.range(12), 10..12);
    }

    #[test]
    fn invariant_holds_for_every_page_and_size() {
        for total in 1..40usize {
            for size in PAGE_SIZE_OPTIONS {
                for requested in 0..12usize {
                    let mut p = Pagination::new(size);
                    p.set_page(requested, total);
                    assert!(p.page() * p.page_size() < total, "total={total} size={size}");
                }
            }
        }
    }

    #[test]
    fn empty_sequence_is_harmless() {
        let mut p = Pagination::default();
        assert_eq!(p.set_page(4, 0), 0);
        assert_eq!(p.page_count(0), 0);
        assert_eq!(p.range(0), 0..0);
        assert!(p.slice::<u8>(&[]).is_empty());
        assert!(!p.has_next(0));
        assert!(!p.has_previous());
        assert_eq!(p.range_label(0), "0–0 of 0");
    }

    #[test]
    fn shrinking_sequence_pulls_page_back() {
        let mut p = Pagination::new(5);
        p.set_page(3, 20);
        p.clamp_to(7);
        assert_eq!(p.page(), 1);
        assert_eq!(p.slice(&[0, 1, 2, 3, 4, 5, 6]), &[5, 6]);
        assert_eq!(p.range_label(7), "6–7 of 7");
    }
}
