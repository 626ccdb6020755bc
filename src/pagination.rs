pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Slice for a 1-based page, clipped to bounds. Never adjusts `page`.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    if page == 0 || page_size == 0 {
        return Vec::new();
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(items.len());
    items[start..end].to_vec()
}

/// One settling pass: a filter change resets to page 1, otherwise the page
/// is pulled back into `[1, max(total_pages, 1)]`.
pub fn settle_page(page: usize, total_pages: usize, filters_changed: bool) -> usize {
    if filters_changed {
        return 1;
    }
    page.clamp(1, total_pages.max(1))
}

#[cfg(test)]
mod tests {
    use super::{paginate, settle_page, total_pages};

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[test]
    fn slices_are_clipped() {
        let items = (1..=25).collect::<Vec<_>>();
        assert_eq!(paginate(&items, 1, 10), (1..=10).collect::<Vec<_>>());
        assert_eq!(paginate(&items, 3, 10), (21..=25).collect::<Vec<_>>());
        assert!(paginate(&items, 4, 10).is_empty());
        assert!(paginate(&items, 0, 10).is_empty());
    }

    #[test]
    fn empty_input_is_empty_on_every_page() {
        let items: Vec<u8> = Vec::new();
        for page in 0..4 {
            assert!(paginate(&items, page, 10).is_empty());
        }
    }

    #[test]
    fn overflow_settles_to_last_page() {
        assert_eq!(settle_page(3, 1, false), 1);
        assert_eq!(settle_page(5, 2, false), 2);
        assert_eq!(settle_page(2, 0, false), 1);
        assert_eq!(settle_page(2, 3, false), 2);
    }

    #[test]
    fn filter_change_wins_over_overflow() {
        assert_eq!(settle_page(3, 5, true), 1);
        assert_eq!(settle_page(9, 2, true), 1);
    }
}
