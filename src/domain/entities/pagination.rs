use serde::Serialize;

/// A resolved page number and size, ready to become LIMIT/OFFSET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Resolves a raw `?page=` value against the number of matching rows.
    ///
    /// Missing or non-numeric values fall back to the first page. Any number
    /// outside `1..=last_page` falls back to the last page. An empty result
    /// still has one (empty) page.
    pub fn resolve(requested: Option<&str>, total_items: i64, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let last_page = total_pages(total_items, per_page);

        let page = match requested.and_then(|raw| raw.trim().parse::<i64>().ok()) {
            Some(p) if (1..=last_page as i64).contains(&p) => p as u32,
            Some(_) => last_page,
            None => 1,
        };

        PageRequest { page, per_page }
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * (self.per_page as i64)
    }
}

fn total_pages(total_items: i64, per_page: u32) -> u32 {
    if total_items <= 0 {
        return 1;
    }
    let per_page = per_page as i64;
    ((total_items + per_page - 1) / per_page) as u32
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: i64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: i64) -> Self {
        let total_pages = total_pages(total_items, request.per_page);
        Page {
            items,
            page: request.page,
            per_page: request.per_page,
            total_items,
            total_pages,
            has_next: request.page < total_pages,
            has_previous: request.page > 1,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_page_values_fall_back_to_first_page() {
        for raw in [None, Some("abc"), Some(""), Some("2.5")] {
            assert_eq!(PageRequest::resolve(raw, 45, 20).page, 1, "{raw:?}");
        }
    }

    #[test]
    fn out_of_range_numbers_fall_back_to_last_page() {
        for raw in ["0", "-3", "99"] {
            assert_eq!(PageRequest::resolve(Some(raw), 45, 20).page, 3, "{raw}");
        }
        assert_eq!(PageRequest::resolve(Some("0"), 0, 20).page, 1);
    }

    #[test]
    fn page_past_the_end_becomes_last_page() {
        let request = PageRequest::resolve(Some("9"), 45, 20);
        assert_eq!(request.page, 3);
        assert_eq!(request.offset(), 40);
        assert_eq!(request.limit(), 20);
    }

    #[test]
    fn empty_result_has_a_single_page() {
        let request = PageRequest::resolve(Some("4"), 0, 10);
        let page: Page<u8> = Page::new(vec![], request, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn page_flags_follow_position() {
        let request = PageRequest::resolve(Some("2"), 25, 10);
        let page = Page::new(vec![1, 2, 3], request, 25).map(|n| n * 2);
        assert_eq!(page.items, vec![2, 4, 6]);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_previous);
    }
}
