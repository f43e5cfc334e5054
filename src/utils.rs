#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, clamped into `1..=total_pages`.
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Index of the first item on this page among all items, 1-based.
    pub fn first_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.per_page + 1
        }
    }
}

pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let items = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        per_page,
        total_pages,
        total_items,
    }
}

/// Rounded share of `part` in `total`, 0 when there is nothing to share.
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }

    (part as f64 / total as f64 * 100.0).round() as u32
}

pub fn truncate(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }

    let mut s: String = input.chars().take(max_chars).collect();
    s.push_str("...");
    s
}

pub fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

pub fn share_url(public_url: &str, poll_id: &str) -> String {
    format!("{}/{poll_id}", trim_base_url(public_url))
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(
            truncate("What is your favorite programming language?", 20),
            "What is your favorit..."
        );
        assert_eq!(truncate("", 5), "");
    }

    #[test]
    fn test_share_url() {
        assert_eq!(share_url("http://localhost:3000", "42"), "http://localhost:3000/42");
        assert_eq!(share_url("http://localhost:3000/ ", "42"), "http://localhost:3000/42");
    }

    #[test]
    fn test_paginate_basic() {
        let page = paginate((1..=25).collect::<Vec<_>>(), 2, 10);

        assert_eq!(page.items, (11..=20).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 25);
        assert!(page.has_next());
        assert!(page.has_previous());
        assert_eq!(page.first_index(), 11);
    }

    #[test]
    fn test_paginate_clamps_out_of_range() {
        let past_end = paginate((1..=25).collect::<Vec<_>>(), 9, 10);
        let before_start = paginate((1..=25).collect::<Vec<_>>(), 0, 10);

        assert_eq!(past_end.page, 3);
        assert_eq!(past_end.items, (21..=25).collect::<Vec<_>>());
        assert_eq!(before_start.page, 1);
    }

    #[test]
    fn test_paginate_empty() {
        let page = paginate(Vec::<u8>::new(), 1, 10);

        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.first_index(), 0);
        assert!(!page.has_next());
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Favorite Language", "language"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("Lunch", "dinner"));
    }
}
