//! Page-number pagination

/// Donation posts shown per page
pub const DONATION_PAGE_SIZE: usize = 3;

/// One resolved page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    pub num_pages: usize,
    pub per_page: usize,
}

impl Page {
    /// Resolve a raw `?page=` value against `total` items
    ///
    /// Missing or non-numeric values select the first page; any other
    /// integer outside `1..=num_pages` (however large) selects the last
    /// page. An empty listing still has one page.
    pub fn resolve(raw: Option<&str>, total: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let num_pages = total.div_ceil(per_page).max(1);

        let number = match raw.map(str::trim) {
            None => 1,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n < 1 => num_pages,
                Ok(n) => usize::try_from(n).map_or(num_pages, |n| n.min(num_pages)),
                Err(_) if is_integer(raw) => num_pages,
                Err(_) => 1,
            },
        };

        Self {
            number,
            num_pages,
            per_page,
        }
    }

    pub fn offset(&self) -> usize {
        (self.number - 1) * self.per_page
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }
}

/// Optionally signed run of ASCII digits
fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
