use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStyle {
    /// Counts the whole set and reports the last page.
    #[default]
    LengthAware,
    /// Only reports whether another page follows.
    Simple,
}

/// `per_page == 0` asks for the whole set. Pages are 1-based.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PageRequest {
    pub per_page: u32,
    pub page: u32,
    pub style: PageStyle,
}

impl PageRequest {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn per_page(per_page: u32) -> Self {
        Self {
            per_page,
            page: 1,
            style: PageStyle::LengthAware,
        }
    }

    pub fn page(self, page: u32) -> Self {
        Self { page, ..self }
    }

    pub fn simple(self) -> Self {
        Self {
            style: PageStyle::Simple,
            ..self
        }
    }

    fn current_page(&self) -> u32 {
        self.page.max(1)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: u32,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SimplePage<T> {
    pub items: Vec<T>,
    pub per_page: u32,
    pub current_page: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Paginated<T> {
    All { items: Vec<T> },
    LengthAware(Page<T>),
    Simple(SimplePage<T>),
}

impl<T> Paginated<T> {
    /// Picks the pagination mode from the request and slices `items`
    /// accordingly.
    pub fn resolve(items: Vec<T>, request: PageRequest) -> Self {
        if request.per_page == 0 {
            return Paginated::All { items };
        }

        let per_page = request.per_page as usize;
        let current_page = request.current_page();
        let total = items.len();
        let skip = (current_page as usize - 1).saturating_mul(per_page);
        let has_more = total > skip.saturating_add(per_page);
        let items: Vec<T> = items.into_iter().skip(skip).take(per_page).collect();

        match request.style {
            PageStyle::LengthAware => Paginated::LengthAware(Page {
                items,
                total: total as u64,
                per_page: request.per_page,
                current_page,
                last_page: (total.div_ceil(per_page) as u32).max(1),
            }),
            PageStyle::Simple => Paginated::Simple(SimplePage {
                items,
                per_page: request.per_page,
                current_page,
                has_more,
            }),
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Paginated::All { items } => items,
            Paginated::LengthAware(page) => &page.items,
            Paginated::Simple(page) => &page.items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Paginated::All { items } => items,
            Paginated::LengthAware(page) => page.items,
            Paginated::Simple(page) => page.items,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Size of the whole set, when the mode knows it.
    pub fn total(&self) -> Option<u64> {
        match self {
            Paginated::All { items } => Some(items.len() as u64),
            Paginated::LengthAware(page) => Some(page.total),
            Paginated::Simple(_) => None,
        }
    }
}
