//! Client-side search and pagination over fetched lists

use crate::models::{Ormawa, Post, Registration, User};

/// Default page size for listings
pub const DEFAULT_PER_PAGE: usize = 10;

/// Something that can be matched against a free-text search term
pub trait Searchable {
    /// Text fields the search term is matched against
    fn haystack(&self) -> Vec<&str>;

    /// Case-insensitive substring match on any field; a blank term matches everything
    fn matches(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.haystack()
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl Searchable for Ormawa {
    fn haystack(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.type_ormawa.as_deref());
        fields.extend(self.category_ormawa.as_deref());
        fields
    }
}

impl Searchable for Post {
    fn haystack(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.status.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}

impl Searchable for User {
    fn haystack(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.role.as_str()]
    }
}

impl Searchable for Registration {
    fn haystack(&self) -> Vec<&str> {
        let mut fields = vec![
            self.full_name.as_str(),
            self.nim.as_str(),
            self.email.as_str(),
            self.status.as_str(),
        ];
        fields.extend(self.organization.as_deref());
        fields
    }
}

/// Keep the items matching `term`, in their original order
pub fn filter_by_term<T: Searchable>(items: Vec<T>, term: Option<&str>) -> Vec<T> {
    match term.map(str::trim).filter(|t| !t.is_empty()) {
        Some(term) => items.into_iter().filter(|item| item.matches(term)).collect(),
        None => items,
    }
}

/// One page of a longer list
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number, clamped into range
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slice out a 1-based page; out-of-range pages are clamped to the last one
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
        total_items,
        total_pages,
    }
}
