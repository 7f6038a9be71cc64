//! Listing helpers used by the views: ordering, paging and size formatting

use serde::{Deserialize, Serialize};

use crate::adapter::ObjectEntry;

pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Size,
    LastModified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Folder markers are keys ending in "/".
pub fn is_folder(key: &str) -> bool {
    key.ends_with('/')
}

/// Last path segment of a key; folders keep their trailing "/".
pub fn display_name(key: &str) -> &str {
    let trimmed = key.strip_suffix('/').unwrap_or(key);
    match trimmed.rfind('/') {
        Some(idx) => &key[idx + 1..],
        None => key,
    }
}

/// Sorted copy of `objects`. Ties keep listing order.
pub fn sort_objects(objects: &[ObjectEntry], field: SortField, order: SortOrder) -> Vec<ObjectEntry> {
    let mut sorted = objects.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match field {
            SortField::Name => a.key.to_lowercase().cmp(&b.key.to_lowercase()),
            SortField::Size => a.size.cmp(&b.size),
            SortField::LastModified => a.last_modified.cmp(&b.last_modified),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    sorted
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<'a> {
    pub items: &'a [ObjectEntry],
    /// 1-based, clamped to the available pages
    pub page: usize,
    pub total_pages: usize,
}

pub fn paginate(objects: &[ObjectEntry], page: usize, per_page: usize) -> Page<'_> {
    let per_page = per_page.max(1);
    let total_pages = objects.len().div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let start = ((page - 1) * per_page).min(objects.len());
    let end = (start + per_page).min(objects.len());

    Page {
        items: &objects[start..end],
        page,
        total_pages,
    }
}

/// Human-readable size in base-1024 units, at most two decimals.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
