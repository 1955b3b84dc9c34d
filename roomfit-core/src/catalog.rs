//! Searching and ordering the furniture catalog.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::{FurnitureKind, FurnitureTemplate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    /// Floor area, smallest first.
    Size,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "size" | "area" => Ok(SortKey::Size),
            _ => Err(format!("unknown sort key: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    /// Case-insensitive substring matched against name and type.
    pub search: String,
    pub category: Option<FurnitureKind>,
    pub sort: SortKey,
}

impl CatalogQuery {
    pub fn matches(&self, template: &FurnitureTemplate) -> bool {
        if let Some(category) = self.category {
            if template.kind != category {
                return false;
            }
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || template.name.to_lowercase().contains(&needle)
            || template.kind.as_str().contains(&needle)
    }

    pub fn apply<'a, T>(&self, catalog: &'a [T]) -> Vec<&'a T>
    where
        T: AsRef<FurnitureTemplate>,
    {
        let mut out: Vec<&T> = catalog
            .iter()
            .filter(|t| self.matches(AsRef::<FurnitureTemplate>::as_ref(*t)))
            .collect();
        out.sort_by(|a, b| compare(self.sort, (*a).as_ref(), (*b).as_ref()));
        out
    }
}

fn compare(key: SortKey, a: &FurnitureTemplate, b: &FurnitureTemplate) -> Ordering {
    match key {
        SortKey::Name => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
        SortKey::Size => a.area().total_cmp(&b.area()),
    }
}

impl AsRef<FurnitureTemplate> for FurnitureTemplate {
    fn as_ref(&self) -> &FurnitureTemplate {
        self
    }
}

/// Number of catalog entries per category.
pub fn count_by_kind<T: AsRef<FurnitureTemplate>>(catalog: &[T]) -> HashMap<FurnitureKind, usize> {
    let mut counts = HashMap::new();
    for template in catalog {
        *counts.entry(template.as_ref().kind).or_insert(0) += 1;
    }
    counts
}
