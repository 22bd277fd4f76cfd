use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Fixed number of results per page. The catalog is always queried with
/// `size=PAGE_SIZE`.
pub const PAGE_SIZE: u32 = 10;

/// Field a search can be sorted by. Only these two are offered to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Age,
}

impl SortField {
    fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Age => "age",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A sort key in the catalog's `field:dir` wire form, e.g. `name:asc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field.as_str(), self.direction.as_str())
    }
}

/// Error returned when parsing a sort key from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid sort key '{0}', expected one of name:asc, name:desc, age:asc, age:desc")]
pub struct InvalidSortKey(String);

impl FromStr for SortKey {
    type Err = InvalidSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s
            .split_once(':')
            .ok_or_else(|| InvalidSortKey(s.to_string()))?;

        let field = match field {
            "name" => SortField::Name,
            "age" => SortField::Age,
            _ => return Err(InvalidSortKey(s.to_string())),
        };
        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(InvalidSortKey(s.to_string())),
        };

        Ok(SortKey { field, direction })
    }
}

/// The full set of search parameters the orchestrator owns.
///
/// `breed`, `zip_code` and `sort` are handled by the catalog's search
/// endpoint; `search_term` and `age` are not and are re-applied locally after
/// the detail fetch (see `core::refine`). Invariant: `page >= 1`, and any
/// change to a field other than `page` resets `page` to 1.
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    pub breed: Option<String>,
    pub zip_code: Option<String>,
    /// Case-insensitive substring match on the dog's name, applied locally.
    pub search_term: Option<String>,
    /// Exact age match, applied locally.
    pub age: Option<u8>,
    pub sort: Option<SortKey>,
    /// 1-based page number.
    pub page: u32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            breed: None,
            zip_code: None,
            search_term: None,
            age: None,
            sort: None,
            page: 1,
        }
    }
}

impl FilterCriteria {
    /// Zero-based result offset sent as the `from` query parameter.
    pub fn offset(&self) -> u32 {
        (self.page - 1) * PAGE_SIZE
    }

    /// Query parameters for `GET /search`, in a fixed order.
    ///
    /// Only non-empty criteria fields are serialized; `size` and `from` are
    /// always included. `search_term` and `age` never appear here since the
    /// search endpoint does not support them.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(5);
        if let Some(breed) = &self.breed {
            params.push(("breeds", breed.clone()));
        }
        if let Some(zip) = &self.zip_code {
            params.push(("zipCodes", zip.clone()));
        }
        params.push(("size", PAGE_SIZE.to_string()));
        params.push(("from", self.offset().to_string()));
        if let Some(sort) = &self.sort {
            params.push(("sort", sort.to_string()));
        }
        params
    }

    /// Merge a partial update into the criteria.
    ///
    /// Applies every field present in the patch, then resets `page` to 1 if
    /// any non-page field was supplied, even when the patch also carried an
    /// explicit page. An empty patch changes nothing (used for manual
    /// retries).
    pub fn apply(&mut self, patch: CriteriaPatch) {
        let filters_touched = patch.touches_filters();

        if let Some(breed) = patch.breed {
            self.breed = non_empty(breed);
        }
        if let Some(zip) = patch.zip_code {
            self.zip_code = non_empty(zip);
        }
        if let Some(term) = patch.search_term {
            self.search_term = non_empty(term);
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(sort) = patch.sort {
            self.sort = sort;
        }
        if let Some(page) = patch.page {
            self.page = page.max(1);
        }

        if filters_touched {
            self.page = 1;
        }
    }
}

/// Drop empty strings so a cleared text field behaves like "no filter".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A partial criteria update.
///
/// Every field is tri-state: `None` leaves the criteria field unchanged,
/// `Some(None)` clears it, `Some(Some(v))` sets it. `page` has no cleared
/// state; pages are only ever set.
#[derive(Debug, Clone, Default)]
pub struct CriteriaPatch {
    pub breed: Option<Option<String>>,
    pub zip_code: Option<Option<String>>,
    pub search_term: Option<Option<String>>,
    pub age: Option<Option<u8>>,
    pub sort: Option<Option<SortKey>>,
    pub page: Option<u32>,
}

impl CriteriaPatch {
    /// True when any field other than `page` is present.
    pub fn touches_filters(&self) -> bool {
        self.breed.is_some()
            || self.zip_code.is_some()
            || self.search_term.is_some()
            || self.age.is_some()
            || self.sort.is_some()
    }
}
