pub mod criteria;
pub mod domain;
pub mod responses;

pub use criteria::{CriteriaPatch, FilterCriteria, SortDirection, SortField, SortKey, PAGE_SIZE};
pub use domain::{Dog, SearchPage};
pub use responses::{MatchResponse, SearchResponse};
