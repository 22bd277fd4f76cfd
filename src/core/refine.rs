use crate::models::{Dog, FilterCriteria};

/// Whether a dog passes the locally-applied refinement filters.
///
/// The catalog's search endpoint cannot filter on name or exact age, so
/// those two criteria are re-applied here after the detail fetch. A dog
/// passes when its name contains the search term (case-insensitive) and its
/// age equals the requested age; absent criteria always pass.
#[inline]
pub fn matches_refinement(dog: &Dog, criteria: &FilterCriteria) -> bool {
    if let Some(term) = &criteria.search_term {
        if !dog.name.to_lowercase().contains(&term.to_lowercase()) {
            return false;
        }
    }

    if let Some(age) = criteria.age {
        if dog.age != age {
            return false;
        }
    }

    true
}

/// Drop the dogs on a fetched page that fail the local refinement.
///
/// Order is preserved. Callers keep the server-side total untouched, so a
/// refined page may hold fewer rows than the total implies.
pub fn refine(dogs: Vec<Dog>, criteria: &FilterCriteria) -> Vec<Dog> {
    dogs.into_iter()
        .filter(|dog| matches_refinement(dog, criteria))
        .collect()
}
