use serde::{Deserialize, Serialize};

use crate::models::criteria::PAGE_SIZE;

/// A dog available for adoption, exactly as the catalog service describes it.
///
/// Records are immutable once fetched; everything here is sourced from the
/// `POST /details` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dog {
    pub id: String,
    pub name: String,
    pub breed: String,
    pub age: u8,
    pub zip_code: String,
    pub img: String,
}

/// One resolved page of search results.
///
/// `total` counts server-side matches before client-side refinement, so a
/// page can hold fewer records than `total` and the page size suggest when
/// the name/age refinement dropped rows. That mismatch is observed catalog
/// behavior and is kept as-is.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub dogs: Vec<Dog>,
    pub total: u64,
}

impl SearchPage {
    /// Number of pages the server-side total spans: `ceil(total / PAGE_SIZE)`.
    pub fn page_count(&self) -> u32 {
        self.total.div_ceil(u64::from(PAGE_SIZE)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_total(total: u64) -> SearchPage {
        SearchPage { dogs: vec![], total }
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_with_total(0).page_count(), 0);
        assert_eq!(page_with_total(1).page_count(), 1);
        assert_eq!(page_with_total(10).page_count(), 1);
        assert_eq!(page_with_total(11).page_count(), 2);
        assert_eq!(page_with_total(95).page_count(), 10);
        assert_eq!(page_with_total(101).page_count(), 11);
    }

    #[test]
    fn test_dog_wire_format() {
        let json = r#"{
            "id": "d-1",
            "name": "Rex",
            "breed": "Poodle",
            "age": 3,
            "zip_code": "10001",
            "img": "https://cdn.example.com/rex.jpg"
        }"#;

        let dog: Dog = serde_json::from_str(json).unwrap();
        assert_eq!(dog.id, "d-1");
        assert_eq!(dog.name, "Rex");
        assert_eq!(dog.breed, "Poodle");
        assert_eq!(dog.age, 3);
        assert_eq!(dog.zip_code, "10001");
    }

    #[test]
    fn test_dog_ignores_unknown_fields() {
        // The live service may grow extra fields; decoding must not break.
        let json = r#"{
            "id": "d-2",
            "name": "Mia",
            "breed": "Beagle",
            "age": 5,
            "zip_code": "94103",
            "img": "x.jpg",
            "shelter": "Oakside"
        }"#;

        let dog: Dog = serde_json::from_str(json).unwrap();
        assert_eq!(dog.name, "Mia");
    }
}
