use serde::Deserialize;

/// Body of `GET /search`: the matching IDs for one page plus the total
/// number of matches across all pages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub result_ids: Vec<String>,
    pub total: u64,
}

/// Body of `POST /match`: the ID of the dog selected from the submitted
/// candidates.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchResponse {
    #[serde(rename = "match")]
    pub match_id: String,
}
