use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    matches::{MatchEntry, MatchRecord, SwipeOutcome},
    swipes::SwipeEdge,
};

#[derive(Debug, Deserialize)]
pub struct SwipeRightRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub message: &'static str,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_record: Option<MatchRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swipe: Option<SwipeEdge>,
    pub is_new_match: bool,
}

impl SwipeResponse {
    /// Whether the call created something (a swipe edge or a match).
    pub fn created(outcome: &SwipeOutcome) -> bool {
        match outcome {
            SwipeOutcome::Matched { is_new, .. } | SwipeOutcome::Swiped { is_new, .. } => *is_new,
        }
    }
}

impl From<SwipeOutcome> for SwipeResponse {
    fn from(outcome: SwipeOutcome) -> Self {
        match outcome {
            SwipeOutcome::Matched { record, is_new } => Self {
                message: if is_new {
                    "It's a match!"
                } else {
                    "Match already exists"
                },
                match_record: Some(record),
                swipe: None,
                is_new_match: is_new,
            },
            SwipeOutcome::Swiped { edge, is_new } => Self {
                message: if is_new {
                    "Swipe right recorded"
                } else {
                    "Swipe right already recorded"
                },
                match_record: None,
                swipe: Some(edge),
                is_new_match: false,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub count: usize,
    pub matches: Vec<MatchEntry>,
}
