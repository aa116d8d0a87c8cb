//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of itinerary item a comment is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentTarget {
    Activity,
    Accommodation,
}

impl std::fmt::Display for CommentTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommentTarget::Activity => write!(f, "activity"),
            CommentTarget::Accommodation => write!(f, "accommodation"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub trip_id: String,
    pub entity_id: String,
    pub entity_type: CommentTarget,
    pub text: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub entity_id: String,
    pub entity_type: CommentTarget,
    pub text: String,
}
