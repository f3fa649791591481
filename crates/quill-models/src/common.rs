use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned by deletions: the identifier of the removed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdResponse {
    pub id: u64,
}
