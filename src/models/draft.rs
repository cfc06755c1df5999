use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ScheduleGroup;

/// A schedule group staged for review. At most one exists per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Draft {
    pub id: String,
    pub group_id: String,
    pub draft_name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveDraftRequest {
    pub draft_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftWithGroup {
    #[serde(flatten)]
    pub draft: Draft,
    pub group: ScheduleGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftState {
    NoDraft,
    Drafted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftAction {
    Save,
    Approve,
    Reject,
}

/// Result of a lifecycle call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftTransition {
    pub draft_id: String,
    pub group_id: String,
    pub action: DraftAction,
    pub state: DraftState,
    /// Rows removed by a reject cascade; zero for other actions.
    pub entries_deleted: u64,
    pub meetings_deleted: u64,
}
