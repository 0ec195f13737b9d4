use serde::{Deserialize, Serialize};

use crate::models::layout::SlotSize;

/// `mcqSetId: null` (or an absent key) stages a removal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageChangePayload {
    #[serde(default)]
    pub mcq_set_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscardPayload {
    #[serde(default)]
    pub confirm: bool,
}

/// Body of `POST /api/admin/mcq/layout`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignSlotRequest {
    pub mcq_set_id: String,
    pub position: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub position: u8,
    pub size: SlotSize,
    pub persisted_set_id: Option<String>,
    pub has_pending_change: bool,
    pub pending_set_id: Option<String>,
    /// Set id, or `"none"`.
    pub effective_value: String,
    pub can_upload_banner: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDraftView {
    pub slots: Vec<SlotView>,
    pub dirty: bool,
    pub committing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotAction {
    Assign,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotCommitResult {
    pub position: u8,
    pub action: SlotAction,
    pub mcq_set_id: Option<String>,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOutcome {
    pub success_count: usize,
    pub error_count: usize,
    pub results: Vec<SlotCommitResult>,
    /// False when the layout could not be re-read after the calls.
    pub refreshed: bool,
    pub message: String,
}
