use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::dto::layout_dto::{
    CommitOutcome, LayoutDraftView, SlotAction, SlotCommitResult, SlotView,
};
use crate::error::{Error, Result};
use crate::models::layout::{check_position, slot_size, LayoutSlot, SLOT_POSITIONS};
use crate::models::mcq_set::{McqSet, SetStatus};
use crate::services::mcq_backend::{BannerUpload, McqBackend};
use crate::utils::in_flight::InFlight;

pub const NONE_VALUE: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    Assign(String),
    Remove,
}

impl PendingChange {
    fn set_id(&self) -> Option<&str> {
        match self {
            PendingChange::Assign(id) => Some(id.as_str()),
            PendingChange::Remove => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectiveValue {
    Set(String),
    None,
}

impl EffectiveValue {
    pub fn as_wire(&self) -> String {
        match self {
            EffectiveValue::Set(id) => id.clone(),
            EffectiveValue::None => NONE_VALUE.to_string(),
        }
    }
}

/// One admin's view of the slot grid: the last persisted assignment plus
/// uncommitted edits layered on top.
#[derive(Debug, Clone, Default)]
pub struct LayoutDraft {
    persisted: BTreeMap<u8, String>,
    pending: BTreeMap<u8, PendingChange>,
    committing: bool,
}

impl LayoutDraft {
    #[cfg(test)]
    pub fn from_slots(slots: &[LayoutSlot]) -> Self {
        let mut draft = Self::default();
        draft.replace_persisted(slots);
        draft
    }

    pub fn replace_persisted(&mut self, slots: &[LayoutSlot]) {
        self.persisted = slots
            .iter()
            .filter_map(|slot| slot.set_id().map(|id| (slot.position, id.to_string())))
            .collect();
    }

    pub fn persisted(&self, position: u8) -> Option<&str> {
        self.persisted.get(&position).map(|s| s.as_str())
    }

    pub fn pending_override(&self, position: u8) -> Option<&PendingChange> {
        self.pending.get(&position)
    }

    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_committing(&self) -> bool {
        self.committing
    }

    /// Pending override if present, else the persisted set, else none.
    pub fn effective_value(&self, position: u8) -> EffectiveValue {
        match self.pending.get(&position) {
            Some(PendingChange::Assign(id)) => EffectiveValue::Set(id.clone()),
            Some(PendingChange::Remove) => EffectiveValue::None,
            None => match self.persisted.get(&position) {
                Some(id) => EffectiveValue::Set(id.clone()),
                None => EffectiveValue::None,
            },
        }
    }

    /// True when `set_id` is persisted or pending at any position other than `position`.
    fn is_taken_elsewhere(&self, position: u8, set_id: &str) -> bool {
        let persisted = self
            .persisted
            .iter()
            .any(|(pos, id)| *pos != position && id == set_id);
        let pending = self
            .pending
            .iter()
            .any(|(pos, change)| *pos != position && change.set_id() == Some(set_id));
        persisted || pending
    }

    pub fn stage_change(&mut self, position: u8, mcq_set_id: Option<String>) -> Result<()> {
        check_position(position)?;
        if self.committing {
            return Err(Error::Conflict(
                "Layout changes are being saved; try again shortly".into(),
            ));
        }
        let change = match mcq_set_id {
            Some(id) => {
                if self.is_taken_elsewhere(position, &id) {
                    return Err(Error::Conflict(format!(
                        "MCQ set {} is already assigned to another position",
                        id
                    )));
                }
                PendingChange::Assign(id)
            }
            None => PendingChange::Remove,
        };
        self.pending.insert(position, change);
        Ok(())
    }

    /// Active sets that may go into `position` without breaking the 1:1 rule.
    pub fn available_candidates(&self, position: u8, sets: &[McqSet]) -> Vec<McqSet> {
        sets.iter()
            .filter(|s| s.status == SetStatus::Active)
            .filter(|s| !self.is_taken_elsewhere(position, &s.id))
            .cloned()
            .collect()
    }

    /// Banners go only onto committed assignments.
    pub fn can_upload_banner(&self, position: u8) -> bool {
        !self.pending.contains_key(&position) && self.persisted.contains_key(&position)
    }

    pub fn view(&self) -> LayoutDraftView {
        let slots = SLOT_POSITIONS
            .iter()
            .map(|&position| {
                let pending = self.pending_override(position);
                SlotView {
                    position,
                    size: slot_size(position),
                    persisted_set_id: self.persisted(position).map(|s| s.to_string()),
                    has_pending_change: pending.is_some(),
                    pending_set_id: pending.and_then(|c| c.set_id()).map(|s| s.to_string()),
                    effective_value: self.effective_value(position).as_wire(),
                    can_upload_banner: self.can_upload_banner(position),
                }
            })
            .collect();

        LayoutDraftView {
            slots,
            dirty: self.is_dirty(),
            committing: self.is_committing(),
        }
    }
}

type Drafts = Arc<Mutex<HashMap<String, LayoutDraft>>>;

/// Clears the committing flag even if the commit future is dropped midway.
struct CommitGuard<'a> {
    drafts: &'a Mutex<HashMap<String, LayoutDraft>>,
    admin_id: &'a str,
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut drafts) = self.drafts.lock() {
            if let Some(draft) = drafts.get_mut(self.admin_id) {
                draft.committing = false;
            }
        }
    }
}

#[derive(Clone)]
pub struct LayoutService {
    backend: Arc<dyn McqBackend>,
    drafts: Drafts,
    banner_uploads: InFlight<u8>,
}

impl LayoutService {
    pub fn new(backend: Arc<dyn McqBackend>) -> Self {
        Self {
            backend,
            drafts: Arc::new(Mutex::new(HashMap::new())),
            banner_uploads: InFlight::new(),
        }
    }

    /// Runs `f` on the admin's draft. A draft left clean and not committing is dropped;
    /// its persisted slots are re-read on every request anyway.
    fn with_draft<T>(&self, admin_id: &str, f: impl FnOnce(&mut LayoutDraft) -> T) -> T {
        let mut drafts = self.drafts.lock().expect("layout drafts mutex poisoned");
        let draft = drafts.entry(admin_id.to_string()).or_default();
        let out = f(draft);
        if !draft.is_dirty() && !draft.is_committing() {
            drafts.remove(admin_id);
        }
        out
    }

    /// Loads the persisted layout into the draft, then runs `f` under the same lock.
    async fn with_fresh_draft<T>(
        &self,
        admin_id: &str,
        f: impl FnOnce(&mut LayoutDraft) -> T,
    ) -> Result<T> {
        let slots = self.backend.get_layout().await?;
        Ok(self.with_draft(admin_id, |draft| {
            draft.replace_persisted(&slots);
            f(draft)
        }))
    }

    /// Re-reads persisted slots into the admin's draft, keeping pending edits.
    pub async fn refresh(&self, admin_id: &str) -> Result<LayoutDraftView> {
        self.with_fresh_draft(admin_id, |draft| draft.view()).await
    }

    #[cfg(test)]
    fn draft_count(&self) -> usize {
        self.drafts.lock().expect("layout drafts mutex poisoned").len()
    }

    pub async fn stage_change(
        &self,
        admin_id: &str,
        position: u8,
        mcq_set_id: Option<String>,
    ) -> Result<LayoutDraftView> {
        check_position(position)?;
        if let Some(id) = &mcq_set_id {
            let sets = self.backend.list_active_sets().await?;
            if !sets.iter().any(|s| &s.id == id && s.status == SetStatus::Active) {
                return Err(Error::NotFound(format!("Active MCQ set {} not found", id)));
            }
        }
        self.with_fresh_draft(admin_id, |draft| {
            draft.stage_change(position, mcq_set_id)?;
            Ok(draft.view())
        })
        .await?
    }

    pub async fn available_candidates(&self, admin_id: &str, position: u8) -> Result<Vec<McqSet>> {
        check_position(position)?;
        let sets = self.backend.list_active_sets().await?;
        self.with_fresh_draft(admin_id, |draft| draft.available_candidates(position, &sets))
            .await
    }

    /// Applies every pending change with its own call. A failed call does not stop
    /// the rest; nothing is rolled back.
    pub async fn commit(&self, admin_id: &str) -> Result<CommitOutcome> {
        let pending = {
            let mut drafts = self.drafts.lock().expect("layout drafts mutex poisoned");
            let Some(draft) = drafts.get_mut(admin_id) else {
                return Err(Error::BadRequest("No pending layout changes to save".into()));
            };
            if draft.committing {
                return Err(Error::Conflict("A layout save is already in progress".into()));
            }
            if draft.pending.is_empty() {
                return Err(Error::BadRequest("No pending layout changes to save".into()));
            }
            draft.committing = true;
            draft.pending.clone()
        };
        let _guard = CommitGuard {
            drafts: self.drafts.as_ref(),
            admin_id,
        };

        let mut results = Vec::with_capacity(pending.len());
        for (position, change) in pending {
            let (action, mcq_set_id, outcome) = match change {
                PendingChange::Assign(id) => (
                    SlotAction::Assign,
                    Some(id.clone()),
                    self.backend
                        .assign_slot(admin_id.to_string(), id, position)
                        .await,
                ),
                PendingChange::Remove => (
                    SlotAction::Remove,
                    None,
                    self.backend.remove_slot(admin_id.to_string(), position).await,
                ),
            };

            let error = match outcome {
                Ok(()) => {
                    info!(admin_id, position, ?action, "Layout slot updated");
                    None
                }
                Err(e) => {
                    warn!(admin_id, position, ?action, "Layout slot update failed: {}", e);
                    Some(e.to_string())
                }
            };
            results.push(SlotCommitResult {
                position,
                action,
                mcq_set_id,
                success: error.is_none(),
                error,
            });
        }

        let refreshed_slots = match self.backend.get_layout().await {
            Ok(slots) => Some(slots),
            Err(e) => {
                warn!(admin_id, "Could not reload layout after save: {}", e);
                None
            }
        };

        self.with_draft(admin_id, |draft| {
            draft.pending.clear();
            if let Some(slots) = &refreshed_slots {
                draft.replace_persisted(slots);
            }
        });

        let success_count = results.iter().filter(|r| r.success).count();
        let error_count = results.len() - success_count;
        let message = if error_count == 0 {
            format!("Layout saved: {} slot(s) updated", success_count)
        } else {
            format!(
                "Layout partially saved: {} slot(s) updated, {} failed",
                success_count, error_count
            )
        };
        info!(admin_id, success_count, error_count, "Layout commit finished");

        Ok(CommitOutcome {
            success_count,
            error_count,
            results,
            refreshed: refreshed_slots.is_some(),
            message,
        })
    }

    pub async fn discard(&self, admin_id: &str, confirmed: bool) -> Result<LayoutDraftView> {
        if !confirmed {
            return Err(Error::BadRequest(
                "Discarding pending layout changes requires confirmation".into(),
            ));
        }
        self.with_draft(admin_id, |draft| {
            if draft.committing {
                return Err(Error::Conflict(
                    "Layout changes are being saved and cannot be discarded".into(),
                ));
            }
            draft.pending.clear();
            Ok(())
        })?;
        info!(admin_id, "Pending layout changes discarded");
        self.refresh(admin_id).await
    }

    pub async fn upload_banner(
        &self,
        admin_id: &str,
        position: u8,
        banner: BannerUpload,
    ) -> Result<McqSet> {
        check_position(position)?;
        let set_id = self
            .with_fresh_draft(admin_id, |draft| {
                if draft.pending_override(position).is_some() {
                    return Err(Error::Conflict(format!(
                        "Save the layout before uploading a banner for position {}",
                        position
                    )));
                }
                draft
                    .persisted(position)
                    .map(|s| s.to_string())
                    .ok_or_else(|| {
                        Error::BadRequest(format!(
                            "No MCQ set is assigned to position {}",
                            position
                        ))
                    })
            })
            .await??;

        let _upload = self.banner_uploads.try_acquire(position).ok_or_else(|| {
            Error::Conflict(format!(
                "A banner upload for position {} is already in progress",
                position
            ))
        })?;

        info!(admin_id, position, mcq_set_id = %set_id, "Uploading slot banner");
        self.backend
            .upload_banner(admin_id.to_string(), set_id, banner)
            .await
    }
}
