use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    Draft, DraftAction, DraftState, DraftTransition, DraftWithGroup, SaveDraftRequest,
};

/// Transition table for a group's draft: save only from `NoDraft`, approve and
/// reject only from `Drafted`.
pub fn next_state(current: DraftState, action: DraftAction) -> Result<DraftState, AppError> {
    match (current, action) {
        (DraftState::NoDraft, DraftAction::Save) => Ok(DraftState::Drafted),
        (DraftState::Drafted, DraftAction::Approve | DraftAction::Reject) => {
            Ok(DraftState::NoDraft)
        }
        (DraftState::Drafted, DraftAction::Save) => Err(AppError::Conflict(
            "a draft already exists for this schedule group".to_string(),
        )),
        (DraftState::NoDraft, DraftAction::Approve | DraftAction::Reject) => {
            Err(AppError::NotFound("draft".to_string()))
        }
    }
}

fn state_of<T>(draft: &Option<T>) -> DraftState {
    match draft {
        Some(_) => DraftState::Drafted,
        None => DraftState::NoDraft,
    }
}

pub struct DraftService {
    db: SqlitePool,
}

impl DraftService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<DraftWithGroup>, AppError> {
        Ok(repository::fetch_drafts(&self.db).await?)
    }

    /// Stages a schedule group for review.
    ///
    /// The lookup gives a fast `Conflict`; the unique index on `drafts.group_id`
    /// is what actually serializes two concurrent saves.
    pub async fn save(&self, group_id: &str, req: SaveDraftRequest) -> Result<Draft, AppError> {
        let group = {
            let mut conn = self.db.acquire().await?;
            repository::find_schedule_group(&mut conn, group_id).await?
        }
        .ok_or_else(|| AppError::NotFound(format!("schedule group {}", group_id)))?;

        let existing = repository::find_draft_by_group(&self.db, group_id).await?;
        next_state(state_of(&existing), DraftAction::Save)?;

        let draft_name = req
            .draft_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| {
                format!("{} {} {}", group.school_year, group.semester, group.department)
            });

        let draft = repository::insert_draft(&self.db, group_id, &draft_name)
            .await
            .map_err(|e| {
                AppError::conflict_on_unique(
                    e,
                    format!("a draft already exists for schedule group {}", group_id),
                )
            })?;

        info!("Saved draft {} for schedule group {}", draft.id, group_id);
        Ok(draft)
    }

    /// Removes the draft. The group's entries stay as they are and become live.
    pub async fn approve(&self, draft_id: &str) -> Result<DraftTransition, AppError> {
        let found = repository::find_draft_by_id(&self.db, draft_id).await?;
        let state = next_state(state_of(&found), DraftAction::Approve)?;
        let Some(draft) = found else {
            return Err(AppError::NotFound(format!("draft {}", draft_id)));
        };

        let mut conn = self.db.acquire().await?;
        if !repository::delete_draft(&mut conn, draft_id).await? {
            return Err(AppError::NotFound(format!("draft {}", draft_id)));
        }

        info!("Approved draft {} (schedule group {})", draft_id, draft.group_id);
        Ok(DraftTransition {
            draft_id: draft.id,
            group_id: draft.group_id,
            action: DraftAction::Approve,
            state,
            entries_deleted: 0,
            meetings_deleted: 0,
        })
    }

    /// Removes the draft and the whole schedule it guards in one transaction.
    ///
    /// The group is resolved through the draft before anything is deleted. If
    /// it cannot be resolved the transaction is dropped and nothing changes.
    pub async fn reject(&self, draft_id: &str) -> Result<DraftTransition, AppError> {
        let mut tx = self.db.begin().await?;

        let found = repository::resolve_draft_group(&mut tx, draft_id).await?;
        let state = next_state(state_of(&found), DraftAction::Reject)?;
        let Some((group_ref, resolved)) = found else {
            return Err(AppError::NotFound(format!("draft {}", draft_id)));
        };

        let Some(group_id) = resolved else {
            warn!(
                "Draft {} references missing schedule group {}; aborting reject",
                draft_id, group_ref
            );
            return Err(AppError::Integrity(format!(
                "draft {} references schedule group {} which cannot be resolved",
                draft_id, group_ref
            )));
        };

        // Draft goes first: drafts.group_id references the group row.
        repository::delete_draft(&mut tx, draft_id).await?;
        let counts = repository::delete_group_schedule(&mut tx, &group_id).await?;
        if counts.groups != 1 {
            return Err(AppError::Integrity(format!(
                "schedule group {} vanished during reject of draft {}",
                group_id, draft_id
            )));
        }

        tx.commit().await?;

        info!(
            "Rejected draft {}: removed group {} ({} entries, {} meetings)",
            draft_id, group_id, counts.entries, counts.meetings
        );
        Ok(DraftTransition {
            draft_id: draft_id.to_string(),
            group_id,
            action: DraftAction::Reject,
            state,
            entries_deleted: counts.entries,
            meetings_deleted: counts.meetings,
        })
    }
}
