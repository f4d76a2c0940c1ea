//! Per-viewer session state: search text, view mode, role and the inline edit
//! in progress.
//!
//! Handlers take the context by value and hand back the updated one, so a
//! surface keeps exactly one owned copy and every change is explicit.

use crate::core::{
    PersonPatch, Result, Role, Status, TrackedPerson, TrackerError, ViewMode,
};
use crate::projection::project;
use crate::store::RecordStore;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Operations a surface offers, checked against the session role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Edit,
    Delete,
    InlineEdit,
}

impl Action {
    fn describe(self) -> &'static str {
        match self {
            Action::Add => "add records",
            Action::Edit => "edit records",
            Action::Delete => "delete records",
            Action::InlineEdit => "edit status and remarks",
        }
    }
}

/// Uncommitted status/remarks for the record in inline-edit mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineDraft {
    pub id: Uuid,
    pub status: Status,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub filter_text: String,
    pub view_mode: ViewMode,
    pub role: Role,
    pub inline_edit: Option<InlineDraft>,
}

impl SessionContext {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter_text: impl Into<String>) -> Self {
        self.filter_text = filter_text.into();
        self
    }

    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    pub fn toggle_view_mode(mut self) -> Self {
        self.view_mode = self.view_mode.toggled();
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn guard(&self, action: Action) -> Result<()> {
        let allowed = match action {
            Action::Add | Action::Edit | Action::Delete => self.role.can_manage_records(),
            Action::InlineEdit => self.role.can_edit_inline(),
        };
        if allowed {
            Ok(())
        } else {
            Err(TrackerError::PermissionDenied(format!(
                "{} cannot {}",
                self.role.label(),
                action.describe()
            )))
        }
    }

    /// Records to show for the current filter, in display order.
    pub fn visible(&self, records: &[TrackedPerson]) -> Vec<TrackedPerson> {
        project(records, &self.filter_text)
    }

    pub fn editing(&self) -> Option<Uuid> {
        self.inline_edit.as_ref().map(|draft| draft.id)
    }

    pub fn is_editing(&self, id: Uuid) -> bool {
        self.editing() == Some(id)
    }

    /// Points inline edit at `record`. A draft for another record is dropped
    /// without being saved.
    pub fn start_inline_edit(mut self, record: &TrackedPerson) -> Result<Self> {
        self.guard(Action::InlineEdit)?;
        if let Some(previous) = self.inline_edit.as_ref().filter(|d| d.id != record.id) {
            debug!(from = %previous.id, to = %record.id, "inline edit switched, draft discarded");
        }
        self.inline_edit = Some(InlineDraft {
            id: record.id,
            status: record.status,
            remarks: record.remarks.clone(),
        });
        Ok(self)
    }

    pub fn set_draft_status(mut self, status: Status) -> Self {
        if let Some(draft) = self.inline_edit.as_mut() {
            draft.status = status;
        }
        self
    }

    pub fn set_draft_remarks(mut self, remarks: impl Into<String>) -> Self {
        if let Some(draft) = self.inline_edit.as_mut() {
            let remarks = remarks.into();
            draft.remarks = if remarks.trim().is_empty() {
                None
            } else {
                Some(remarks)
            };
        }
        self
    }

    pub fn cancel_inline_edit(mut self) -> Self {
        self.inline_edit = None;
        self
    }

    /// Commits the draft through the store and leaves inline-edit mode.
    ///
    /// The pointer is cleared whether or not the commit succeeds; a record that
    /// vanished meanwhile reports `NotFound`.
    pub async fn save_inline_edit(mut self, store: &RecordStore) -> (Self, Result<TrackedPerson>) {
        let Some(draft) = self.inline_edit.take() else {
            return (
                self,
                Err(TrackerError::validation("no inline edit in progress")),
            );
        };
        let result = store
            .update(draft.id, PersonPatch::inline(draft.status, draft.remarks))
            .await;
        (self, result)
    }
}
