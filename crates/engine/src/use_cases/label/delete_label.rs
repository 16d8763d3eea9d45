//! Delete label use case.

use std::sync::Arc;

use tabletop_domain::{Label, LabelId, User};

use crate::infrastructure::ports::LabelRepo;

use super::error::LabelError;

pub struct DeleteLabel {
    labels: Arc<dyn LabelRepo>,
}

impl DeleteLabel {
    pub fn new(labels: Arc<dyn LabelRepo>) -> Self {
        Self { labels }
    }

    /// Delete an owned label and its selections, returning its last state.
    pub async fn execute(&self, actor: &User, id: LabelId) -> Result<Label, LabelError> {
        let mut label = self
            .labels
            .get(id)
            .await?
            .ok_or(LabelError::NotFound(id))?;

        if !label.is_owned_by(actor.id()) {
            return Err(LabelError::NotOwner(id));
        }

        let visible = self
            .labels
            .delete(id)
            .await?
            .ok_or(LabelError::NotFound(id))?;
        label.set_visible(visible);
        tracing::debug!(label_id = %id, owner = %actor.name(), "Label deleted");
        Ok(label)
    }
}
