//! Set label visibility use case.

use std::sync::Arc;

use tabletop_domain::{Label, LabelId, User};

use crate::infrastructure::ports::LabelRepo;

use super::error::LabelError;

/// New label state together with the flag it replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityChange {
    pub label: Label,
    pub previously_visible: bool,
}

pub struct SetLabelVisibility {
    labels: Arc<dyn LabelRepo>,
}

impl SetLabelVisibility {
    pub fn new(labels: Arc<dyn LabelRepo>) -> Self {
        Self { labels }
    }

    pub async fn execute(
        &self,
        actor: &User,
        id: LabelId,
        visible: bool,
    ) -> Result<VisibilityChange, LabelError> {
        let mut label = self
            .labels
            .get(id)
            .await?
            .ok_or(LabelError::NotFound(id))?;

        if !label.is_owned_by(actor.id()) {
            return Err(LabelError::NotOwner(id));
        }

        // The stored flag may have moved since `get`; trust the write.
        let flipped = self.labels.set_visibility(id, visible).await?;
        let previously_visible = if flipped { !visible } else { visible };
        label.set_visible(visible);
        Ok(VisibilityChange {
            label,
            previously_visible,
        })
    }
}
