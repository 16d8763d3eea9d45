//! Add label use case.

use std::sync::Arc;

use tabletop_domain::{Label, LabelCategory, LabelId, LabelName, User};

use crate::infrastructure::ports::LabelRepo;

use super::error::LabelError;

/// A label as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLabel {
    pub id: LabelId,
    /// Owner name as claimed by the client.
    pub owner: String,
    pub category: Option<String>,
    pub name: String,
    pub visible: bool,
}

pub struct AddLabel {
    labels: Arc<dyn LabelRepo>,
}

impl AddLabel {
    pub fn new(labels: Arc<dyn LabelRepo>) -> Self {
        Self { labels }
    }

    /// Persist a label owned by `actor`.
    ///
    /// The claimed owner must be the acting user (compared case-insensitively)
    /// and the id must be unused.
    pub async fn execute(&self, actor: &User, input: NewLabel) -> Result<Label, LabelError> {
        if !actor.name().matches(&input.owner) {
            return Err(LabelError::ForeignOwner {
                claimed: input.owner,
                actor: actor.name().to_string(),
            });
        }

        let category = input
            .category
            .filter(|c| !c.trim().is_empty())
            .map(LabelCategory::new)
            .transpose()?;
        let name = LabelName::new(input.name)?;

        if self.labels.get(input.id).await?.is_some() {
            return Err(LabelError::DuplicateId(input.id));
        }

        let label = Label::new(
            input.id,
            actor.id(),
            actor.name().clone(),
            category,
            name,
            input.visible,
        );
        self.labels.create(&label).await.map_err(|e| {
            if e.is_constraint() {
                LabelError::DuplicateId(input.id)
            } else {
                LabelError::Repo(e)
            }
        })?;

        tracing::debug!(
            label_id = %label.id(),
            owner = %actor.name(),
            visible = label.visible(),
            "Label created"
        );
        Ok(label)
    }
}
