//! Label filter use cases.
//!
//! A filter is a per-user, per-room selection of labels used to narrow what
//! the client displays. It is private to the selecting user.

use std::sync::Arc;

use tabletop_domain::{LabelId, LabelSelection, RoomId, User};

use crate::infrastructure::ports::LabelRepo;

use super::error::LabelError;

pub struct AddLabelFilter {
    labels: Arc<dyn LabelRepo>,
}

impl AddLabelFilter {
    pub fn new(labels: Arc<dyn LabelRepo>) -> Self {
        Self { labels }
    }

    /// Select a label the actor can perceive.
    ///
    /// Hidden labels of other users are reported as not found.
    pub async fn execute(
        &self,
        actor: &User,
        room_id: RoomId,
        id: LabelId,
    ) -> Result<LabelSelection, LabelError> {
        self.labels
            .get(id)
            .await?
            .filter(|label| label.visible() || label.is_owned_by(actor.id()))
            .ok_or(LabelError::NotFound(id))?;

        let selection = LabelSelection {
            label_id: id,
            user_id: actor.id(),
            room_id,
        };
        self.labels.add_selection(&selection).await?;
        Ok(selection)
    }
}

pub struct RemoveLabelFilter {
    labels: Arc<dyn LabelRepo>,
}

impl RemoveLabelFilter {
    pub fn new(labels: Arc<dyn LabelRepo>) -> Self {
        Self { labels }
    }

    /// Drop a selection. Removing one that does not exist is not an error.
    pub async fn execute(
        &self,
        actor: &User,
        room_id: RoomId,
        id: LabelId,
    ) -> Result<LabelSelection, LabelError> {
        let selection = LabelSelection {
            label_id: id,
            user_id: actor.id(),
            room_id,
        };
        if !self.labels.remove_selection(&selection).await? {
            tracing::debug!(label_id = %id, user = %actor.name(), "No label filter to remove");
        }
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockLabelRepo;
    use crate::use_cases::label::test_support::{label_of, user};

    #[tokio::test]
    async fn selecting_a_visible_label_records_the_selection() {
        let alice = user("alice");
        let bob = user("bob");
        let label = label_of(&alice, true);
        let id = label.id();
        let room = RoomId::new();
        let bob_id = bob.id();

        let mut labels = MockLabelRepo::new();
        labels
            .expect_get()
            .returning(move |_| Ok(Some(label.clone())));
        labels
            .expect_add_selection()
            .withf(move |s| s.label_id == id && s.user_id == bob_id && s.room_id == room)
            .times(1)
            .returning(|_| Ok(()));

        let use_case = AddLabelFilter::new(Arc::new(labels));
        let selection = use_case.execute(&bob, room, id).await.unwrap();
        assert_eq!(selection.user_id, bob_id);
    }

    #[tokio::test]
    async fn hidden_labels_of_others_cannot_be_selected() {
        let alice = user("alice");
        let label = label_of(&alice, false);
        let id = label.id();

        let mut labels = MockLabelRepo::new();
        labels
            .expect_get()
            .returning(move |_| Ok(Some(label.clone())));
        labels.expect_add_selection().never();

        let use_case = AddLabelFilter::new(Arc::new(labels));
        let err = use_case
            .execute(&user("bob"), RoomId::new(), id)
            .await
            .unwrap_err();
        assert!(matches!(err, LabelError::NotFound(_)));
    }

    #[tokio::test]
    async fn removing_a_missing_selection_succeeds() {
        let mut labels = MockLabelRepo::new();
        labels.expect_remove_selection().returning(|_| Ok(false));

        let use_case = RemoveLabelFilter::new(Arc::new(labels));
        let id = LabelId::new();
        let selection = use_case
            .execute(&user("alice"), RoomId::new(), id)
            .await
            .unwrap();
        assert_eq!(selection.label_id, id);
    }
}
