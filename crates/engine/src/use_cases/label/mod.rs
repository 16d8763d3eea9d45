//! Label use cases.
//!
//! Labels are user-owned annotations. Only the owner may change or delete a
//! label; everyone else may only see it while it is visible.

use std::sync::Arc;

mod add_label;
mod delete_label;
mod error;
mod filter;
mod set_visibility;

pub use add_label::{AddLabel, NewLabel};
pub use delete_label::DeleteLabel;
pub use error::LabelError;
pub use filter::{AddLabelFilter, RemoveLabelFilter};
pub use set_visibility::{SetLabelVisibility, VisibilityChange};

use crate::infrastructure::ports::LabelRepo;

/// Container for label use cases.
pub struct LabelUseCases {
    pub add: Arc<AddLabel>,
    pub delete: Arc<DeleteLabel>,
    pub set_visibility: Arc<SetLabelVisibility>,
    pub add_filter: Arc<AddLabelFilter>,
    pub remove_filter: Arc<RemoveLabelFilter>,
}

impl LabelUseCases {
    pub fn new(labels: Arc<dyn LabelRepo>) -> Self {
        Self {
            add: Arc::new(AddLabel::new(labels.clone())),
            delete: Arc::new(DeleteLabel::new(labels.clone())),
            set_visibility: Arc::new(SetLabelVisibility::new(labels.clone())),
            add_filter: Arc::new(AddLabelFilter::new(labels.clone())),
            remove_filter: Arc::new(RemoveLabelFilter::new(labels)),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tabletop_domain::{Label, LabelId, LabelName, User, UserName};

    pub fn user(name: &str) -> User {
        User::new(UserName::new(name).unwrap())
    }

    pub fn label_of(owner: &User, visible: bool) -> Label {
        Label::new(
            LabelId::new(),
            owner.id(),
            owner.name().clone(),
            None,
            LabelName::new("Ally").unwrap(),
            visible,
        )
    }
}
