//! Label entity - a user-owned annotation

use serde::{Deserialize, Serialize};

use crate::{LabelCategory, LabelId, LabelName, RoomId, UserId, UserName};

/// Anything that has an owner and a visibility flag.
///
/// Owners always see their own objects; everyone else only sees them while
/// `is_visible()` holds.
pub trait OwnedObject {
    type Id: Copy + Eq + std::fmt::Debug;

    fn object_id(&self) -> Self::Id;
    fn owner(&self) -> UserId;
    fn is_visible(&self) -> bool;
}

/// A label owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    id: LabelId,
    owner: UserId,
    owner_name: UserName,
    category: Option<LabelCategory>,
    name: LabelName,
    visible: bool,
}

impl Label {
    pub fn new(
        id: LabelId,
        owner: UserId,
        owner_name: UserName,
        category: Option<LabelCategory>,
        name: LabelName,
        visible: bool,
    ) -> Self {
        Self {
            id,
            owner,
            owner_name,
            category,
            name,
            visible,
        }
    }

    #[inline]
    pub fn id(&self) -> LabelId {
        self.id
    }

    #[inline]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    #[inline]
    pub fn owner_name(&self) -> &UserName {
        &self.owner_name
    }

    #[inline]
    pub fn category(&self) -> Option<&LabelCategory> {
        self.category.as_ref()
    }

    #[inline]
    pub fn name(&self) -> &LabelName {
        &self.name
    }

    #[inline]
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Set the visibility flag, returning the previous value.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        std::mem::replace(&mut self.visible, visible)
    }
}

impl OwnedObject for Label {
    type Id = LabelId;

    fn object_id(&self) -> LabelId {
        self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Marks a label as an active filter for one viewer in one room.
///
/// Independent of the label's own visibility flag; removed when the label is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelSelection {
    pub label_id: LabelId,
    pub user_id: UserId,
    pub room_id: RoomId,
}

/// A selection belongs to the selecting user and is never public.
impl OwnedObject for LabelSelection {
    type Id = LabelId;

    fn object_id(&self) -> LabelId {
        self.label_id
    }

    fn owner(&self) -> UserId {
        self.user_id
    }

    fn is_visible(&self) -> bool {
        false
    }
}
