//! Per-recipient views of owned objects.
//!
//! Given an object transition and the sessions that might hear about it,
//! decides what each session is allowed to learn. Owner sessions always get
//! the ground truth. Other sessions only ever learn about an object while it
//! is visible, and are told to forget it when it stops being visible.
//!
//! Callers exclude the originating session before resolving.

use tabletop_domain::{OwnedObject, SessionId};

use crate::api::connections::Recipient;

/// What one recipient should be told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<T: OwnedObject> {
    /// The owner's own sessions see the raw transition.
    OwnerView(T),
    /// The object became perceivable to a non-owner.
    PublicAppear(T),
    /// A non-owner must drop the object.
    PublicDisappear(T::Id),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery<T: OwnedObject> {
    pub session_id: SessionId,
    pub view: View<T>,
}

fn is_owner<T: OwnedObject>(object: &T, recipient: &Recipient) -> bool {
    recipient.user_id == object.owner()
}

/// A new object was created.
pub fn on_created<T>(object: &T, recipients: &[Recipient]) -> Vec<Delivery<T>>
where
    T: OwnedObject + Clone,
{
    recipients
        .iter()
        .filter_map(|recipient| {
            let view = if is_owner(object, recipient) {
                View::OwnerView(object.clone())
            } else if object.is_visible() {
                View::PublicAppear(object.clone())
            } else {
                return None;
            };
            Some(Delivery {
                session_id: recipient.session_id,
                view,
            })
        })
        .collect()
}

/// The visibility flag was written. `object` carries the new state.
///
/// Non-owners hear nothing when the flag did not actually change.
pub fn on_visibility_changed<T>(
    object: &T,
    previously_visible: bool,
    recipients: &[Recipient],
) -> Vec<Delivery<T>>
where
    T: OwnedObject + Clone,
{
    let changed = previously_visible != object.is_visible();
    recipients
        .iter()
        .filter_map(|recipient| {
            let view = if is_owner(object, recipient) {
                View::OwnerView(object.clone())
            } else if !changed {
                return None;
            } else if object.is_visible() {
                View::PublicAppear(object.clone())
            } else {
                View::PublicDisappear(object.object_id())
            };
            Some(Delivery {
                session_id: recipient.session_id,
                view,
            })
        })
        .collect()
}

/// The object was deleted. `object` is its last state.
pub fn on_deleted<T>(object: &T, recipients: &[Recipient]) -> Vec<Delivery<T>>
where
    T: OwnedObject + Clone,
{
    recipients
        .iter()
        .filter_map(|recipient| {
            let view = if is_owner(object, recipient) {
                View::OwnerView(object.clone())
            } else if object.is_visible() {
                View::PublicDisappear(object.object_id())
            } else {
                return None;
            };
            Some(Delivery {
                session_id: recipient.session_id,
                view,
            })
        })
        .collect()
}

/// Private bookkeeping that only the owner's other sessions may see.
pub fn on_owner_only<T>(object: &T, recipients: &[Recipient]) -> Vec<Delivery<T>>
where
    T: OwnedObject + Clone,
{
    recipients
        .iter()
        .filter(|recipient| is_owner(object, recipient))
        .map(|recipient| Delivery {
            session_id: recipient.session_id,
            view: View::OwnerView(object.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabletop_domain::{Label, LabelId, LabelName, UserId, UserName};

    struct Room {
        owner: UserId,
        owner_session: Recipient,
        other_session: Recipient,
    }

    fn room() -> Room {
        let owner = UserId::new();
        Room {
            owner,
            owner_session: Recipient {
                session_id: SessionId::new(),
                user_id: owner,
            },
            other_session: Recipient {
                session_id: SessionId::new(),
                user_id: UserId::new(),
            },
        }
    }

    fn label(owner: UserId, visible: bool) -> Label {
        Label::new(
            LabelId::new(),
            owner,
            UserName::new("alice").unwrap(),
            None,
            LabelName::new("Ally").unwrap(),
            visible,
        )
    }

    fn views_for(deliveries: &[Delivery<Label>], session: SessionId) -> Vec<&View<Label>> {
        deliveries
            .iter()
            .filter(|d| d.session_id == session)
            .map(|d| &d.view)
            .collect()
    }

    #[test]
    fn hidden_creation_reaches_only_the_owner() {
        let room = room();
        let hidden = label(room.owner, false);
        let deliveries = on_created(&hidden, &[room.owner_session, room.other_session]);

        assert_eq!(
            views_for(&deliveries, room.owner_session.session_id),
            vec![&View::OwnerView(hidden.clone())]
        );
        assert!(views_for(&deliveries, room.other_session.session_id).is_empty());
    }

    #[test]
    fn visible_creation_appears_for_everyone() {
        let room = room();
        let shown = label(room.owner, true);
        let deliveries = on_created(&shown, &[room.owner_session, room.other_session]);

        assert_eq!(
            views_for(&deliveries, room.other_session.session_id),
            vec![&View::PublicAppear(shown.clone())]
        );
    }

    #[test]
    fn becoming_visible_appears_and_becoming_hidden_disappears() {
        let room = room();
        let recipients = [room.owner_session, room.other_session];

        let shown = label(room.owner, true);
        let deliveries = on_visibility_changed(&shown, false, &recipients);
        assert_eq!(
            views_for(&deliveries, room.other_session.session_id),
            vec![&View::PublicAppear(shown.clone())]
        );
        assert_eq!(
            views_for(&deliveries, room.owner_session.session_id),
            vec![&View::OwnerView(shown.clone())]
        );

        let mut hidden = shown.clone();
        hidden.set_visible(false);
        let deliveries = on_visibility_changed(&hidden, true, &recipients);
        assert_eq!(
            views_for(&deliveries, room.other_session.session_id),
            vec![&View::PublicDisappear(hidden.id())]
        );
    }

    #[test]
    fn unchanged_visibility_is_silent_for_non_owners() {
        let room = room();
        let shown = label(room.owner, true);
        let deliveries =
            on_visibility_changed(&shown, true, &[room.owner_session, room.other_session]);

        assert!(views_for(&deliveries, room.other_session.session_id).is_empty());
        assert_eq!(views_for(&deliveries, room.owner_session.session_id).len(), 1);
    }

    #[test]
    fn deleting_hidden_object_only_informs_the_owner() {
        let room = room();
        let recipients = [room.owner_session, room.other_session];

        let hidden = label(room.owner, false);
        let deliveries = on_deleted(&hidden, &recipients);
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].session_id, room.owner_session.session_id);

        let shown = label(room.owner, true);
        let deliveries = on_deleted(&shown, &recipients);
        assert_eq!(
            views_for(&deliveries, room.other_session.session_id),
            vec![&View::PublicDisappear(shown.id())]
        );
    }

    #[test]
    fn owner_only_ignores_visibility() {
        let room = room();
        let shown = label(room.owner, true);
        let deliveries = on_owner_only(&shown, &[room.owner_session, room.other_session]);
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].session_id, room.owner_session.session_id);
    }
}
