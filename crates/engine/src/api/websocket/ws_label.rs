//! Label events.
//!
//! Every handler persists first and fans out second. Nothing is fanned out
//! when the operation is rejected, and the originating session never receives
//! an echo of its own event. Add, delete and visibility events hold the
//! label's lock across both steps.

use super::*;

use crate::api::connections::Recipient;
use crate::api::websocket::error_sanitizer::sanitize_repo_error;
use crate::use_cases::label::{LabelError, NewLabel};
use crate::use_cases::visibility::{self, Delivery, View};
use tabletop_domain::{Label, LabelSelection};
use tabletop_shared::LabelData;

const LABEL_ADD: &str = "Label.Add";
const LABEL_DELETE: &str = "Label.Delete";
const LABEL_VISIBILITY_SET: &str = "Label.Visibility.Set";
const FILTER_ADD: &str = "Labels.Filter.Add";
const FILTER_REMOVE: &str = "Labels.Filter.Remove";

pub(super) async fn handle_label_add(
    app: &App,
    session_id: SessionId,
    data: LabelData,
) -> Option<ServerMessage> {
    let session = bound_session(app, session_id, LABEL_ADD).await?;
    let input = NewLabel {
        id: LabelId::from_uuid(data.id),
        owner: data.owner,
        category: data.category,
        name: data.name,
        visible: data.visible,
    };

    let _guard = app.label_locks.lock(input.id).await;
    let label = match app.use_cases.label.add.execute(&session.user, input).await {
        Ok(label) => label,
        Err(e) => return reject(&session, LABEL_ADD, e, "add label"),
    };

    let recipients = others_in_room(app, &session).await;
    let deliveries = render(visibility::on_created(&label, &recipients), &label, label_added);
    app.fanout.deliver(LABEL_ADD, deliveries).await;
    None
}

pub(super) async fn handle_label_delete(
    app: &App,
    session_id: SessionId,
    id: LabelId,
) -> Option<ServerMessage> {
    let session = bound_session(app, session_id, LABEL_DELETE).await?;

    let _guard = app.label_locks.lock(id).await;
    let label = match app.use_cases.label.delete.execute(&session.user, id).await {
        Ok(label) => label,
        Err(e) => return reject(&session, LABEL_DELETE, e, "delete label"),
    };

    let recipients = others_in_room(app, &session).await;
    let deliveries = render(visibility::on_deleted(&label, &recipients), &label, label_deleted);
    app.fanout.deliver(LABEL_DELETE, deliveries).await;
    None
}

pub(super) async fn handle_label_visibility(
    app: &App,
    session_id: SessionId,
    id: LabelId,
    visible: bool,
) -> Option<ServerMessage> {
    let session = bound_session(app, session_id, LABEL_VISIBILITY_SET).await?;

    let _guard = app.label_locks.lock(id).await;
    let change = match app
        .use_cases
        .label
        .set_visibility
        .execute(&session.user, id, visible)
        .await
    {
        Ok(change) => change,
        Err(e) => return reject(&session, LABEL_VISIBILITY_SET, e, "set label visibility"),
    };

    let recipients = others_in_room(app, &session).await;
    let views =
        visibility::on_visibility_changed(&change.label, change.previously_visible, &recipients);
    let deliveries = render(views, &change.label, visibility_set);
    app.fanout.deliver(LABEL_VISIBILITY_SET, deliveries).await;
    None
}

pub(super) async fn handle_filter_add(
    app: &App,
    session_id: SessionId,
    id: LabelId,
) -> Option<ServerMessage> {
    let session = bound_session(app, session_id, FILTER_ADD).await?;

    let selection = match app
        .use_cases
        .label
        .add_filter
        .execute(&session.user, session.room_id(), id)
        .await
    {
        Ok(selection) => selection,
        Err(e) => return reject(&session, FILTER_ADD, e, "add label filter"),
    };

    let message = ServerMessage::LabelFilterAdd(selection.label_id.to_uuid());
    echo_to_owner(app, &session, &selection, FILTER_ADD, message).await;
    None
}

pub(super) async fn handle_filter_remove(
    app: &App,
    session_id: SessionId,
    id: LabelId,
) -> Option<ServerMessage> {
    let session = bound_session(app, session_id, FILTER_REMOVE).await?;

    let selection = match app
        .use_cases
        .label
        .remove_filter
        .execute(&session.user, session.room_id(), id)
        .await
    {
        Ok(selection) => selection,
        Err(e) => return reject(&session, FILTER_REMOVE, e, "remove label filter"),
    };

    let message = ServerMessage::LabelFilterRemove(selection.label_id.to_uuid());
    echo_to_owner(app, &session, &selection, FILTER_REMOVE, message).await;
    None
}

// =============================================================================
// Helpers
// =============================================================================

async fn others_in_room(app: &App, session: &SessionInfo) -> Vec<Recipient> {
    app.sessions
        .recipients_in(session.room_id(), Some(session.session_id), None)
        .await
}

async fn echo_to_owner(
    app: &App,
    session: &SessionInfo,
    selection: &LabelSelection,
    event: &'static str,
    message: ServerMessage,
) {
    let recipients = others_in_room(app, session).await;
    let deliveries = visibility::on_owner_only(selection, &recipients)
        .into_iter()
        .map(|delivery| (delivery.session_id, message.clone()))
        .collect();
    app.fanout.deliver(event, deliveries).await;
}

/// Turn resolved views into wire messages. Owners get `owner_view`; everyone
/// else gets an add or a delete.
fn render(
    deliveries: Vec<Delivery<Label>>,
    label: &Label,
    owner_view: fn(&Label) -> ServerMessage,
) -> Vec<(SessionId, ServerMessage)> {
    deliveries
        .into_iter()
        .map(|delivery| {
            let message = match delivery.view {
                View::OwnerView(label) => owner_view(&label),
                View::PublicAppear(label) => label_added(&label),
                View::PublicDisappear(id) => ServerMessage::LabelDelete {
                    owner: label.owner_name().to_string(),
                    id: id.to_uuid(),
                },
            };
            (delivery.session_id, message)
        })
        .collect()
}

fn label_data(label: &Label) -> LabelData {
    LabelData {
        id: label.id().to_uuid(),
        owner: label.owner_name().to_string(),
        category: label.category().map(|c| c.to_string()),
        name: label.name().to_string(),
        visible: label.visible(),
    }
}

fn label_added(label: &Label) -> ServerMessage {
    ServerMessage::LabelAdd(label_data(label))
}

fn label_deleted(label: &Label) -> ServerMessage {
    ServerMessage::LabelDelete {
        owner: label.owner_name().to_string(),
        id: label.id().to_uuid(),
    }
}

fn visibility_set(label: &Label) -> ServerMessage {
    ServerMessage::LabelVisibilitySet {
        owner: label.owner_name().to_string(),
        id: label.id().to_uuid(),
        visible: label.visible(),
    }
}

/// Map a rejected label operation to the reply for the originating session.
///
/// Only malformed input and storage failures are reported back. Attempts on
/// labels the sender may not touch are logged and dropped silently.
fn reject(
    session: &SessionInfo,
    event: &'static str,
    error: LabelError,
    operation: &str,
) -> Option<ServerMessage> {
    match error {
        LabelError::Validation(e) => Some(ServerMessage::Error {
            code: codes::INVALID_REQUEST.to_string(),
            message: e.to_string(),
        }),
        LabelError::Repo(e) => Some(ServerMessage::Error {
            code: codes::INTERNAL_ERROR.to_string(),
            message: sanitize_repo_error(&e, operation),
        }),
        e => {
            tracing::warn!(
                session_id = %session.session_id,
                user = %session.user.name(),
                event,
                authorization = e.is_authorization_violation(),
                error = %e,
                "Label event rejected"
            );
            None
        }
    }
}
