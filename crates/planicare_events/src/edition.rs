// --- File: crates/planicare_events/src/edition.rs ---
//! Edition payload builder.
//!
//! Translates an update intent into a field-level [`EventPatch`]. Single
//! edits, series propagation and the absence cascade all go through
//! this one builder so the set/unset rules cannot drift apart.

use planicare_common::{
    Event, EventKind, EventPatch, EventUpdatePayload, Frequency, Patch, Repetition,
};

/// Whether a direct edit must detach the occurrence from its series.
///
/// Any main-field change (worker, sector, subscription, either date,
/// cancellation state, internal-hour kind, address) detaches; an edit that
/// only touches the misc note keeps the occurrence attached.
pub fn should_detach(event: &Event, payload: &EventUpdatePayload) -> bool {
    event.repetition.frequency.is_repeating() && main_fields_changed(event, payload)
}

fn main_fields_changed(event: &Event, payload: &EventUpdatePayload) -> bool {
    let worker_changed = payload.worker != event.worker;
    let sector_changed = payload.sector.is_some() && payload.sector != event.sector;
    let subscription_changed =
        payload.subscription.is_some() && payload.subscription != event.kind.subscription();
    let dates_changed =
        payload.start_date != event.start_date || payload.end_date != event.end_date;
    let cancel_changed = payload.is_cancelled != event.is_cancelled;
    let internal_hour_changed = match (&payload.internal_hour_kind, &event.kind) {
        (Some(new_kind), EventKind::InternalHour { kind }) => new_kind != kind,
        (Some(_), _) => false,
        (None, _) => false,
    };
    let address_changed = match payload.address.as_deref() {
        None => false,
        Some(address) if address.trim().is_empty() => event.address.is_some(),
        Some(address) => event.address.as_deref() != Some(address),
    };

    worker_changed
        || sector_changed
        || subscription_changed
        || dates_changed
        || cancel_changed
        || internal_hour_changed
        || address_changed
}

/// Builds the patch for one occurrence.
///
/// Unset rules: no worker given clears the worker, a given worker clears the
/// sector, un-cancelling clears the stored cancellation, an empty address
/// clears the address. `detach` additionally drops the occurrence out of its
/// series (`frequency = NEVER`, parent pointer kept).
pub fn build_edition_patch(
    event: &Event,
    payload: &EventUpdatePayload,
    detach: bool,
) -> EventPatch {
    let (worker, sector) = match payload.worker {
        Some(worker) => (Patch::Set(worker), Patch::Unset),
        None => (
            Patch::Unset,
            payload.sector.map(Patch::Set).unwrap_or(Patch::Keep),
        ),
    };

    let cancellation = if payload.is_cancelled {
        match &payload.cancellation {
            Some(cancellation) => Patch::Set(cancellation.clone()),
            None => Patch::Keep,
        }
    } else if event.is_cancelled {
        Patch::Unset
    } else {
        Patch::Keep
    };

    let address = match payload.address.as_deref() {
        None => Patch::Keep,
        Some(value) if value.trim().is_empty() => Patch::Unset,
        Some(value) => Patch::Set(value.to_string()),
    };

    let repetition = (detach && event.repetition.frequency.is_repeating()).then(|| Repetition {
        frequency: Frequency::Never,
        parent_id: event.repetition.parent_id,
    });

    EventPatch {
        start_date: Some(payload.start_date),
        end_date: Some(payload.end_date),
        worker,
        sector,
        subscription: payload.subscription,
        internal_hour_kind: payload.internal_hour_kind.clone(),
        misc: payload.misc.clone().map(Patch::Set).unwrap_or(Patch::Keep),
        address,
        cancellation,
        repetition,
    }
}

/// Update intent that unassigns an event, preserving everything else.
/// Used by the absence cascade to hand interventions back to their sector.
pub fn unassign_payload(event: &Event, sector: Option<uuid::Uuid>) -> EventUpdatePayload {
    EventUpdatePayload {
        start_date: event.start_date,
        end_date: event.end_date,
        worker: None,
        sector,
        subscription: None,
        internal_hour_kind: None,
        misc: event.misc.clone(),
        address: event.address.clone(),
        is_cancelled: event.is_cancelled,
        cancellation: event.cancellation.clone(),
        should_update_repetition: false,
    }
}
