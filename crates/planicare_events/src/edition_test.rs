#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use planicare_common::{
        Cancellation, Event, EventKind, Frequency, Patch, Repetition,
    };
    use uuid::Uuid;

    use crate::edition::{build_edition_patch, should_detach};
    use crate::support::identity_update;

    fn series_event() -> Event {
        let id = Uuid::new_v4();
        Event {
            id,
            company_id: Uuid::new_v4(),
            kind: EventKind::Intervention {
                customer: Uuid::new_v4(),
                subscription: Uuid::new_v4(),
            },
            start_date: Utc.with_ymd_and_hms(2025, 5, 5, 9, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 5, 5, 11, 0, 0).unwrap(),
            worker: Some(Uuid::new_v4()),
            sector: None,
            misc: Some("weekly visit".to_string()),
            address: Some("12 rue des Lilas".to_string()),
            is_cancelled: false,
            cancellation: None,
            is_billed: false,
            repetition: Repetition { frequency: Frequency::EveryWeek, parent_id: Some(id) },
        }
    }

    #[test]
    fn misc_only_edit_stays_attached() {
        let event = series_event();
        let mut payload = identity_update(&event);
        payload.misc = Some("changed note".to_string());

        assert!(!should_detach(&event, &payload));
        let patch = build_edition_patch(&event, &payload, false);
        assert_eq!(patch.misc, Patch::Set("changed note".to_string()));
        assert_eq!(patch.repetition, None);
    }

    #[test]
    fn main_field_edits_detach() {
        let event = series_event();

        let mut hours = identity_update(&event);
        hours.start_date = event.start_date + Duration::hours(1);
        hours.end_date = event.end_date + Duration::hours(1);
        assert!(should_detach(&event, &hours));

        let mut reassigned = identity_update(&event);
        reassigned.worker = Some(Uuid::new_v4());
        assert!(should_detach(&event, &reassigned));

        let mut cancelled = identity_update(&event);
        cancelled.is_cancelled = true;
        cancelled.cancellation = Some(Cancellation {
            condition: "invoiced_and_not_paid".to_string(),
            reason: "customer_initiative".to_string(),
        });
        assert!(should_detach(&event, &cancelled));

        // Out-of-series events have nothing to detach from.
        let mut loose = series_event();
        loose.repetition = Repetition::none();
        let mut edit = identity_update(&loose);
        edit.start_date = loose.start_date + Duration::hours(1);
        assert!(!should_detach(&loose, &edit));
    }

    #[test]
    fn detach_patch_keeps_the_parent_pointer() {
        let event = series_event();
        let mut payload = identity_update(&event);
        payload.start_date = event.start_date + Duration::hours(1);

        let patch = build_edition_patch(&event, &payload, true);
        let repetition = patch.repetition.expect("detach must rewrite the repetition");
        assert_eq!(repetition.frequency, Frequency::Never);
        assert_eq!(repetition.parent_id, event.repetition.parent_id);
    }

    #[test]
    fn worker_and_sector_clear_each_other() {
        let event = series_event();

        let assigned = identity_update(&event);
        let patch = build_edition_patch(&event, &assigned, false);
        assert!(matches!(patch.worker, Patch::Set(_)));
        assert_eq!(patch.sector, Patch::Unset);

        let mut unassigned = identity_update(&event);
        unassigned.worker = None;
        unassigned.sector = Some(Uuid::new_v4());
        let patch = build_edition_patch(&event, &unassigned, false);
        assert_eq!(patch.worker, Patch::Unset);
        assert!(matches!(patch.sector, Patch::Set(_)));
    }

    #[test]
    fn uncancelling_clears_the_stored_cancellation() {
        let mut event = series_event();
        event.is_cancelled = true;
        event.cancellation = Some(Cancellation {
            condition: "invoiced_and_paid".to_string(),
            reason: "auxiliary_initiative".to_string(),
        });

        let mut payload = identity_update(&event);
        payload.is_cancelled = false;
        payload.cancellation = None;
        let patch = build_edition_patch(&event, &payload, false);
        assert_eq!(patch.cancellation, Patch::Unset);
    }

    #[test]
    fn empty_address_clears_the_address() {
        let event = series_event();
        let mut payload = identity_update(&event);
        payload.address = Some("  ".to_string());

        let patch = build_edition_patch(&event, &payload, false);
        assert_eq!(patch.address, Patch::Unset);
        // And an empty address on an event that had one is a main-field
        // change, so it also detaches.
        assert!(should_detach(&event, &payload));
    }
}
