#[cfg(test)]
mod tests {
    use crate::models::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn intervention() -> Event {
        Event {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            kind: EventKind::Intervention {
                customer: Uuid::new_v4(),
                subscription: Uuid::new_v4(),
            },
            start_date: Utc.with_ymd_and_hms(2025, 5, 5, 9, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 5, 5, 11, 0, 0).unwrap(),
            worker: Some(Uuid::new_v4()),
            sector: None,
            misc: None,
            address: None,
            is_cancelled: false,
            cancellation: None,
            is_billed: false,
            repetition: Repetition { frequency: Frequency::EveryWeek, parent_id: Some(Uuid::new_v4()) },
        }
    }

    #[test]
    fn event_serializes_with_stable_wire_names() {
        let event = intervention();
        let json = serde_json::to_value(&event).expect("event should serialize");

        // The persisted field names and enum values are a compatibility
        // contract with existing stored data.
        assert_eq!(json["type"], "INTERVENTION");
        assert!(json.get("startDate").is_some(), "startDate must be camelCase");
        assert!(json.get("companyId").is_some());
        assert_eq!(json["repetition"]["frequency"], "EVERY_WEEK");
        assert!(json["repetition"].get("parentId").is_some());
        assert_eq!(json["isCancelled"], false);
        assert_eq!(json["isBilled"], false);
    }

    #[test]
    fn frequency_wire_values_are_stable() {
        for (frequency, expected) in [
            (Frequency::Never, "\"NEVER\""),
            (Frequency::EveryDay, "\"EVERY_DAY\""),
            (Frequency::EveryWeekDay, "\"EVERY_WEEK_DAY\""),
            (Frequency::EveryWeek, "\"EVERY_WEEK\""),
            (Frequency::EveryTwoWeeks, "\"EVERY_TWO_WEEKS\""),
        ] {
            assert_eq!(serde_json::to_string(&frequency).unwrap(), expected);
        }
    }

    #[test]
    fn kind_round_trips_through_the_type_tag() {
        let kind = EventKind::Absence { absence_type: "paid_leave".to_string() };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "ABSENCE");
        assert_eq!(json["absenceType"], "paid_leave");

        let parsed: EventKind = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, kind);
    }

    #[test]
    fn patch_sets_and_unsets_fields() {
        let mut event = intervention();
        let sector = Uuid::new_v4();

        let parent_id = event.repetition.parent_id;
        let patch = EventPatch {
            worker: Patch::Unset,
            sector: Patch::Set(sector),
            repetition: Some(Repetition { frequency: Frequency::Never, parent_id }),
            ..Default::default()
        };
        patch.apply(&mut event);

        assert_eq!(event.worker, None);
        assert_eq!(event.sector, Some(sector));
        assert_eq!(event.repetition.frequency, Frequency::Never);
        // Detaching keeps the parent pointer; only the frequency drops.
        assert!(event.repetition.parent_id.is_some());
    }

    #[test]
    fn patch_cancellation_set_and_clear() {
        let mut event = intervention();
        let cancellation = Cancellation {
            condition: "invoiced_and_not_paid".to_string(),
            reason: "customer_initiative".to_string(),
        };

        EventPatch { cancellation: Patch::Set(cancellation.clone()), ..Default::default() }
            .apply(&mut event);
        assert!(event.is_cancelled);
        assert_eq!(event.cancellation, Some(cancellation));

        EventPatch { cancellation: Patch::Unset, ..Default::default() }.apply(&mut event);
        assert!(!event.is_cancelled);
        assert_eq!(event.cancellation, None);
    }

    #[test]
    fn patch_kind_fields_only_touch_the_matching_variant() {
        let mut event = intervention();
        let subscription = Uuid::new_v4();
        EventPatch {
            subscription: Some(subscription),
            internal_hour_kind: Some("planning".to_string()),
            ..Default::default()
        }
        .apply(&mut event);

        assert_eq!(event.kind.subscription(), Some(subscription));

        let mut unavailability = intervention();
        unavailability.kind = EventKind::Unavailability;
        EventPatch { subscription: Some(subscription), ..Default::default() }
            .apply(&mut unavailability);
        assert_eq!(unavailability.kind, EventKind::Unavailability);
    }

    #[test]
    fn repetition_validity() {
        assert!(!Repetition::none().is_valid());
        assert!(!Repetition { frequency: Frequency::EveryDay, parent_id: None }.is_valid());
        assert!(Repetition { frequency: Frequency::EveryDay, parent_id: Some(Uuid::new_v4()) }
            .is_valid());
    }
}
