#[cfg(test)]
mod tests {
    use crate::models::*;
    use crate::services::EventQuery;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn unavailability(company_id: Uuid, worker: Uuid) -> Event {
        Event {
            id: Uuid::new_v4(),
            company_id,
            kind: EventKind::Unavailability,
            start_date: Utc.with_ymd_and_hms(2025, 5, 5, 9, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 5, 5, 11, 0, 0).unwrap(),
            worker: Some(worker),
            sector: None,
            misc: None,
            address: None,
            is_cancelled: false,
            cancellation: None,
            is_billed: false,
            repetition: Repetition::none(),
        }
    }

    #[test]
    fn query_filters_company_worker_and_type() {
        let company_id = Uuid::new_v4();
        let worker = Uuid::new_v4();
        let event = unavailability(company_id, worker);

        assert!(EventQuery::company(company_id).for_worker(worker).matches(&event));
        assert!(!EventQuery::company(Uuid::new_v4()).matches(&event));
        assert!(!EventQuery::company(company_id).for_worker(Uuid::new_v4()).matches(&event));
        assert!(!EventQuery::company(company_id)
            .of_types([EventType::Intervention])
            .matches(&event));
    }

    #[test]
    fn query_interval_is_half_open() {
        let company_id = Uuid::new_v4();
        let worker = Uuid::new_v4();
        let event = unavailability(company_id, worker);

        let nine = Utc.with_ymd_and_hms(2025, 5, 5, 9, 0, 0).unwrap();
        let eleven = Utc.with_ymd_and_hms(2025, 5, 5, 11, 0, 0).unwrap();
        let noon = Utc.with_ymd_and_hms(2025, 5, 5, 12, 0, 0).unwrap();

        // Overlapping window matches; a window starting exactly at the
        // event's end does not.
        assert!(EventQuery::company(company_id).intersecting(nine, eleven).matches(&event));
        assert!(!EventQuery::company(company_id).intersecting(eleven, noon).matches(&event));
    }

    #[test]
    fn query_skips_cancelled_unless_asked() {
        let company_id = Uuid::new_v4();
        let mut event = unavailability(company_id, Uuid::new_v4());
        event.is_cancelled = true;

        assert!(!EventQuery::company(company_id).matches(&event));
        assert!(EventQuery::company(company_id).with_cancelled().matches(&event));
    }

    #[test]
    fn query_excludes_the_candidate_itself() {
        let company_id = Uuid::new_v4();
        let event = unavailability(company_id, Uuid::new_v4());

        assert!(!EventQuery::company(company_id).excluding(event.id).matches(&event));
    }

    #[test]
    fn query_series_selection() {
        let company_id = Uuid::new_v4();
        let parent_id = Uuid::new_v4();
        let mut event = unavailability(company_id, Uuid::new_v4());
        event.repetition =
            Repetition { frequency: Frequency::EveryWeek, parent_id: Some(parent_id) };

        assert!(EventQuery::company(company_id).in_series(parent_id).matches(&event));
        assert!(!EventQuery::company(company_id).in_series(Uuid::new_v4()).matches(&event));
        assert!(!EventQuery::company(company_id)
            .in_series(parent_id)
            .starting_at_or_after(event.start_date + chrono::Duration::days(1))
            .matches(&event));
    }
}
