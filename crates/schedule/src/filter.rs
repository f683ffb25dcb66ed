use crate::date::{normalize_date_time, CalendarDate};
use crate::event::{EventId, ScheduledEvent};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Where an event falls relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTiming {
    Past,
    Today,
    Upcoming,
    /// The event date could not be parsed.
    Invalid,
}

/// Computes calendar views over a flat event list.
///
/// Calendar days are taken in the filter's local offset. All selections are stable: events at
/// the same instant keep their input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleFilter {
    offset: FixedOffset,
}

impl Default for ScheduleFilter {
    fn default() -> Self {
        Self::utc()
    }
}

impl ScheduleFilter {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The local calendar day containing `now`.
    pub fn today(&self, now: DateTime<Utc>) -> CalendarDate {
        now.with_timezone(&self.offset).date_naive()
    }

    /// Local date-time of an event, or `None` if its date is malformed.
    pub fn local_time(&self, event: &ScheduledEvent) -> Option<NaiveDateTime> {
        normalize_date_time(&event.date, &self.offset)
    }

    /// Events paired with their parsed time, malformed ones dropped, in input order.
    fn dated<'a>(
        &self,
        events: &'a [ScheduledEvent],
    ) -> impl Iterator<Item = (NaiveDateTime, &'a ScheduledEvent)> + 'a {
        let offset = self.offset;
        events.iter().filter_map(move |event| {
            match normalize_date_time(&event.date, &offset) {
                Some(at) => Some((at, event)),
                None => {
                    tracing::debug!(event_id = %event.id, "skipping event with malformed date");
                    None
                }
            }
        })
    }

    /// Events on `day`, ordered by time of day.
    pub fn select_for_day<'a>(
        &self,
        events: &'a [ScheduledEvent],
        day: CalendarDate,
    ) -> Vec<&'a ScheduledEvent> {
        let mut selected: Vec<_> = self.dated(events).filter(|(at, _)| at.date() == day).collect();
        selected.sort_by_key(|(at, _)| *at);
        selected.into_iter().map(|(_, event)| event).collect()
    }

    /// The next `limit` events in chronological order.
    ///
    /// With `exclude_past`, events before the start of `today` are dropped; anything from
    /// midnight of `today` onward counts. Without it, past events are kept and sorted in.
    pub fn select_upcoming<'a>(
        &self,
        events: &'a [ScheduledEvent],
        today: CalendarDate,
        limit: usize,
        exclude_past: bool,
    ) -> Vec<&'a ScheduledEvent> {
        if limit == 0 {
            return Vec::new();
        }
        let start_of_today = today.and_time(NaiveTime::MIN);

        let mut selected: Vec<_> = self
            .dated(events)
            .filter(|(at, _)| !exclude_past || *at >= start_of_today)
            .collect();
        selected.sort_by_key(|(at, _)| *at);
        selected
            .into_iter()
            .take(limit)
            .map(|(_, event)| event)
            .collect()
    }

    pub fn has_event_on(&self, events: &[ScheduledEvent], day: CalendarDate) -> bool {
        self.dated(events).any(|(at, _)| at.date() == day)
    }

    pub fn classify(&self, event: &ScheduledEvent, today: CalendarDate) -> EventTiming {
        match self.local_time(event) {
            None => EventTiming::Invalid,
            Some(at) if at.date() < today => EventTiming::Past,
            Some(at) if at.date() == today => EventTiming::Today,
            Some(_) => EventTiming::Upcoming,
        }
    }

    /// Valid events grouped by local day, each day ordered by time.
    pub fn group_by_day<'a>(
        &self,
        events: &'a [ScheduledEvent],
    ) -> BTreeMap<CalendarDate, Vec<&'a ScheduledEvent>> {
        let mut dated: Vec<_> = self.dated(events).collect();
        dated.sort_by_key(|(at, _)| *at);

        let mut days: BTreeMap<CalendarDate, Vec<&'a ScheduledEvent>> = BTreeMap::new();
        for (at, event) in dated {
            days.entry(at.date()).or_default().push(event);
        }
        days
    }

    /// Days of the given month that have at least one event, for marking a month grid.
    pub fn days_with_events(
        &self,
        events: &[ScheduledEvent],
        year: i32,
        month: u32,
    ) -> BTreeSet<u32> {
        self.dated(events)
            .map(|(at, _)| at.date())
            .filter(|day| day.year() == year && day.month() == month)
            .map(|day| day.day())
            .collect()
    }
}

/// A copy of `events` with the completion flag of the event `id` flipped.
///
/// Events with no flag count as not completed. An unknown `id` returns the list unchanged.
pub fn toggle_completed(events: &[ScheduledEvent], id: &EventId) -> Vec<ScheduledEvent> {
    events
        .iter()
        .map(|event| {
            let mut event = event.clone();
            if &event.id == id {
                event.completed = Some(!event.is_completed());
            }
            event
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn day(y: i32, m: u32, d: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ev(id: i64, date: &str) -> ScheduledEvent {
        ScheduledEvent::new(id, format!("event {id}"), date)
    }

    fn ids(events: &[&ScheduledEvent]) -> Vec<EventId> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_upcoming_excludes_past_and_malformed() {
        let events = vec![ev(1, "2024-03-10"), ev(2, "2024-03-09"), ev(3, "invalid")];
        let filter = ScheduleFilter::utc();

        let upcoming = filter.select_upcoming(&events, day(2024, 3, 10), 10, true);
        assert_eq!(ids(&upcoming), vec![EventId::Number(1)]);
    }

    #[test]
    fn test_upcoming_keeps_past_when_asked() {
        let events = vec![ev(1, "2024-03-10"), ev(2, "2024-03-09"), ev(3, "invalid")];
        let filter = ScheduleFilter::utc();

        let all = filter.select_upcoming(&events, day(2024, 3, 10), 10, false);
        assert_eq!(ids(&all), vec![EventId::Number(2), EventId::Number(1)]);
    }

    #[test]
    fn test_upcoming_respects_limit_and_order() {
        let events = vec![
            ev(1, "2024-03-15T10:00"),
            ev(2, "2024-03-11T08:00"),
            ev(3, "2024-03-12"),
            ev(4, "2024-03-11T08:00"),
        ];
        let filter = ScheduleFilter::utc();

        let upcoming = filter.select_upcoming(&events, day(2024, 3, 10), 3, true);
        assert_eq!(
            ids(&upcoming),
            vec![EventId::Number(2), EventId::Number(4), EventId::Number(3)]
        );
        assert!(filter
            .select_upcoming(&events, day(2024, 3, 10), 0, true)
            .is_empty());
        assert!(filter.select_upcoming(&[], day(2024, 3, 10), 5, true).is_empty());
    }

    #[test]
    fn test_midnight_counts_as_today() {
        let events = vec![ev(1, "2024-03-10T00:00:00"), ev(2, "2024-03-09T23:59:59")];
        let filter = ScheduleFilter::utc();

        let upcoming = filter.select_upcoming(&events, day(2024, 3, 10), 5, true);
        assert_eq!(ids(&upcoming), vec![EventId::Number(1)]);
    }

    #[test]
    fn test_select_for_day_uses_calendar_day_and_time_order() {
        let events = vec![
            ev(1, "2024-03-10T23:59"),
            ev(2, "2024-03-11T00:01"),
            ev(3, "2024-03-10T08:15"),
            ev(4, "not a date"),
        ];
        let filter = ScheduleFilter::utc();

        let selected = filter.select_for_day(&events, day(2024, 3, 10));
        assert_eq!(ids(&selected), vec![EventId::Number(3), EventId::Number(1)]);
        assert!(filter.select_for_day(&[], day(2024, 3, 10)).is_empty());
    }

    #[test]
    fn test_local_offset_decides_the_day() {
        let events = vec![ev(1, "2024-03-11T01:30:00Z")];
        let brt = ScheduleFilter::new(FixedOffset::west_opt(3 * 3600).unwrap());

        assert!(brt.has_event_on(&events, day(2024, 3, 10)));
        assert!(!brt.has_event_on(&events, day(2024, 3, 11)));
        assert!(ScheduleFilter::utc().has_event_on(&events, day(2024, 3, 11)));

        let now = Utc.with_ymd_and_hms(2024, 3, 11, 2, 0, 0).unwrap();
        assert_eq!(brt.today(now), day(2024, 3, 10));
    }

    #[test]
    fn test_has_event_on_ignores_malformed() {
        let events = vec![ev(1, "2024-03-10xyz")];
        assert!(!ScheduleFilter::utc().has_event_on(&events, day(2024, 3, 10)));
    }

    #[test]
    fn test_classify() {
        let filter = ScheduleFilter::utc();
        let today = day(2024, 3, 10);

        assert_eq!(filter.classify(&ev(1, "2024-03-09T23:59"), today), EventTiming::Past);
        assert_eq!(filter.classify(&ev(2, "2024-03-10"), today), EventTiming::Today);
        assert_eq!(filter.classify(&ev(3, "2024-03-10T23:59"), today), EventTiming::Today);
        assert_eq!(filter.classify(&ev(4, "2024-03-11"), today), EventTiming::Upcoming);
        assert_eq!(filter.classify(&ev(5, "soon"), today), EventTiming::Invalid);
    }

    #[test]
    fn test_group_by_day_and_month_marks() {
        let events = vec![
            ev(1, "2024-03-12T15:00"),
            ev(2, "2024-03-10T09:00"),
            ev(3, "2024-03-12T08:00"),
            ev(4, "2024-04-01"),
            ev(5, "bad"),
        ];
        let filter = ScheduleFilter::utc();

        let groups = filter.group_by_day(&events);
        assert_eq!(groups.len(), 3);
        assert_eq!(
            ids(&groups[&day(2024, 3, 12)]),
            vec![EventId::Number(3), EventId::Number(1)]
        );

        let marks = filter.days_with_events(&events, 2024, 3);
        assert_eq!(marks.into_iter().collect::<Vec<_>>(), vec![10, 12]);
        assert!(filter.days_with_events(&events, 2023, 3).is_empty());
    }

    #[test]
    fn test_toggle_completed_returns_new_list() {
        let mut done = ev(2, "2024-03-10");
        done.completed = Some(true);
        let events = vec![ev(1, "2024-03-10"), done];

        let toggled = toggle_completed(&events, &EventId::Number(1));
        assert_eq!(toggled[0].completed, Some(true));
        assert_eq!(toggled[1].completed, Some(true));
        assert_eq!(events[0].completed, None);

        let toggled = toggle_completed(&toggled, &EventId::Number(2));
        assert_eq!(toggled[1].completed, Some(false));

        let unchanged = toggle_completed(&events, &EventId::from("1"));
        assert_eq!(unchanged, events);
    }
}
