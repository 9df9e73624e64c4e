//! Matching recurring calendar events against the reminder clock.

use crate::models::{DueReminder, Event, Recurrence};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

pub fn occurs_on(event: &Event, date: NaiveDate) -> bool {
    if date < event.date {
        return false;
    }
    if event.end_date.is_some_and(|end| date > end) {
        return false;
    }
    match event.recurrence {
        Recurrence::None => date == event.date,
        Recurrence::Daily => true,
        Recurrence::Weekly => date.weekday() == event.date.weekday(),
        // Months without that day are skipped rather than clamped.
        Recurrence::Monthly => date.day() == event.date.day(),
    }
}

fn start_time(event: &Event) -> Option<NaiveTime> {
    let time = event.time.as_deref()?;
    NaiveTime::parse_from_str(time, "%H:%M").ok()
}

/// Reminders whose fire time falls in `(now - window, now]`.
pub fn due_reminders<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    now: NaiveDateTime,
    window_minutes: u32,
) -> Vec<DueReminder> {
    let window = Duration::minutes(i64::from(window_minutes));
    let mut due = Vec::new();

    for event in events {
        let (Some(time), Some(lead)) = (start_time(event), event.reminder_minutes) else {
            continue;
        };
        let lead = Duration::minutes(i64::from(lead));

        // Occurrences that could fire inside the window start between these two instants.
        let earliest = (now - window + lead).date();
        let latest = (now + lead).date();
        let mut date = earliest;
        while date <= latest {
            if occurs_on(event, date) {
                let occurs_at = date.and_time(time);
                let remind_at = occurs_at - lead;
                if remind_at > now - window && remind_at <= now {
                    due.push(DueReminder {
                        event_id: event.id.clone(),
                        title: event.title.clone(),
                        occurs_at,
                        remind_at,
                    });
                }
            }
            let Some(next) = date.succ_opt() else { break };
            date = next;
        }
    }

    due.sort_by(|a, b| a.remind_at.cmp(&b.remind_at));
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streak::parse_date_key;
    use chrono::Utc;

    fn event(date: &str, time: Option<&str>, recurrence: Recurrence, reminder: Option<u32>) -> Event {
        Event {
            id: "e1".to_string(),
            user_id: "u1".to_string(),
            title: "standup".to_string(),
            date: parse_date_key(date).unwrap(),
            time: time.map(str::to_string),
            recurrence,
            end_date: None,
            reminder_minutes: reminder,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn at(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn one_off_event_fires_once() {
        let e = event("2024-05-10", Some("09:00"), Recurrence::None, Some(15));
        assert_eq!(due_reminders([&e], at("2024-05-10 08:45"), 5).len(), 1);
        assert_eq!(due_reminders([&e], at("2024-05-10 08:49"), 5).len(), 1);
        assert!(due_reminders([&e], at("2024-05-10 08:50"), 5).is_empty());
        assert!(due_reminders([&e], at("2024-05-11 08:45"), 5).is_empty());
    }

    #[test]
    fn weekly_event_matches_same_weekday_only() {
        let e = event("2024-05-06", Some("10:00"), Recurrence::Weekly, Some(0));
        assert!(occurs_on(&e, parse_date_key("2024-05-13").unwrap()));
        assert!(!occurs_on(&e, parse_date_key("2024-05-14").unwrap()));
        assert!(!occurs_on(&e, parse_date_key("2024-04-29").unwrap()));
        assert_eq!(due_reminders([&e], at("2024-05-20 10:00"), 1).len(), 1);
    }

    #[test]
    fn monthly_event_skips_short_months() {
        let e = event("2024-01-31", Some("12:00"), Recurrence::Monthly, Some(30));
        assert!(!occurs_on(&e, parse_date_key("2024-02-29").unwrap()));
        assert!(occurs_on(&e, parse_date_key("2024-03-31").unwrap()));
    }

    #[test]
    fn reminder_lead_can_cross_midnight() {
        let e = event("2024-05-10", Some("00:10"), Recurrence::Daily, Some(20));
        let due = due_reminders([&e], at("2024-05-11 23:50"), 5);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].occurs_at, at("2024-05-12 00:10"));
    }

    #[test]
    fn end_date_and_missing_fields_suppress_reminders() {
        let mut e = event("2024-05-10", Some("09:00"), Recurrence::Daily, Some(0));
        e.end_date = parse_date_key("2024-05-12");
        assert!(due_reminders([&e], at("2024-05-13 09:00"), 5).is_empty());
        assert_eq!(due_reminders([&e], at("2024-05-12 09:00"), 5).len(), 1);

        let all_day = event("2024-05-10", None, Recurrence::Daily, Some(10));
        let silent = event("2024-05-10", Some("09:00"), Recurrence::Daily, None);
        assert!(due_reminders([&all_day, &silent], at("2024-05-10 08:50"), 60).is_empty());
    }
}
