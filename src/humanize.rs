use crate::locale::{Locale, Unit};
use chrono::{DateTime, Datelike, FixedOffset, Months, Utc};

/// What a date library prints for an instant it could not parse.
pub const INVALID_DATE: &str = "Invalid Date";

#[derive(Debug, Clone, Copy)]
enum Measure {
    Seconds,
    Minutes,
    Hours,
    Days,
    Months,
    Years,
}

struct Threshold {
    unit: Unit,
    // largest rounded amount still rendered with this unit, None for the last bucket
    limit: Option<i64>,
    // None keeps measuring in the previous bucket's measure
    measure: Option<Measure>,
}

const fn th(unit: Unit, limit: Option<i64>, measure: Option<Measure>) -> Threshold {
    Threshold {
        unit,
        limit,
        measure,
    }
}

static THRESHOLDS: [Threshold; 11] = [
    th(Unit::Seconds, Some(44), Some(Measure::Seconds)),
    th(Unit::Minute, Some(89), None),
    th(Unit::Minutes, Some(44), Some(Measure::Minutes)),
    th(Unit::Hour, Some(89), None),
    th(Unit::Hours, Some(21), Some(Measure::Hours)),
    th(Unit::Day, Some(35), None),
    th(Unit::Days, Some(25), Some(Measure::Days)),
    th(Unit::Month, Some(45), None),
    th(Unit::Months, Some(10), Some(Measure::Months)),
    th(Unit::Year, Some(17), None),
    th(Unit::Years, None, Some(Measure::Years)),
];

/// Visible text and tooltip computed for one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub text: String,
    pub title: String,
}

/// Locale-aware renderer for relative and absolute times.
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    pub locale: Locale,
    /// Zone absolute times are shown in.
    pub zone: FixedOffset,
}

impl Formatter {
    pub fn new(locale: Locale, zone: FixedOffset) -> Formatter {
        Formatter { locale, zone }
    }

    /// Distance of `instant` from `now`, e.g. "5 minutes ago" or "in a day".
    pub fn relative(&self, instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let future = instant > now;
        let (earlier, later) = if future { (now, instant) } else { (instant, now) };

        let ms = (later - earlier).num_milliseconds() as f64;
        let mut months = None;
        let mut amount = 0;
        let mut unit = Unit::Seconds;
        for (i, t) in THRESHOLDS.iter().enumerate() {
            if let Some(m) = t.measure {
                let v = match m {
                    Measure::Seconds => ms / 1_000.0,
                    Measure::Minutes => ms / 60_000.0,
                    Measure::Hours => ms / 3_600_000.0,
                    Measure::Days => ms / 86_400_000.0,
                    Measure::Months => *months.get_or_insert_with(|| month_diff(earlier, later)),
                    Measure::Years => *months.get_or_insert_with(|| month_diff(earlier, later)) / 12.0,
                };
                amount = v.round() as i64;
            }
            if t.limit.map_or(true, |limit| amount <= limit) {
                // "1 minutes" reads as the singular bucket before it
                unit = if amount <= 1 && i > 0 {
                    THRESHOLDS[i - 1].unit
                } else {
                    t.unit
                };
                break;
            }
        }

        let phrase = self.locale.unit(unit, amount);
        if future {
            self.locale.future(&phrase)
        } else {
            self.locale.past(&phrase)
        }
    }

    /// Long localized rendering of `instant` in the formatter's zone.
    pub fn format(&self, instant: DateTime<Utc>) -> String {
        self.locale.long_datetime(&instant.with_timezone(&self.zone))
    }

    /// Text and tooltip for an element; unparseable instants render as
    /// [`INVALID_DATE`] in both places.
    pub fn stamp(&self, instant: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Stamp {
        match instant {
            Some(t) => Stamp {
                text: self.relative(t, now),
                title: self.format(t),
            },
            None => Stamp {
                text: INVALID_DATE.to_string(),
                title: INVALID_DATE.to_string(),
            },
        }
    }
}

fn add_months(t: DateTime<Utc>, n: i32) -> Option<DateTime<Utc>> {
    if n >= 0 {
        t.checked_add_months(Months::new(n as u32))
    } else {
        t.checked_sub_months(Months::new(n.unsigned_abs()))
    }
}

/// Calendar months from `a` to `b`, counted from `a`'s day of month, with
/// the remainder as a fraction of the month it falls into. Negative when
/// `b` is before `a`.
fn anchored_months(a: DateTime<Utc>, b: DateTime<Utc>) -> Option<f64> {
    let whole = (b.year() - a.year()) * 12 + b.month() as i32 - a.month() as i32;
    let anchor = add_months(a, whole)?;
    let next = add_months(a, if b < anchor { whole - 1 } else { whole + 1 })?;
    let span = (next - anchor).num_milliseconds().abs() as f64;
    Some(whole as f64 + (b - anchor).num_milliseconds() as f64 / span)
}

/// Months from `from` to `to` (`from <= to`). The count is anchored on
/// whichever instant has the later day of month.
fn month_diff(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let months = if from.day() < to.day() {
        anchored_months(to, from).map(|m| -m)
    } else {
        anchored_months(from, to)
    };
    months.unwrap_or_else(|| (to - from).num_milliseconds() as f64 / (30.4375 * 86_400_000.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn en() -> Formatter {
        Formatter::new(Locale::En, FixedOffset::east_opt(0).unwrap())
    }

    fn ago(f: &Formatter, d: Duration) -> String {
        let now = utc("2024-06-15T12:00:00Z");
        f.relative(now - d, now)
    }

    #[test]
    fn five_minutes_ago() {
        let f = en();
        assert_eq!(
            f.relative(utc("2024-01-01T00:00:00Z"), utc("2024-01-01T00:05:00Z")),
            "5 minutes ago"
        );
        assert_eq!(f.format(utc("2024-01-01T00:00:00Z")), "January 1, 2024 12:00 AM");
    }

    #[test]
    fn seconds_and_minutes_buckets() {
        let f = en();
        assert_eq!(ago(&f, Duration::seconds(0)), "a few seconds ago");
        assert_eq!(ago(&f, Duration::seconds(44)), "a few seconds ago");
        assert_eq!(ago(&f, Duration::seconds(45)), "a minute ago");
        assert_eq!(ago(&f, Duration::seconds(89)), "a minute ago");
        assert_eq!(ago(&f, Duration::seconds(90)), "2 minutes ago");
        assert_eq!(ago(&f, Duration::minutes(44)), "44 minutes ago");
        assert_eq!(ago(&f, Duration::minutes(45)), "an hour ago");
        assert_eq!(ago(&f, Duration::minutes(89)), "an hour ago");
        assert_eq!(ago(&f, Duration::minutes(90)), "2 hours ago");
    }

    #[test]
    fn hours_days_months_years() {
        let f = en();
        assert_eq!(ago(&f, Duration::hours(21)), "21 hours ago");
        assert_eq!(ago(&f, Duration::hours(22)), "a day ago");
        assert_eq!(ago(&f, Duration::hours(35)), "a day ago");
        assert_eq!(ago(&f, Duration::hours(36)), "2 days ago");
        assert_eq!(ago(&f, Duration::days(25)), "25 days ago");
        assert_eq!(ago(&f, Duration::days(26)), "a month ago");
        assert_eq!(ago(&f, Duration::days(45)), "a month ago");
        assert_eq!(ago(&f, Duration::days(46)), "2 months ago");
        assert_eq!(ago(&f, Duration::days(200)), "7 months ago");
        assert_eq!(ago(&f, Duration::days(365)), "a year ago");
        assert_eq!(ago(&f, Duration::days(3 * 365)), "3 years ago");
    }

    #[test]
    fn future_instants() {
        let f = en();
        let now = utc("2024-06-15T12:00:00Z");
        assert_eq!(f.relative(now + Duration::minutes(10), now), "in 10 minutes");
        assert_eq!(f.relative(now + Duration::seconds(5), now), "in a few seconds");
    }

    #[test]
    fn localized_phrases() {
        let zone = FixedOffset::east_opt(0).unwrap();
        let pt = Formatter::new(Locale::PtBr, zone);
        let es = Formatter::new(Locale::Es, zone);
        assert_eq!(ago(&pt, Duration::minutes(5)), "há 5 minutos");
        assert_eq!(ago(&es, Duration::hours(3)), "hace 3 horas");
    }

    #[test]
    fn formats_in_display_zone() {
        let f = Formatter::new(Locale::PtBr, FixedOffset::west_opt(3 * 3600).unwrap());
        assert_eq!(f.format(utc("2024-01-01T00:00:00Z")), "31 de dezembro de 2023 às 21:00");
    }

    #[test]
    fn invalid_instant_stamp() {
        let s = en().stamp(None, utc("2024-01-01T00:00:00Z"));
        assert_eq!(s.text, INVALID_DATE);
        assert_eq!(s.title, INVALID_DATE);
    }

    #[test]
    fn month_diff_is_calendar_based() {
        let d = month_diff(utc("2024-01-15T00:00:00Z"), utc("2024-03-15T00:00:00Z"));
        assert!((d - 2.0).abs() < 1e-9);
        let d = month_diff(utc("2024-01-31T00:00:00Z"), utc("2024-02-01T00:00:00Z"));
        assert!(d > 0.0 && d < 0.1);
    }

    #[test]
    fn month_diff_anchors_on_later_day_of_month() {
        // counted back from Feb 20 the remainder falls in a 31-day month
        let d = month_diff(utc("2023-01-05T00:00:00Z"), utc("2023-02-20T00:00:00Z"));
        assert!((d - (1.0 + 15.0 / 31.0)).abs() < 1e-9);
        assert_eq!(
            en().relative(utc("2023-01-05T00:00:00Z"), utc("2023-02-20T00:00:00Z")),
            "a month ago"
        );
    }
}
