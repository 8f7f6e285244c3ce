// src/services/hours.rs
// DOCUMENTATION: Opening-hours parsing
// PURPOSE: Turn provider weekday descriptions into a structured summary

use std::collections::HashMap;

use regex::Regex;

use crate::models::HoursSummary;

/// One open-close shift, hours as fractional 24h values.
/// Closes past midnight run past 24.0 (25.0 = 01:00 next day).
#[derive(Debug, Clone, Copy, PartialEq)]
struct Shift {
    open: f64,
    close: f64,
}

/// Parse whatever hours data a record carries into a summary.
/// DOCUMENTATION: Prefers the weekday descriptions; falls back to the
/// structured closing-times/days-open form; yields the unknown sentinel
/// when neither parses. Scoring never fails on hours.
pub fn parse_hours(
    opening_hours: Option<&[String]>,
    closing_times: Option<&HashMap<String, String>>,
    days_open: Option<&[u8]>,
) -> HoursSummary {
    if let Some(descriptions) = opening_hours {
        if let Some(summary) = parse_weekday_descriptions(descriptions) {
            return summary;
        }
    }
    if closing_times.is_some() || days_open.is_some() {
        if let Some(summary) = parse_structured(closing_times, days_open) {
            return summary;
        }
    }
    HoursSummary::unknown()
}

fn day_index(prefix: &str) -> Option<usize> {
    // 0=Sunday .. 6=Saturday
    match prefix.trim().to_lowercase().as_str() {
        "sunday" => Some(0),
        "monday" => Some(1),
        "tuesday" => Some(2),
        "wednesday" => Some(3),
        "thursday" => Some(4),
        "friday" => Some(5),
        "saturday" => Some(6),
        _ => None,
    }
}

/// Convert an hour/minute/meridiem triple to fractional hours
fn to_hour(h: u32, m: u32, meridiem: Option<&str>) -> f64 {
    let mut hour = h as f64;
    match meridiem.map(|s| s.to_ascii_lowercase()) {
        Some(ref s) if s.starts_with('p') => {
            if h != 12 {
                hour += 12.0;
            }
        }
        Some(ref s) if s.starts_with('a') => {
            if h == 12 {
                hour = 0.0;
            }
        }
        _ => {}
    }
    hour + m as f64 / 60.0
}

fn parse_weekday_descriptions(descriptions: &[String]) -> Option<HoursSummary> {
    // "12:00 – 2:30 PM" or "12:00 PM – 1:00 AM" or 24h "12:00 – 14:30"
    let range_re = Regex::new(
        r"(?i)(\d{1,2})(?::(\d{2}))?\s*(AM|PM)?\s*[–—−-]\s*(\d{1,2})(?::(\d{2}))?\s*(AM|PM)?",
    )
    .ok()?;

    let mut shifts_by_day: [Vec<Shift>; 7] = Default::default();
    let mut any_day = false;

    for line in descriptions {
        let (prefix, rest) = line.split_once(':')?;
        let day = day_index(prefix)?;
        any_day = true;

        let rest = rest.trim();
        if rest.eq_ignore_ascii_case("closed") {
            continue;
        }
        if rest.to_lowercase().contains("open 24 hours") {
            shifts_by_day[day].push(Shift {
                open: 0.0,
                close: 24.0,
            });
            continue;
        }

        for caps in range_re.captures_iter(rest) {
            let open_h: u32 = caps[1].parse().ok()?;
            let open_m: u32 = caps.get(2).map_or(0, |m| m.as_str().parse().unwrap_or(0));
            let open_mer = caps.get(3).map(|m| m.as_str());
            let close_h: u32 = caps[4].parse().ok()?;
            let close_m: u32 = caps.get(5).map_or(0, |m| m.as_str().parse().unwrap_or(0));
            let close_mer = caps.get(6).map(|m| m.as_str());

            if open_h > 24 || close_h > 24 || open_m > 59 || close_m > 59 {
                continue;
            }

            // A missing AM/PM is inferred from the adjacent field:
            // "12:00 – 2:30 PM" opens at noon, not 00:00.
            let effective_open_mer = open_mer.or(close_mer);
            let mut open = to_hour(open_h, open_m, effective_open_mer);
            let close = to_hour(close_h, close_m, close_mer);
            if open_mer.is_none() && close_mer.is_some() && open > close {
                // The borrowed meridiem overshot; the shift straddles noon
                open = to_hour(open_h, open_m, Some("am"));
            }

            let mut shift = Shift { open, close };
            // Overnight close: past-midnight hours continue the same day
            if shift.close <= shift.open {
                shift.close += 24.0;
            }
            // Normalize runaway values past the next morning
            if shift.close > shift.open + 24.0 {
                shift.close = shift.open + 24.0;
            }
            shifts_by_day[day].push(shift);
        }
    }

    if !any_day {
        return None;
    }
    for shifts in &mut shifts_by_day {
        shifts.sort_by(|a, b| a.open.total_cmp(&b.open));
    }

    Some(summarize(&shifts_by_day, true))
}

/// Fallback for the structured closing-time-by-day + days-open form
fn parse_structured(
    closing_times: Option<&HashMap<String, String>>,
    days_open: Option<&[u8]>,
) -> Option<HoursSummary> {
    let mut shifts_by_day: [Vec<Shift>; 7] = Default::default();
    let mut any = false;

    if let Some(days) = days_open {
        for &d in days {
            if usize::from(d) < 7 {
                // Day known open, schedule unknown: a zero-length marker shift
                shifts_by_day[usize::from(d)].push(Shift {
                    open: f64::NAN,
                    close: f64::NAN,
                });
                any = true;
            }
        }
    }

    if let Some(times) = closing_times {
        for (day_str, time_str) in times {
            let day: usize = day_str.parse().ok()?;
            if day >= 7 {
                continue;
            }
            let hour: f64 = time_str
                .split(':')
                .next()
                .and_then(|h| h.parse::<u32>().ok())
                .map(|h| h as f64)?;
            // Small closing hours are past-midnight closes
            let close = if hour < 6.0 { hour + 24.0 } else { hour };
            shifts_by_day[day].clear();
            shifts_by_day[day].push(Shift {
                open: f64::NAN,
                close,
            });
            any = true;
        }
    }

    if !any {
        return None;
    }
    Some(summarize(&shifts_by_day, false))
}

fn median(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        None
    } else {
        Some(sorted[sorted.len() / 2])
    }
}

fn summarize(shifts_by_day: &[Vec<Shift>; 7], shifts_known: bool) -> HoursSummary {
    let mut open_days = [false; 7];
    let mut weekday_closes = Vec::new();
    let mut all_closes = Vec::new();
    let mut total_hours = 0.0;
    let mut total_hours_known = shifts_known;
    let mut coupe_days = 0u8;
    let mut late_days = 0u8;
    let mut lunch_close_days = 0u8;

    for (day, shifts) in shifts_by_day.iter().enumerate() {
        if shifts.is_empty() {
            continue;
        }
        open_days[day] = true;

        let last_close = shifts
            .iter()
            .map(|s| s.close)
            .filter(|c| !c.is_nan())
            .fold(f64::NAN, f64::max);
        if !last_close.is_nan() {
            all_closes.push(last_close);
            if (1..=5).contains(&day) {
                weekday_closes.push(last_close);
            }
            if last_close >= 25.0 {
                late_days += 1;
            }
            if last_close <= 17.0 {
                lunch_close_days += 1;
            }
        } else {
            total_hours_known = false;
        }

        for shift in shifts {
            if !shift.open.is_nan() && !shift.close.is_nan() {
                total_hours += shift.close - shift.open;
            }
        }

        // Service coupé: a lunch shift closing in [13,16] followed by a
        // dinner shift opening in [17,20]
        if shifts.len() >= 2 {
            let first = &shifts[0];
            let second = &shifts[1];
            if !first.close.is_nan()
                && !second.open.is_nan()
                && (13.0..=16.0).contains(&first.close)
                && (17.0..=20.0).contains(&second.open)
            {
                coupe_days += 1;
            }
        }
    }

    let days_open_count = open_days.iter().filter(|&&d| d).count() as u8;
    if days_open_count == 0 {
        // A schedule that is all "Closed" is not a usable signal
        return HoursSummary::unknown();
    }

    weekday_closes.sort_by(|a, b| a.total_cmp(b));
    let typical_close = median(&weekday_closes);
    let latest_close = all_closes.iter().copied().fold(f64::NAN, f64::max);
    let latest_close = if latest_close.is_nan() {
        None
    } else {
        Some(latest_close)
    };

    let has_saturday = open_days[6];
    let has_sunday = open_days[0];
    let closed_weekends = !has_saturday && !has_sunday;
    let closed_sunday = !has_sunday && has_saturday;
    // With at least one open day, closed weekends means Mon-Fri only
    let weekdays_only = closed_weekends;

    HoursSummary {
        known: true,
        open_days,
        days_open_count: Some(days_open_count),
        typical_close_hour: typical_close,
        latest_close_hour: latest_close,
        total_weekly_hours: if total_hours_known {
            Some(total_hours)
        } else {
            None
        },
        service_coupe: coupe_days >= 3,
        closes_late: late_days >= 3,
        lunch_only: days_open_count >= 4 && lunch_close_days >= 4,
        weekdays_only,
        closed_sunday,
        closed_weekends,
        closes_early: typical_close.map_or(false, |c| c < 22.0 && c > 12.0),
    }
}
