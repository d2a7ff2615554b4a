use chrono::{DateTime, Utc};

const MINUTES_PER_DAY: i64 = 1_440;
const MINUTES_PER_MONTH: i64 = 43_200;
const MINUTES_PER_YEAR: i64 = 525_600;

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

fn rounded_div(value: i64, unit: i64) -> i64 {
    (value as f64 / unit as f64).round() as i64
}

/// Human distance between two instants, e.g. "3 days ago" or "about 2 hours ago"
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let future = seconds < 0;
    let seconds = seconds.abs();
    let minutes = rounded_div(seconds, 60);

    let distance = if seconds < 30 {
        "less than a minute".to_string()
    } else if minutes < 45 {
        plural(minutes.max(1), "minute")
    } else if minutes < 90 {
        "about 1 hour".to_string()
    } else if minutes < MINUTES_PER_DAY {
        format!("about {}", plural(rounded_div(minutes, 60), "hour"))
    } else if minutes < 2_520 {
        "1 day".to_string()
    } else if minutes < MINUTES_PER_MONTH {
        plural(rounded_div(minutes, MINUTES_PER_DAY), "day")
    } else if minutes < MINUTES_PER_MONTH * 2 {
        format!(
            "about {}",
            plural(rounded_div(minutes, MINUTES_PER_MONTH), "month")
        )
    } else if minutes < MINUTES_PER_YEAR {
        plural(minutes / MINUTES_PER_MONTH, "month")
    } else {
        let years = minutes / MINUTES_PER_YEAR;
        let remainder = minutes % MINUTES_PER_YEAR;
        if remainder < MINUTES_PER_YEAR / 4 {
            format!("about {}", plural(years, "year"))
        } else if remainder < MINUTES_PER_YEAR * 3 / 4 {
            format!("over {}", plural(years, "year"))
        } else {
            format!("almost {}", plural(years + 1, "year"))
        }
    };

    if future {
        format!("in {}", distance)
    } else {
        format!("{} ago", distance)
    }
}
