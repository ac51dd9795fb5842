use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone};

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    // RFC3339 values are compared in local wall-clock time
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    for format in formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Human age of `then` relative to `now`, in whole days rounded down.
pub fn relative_age(then: NaiveDateTime, now: NaiveDateTime) -> String {
    let days = (now - then).num_seconds().div_euclid(86_400);

    if days == 0 {
        return "today".to_string();
    }
    if days == 1 {
        return "1 day ago".to_string();
    }
    if days < 7 {
        return format!("{} days ago", days);
    }
    if days < 30 {
        return plural_ago(days / 7, "week");
    }
    if days < 365 {
        return plural_ago(days / 30, "month");
    }
    plural_ago(days / 365, "year")
}

fn plural_ago(count: i64, unit: &str) -> String {
    format!("{} {}{} ago", count, unit, if count > 1 { "s" } else { "" })
}

/// `None` when the timestamp cannot be parsed.
pub fn age_from_str(s: &str, now: NaiveDateTime) -> Option<String> {
    parse_timestamp(s).map(|then| relative_age(then, now))
}

/// Things stores calendar dates as `year << 16 | month << 12 | day << 7`.
pub fn unpack_things_date(packed: i64) -> Option<NaiveDate> {
    if packed <= 0 {
        return None;
    }
    let year = (packed >> 16) as i32;
    let month = ((packed >> 12) & 0xF) as u32;
    let day = ((packed >> 7) & 0x1F) as u32;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn pack_things_date(date: NaiveDate) -> i64 {
    (i64::from(date.year()) << 16) | (i64::from(date.month()) << 12) | (i64::from(date.day()) << 7)
}

/// Epoch seconds (as stored by Things) to local `YYYY-MM-DD HH:MM:SS`.
pub fn format_epoch(seconds: f64) -> Option<String> {
    let whole = seconds.trunc() as i64;
    Local
        .timestamp_opt(whole, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
