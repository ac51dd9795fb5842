use chrono::{Duration, NaiveDate, NaiveDateTime};
use skill_utils::utils::time::{
    age_from_str, format_epoch, pack_things_date, parse_timestamp, relative_age, unpack_things_date,
};

fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(12, 0, 0).unwrap()
}

fn age_after_days(days: i64) -> String {
    let now = noon(2024, 6, 15);
    relative_age(now - Duration::days(days), now)
}

#[test]
fn test_relative_age_buckets() {
    assert_eq!(age_after_days(0), "today");
    assert_eq!(age_after_days(1), "1 day ago");
    assert_eq!(age_after_days(6), "6 days ago");
    assert_eq!(age_after_days(10), "1 week ago");
    assert_eq!(age_after_days(14), "2 weeks ago");
    assert_eq!(age_after_days(40), "1 month ago");
    assert_eq!(age_after_days(60), "2 months ago");
    assert_eq!(age_after_days(400), "1 year ago");
    assert_eq!(age_after_days(800), "2 years ago");
}

#[test]
fn test_relative_age_rounds_down_to_whole_days() {
    let now = noon(2024, 6, 15);
    assert_eq!(relative_age(now - Duration::hours(23), now), "today");
    assert_eq!(relative_age(now - Duration::hours(47), now), "1 day ago");
}

#[test]
fn test_parse_timestamp_formats() {
    let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap();

    assert_eq!(parse_timestamp("2024-03-01 09:30:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-03-01T09:30:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-03-01 09:30"), Some(expected));
    assert_eq!(parse_timestamp("  2024-03-01 09:30:00  "), Some(expected));
    assert_eq!(
        parse_timestamp("2024-03-01"),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0)
    );
    assert!(parse_timestamp("2024-03-01T09:30:00+02:00").is_some());
}

#[test]
fn test_parse_timestamp_rejects_garbage() {
    assert_eq!(parse_timestamp(""), None);
    assert_eq!(parse_timestamp("last tuesday"), None);
    assert_eq!(parse_timestamp("2024-13-40"), None);
}

#[test]
fn test_age_from_str() {
    let now = noon(2024, 6, 15);
    assert_eq!(age_from_str("2024-06-14 08:00:00", now).as_deref(), Some("1 day ago"));
    assert_eq!(age_from_str("not a date", now), None);
}

#[test]
fn test_things_date_packing() {
    let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let packed = pack_things_date(date);

    assert_eq!(packed, (2024 << 16) | (6 << 12) | (15 << 7));
    assert_eq!(unpack_things_date(packed), Some(date));
    assert_eq!(unpack_things_date(0), None);
    assert_eq!(unpack_things_date(-5), None);
    // month 15 does not exist
    assert_eq!(unpack_things_date((2024 << 16) | (15 << 12) | (1 << 7)), None);
}

#[test]
fn test_format_epoch_shape() {
    let formatted = format_epoch(1_700_000_000.75).expect("valid epoch");
    assert_eq!(formatted.len(), "2023-11-14 22:13:20".len());
    assert!(parse_timestamp(&formatted).is_some());
}
