use chrono::{DateTime, SecondsFormat, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Fixed-width RFC 3339 so that string order matches chronological order.
pub fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn from_rfc3339(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formatted_timestamps_sort_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let later = earlier + chrono::Duration::nanoseconds(1_500);
        assert!(to_rfc3339(earlier) < to_rfc3339(later));
        assert_eq!(to_rfc3339(earlier).len(), to_rfc3339(later).len());
    }

    #[test]
    fn parses_what_it_formats() {
        let ts = now();
        assert_eq!(from_rfc3339(&to_rfc3339(ts)).unwrap(), ts);
    }
}
