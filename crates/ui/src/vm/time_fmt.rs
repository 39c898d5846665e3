use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

/// Wall time between two instants as `M分SS秒`; negative spans read as zero.
#[must_use]
pub fn format_elapsed(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> String {
    let seconds = (completed_at - started_at).num_seconds().max(0);
    format!("{}分{:02}秒", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::time::fixed_now;

    #[test]
    fn elapsed_is_minutes_and_padded_seconds() {
        let start = fixed_now();
        assert_eq!(format_elapsed(start, start + Duration::seconds(125)), "2分05秒");
        assert_eq!(format_elapsed(start, start - Duration::seconds(5)), "0分00秒");
    }
}
