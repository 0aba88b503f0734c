use chrono::{DateTime, Utc};

/// Short timestamp for chat and roadmap lists, e.g. `Nov 14, 22:13`.
#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::time::fixed_now;

    #[test]
    fn formats_month_day_and_time() {
        assert_eq!(format_datetime(fixed_now()), "Nov 14, 22:13");
    }
}
