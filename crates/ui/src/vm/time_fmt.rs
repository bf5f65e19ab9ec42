use eduhub_core::grading::{SCORE_SCALE, round2};

/// `m:ss`, minutes unpadded.
#[must_use]
pub fn format_countdown(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("{minutes}:{remainder:02}")
}

/// Two-decimal number without trailing zeros ("2.5", "30").
#[must_use]
pub fn format_decimal(value: f64) -> String {
    format!("{}", round2(value))
}

#[must_use]
pub fn format_score(score: f64) -> String {
    format!("{} / {}", format_decimal(score), format_decimal(SCORE_SCALE))
}

#[must_use]
pub fn format_minutes(minutes: f64) -> String {
    format!("{} minutes", format_decimal(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_pads_seconds_only() {
        assert_eq!(format_countdown(1200), "20:00");
        assert_eq!(format_countdown(1199), "19:59");
        assert_eq!(format_countdown(65), "1:05");
        assert_eq!(format_countdown(0), "0:00");
    }

    #[test]
    fn decimals_drop_trailing_zeros() {
        assert_eq!(format_decimal(2.5), "2.5");
        assert_eq!(format_decimal(30.0), "30");
        assert_eq!(format_decimal(4.285_714), "4.29");
        assert_eq!(format_score(27.5), "27.5 / 30");
        assert_eq!(format_minutes(0.5), "0.5 minutes");
    }
}
