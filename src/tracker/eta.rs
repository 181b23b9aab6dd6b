const ARRIVING_NOW: &str = "Arriving now";

/// Whole minutes for a duration, halves rounding up.
pub fn eta_minutes(seconds: f64) -> i64 {
    (seconds.max(0.0) / 60.0).round() as i64
}

/// Display string for a route duration. Anything under a minute is
/// "Arriving now"; otherwise the rounded minute count.
pub fn format_eta(seconds: f64) -> String {
    if seconds < 60.0 {
        return ARRIVING_NOW.to_string();
    }
    match eta_minutes(seconds) {
        1 => "1 min".to_string(),
        n => format!("{} mins", n),
    }
}

pub fn round_miles(miles: f64) -> f64 {
    (miles * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        assert_eq!(format_eta(0.0), "Arriving now");
        assert_eq!(format_eta(59.0), "Arriving now");
        assert_eq!(format_eta(60.0), "1 min");
        assert_eq!(format_eta(89.0), "1 min");
        assert_eq!(format_eta(90.0), "2 mins");
        assert_eq!(format_eta(119.0), "2 mins");
        assert_eq!(format_eta(120.0), "2 mins");
        assert_eq!(format_eta(1530.0), "26 mins");
    }

    #[test]
    fn negative_durations_are_arriving() {
        assert_eq!(format_eta(-5.0), "Arriving now");
        assert_eq!(eta_minutes(-5.0), 0);
    }

    #[test]
    fn miles_rounding() {
        assert_eq!(round_miles(2.1004), 2.1);
        assert_eq!(round_miles(0.06), 0.1);
    }
}
