use tracing::debug;

/// Calendar unit of a subscription or introductory-offer period, as reported
/// by StoreKit (`"day"`, `"week"`, `"month"`, `"year"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionUnit {
    Day,
    Week,
    Month,
    Year,
}

impl SubscriptionUnit {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "day" => Some(SubscriptionUnit::Day),
            "week" => Some(SubscriptionUnit::Week),
            "month" => Some(SubscriptionUnit::Month),
            "year" => Some(SubscriptionUnit::Year),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            SubscriptionUnit::Day => "day",
            SubscriptionUnit::Week => "week",
            SubscriptionUnit::Month => "month",
            SubscriptionUnit::Year => "year",
        }
    }

    /// ISO 8601 duration designator.
    pub fn designator(self) -> char {
        match self {
            SubscriptionUnit::Day => 'D',
            SubscriptionUnit::Week => 'W',
            SubscriptionUnit::Month => 'M',
            SubscriptionUnit::Year => 'Y',
        }
    }
}

/// Rounds a period up to a single longer unit once it spans that unit:
/// 30+ days is one month, 7+ days one week, 4+ weeks one month and 12+
/// months one year. Anything shorter is returned unchanged.
pub fn collapse(cycles: i32, unit: SubscriptionUnit) -> (i32, SubscriptionUnit) {
    use SubscriptionUnit::*;
    match unit {
        Day if cycles >= 30 => (1, Month),
        Day if cycles >= 7 => (1, Week),
        Week if cycles >= 4 => (1, Month),
        Month if cycles >= 12 => (1, Year),
        _ => (cycles, unit),
    }
}

/// Renders `P<cycles><designator>`, e.g. `to_iso8601(3, "day") == "P3D"`.
///
/// An unrecognized unit token yields `P<cycles>` with no designator, which
/// is not a valid duration; callers that must not leak it should check the
/// token with [`SubscriptionUnit::from_token`] first, as
/// [`normalize_period`] does.
pub fn to_iso8601(cycles: i32, unit_token: &str) -> String {
    match SubscriptionUnit::from_token(unit_token) {
        Some(unit) => format!("P{}{}", cycles, unit.designator()),
        None => format!("P{}", cycles),
    }
}

/// Collapses a raw StoreKit period and renders it as an ISO 8601 duration.
/// Returns `None` when the count is not positive or the unit token is not
/// recognized.
pub fn normalize_period(cycles: i32, unit_token: &str) -> Option<String> {
    if cycles <= 0 {
        debug!(unit = unit_token, cycles, "Ignoring period with non-positive count.");
        return None;
    }
    let Some(unit) = SubscriptionUnit::from_token(unit_token) else {
        debug!(unit = unit_token, cycles, "Ignoring period with unrecognized unit.");
        return None;
    };
    let (cycles, unit) = collapse(cycles, unit);
    Some(to_iso8601(cycles, unit.token()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirty_days_is_one_month() {
        assert_eq!(normalize_period(30, "day").as_deref(), Some("P1M"));
    }

    #[test]
    fn five_days_stay_days() {
        assert_eq!(normalize_period(5, "day").as_deref(), Some("P5D"));
    }

    #[test]
    fn collapse_thresholds() {
        use SubscriptionUnit::*;
        assert_eq!(collapse(6, Day), (6, Day));
        assert_eq!(collapse(7, Day), (1, Week));
        assert_eq!(collapse(14, Day), (1, Week));
        assert_eq!(collapse(29, Day), (1, Week));
        assert_eq!(collapse(31, Day), (1, Month));
        assert_eq!(collapse(3, Week), (3, Week));
        assert_eq!(collapse(4, Week), (1, Month));
        assert_eq!(collapse(6, Month), (6, Month));
        assert_eq!(collapse(12, Month), (1, Year));
        assert_eq!(collapse(2, Year), (2, Year));
    }

    #[test]
    fn iso8601_designators() {
        assert_eq!(to_iso8601(3, "day"), "P3D");
        assert_eq!(to_iso8601(1, "week"), "P1W");
        assert_eq!(to_iso8601(6, "Month"), "P6M");
        assert_eq!(to_iso8601(1, "year"), "P1Y");
    }

    #[test]
    fn unknown_unit() {
        assert_eq!(to_iso8601(2, "fortnight"), "P2");
        assert_eq!(normalize_period(2, "fortnight"), None);
        assert_eq!(normalize_period(2, ""), None);
    }

    #[test]
    fn non_positive_counts_are_rejected() {
        assert_eq!(normalize_period(-3, "day"), None);
        assert_eq!(normalize_period(0, "day"), None);
        assert_eq!(normalize_period(-40, "day"), None);
        assert_eq!(normalize_period(1, "day").as_deref(), Some("P1D"));
    }
}
