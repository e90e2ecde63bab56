use std::sync::LazyLock;

use regex::Regex;

const FEET_PER_MILE: f64 = 5280.0;
const METERS_PER_MILE: f64 = 1609.34;
const KM_PER_MILE: f64 = 1.60934;

static DISTANCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]*\.?[0-9]+)\s*([a-zA-Z]+)?").expect("invalid distance regex")
});

/// Normalize a free-text distance string ("10 mi", "295 ft", "5.5 km",
/// "850 m") to statute miles. An unrecognized or absent unit is treated as
/// miles already; a string with no numeric value yields 0.
pub fn parse_distance(text: &str) -> f64 {
    let Some(caps) = DISTANCE_RE.captures(text) else {
        return 0.0;
    };

    let value: f64 = match caps.get(1).and_then(|m| m.as_str().parse().ok()) {
        Some(v) => v,
        None => return 0.0,
    };

    let unit = caps
        .get(2)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_default();

    match unit.as_str() {
        "ft" | "feet" => value / FEET_PER_MILE,
        "m" | "meter" | "meters" => value / METERS_PER_MILE,
        "km" => value / KM_PER_MILE,
        // "mi", "mile", "miles", unknown or missing
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_miles_passthrough() {
        assert!(close(parse_distance("10 mi"), 10.0));
        assert!(close(parse_distance("2.5 miles"), 2.5));
    }

    #[test]
    fn test_feet_conversion() {
        assert!(close(parse_distance("295 ft"), 295.0 / 5280.0));
        assert!(close(parse_distance("5280 ft"), 1.0));
    }

    #[test]
    fn test_meters_conversion() {
        assert!(close(parse_distance("1609.34 m"), 1.0));
    }

    #[test]
    fn test_km_conversion() {
        assert!(close(parse_distance("5.5 km"), 5.5 / 1.60934));
    }

    #[test]
    fn test_unitless_defaults_to_miles() {
        assert!(close(parse_distance("7"), 7.0));
        assert!(close(parse_distance("3.2"), 3.2));
    }

    #[test]
    fn test_unrecognized_unit_defaults_to_miles() {
        assert!(close(parse_distance("4 furlongs"), 4.0));
    }

    #[test]
    fn test_no_number_yields_zero() {
        assert!(close(parse_distance("n/a"), 0.0));
        assert!(close(parse_distance(""), 0.0));
    }
}
