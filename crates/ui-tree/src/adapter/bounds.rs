use crate::node::Bounds;
use once_cell::sync::Lazy;
use regex::Regex;

static BOUNDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[\s*(-?\d+)\s*,\s*(-?\d+)\s*\]\s*\[\s*(-?\d+)\s*,\s*(-?\d+)\s*\]$")
        .expect("bounds pattern is valid")
});

/// Parse a native bounds string `"[x1,y1][x2,y2]"`.
///
/// Anything that does not match yields `None`; a node without bounds stays in
/// the tree, it just cannot be resolved to a point later.
#[must_use]
pub fn parse_bounds(raw: &str) -> Option<Bounds> {
    let caps = BOUNDS_RE.captures(raw.trim())?;
    let coord = |idx: usize| caps.get(idx)?.as_str().parse::<i32>().ok();
    Some(Bounds::new(coord(1)?, coord(2)?, coord(3)?, coord(4)?))
}

/// Build bounds from remote `x`/`y`/`width`/`height` attributes.
///
/// Fractional values are rounded; all four must parse.
pub(crate) fn bounds_from_frame(
    x: Option<&str>,
    y: Option<&str>,
    width: Option<&str>,
    height: Option<&str>,
) -> Option<Bounds> {
    Some(Bounds::from_origin_size(
        parse_unit(x?)?,
        parse_unit(y?)?,
        parse_unit(width?)?,
        parse_unit(height?)?,
    ))
}

fn parse_unit(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<i32>() {
        return Some(value);
    }
    let value = raw.parse::<f64>().ok()?;
    if !value.is_finite() || value > f64::from(i32::MAX) || value < f64::from(i32::MIN) {
        return None;
    }
    Some(value.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bounds() {
        assert_eq!(
            parse_bounds("[10,20][110,220]"),
            Some(Bounds::new(10, 20, 110, 220))
        );
        assert_eq!(
            parse_bounds(" [0, 0][1080, 2340] "),
            Some(Bounds::new(0, 0, 1080, 2340))
        );
    }

    #[test]
    fn test_parse_bounds_rejects_garbage() {
        assert_eq!(parse_bounds(""), None);
        assert_eq!(parse_bounds("[10,20]"), None);
        assert_eq!(parse_bounds("[a,b][c,d]"), None);
        assert_eq!(parse_bounds("10,20,110,220"), None);
        assert_eq!(parse_bounds("[10,20][110,99999999999]"), None);
    }

    #[test]
    fn test_bounds_from_frame() {
        assert_eq!(
            bounds_from_frame(Some("10"), Some("20"), Some("100"), Some("50")),
            Some(Bounds::new(10, 20, 110, 70))
        );
        assert_eq!(
            bounds_from_frame(Some("0.4"), Some("19.6"), Some("100"), Some("50.5")),
            Some(Bounds::new(0, 20, 100, 71))
        );
        assert_eq!(bounds_from_frame(Some("10"), None, Some("1"), Some("1")), None);
        assert_eq!(bounds_from_frame(Some("x"), Some("0"), Some("1"), Some("1")), None);
    }
}
