use std::sync::LazyLock;

use regex::Regex;

/// InnateDB carries no confidence; these sentinels mark its rows.
pub const INNATEDB_SCORES: (f64, f64) = (0.0, 1.0);

const FALLBACK_SCORE: f64 = 0.0;

static MISCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"intact-miscore:\s*([^|\s]+)").expect("valid miscore regex"));

/// Parses an IMEx `confidenceScore` field.
///
/// The field holds `|`-separated `<method>:<value>` alternatives. The
/// `intact-miscore` alternative wins when present, otherwise the first
/// alternative with a numeric value. Absent, `-` or `NaN` input yields 0.
pub fn imex_score(field: Option<&str>) -> f64 {
    let Some(field) = field.map(str::trim).filter(|value| !is_placeholder(value)) else {
        return FALLBACK_SCORE;
    };

    if let Some(value) = MISCORE_RE
        .captures(field)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_score(m.as_str()))
    {
        return value;
    }

    field
        .split('|')
        .filter_map(|alternative| alternative.rsplit_once(':'))
        .find_map(|(_, value)| parse_score(value))
        .unwrap_or(FALLBACK_SCORE)
}

/// Parses an InWeb `score_1|score_2` field. A `-` (or anything unparsable)
/// at either position yields 0 for that position.
pub fn inweb_scores(field: Option<&str>) -> (f64, f64) {
    let Some(field) = field.map(str::trim) else {
        return (FALLBACK_SCORE, FALLBACK_SCORE);
    };
    let mut parts = field.split('|');
    let first = parts.next().and_then(parse_score).unwrap_or(FALLBACK_SCORE);
    let second = parts.next().and_then(parse_score).unwrap_or(FALLBACK_SCORE);
    (first, second)
}

/// Clamps a parsed score into `[0, inf)`; non-numeric and non-finite input is rejected.
pub fn parse_score(value: &str) -> Option<f64> {
    let value = value.trim();
    if is_placeholder(value) {
        return None;
    }
    let parsed = value.parse::<f64>().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    Some(parsed.max(0.0))
}

fn is_placeholder(value: &str) -> bool {
    value.is_empty() || value == "-" || value.eq_ignore_ascii_case("nan")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imex_prefers_miscore() {
        let score = imex_score(Some("author score:high|intact-miscore:0.42"));
        assert_eq!(score, 0.42);
    }

    #[test]
    fn imex_falls_back_to_first_numeric() {
        assert_eq!(imex_score(Some("author score:high|mint-score:0.7")), 0.7);
    }

    #[test]
    fn imex_absent_is_zero() {
        assert_eq!(imex_score(None), 0.0);
        assert_eq!(imex_score(Some("-")), 0.0);
        assert_eq!(imex_score(Some("nan")), 0.0);
        assert_eq!(imex_score(Some("author score:high")), 0.0);
    }

    #[test]
    fn inweb_placeholders() {
        assert_eq!(inweb_scores(Some("0.25|0.9")), (0.25, 0.9));
        assert_eq!(inweb_scores(Some("-|0.9")), (0.0, 0.9));
        assert_eq!(inweb_scores(Some("0.3|-")), (0.3, 0.0));
        assert_eq!(inweb_scores(Some("0.3")), (0.3, 0.0));
        assert_eq!(inweb_scores(None), (0.0, 0.0));
    }

    #[test]
    fn negative_scores_clamp() {
        assert_eq!(parse_score("-0.5"), Some(0.0));
        assert_eq!(parse_score("inf"), None);
    }
}
