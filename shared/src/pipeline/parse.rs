use chrono::NaiveDate;

/// Parses a pt-BR flow cell into billions of R$.
///
/// Cleanup first: lowercase, drop the "r$" marker, spaces and
/// thousands periods, turn the decimal comma into a period. Then the
/// magnitude suffix, first match wins: "mi" means millions (divide by
/// 1000), "bi" means the value is already in billions. An empty cell,
/// a bare dash or the literal "nan" is zero. Anything else is taken as
/// a bare billions figure. `None` means the residue was not a number;
/// the caller decides how fatal that is.
pub fn parse_flow_amount(raw: &str) -> Option<f64> {
    let cleaned = raw
        .to_lowercase()
        .replace("r$", "")
        .replace(' ', "")
        .replace('.', "")
        .replace(',', ".");
    let v = cleaned.trim();

    if v.contains("mi") {
        return v.replace("mi", "").parse::<f64>().ok().map(|x| x / 1000.0);
    }
    if v.contains("bi") {
        return v.replace("bi", "").parse::<f64>().ok();
    }
    if v.is_empty() || v == "-" || v == "nan" {
        return Some(0.0);
    }
    v.parse::<f64>().ok()
}

/// Coercive day-first date parse; `None` for anything unparsable.
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    for fmt in ["%d/%m/%Y", "%d/%m/%y", "%d-%m-%Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_markers() {
        assert_eq!(parse_flow_amount("R$ 1,5 bi"), Some(1.5));
        assert_eq!(parse_flow_amount("R$ 800 mi"), Some(0.8));
        assert_eq!(parse_flow_amount("R$ -300 mi"), Some(-0.3));
        assert_eq!(parse_flow_amount("2 bi"), Some(2.0));
    }

    #[test]
    fn test_zero_tokens() {
        assert_eq!(parse_flow_amount("-"), Some(0.0));
        assert_eq!(parse_flow_amount(""), Some(0.0));
        assert_eq!(parse_flow_amount("nan"), Some(0.0));
        assert_eq!(parse_flow_amount("NaN"), Some(0.0));
    }

    #[test]
    fn test_bare_number_with_locale_separators() {
        assert_eq!(parse_flow_amount("R$ 2.500,75"), Some(2500.75));
        assert_eq!(parse_flow_amount("1,25"), Some(1.25));
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(parse_flow_amount("n/d"), None);
        assert_eq!(parse_flow_amount("R$ abc bi"), None);
    }

    #[test]
    fn test_day_first_dates() {
        assert_eq!(
            parse_day_first("31/03/2025"),
            NaiveDate::from_ymd_opt(2025, 3, 31)
        );
        assert_eq!(
            parse_day_first("2025-03-31"),
            NaiveDate::from_ymd_opt(2025, 3, 31)
        );
        assert_eq!(parse_day_first("total"), None);
    }
}
