//! Display formatting helpers. All pure; no locale machinery, the
//! published dashboards are en-US only.

/// Thousands-separated integer, e.g. `1250` -> `"1,250"`.
pub fn number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Whole-dollar currency, e.g. `2400000.0` -> `"$2,400,000"`.
pub fn currency(amount: f64) -> String {
    let whole = amount.round() as i64;
    if whole < 0 {
        format!("-${}", number(whole.unsigned_abs()))
    } else {
        format!("${}", number(whole as u64))
    }
}

/// Compact millions with one decimal, e.g. `2_400_000.0` -> `"$2.4M"`.
pub fn compact_millions(amount: f64) -> String {
    format!("${:.1}M", amount / 1_000_000.0)
}

/// Percentage with a fixed number of decimals, e.g. `87.3` -> `"87.3%"`.
pub fn percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

/// Percentage rounded to a whole number, e.g. `87.3` -> `"87%"`.
pub fn percent_whole(value: f64) -> String {
    format!("{:.0}%", value)
}

/// Signed percentage delta, e.g. `30.0` -> `"+30%"`.
pub fn percent_delta(value: f64) -> String {
    format!("+{:.0}%", value)
}

/// Satisfaction on the survey's 0-5 scale, e.g. `4.2` -> `"4.2/5"`.
pub fn satisfaction(value: f64) -> String {
    format!("{:.1}/5", value)
}

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Short month label for a `"<year>_<month>"` trend key,
/// e.g. `"2025_03"` -> `"Mar"`. Unparseable keys pass through unchanged.
pub fn month_label(key: &str) -> String {
    let month = key
        .split('_')
        .nth(1)
        .and_then(|m| m.parse::<usize>().ok());
    match month {
        Some(m) if (1..=12).contains(&m) => MONTH_ABBREV[m - 1].to_string(),
        _ => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_separators() {
        assert_eq!(number(0), "0");
        assert_eq!(number(999), "999");
        assert_eq!(number(1250), "1,250");
        assert_eq!(number(2400000), "2,400,000");
    }

    #[test]
    fn test_currency() {
        assert_eq!(currency(2400000.0), "$2,400,000");
        assert_eq!(currency(-1500.4), "-$1,500");
    }

    #[test]
    fn test_compact_millions_example() {
        // Reference scenario: monthly_roi 2.4M displays as "$2.4M".
        assert_eq!(compact_millions(2_400_000.0), "$2.4M");
        assert_eq!(compact_millions(850_000.0), "$0.9M");
    }

    #[test]
    fn test_percent_whole_example() {
        // Reference scenario: adoption_rate 87.3 displays as "87%".
        assert_eq!(percent_whole(87.3), "87%");
        assert_eq!(percentage(87.3, 1), "87.3%");
        assert_eq!(percent_delta(30.0), "+30%");
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label("2025_03"), "Mar");
        assert_eq!(month_label("2024_12"), "Dec");
        assert_eq!(month_label("garbage"), "garbage");
        assert_eq!(month_label("2025_00"), "2025_00");
    }
}
