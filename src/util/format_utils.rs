/**
Format a monetary amount for display, e.g. `R$ 1,234.57`.

## Arguments
- `amount`: The value to format. Rounded to two decimals.
- `symbol`: Currency symbol placed before the number.

## Returns
The formatted string. Negative amounts carry the minus sign before the symbol.
 */
pub fn format_currency(amount: f64, symbol: &str) -> String {
    if !amount.is_finite() {
        return format!("{} {}", symbol, amount);
    }
    let fixed = format!("{:.2}", amount.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = group_thousands(integer);
    // -0.001 rounds to 0.00 and should not print a sign
    let negative = amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    format!("{}{} {}.{}", sign, symbol, grouped, fraction)
}

/// Percent with two decimals from a fractional rate, e.g. `0.0525` -> `5.25%`.
pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
