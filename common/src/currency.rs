use serde::{Deserialize, Serialize};
use std::fmt;

/// Settlement currency. Amounts are always stored in minor units (cents);
/// the unit travels with the priced entity rather than being inferred.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    Usd,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
        }
    }
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
        }
    }
}

/// Format an amount in minor units for display: `$1,234` for whole dollars,
/// `$1,234.50` otherwise.
pub fn format_amount(minor: u64, currency: &Currency) -> String {
    let whole = minor / 100;
    let cents = minor % 100;
    let grouped = group_thousands(whole);
    if cents == 0 {
        format!("{}{grouped}", currency.symbol())
    } else {
        format!("{}{grouped}.{cents:02}", currency.symbol())
    }
}

fn group_thousands(n: u64) -> String {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_dollar_amounts_drop_the_cents() {
        assert_eq!(format_amount(0, &Currency::Usd), "$0");
        assert_eq!(format_amount(4_500, &Currency::Usd), "$45");
        assert_eq!(format_amount(500_000, &Currency::Usd), "$5,000");
        assert_eq!(format_amount(123_456_700, &Currency::Usd), "$1,234,567");
    }

    #[test]
    fn fractional_amounts_keep_two_places() {
        assert_eq!(format_amount(1, &Currency::Usd), "$0.01");
        assert_eq!(format_amount(7_905, &Currency::Usd), "$79.05");
        assert_eq!(format_amount(123_450, &Currency::Usd), "$1,234.50");
    }
}
