//! Currencies, exchange rates and price text.
//!
//! Amounts are `rust_decimal::Decimal` values so conversions never lose
//! precision before the final two-decimal render.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;

/// Supported display currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Azerbaijani manat, the base currency of every catalog price.
    #[default]
    AZN,
    USD,
    EUR,
    RUB,
}

impl Currency {
    /// Currency in which canonical prices are expressed.
    pub const BASE: Currency = Currency::AZN;

    /// Every currency in the catalog, base first.
    pub const ALL: [Currency; 4] = [Currency::AZN, Currency::USD, Currency::EUR, Currency::RUB];

    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::AZN => "AZN",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::RUB => "RUB",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::AZN => "\u{20bc}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::RUB => "\u{20bd}",
        }
    }

    /// Flag glyph shown next to the currency in pickers.
    pub fn flag(&self) -> &'static str {
        match self {
            Currency::AZN => "\u{1f1e6}\u{1f1ff}",
            Currency::USD => "\u{1f1fa}\u{1f1f8}",
            Currency::EUR => "\u{1f1ea}\u{1f1fa}",
            Currency::RUB => "\u{1f1f7}\u{1f1fa}",
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Currency::AZN => "Azerbaijani Manat",
            Currency::USD => "US Dollar",
            Currency::EUR => "Euro",
            Currency::RUB => "Russian Ruble",
        }
    }

    /// Whether this is the base currency.
    pub fn is_base(&self) -> bool {
        *self == Currency::BASE
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "AZN" => Some(Currency::AZN),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "RUB" => Some(Currency::RUB),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s).ok_or_else(|| CommerceError::UnknownCurrency(s.to_string()))
    }
}

/// Exchange-rate table.
///
/// `rate(c)` is the number of units of `c` per one unit of the base
/// currency, so `base × rate(c)` expresses a base amount in `c` and
/// `amount / rate(c)` brings it back. The base rate is always exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRates {
    rates: BTreeMap<Currency, Decimal>,
}

impl ExchangeRates {
    /// Build a table from explicit rates.
    ///
    /// Every non-base currency needs a strictly positive rate. The base may
    /// be omitted; if given it must be one.
    pub fn new(rates: impl IntoIterator<Item = (Currency, Decimal)>) -> Result<Self, CommerceError> {
        let mut table = BTreeMap::new();
        for (currency, rate) in rates {
            if rate <= Decimal::ZERO || (currency.is_base() && rate != Decimal::ONE) {
                return Err(CommerceError::InvalidExchangeRate {
                    code: currency.code().to_string(),
                    rate,
                });
            }
            table.insert(currency, rate);
        }
        table.insert(Currency::BASE, Decimal::ONE);

        if let Some(missing) = Currency::ALL.iter().find(|c| !table.contains_key(c)) {
            return Err(CommerceError::MissingExchangeRate(missing.code().to_string()));
        }

        Ok(Self { rates: table })
    }

    /// Build a table from code-keyed rates, as found in configuration.
    pub fn from_codes(rates: &HashMap<String, Decimal>) -> Result<Self, CommerceError> {
        let parsed = rates
            .iter()
            .map(|(code, rate)| code.parse::<Currency>().map(|c| (c, *rate)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parsed)
    }

    /// Units of `currency` per one unit of base.
    pub fn rate(&self, currency: Currency) -> Decimal {
        self.rates.get(&currency).copied().unwrap_or(Decimal::ONE)
    }

    /// Convert `amount` from one currency to another through the base.
    pub fn convert(&self, amount: Decimal, from: Currency, to: Currency) -> Decimal {
        if from == to {
            return amount;
        }
        let base_amount = if from.is_base() {
            amount
        } else {
            amount
                .checked_div(self.rate(from))
                .unwrap_or_else(|| saturated(amount))
        };
        if to.is_base() {
            base_amount
        } else {
            base_amount.saturating_mul(self.rate(to))
        }
    }

    /// Iterate over `(currency, rate)` pairs, base first.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, Decimal)> + '_ {
        self.rates.iter().map(|(c, r)| (*c, *r))
    }
}

impl Default for ExchangeRates {
    fn default() -> Self {
        let rates = BTreeMap::from([
            (Currency::AZN, Decimal::ONE),
            (Currency::USD, Decimal::new(59, 2)),
            (Currency::EUR, Decimal::new(51, 2)),
            (Currency::RUB, Decimal::new(441, 1)),
        ]);
        Self { rates }
    }
}

/// The `Decimal` bound on the side of `amount`'s sign.
fn saturated(amount: Decimal) -> Decimal {
    if amount.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// Render an amount as `symbol + two decimals`, rounding half away from zero.
///
/// ```
/// use rust_decimal::Decimal;
/// use shop_commerce::money::{format_amount, Currency};
/// assert_eq!(format_amount(Decimal::new(59, 0), Currency::USD), "$59.00");
/// assert_eq!(format_amount(Decimal::new(12345, 3), Currency::EUR), "\u{20ac}12.35");
/// ```
pub fn format_amount(amount: Decimal, currency: Currency) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{:.2}", currency.symbol(), rounded)
}

/// Extract the numeric value from price text delivered by the catalog.
///
/// Prices arrive as display strings: `"12.00"`, `"&#8380;12.00"`,
/// `"$1,299.00"`, `"12,50 €"` or ranges like `"10.00 - 20.00"`. The first
/// number wins. Returns `None` when no number is present.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let text = strip_html_entities(raw);
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let token: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let token = token.trim_end_matches(['.', ',']);

    let normalized = match (token.rfind('.'), token.rfind(',')) {
        // "12,50": a lone comma followed by one or two digits is a decimal comma
        (None, Some(pos)) if token.len() - pos - 1 <= 2 && token.matches(',').count() == 1 => {
            token.replacen(',', ".", 1)
        }
        _ => token.replace(',', ""),
    };

    Decimal::from_str(&normalized).ok()
}

fn strip_html_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let entity_end = tail
            .char_indices()
            .skip(1)
            .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '#' || *c == ';')
            .find(|(_, c)| *c == ';')
            .map(|(i, _)| i);
        match entity_end {
            Some(end) => {
                out.push(' ');
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::dec;

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("GBP"), None);
        assert!("XYZ".parse::<Currency>().is_err());
    }

    #[test]
    fn test_default_rates() {
        let rates = ExchangeRates::default();
        assert_eq!(rates.rate(Currency::AZN), Decimal::ONE);
        assert_eq!(rates.rate(Currency::USD), dec!(0.59));
        assert_eq!(rates.rate(Currency::EUR), dec!(0.51));
        assert_eq!(rates.rate(Currency::RUB), dec!(44.1));
    }

    #[test]
    fn test_convert_from_base() {
        let rates = ExchangeRates::default();
        assert_eq!(rates.convert(dec!(100), Currency::AZN, Currency::USD), dec!(59.00));
        assert_eq!(rates.convert(dec!(100), Currency::AZN, Currency::RUB), dec!(4410.0));
        assert_eq!(rates.convert(dec!(100), Currency::AZN, Currency::AZN), dec!(100));
    }

    #[test]
    fn test_convert_to_base() {
        let rates = ExchangeRates::default();
        assert_eq!(rates.convert(dec!(59), Currency::USD, Currency::AZN), dec!(100));
    }

    #[test]
    fn test_convert_saturates_at_bounds() {
        let rates = ExchangeRates::default();
        assert_eq!(rates.convert(Decimal::MAX, Currency::AZN, Currency::RUB), Decimal::MAX);
        assert_eq!(rates.convert(Decimal::MIN, Currency::EUR, Currency::AZN), Decimal::MIN);
        assert_eq!(rates.convert(Decimal::MAX, Currency::USD, Currency::RUB), Decimal::MAX);
    }

    #[test]
    fn test_convert_composes_through_base() {
        let rates = ExchangeRates::default();
        let direct = rates.convert(dec!(250), Currency::USD, Currency::EUR);
        let via_base = rates.convert(
            rates.convert(dec!(250), Currency::USD, Currency::AZN),
            Currency::AZN,
            Currency::EUR,
        );
        assert_eq!(direct, via_base);
    }

    #[test]
    fn test_rates_validation() {
        let err = ExchangeRates::new([(Currency::USD, dec!(0))]).unwrap_err();
        assert!(matches!(err, CommerceError::InvalidExchangeRate { .. }));

        let err = ExchangeRates::new([(Currency::AZN, dec!(2))]).unwrap_err();
        assert!(matches!(err, CommerceError::InvalidExchangeRate { .. }));

        let err = ExchangeRates::new([(Currency::USD, dec!(0.6))]).unwrap_err();
        assert!(matches!(err, CommerceError::MissingExchangeRate(_)));

        let rates = ExchangeRates::new([
            (Currency::USD, dec!(0.6)),
            (Currency::EUR, dec!(0.5)),
            (Currency::RUB, dec!(50)),
        ])
        .unwrap();
        assert_eq!(rates.rate(Currency::AZN), Decimal::ONE);
    }

    #[test]
    fn test_rates_from_codes() {
        let map = HashMap::from([
            ("usd".to_string(), dec!(0.6)),
            ("EUR".to_string(), dec!(0.5)),
            ("RUB".to_string(), dec!(50)),
        ]);
        let rates = ExchangeRates::from_codes(&map).unwrap();
        assert_eq!(rates.rate(Currency::USD), dec!(0.6));

        let bad = HashMap::from([("GBP".to_string(), dec!(0.4))]);
        assert_eq!(
            ExchangeRates::from_codes(&bad).unwrap_err(),
            CommerceError::UnknownCurrency("GBP".into())
        );
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(59), Currency::USD), "$59.00");
        assert_eq!(format_amount(dec!(0.005), Currency::USD), "$0.01");
        assert_eq!(format_amount(dec!(1234.5), Currency::AZN), "\u{20bc}1234.50");
        assert_eq!(format_amount(dec!(4410.0), Currency::RUB), "\u{20bd}4410.00");
    }

    #[test]
    fn test_parse_price_variants() {
        assert_eq!(parse_price("12.00"), Some(dec!(12.00)));
        assert_eq!(parse_price("&#8380;12.00"), Some(dec!(12.00)));
        assert_eq!(parse_price("$1,299.99"), Some(dec!(1299.99)));
        assert_eq!(parse_price("12,50 \u{20ac}"), Some(dec!(12.50)));
        assert_eq!(parse_price("10.00 - 20.00"), Some(dec!(10.00)));
        assert_eq!(parse_price("25&nbsp;\u{20bc}"), Some(dec!(25)));
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("free"), None);
    }

    proptest! {
        #[test]
        fn prop_round_trip_within_tolerance(
            cents in 1i64..100_000_000,
            from in 0usize..4,
            to in 0usize..4,
        ) {
            let rates = ExchangeRates::default();
            let (a, b) = (Currency::ALL[from], Currency::ALL[to]);
            let amount = Decimal::new(cents, 2);
            let back = rates.convert(rates.convert(amount, a, b), b, a);
            let tolerance = amount * dec!(0.000000001);
            prop_assert!((back - amount).abs() <= tolerance, "{} -> {} -> {}: {} vs {}", a, b, a, amount, back);
        }
    }
}
