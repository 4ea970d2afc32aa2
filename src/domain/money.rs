use std::fmt;

/// Amounts are plain `f64` values. Totals are accumulated in insertion order
/// so that rounding is reproducible from one run to the next.
pub type Amount = f64;

/// Format an amount with exactly two decimal places.
/// Example: 50.0 -> "50.00", -12.345 -> "-12.35", 0.1 + 0.2 -> "0.30"
pub fn format_amount(amount: Amount) -> String {
    format!("{:.2}", amount)
}

/// Parse a decimal string into an amount.
/// Thousands separators are stripped before parsing: "1,234.50" -> 1234.5
///
/// Surrounding whitespace is trimmed, so " 7.25" parses as 7.25 rather than
/// being rejected the way a strict float parser would reject it.
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err(ParseAmountError::Empty);
    }
    cleaned
        .parse::<Amount>()
        .map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))
}

/// Outcome of a best-effort amount parse.
#[derive(Debug, Clone, PartialEq)]
pub struct LenientAmount {
    pub value: Amount,
    /// Set when the input could not be parsed and `value` fell back to zero.
    pub warning: Option<ParseAmountError>,
}

/// Parse an amount, falling back to `0.0` for malformed input.
///
/// The fallback is never silent: the parse error is returned alongside the
/// value so the caller can report it (console message, import warning, log).
pub fn parse_amount_or_zero(input: &str) -> LenientAmount {
    match parse_amount(input) {
        Ok(value) => LenientAmount {
            value,
            warning: None,
        },
        Err(err) => {
            tracing::warn!(input, error = %err, "amount fell back to zero");
            LenientAmount {
                value: 0.0,
                warning: Some(err),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidFormat(String),
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "empty amount"),
            ParseAmountError::InvalidFormat(input) => {
                write!(f, "invalid amount format: {:?}", input)
            }
        }
    }
}

impl std::error::Error for ParseAmountError {}
