use std::fmt::Display;

/// A decimal number with at most two decimal places, stored as hundredths to
/// avoid float rounding. Displays with exactly two places (`5` -> `5.00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalAmount(i64);

const DECIMAL_PLACES: usize = 2;

impl DecimalAmount {
    pub fn parse(number: &str) -> Result<Self, String> {
        let not_a_number = || "Enter a number.".to_string();

        let number = number.trim();
        let (negative, unsigned) = match number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, number.strip_prefix('+').unwrap_or(number)),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if whole.len() + fraction.len() == 0 || !digits_only(whole) || !digits_only(fraction) {
            return Err(not_a_number());
        }
        if fraction.len() > DECIMAL_PLACES {
            return Err(format!(
                "Ensure that there are no more than {DECIMAL_PLACES} decimal places."
            ));
        }

        let whole: i64 = match whole {
            "" => 0,
            w => w.parse().map_err(|_| not_a_number())?,
        };
        let fraction: i64 = format!("{:0<width$}", fraction, width = DECIMAL_PLACES)
            .parse()
            .map_err(|_| not_a_number())?;
        let hundredths = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(fraction))
            .ok_or_else(not_a_number)?;

        Ok(Self(match negative {
            true => -hundredths,
            false => hundredths,
        }))
    }
}

impl Display for DecimalAmount {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
