/// A ten digit North American phone number, normalised to `XXX-XXX-XXXX`.
///
/// Accepts the usual ways of writing one: `(555) 123-4567`, `555.123.4567`,
/// `5551234567`, or any of these with a leading `1`/`1-` country code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsPhoneNumber(String);

/// Digit offsets at which a separator may appear in the ten digit number
const GROUP_BREAKS: [usize; 2] = [3, 6];

impl UsPhoneNumber {
    pub fn parse(phone: &str) -> Result<Self, String> {
        let invalid = || Err("Phone numbers must be in XXX-XXX-XXXX format.".to_string());

        let mut digits = String::new();
        // number of digits seen before each separator
        let mut breaks = vec![];
        let mut after_separator = true;

        for c in phone
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '(' && *c != ')')
        {
            match c {
                '0'..='9' => {
                    digits.push(c);
                    after_separator = false;
                }
                '-' | '.' if !after_separator => {
                    breaks.push(digits.len());
                    after_separator = true;
                }
                _ => return invalid(),
            }
        }
        // also rejects empty input
        if after_separator {
            return invalid();
        }

        let country_code = match digits.len() {
            10 => 0,
            11 if digits.starts_with('1') => 1,
            _ => return invalid(),
        };
        let breaks_ok = breaks.iter().all(|&b| {
            (country_code == 1 && b == 1)
                || (b > country_code && GROUP_BREAKS.contains(&(b - country_code)))
        });
        if !breaks_ok {
            return invalid();
        }

        let d = &digits[country_code..];
        Ok(Self(format!("{}-{}-{}", &d[..3], &d[3..6], &d[6..])))
    }
}

impl AsRef<str> for UsPhoneNumber {
    fn as_ref(&self) -> &str { &self.0 }
}
