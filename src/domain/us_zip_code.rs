/// A US ZIP code, either `XXXXX` or ZIP+4 (`XXXXX-XXXX`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsZipCode(String);

impl UsZipCode {
    pub fn parse(zip: &str) -> Result<Self, String> {
        let zip = zip.trim();
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        let ok = match zip.split_once('-') {
            None => zip.len() == 5 && all_digits(zip),
            Some((head, tail)) => {
                head.len() == 5 && tail.len() == 4 && all_digits(head) && all_digits(tail)
            }
        };
        match ok {
            true => Ok(Self(zip.to_string())),
            false => Err("Enter a zip code in the format XXXXX or XXXXX-XXXX.".to_string()),
        }
    }
}

impl AsRef<str> for UsZipCode {
    fn as_ref(&self) -> &str { &self.0 }
}
