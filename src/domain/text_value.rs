use unicode_segmentation::UnicodeSegmentation;

/// Free-form text for a `text` merge variable. The provider truncates text
/// merge fields at 255 characters, so longer input is rejected up front
/// rather than silently cut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextValue(String);

impl TextValue {
    pub const MAX_LENGTH: usize = 255;

    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        // graphemes, not bytes or chars: "é" typed as e + combining accent is one
        let length = text.graphemes(true).count();
        match length > Self::MAX_LENGTH {
            true => Err(format!(
                "Ensure this value has at most {} characters (it has {length}).",
                Self::MAX_LENGTH
            )),
            false => Ok(Self(text.to_string())),
        }
    }
}

impl AsRef<str> for TextValue {
    fn as_ref(&self) -> &str { &self.0 }
}
