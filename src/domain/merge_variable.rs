use serde::Deserialize;
use serde_aux::field_attributes::deserialize_default_from_null;

/// The kinds of merge variable a list can declare. Values the provider may add
/// in the future (or exotic ones like `radio` and `imageurl`) deserialize into
/// `Unsupported`, so that a single unknown field does not break the whole
/// form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Email,
    Text,
    Zip,
    Number,
    Phone,
    Dropdown,
    Date,
    Address,
    /// The provider calls this one `url`
    #[serde(rename = "url", alias = "website")]
    Website,
    /// Month and day only, unlike `Date`
    Birthday,
    #[serde(other)]
    Unsupported,
}

/// A provider-defined subscriber field, e.g. `EMAIL`, `FNAME` or `ZIP`.
///
/// Read-only; a list's merge variables are fetched once per form and passed
/// in as-is. Missing keys are a deserialization error, not something we try
/// to recover from.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeVariable {
    /// Unique within a list; doubles as the html input name
    pub tag: String,
    pub field_type: FieldType,
    /// Human readable label
    pub name: String,
    #[serde(rename = "req")]
    pub required: bool,
    #[serde(rename = "helptext", default, deserialize_with = "deserialize_default_from_null")]
    pub help_text: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub default: String,
    /// `false` means the field is not meant to be filled in by the user
    pub show: bool,
    /// Only meaningful for `FieldType::Dropdown`
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub choices: Vec<String>,
}

impl MergeVariable {
    /// A visible, optional merge variable with no help text or default.
    /// Mostly useful for building fixtures.
    pub fn new(
        tag: &str,
        field_type: FieldType,
        name: &str,
    ) -> Self {
        Self {
            tag: tag.to_string(),
            field_type,
            name: name.to_string(),
            required: false,
            help_text: String::new(),
            default: String::new(),
            show: true,
            choices: vec![],
        }
    }
}
