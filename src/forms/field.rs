use chrono::NaiveDate;

use super::EMAIL_TAG;
use crate::domain::DecimalAmount;
use crate::domain::FieldType;
use crate::domain::MergeVariable;
use crate::domain::SubscriberEmail;
use crate::domain::TextValue;
use crate::domain::UsPhoneNumber;
use crate::domain::UsZipCode;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const ZIP_FALLBACK_HELP_TEXT: &str = "Enter in your US zip code.";

/// Accepted date spellings, tried in order
// two digit years first, `%Y` would happily read `99` as the year 99
const DATE_INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];
/// How dates are sent to the provider
const DATE_OUTPUT_FORMAT: &str = "%Y-%m-%d";

/// What a field accepts. Mirrors the implemented subset of `FieldType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Email,
    Text,
    /// US only
    Zip,
    /// Two decimal places
    Number,
    /// US only
    Phone,
    /// The choices double as their own labels
    Dropdown(Vec<String>),
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    Visible,
    /// Round-trips a default value the user never sees
    Hidden,
}

/// One input of the subscribe form, derived from a single merge variable and
/// never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub tag: String,
    pub kind: FieldKind,
    pub label: String,
    pub help_text: String,
    pub required: bool,
    pub initial: Option<String>,
    pub widget: Widget,
}

impl FormField {
    /// `None` for merge variable types we can't render yet (address, website,
    /// birthday, and anything the provider added that we don't know about).
    pub fn from_merge_variable(var: &MergeVariable) -> Option<Self> {
        let kind = match var.field_type {
            FieldType::Email => FieldKind::Email,
            FieldType::Text => FieldKind::Text,
            FieldType::Zip => FieldKind::Zip,
            FieldType::Number => FieldKind::Number,
            FieldType::Phone => FieldKind::Phone,
            FieldType::Dropdown => FieldKind::Dropdown(var.choices.clone()),
            FieldType::Date => FieldKind::Date,
            FieldType::Address
            | FieldType::Website
            | FieldType::Birthday
            | FieldType::Unsupported => {
                tracing::debug!(
                    tag = %var.tag,
                    field_type = ?var.field_type,
                    "skipping merge variable without a form field"
                );
                return None;
            }
        };

        // an empty required initial value would show an error on first load
        let initial = (!var.default.is_empty()).then(|| var.default.clone());
        let widget = match (var.show, &initial) {
            (false, Some(_)) => Widget::Hidden,
            _ => Widget::Visible,
        };
        let help_text = match (&kind, var.help_text.is_empty()) {
            (FieldKind::Zip, true) => ZIP_FALLBACK_HELP_TEXT.to_string(),
            _ => var.help_text.clone(),
        };

        Some(Self {
            tag: var.tag.clone(),
            kind,
            label: var.name.clone(),
            help_text,
            // the provider can't subscribe anyone without an address, whatever
            // the list claims
            required: var.required || var.tag == EMAIL_TAG,
            initial,
            widget,
        })
    }

    pub fn max_length(&self) -> Option<usize> {
        match self.kind {
            FieldKind::Text => Some(TextValue::MAX_LENGTH),
            _ => None,
        }
    }

    /// Validate raw user input and normalise it to what the provider expects.
    /// Optional fields left blank clean to an empty string.
    pub fn clean(
        &self,
        raw: Option<&str>,
    ) -> Result<String, String> {
        let raw = raw.unwrap_or_default();
        if raw.trim().is_empty() {
            return match self.required {
                true => Err(REQUIRED_MESSAGE.to_string()),
                false => Ok(String::new()),
            };
        }

        match &self.kind {
            FieldKind::Email => SubscriberEmail::parse(raw.to_string()).map(|e| e.as_ref().to_string()),
            FieldKind::Text => TextValue::parse(raw).map(|t| t.as_ref().to_string()),
            FieldKind::Zip => UsZipCode::parse(raw).map(|z| z.as_ref().to_string()),
            FieldKind::Number => DecimalAmount::parse(raw).map(|n| n.to_string()),
            FieldKind::Phone => UsPhoneNumber::parse(raw).map(|p| p.as_ref().to_string()),
            FieldKind::Dropdown(choices) => match choices.iter().any(|c| c == raw) {
                true => Ok(raw.to_string()),
                false => Err(format!(
                    "Select a valid choice. {raw} is not one of the available choices."
                )),
            },
            FieldKind::Date => DATE_INPUT_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw.trim(), fmt).ok())
                .map(|d| d.format(DATE_OUTPUT_FORMAT).to_string())
                .ok_or_else(|| "Enter a valid date.".to_string()),
        }
    }
}

/// The fields of one form, in merge variable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet(Vec<FormField>);

impl FieldSet {
    /// One field per implemented merge variable; the rest are skipped
    /// without error.
    pub fn from_merge_variables(merge_vars: &[MergeVariable]) -> Self {
        Self(
            merge_vars
                .iter()
                .filter_map(FormField::from_merge_variable)
                .collect(),
        )
    }

    pub fn get(
        &self,
        tag: &str,
    ) -> Option<&FormField> {
        self.0.iter().find(|f| f.tag == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormField> { self.0.iter() }
}
