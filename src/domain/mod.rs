mod decimal_amount;
mod merge_variable;
mod subscriber_email;
mod subscription_request;
mod text_value;
mod us_phone_number;
mod us_zip_code;
// allow external `use` statements to skip `merge_variable` etc
pub use decimal_amount::DecimalAmount;
pub use merge_variable::FieldType;
pub use merge_variable::MergeVariable;
pub use subscriber_email::SubscriberEmail;
pub use subscription_request::SubscriptionRequest;
pub use text_value::TextValue;
pub use us_phone_number::UsPhoneNumber;
pub use us_zip_code::UsZipCode;
