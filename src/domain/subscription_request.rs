use std::collections::BTreeMap;
use std::net::IpAddr;

use chrono::DateTime;
use chrono::Utc;

use super::SubscriberEmail;

/// Merge variable key under which the requester's ip is sent
const SUBSCRIBER_IP_KEY: &str = "subscriber_IP";
/// Merge variable key under which the submission time is sent
const OPTIN_TIME_KEY: &str = "optin_time";
const OPTIN_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything the provider needs to subscribe one address. Built once per
/// submission attempt from already cleaned form values, then dropped.
#[derive(Debug)]
pub struct SubscriptionRequest {
    pub email: SubscriberEmail,
    /// Cleaned form values, keyed by merge variable tag
    pub values: BTreeMap<String, String>,
    pub optin_time: DateTime<Utc>,
    pub subscriber_ip: Option<IpAddr>,
    pub double_optin: bool,
}

impl SubscriptionRequest {
    /// Stamps the request with the current time.
    pub fn new(
        email: SubscriberEmail,
        values: BTreeMap<String, String>,
        subscriber_ip: Option<IpAddr>,
        double_optin: bool,
    ) -> Self {
        Self {
            email,
            values,
            optin_time: Utc::now(),
            subscriber_ip,
            double_optin,
        }
    }

    /// The `merge_vars` mapping as sent to the provider: the form values plus
    /// the reserved ip and timestamp keys.
    pub fn merge_vars(&self) -> BTreeMap<String, String> {
        let mut merge_vars = self.values.clone();
        if let Some(ip) = self.subscriber_ip {
            merge_vars.insert(SUBSCRIBER_IP_KEY.to_string(), ip.to_string());
        }
        merge_vars.insert(
            OPTIN_TIME_KEY.to_string(),
            self.optin_time.format(OPTIN_TIME_FORMAT).to_string(),
        );
        merge_vars
    }
}
