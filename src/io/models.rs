//! Wire models for the IO App API.
//!
//! These mirror the JSON payloads of <https://developer.io.italia.it/openapi.html>
//! and are carried as contracts only; message content is never interpreted
//! by this crate.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payee {
    pub fiscal_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentData {
    pub amount: u64,
    pub notice_number: String,
    pub invalid_after_due_date: bool,
    pub payee: Payee,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionData {
    pub nre: String,
    pub iup: String,
    pub prescriber_fiscal_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegalData {
    pub sender_email_from: String,
    pub has_attachment: bool,
    pub message_unique_id: String,
    pub original_message_url: String,
    pub pec_server_service_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EuCovidCert {
    pub auth_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageContent {
    pub subject: String,
    pub markdown: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<PaymentData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription_data: Option<PrescriptionData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_data: Option<LegalData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eu_covid_cert: Option<EuCovidCert>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultAddresses {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationStatus {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMessageResponse {
    pub message: MessageContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationStatus>,
}

/// Profile of a user as visible to the calling service.
///
/// `sender_allowed` is false when the user exists but has opted out of
/// messages from this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub sender_allowed: bool,
}

/// Subscription deltas for a single calendar date.
///
/// Entries are SHA-256 hashes of fiscal codes, never the codes themselves.
/// The two lists are taken as the API reports them; nothing here assumes
/// they are disjoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionsFeed {
    pub date_utc: NaiveDate,
    #[serde(default)]
    pub subscriptions: Vec<String>,
    #[serde(default)]
    pub unsubscriptions: Vec<String>,
}
