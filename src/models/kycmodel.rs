use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "document_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    NationalId,
    DriverLicense,
    Passport,
    UtilityBill,
    TradeCertificate,
}

impl DocumentType {
    pub fn to_str(&self) -> &str {
        match self {
            DocumentType::NationalId => "national_id",
            DocumentType::DriverLicense => "driver_license",
            DocumentType::Passport => "passport",
            DocumentType::UtilityBill => "utility_bill",
            DocumentType::TradeCertificate => "trade_certificate",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "kyc_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct KycDocument {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_type: DocumentType,
    pub document_url: String,
    pub reference: String,
    pub status: KycStatus,
    pub reviewed_by: Option<Uuid>,
    pub review_notes: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>, // Database has DEFAULT NOW(), can be NULL
    pub reviewed_at: Option<DateTime<Utc>>,
}
