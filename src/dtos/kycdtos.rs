use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::kycmodel::DocumentType;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SubmitKycDto {
    pub document_type: DocumentType,

    #[validate(url(message = "Invalid document URL"))]
    pub document_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum KycDecision {
    Approve,
    Reject,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReviewKycDto {
    pub decision: KycDecision,

    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}
