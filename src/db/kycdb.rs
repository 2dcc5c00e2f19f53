// db/kycdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::kycmodel::{DocumentType, KycDocument, KycStatus};

#[async_trait]
pub trait KycExt {
    async fn submit_document(
        &self,
        user_id: Uuid,
        document_type: DocumentType,
        document_url: String,
        reference: String,
    ) -> Result<KycDocument, Error>;

    async fn get_documents_for_user(&self, user_id: Uuid) -> Result<Vec<KycDocument>, Error>;

    async fn get_document_by_id(&self, document_id: Uuid) -> Result<Option<KycDocument>, Error>;

    async fn get_pending_documents(&self, page: u32, limit: usize)
        -> Result<Vec<KycDocument>, Error>;

    /// Records the admin decision. Conditional on the document still being
    /// pending so two concurrent reviews cannot both land.
    async fn review_document(
        &self,
        document_id: Uuid,
        reviewer_id: Uuid,
        status: KycStatus,
        review_notes: Option<String>,
    ) -> Result<Option<KycDocument>, Error>;
}

const KYC_COLUMNS: &str = r#"
    id, user_id, document_type, document_url, reference, status,
    reviewed_by, review_notes, submitted_at, reviewed_at
"#;

#[async_trait]
impl KycExt for DBClient {
    async fn submit_document(
        &self,
        user_id: Uuid,
        document_type: DocumentType,
        document_url: String,
        reference: String,
    ) -> Result<KycDocument, Error> {
        sqlx::query_as::<_, KycDocument>(&format!(
            r#"
            INSERT INTO kyc_documents (user_id, document_type, document_url, reference)
            VALUES ($1, $2, $3, $4)
            RETURNING {KYC_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(document_type)
        .bind(document_url)
        .bind(reference)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_documents_for_user(&self, user_id: Uuid) -> Result<Vec<KycDocument>, Error> {
        sqlx::query_as::<_, KycDocument>(&format!(
            r#"
            SELECT {KYC_COLUMNS}
            FROM kyc_documents
            WHERE user_id = $1
            ORDER BY submitted_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_document_by_id(&self, document_id: Uuid) -> Result<Option<KycDocument>, Error> {
        sqlx::query_as::<_, KycDocument>(&format!(
            r#"
            SELECT {KYC_COLUMNS}
            FROM kyc_documents
            WHERE id = $1
            "#
        ))
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_pending_documents(
        &self,
        page: u32,
        limit: usize,
    ) -> Result<Vec<KycDocument>, Error> {
        let offset = (page.saturating_sub(1) as i64) * limit as i64;

        sqlx::query_as::<_, KycDocument>(&format!(
            r#"
            SELECT {KYC_COLUMNS}
            FROM kyc_documents
            WHERE status = 'pending'::kyc_status
            ORDER BY submitted_at ASC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn review_document(
        &self,
        document_id: Uuid,
        reviewer_id: Uuid,
        status: KycStatus,
        review_notes: Option<String>,
    ) -> Result<Option<KycDocument>, Error> {
        sqlx::query_as::<_, KycDocument>(&format!(
            r#"
            UPDATE kyc_documents
            SET status = $3, reviewed_by = $2, review_notes = $4, reviewed_at = NOW()
            WHERE id = $1
              AND status = 'pending'::kyc_status
            RETURNING {KYC_COLUMNS}
            "#
        ))
        .bind(document_id)
        .bind(reviewer_id)
        .bind(status)
        .bind(review_notes)
        .fetch_optional(&self.pool)
        .await
    }
}
