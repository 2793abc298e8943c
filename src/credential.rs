//! Placeholder credential minting.
//!
//! Generates a random identifier and a timestamp; nothing is written
//! on-chain. A real implementation would mint a token against the verified
//! work-experience record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::WorkExperienceRecord;

/// Metadata carried by a minted credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialMetadata {
    pub company: String,
    pub role: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub verified_by: String,
}

impl CredentialMetadata {
    pub fn from_record(record: &WorkExperienceRecord, verified_by: &str) -> Self {
        Self {
            company: record.company_name.clone(),
            role: record.role_title.clone(),
            start_date: record.start_date.to_string(),
            end_date: record.end_date.map(|d| d.to_string()),
            verified_by: verified_by.to_string(),
        }
    }
}

/// A minted verification credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StampCredential {
    pub token_address: String,
    pub metadata: CredentialMetadata,
    pub minted_at: DateTime<Utc>,
}

/// Mint a credential for verified metadata.
pub fn mint_credential(metadata: CredentialMetadata) -> StampCredential {
    StampCredential {
        token_address: Uuid::new_v4().to_string(),
        metadata,
        minted_at: Utc::now(),
    }
}
