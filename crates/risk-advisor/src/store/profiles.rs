//! Assessment Archive
//!
//! Append-only record of every scored questionnaire, per user. A new
//! assessment supersedes the previous one; nothing is ever edited in place.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AdvisorError, Result};
use crate::model::RiskProfile;
use crate::questionnaire::QuestionnaireResponse;

/// One scored questionnaire
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: Uuid,
    pub user_id: String,
    pub questionnaire: QuestionnaireResponse,
    pub profile: RiskProfile,
    pub assessed_at: DateTime<Utc>,
}

impl Assessment {
    pub fn new(
        user_id: impl Into<String>,
        questionnaire: QuestionnaireResponse,
        profile: RiskProfile,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            questionnaire,
            profile,
            assessed_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn record(&self, assessment: Assessment) -> Result<()>;

    /// Most recent assessment for the user
    async fn latest(&self, user_id: &str) -> Result<Assessment>;

    /// Every assessment for the user, oldest first. Empty for unknown users.
    async fn history(&self, user_id: &str) -> Result<Vec<Assessment>>;
}

/// In-process archive; lost on restart
#[derive(Default)]
pub struct MemoryProfileStore {
    assessments: RwLock<HashMap<String, Vec<Assessment>>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn record(&self, assessment: Assessment) -> Result<()> {
        let user_id = assessment.user_id.trim();
        if user_id.is_empty() {
            return Err(AdvisorError::validation("user_id cannot be empty"));
        }

        tracing::debug!(
            user_id = %user_id,
            score = assessment.profile.score,
            "Recording risk assessment"
        );

        self.assessments
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .push(assessment);
        Ok(())
    }

    async fn latest(&self, user_id: &str) -> Result<Assessment> {
        self.assessments
            .read()
            .await
            .get(user_id.trim())
            .and_then(|history| history.last())
            .cloned()
            .ok_or_else(|| AdvisorError::NotFound(format!("no assessment for user {user_id}")))
    }

    async fn history(&self, user_id: &str) -> Result<Vec<Assessment>> {
        Ok(self
            .assessments
            .read()
            .await
            .get(user_id.trim())
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::Factor;

    fn questionnaire() -> QuestionnaireResponse {
        QuestionnaireResponse::new()
            .answer(Factor::AgeBracket, "25_34")
            .answer(Factor::IncomeBracket, "high")
            .answer(Factor::Experience, "advanced")
            .answer(Factor::RiskTolerance, "high")
            .answer(Factor::TimeHorizon, "long")
    }

    #[tokio::test]
    async fn test_reassessment_supersedes() {
        let store = MemoryProfileStore::new();
        let first = Assessment::new("alice", questionnaire(), RiskProfile::for_score(8).unwrap());
        let second = Assessment::new("alice", questionnaire(), RiskProfile::for_score(5).unwrap());

        store.record(first.clone()).await.unwrap();
        store.record(second.clone()).await.unwrap();

        assert_eq!(store.latest("alice").await.unwrap().id, second.id);

        let history = store.history("alice").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], first);
        assert!(store.history("bob").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let store = MemoryProfileStore::new();
        assert!(matches!(store.latest("nobody").await, Err(AdvisorError::NotFound(_))));
        assert!(store.history("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_user_id_rejected() {
        let store = MemoryProfileStore::new();
        let assessment = Assessment::new("  ", questionnaire(), RiskProfile::for_score(3).unwrap());
        assert!(store.record(assessment).await.is_err());
    }
}
