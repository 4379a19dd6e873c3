use std::sync::Arc;

use tracing::{debug, warn};

use super::dto::UserProfile;
use super::repo::ProfileRepo;

#[derive(Clone)]
pub struct ProfileLoader {
    repo: Arc<dyn ProfileRepo>,
}

impl ProfileLoader {
    pub fn new(repo: Arc<dyn ProfileRepo>) -> Self {
        Self { repo }
    }

    /// Always yields a profile; lookup failures and unknown users get
    /// `UserProfile::fallback()`.
    pub async fn load(&self, user_id: &str) -> UserProfile {
        match self.repo.find_profile(user_id).await {
            Ok(Some(row)) => {
                let profile = UserProfile::from_row(row);
                debug!(%user_id, ?profile, "profile loaded");
                profile
            }
            Ok(None) => {
                debug!(%user_id, "no profile stored; using defaults");
                UserProfile::fallback()
            }
            Err(e) => {
                warn!(%user_id, error = %format!("{e:#}"), "profile lookup failed; using defaults");
                UserProfile::fallback()
            }
        }
    }
}
