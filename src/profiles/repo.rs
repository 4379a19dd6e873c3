use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::dto::ProfileRow;

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn find_profile(&self, user_id: &str) -> anyhow::Result<Option<ProfileRow>>;
}

#[derive(Clone)]
pub struct PgProfileRepo {
    db: PgPool,
}

impl PgProfileRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepo for PgProfileRepo {
    /// Reads the row as JSON so absent or retyped columns never break decoding.
    async fn find_profile(&self, user_id: &str) -> anyhow::Result<Option<ProfileRow>> {
        let row = sqlx::query_as::<_, (serde_json::Value,)>(
            r#"
            SELECT to_jsonb(p)
              FROM profiles p
             WHERE p.id::text = $1
             LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("select profile")?;

        row.map(|(raw,)| serde_json::from_value(raw).context("decode profile row"))
            .transpose()
    }
}
