use async_trait::async_trait;

use super::SqliteRepository;
use super::kv;
use crate::repository::{
    SessionRecord, SessionRepository, StorageError, TOKEN_KEY, USER_KEY, decode_user, encode_user,
};

fn connection<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl SessionRepository for SqliteRepository {
    async fn load_session(&self) -> Result<Option<SessionRecord>, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(connection)?;
        let Some(token) = kv::get(&mut conn, TOKEN_KEY).await? else {
            return Ok(None);
        };
        let user = kv::get(&mut conn, USER_KEY)
            .await?
            .map(|entry| decode_user(&entry.value))
            .transpose()?;
        Ok(Some(SessionRecord {
            token: token.value,
            user,
            signed_in_at: token.updated_at,
        }))
    }

    async fn save_session(&self, session: &SessionRecord) -> Result<(), StorageError> {
        let user = session.user.as_ref().map(encode_user).transpose()?;
        let mut tx = self.pool.begin().await.map_err(connection)?;
        kv::put(&mut tx, TOKEN_KEY, &session.token, session.signed_in_at).await?;
        match user {
            Some(value) => kv::put(&mut tx, USER_KEY, &value, session.signed_in_at).await?,
            None => kv::delete(&mut tx, USER_KEY).await?,
        }
        tx.commit().await.map_err(connection)?;
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(connection)?;
        kv::delete(&mut tx, TOKEN_KEY).await?;
        kv::delete(&mut tx, USER_KEY).await?;
        tx.commit().await.map_err(connection)?;
        Ok(())
    }
}
