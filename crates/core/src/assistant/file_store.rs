//! File-based assistant storage implementation
//!
//! Stores assistants as JSON in a file on disk.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

use super::model::{Assistant, PutAssistantRequest, PUBLIC_USER_ID};
use super::repository::AssistantRepository;
use crate::{Error, Result};

type AssistantKey = (String, String);

fn key(user_id: &str, assistant_id: &str) -> AssistantKey {
    (user_id.to_string(), assistant_id.to_string())
}

/// File-based assistant store using JSON
pub struct FileAssistantStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory cache keyed by (owner, assistant id)
    cache: RwLock<HashMap<AssistantKey, Assistant>>,
}

impl FileAssistantStore {
    /// Create a new FileAssistantStore
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
                Error::Storage(format!("Failed to read assistants file: {}", e))
            })?;
            let assistants: Vec<Assistant> = serde_json::from_str(&content).map_err(|e| {
                Error::Storage(format!("Failed to parse assistants file: {}", e))
            })?;
            assistants
                .into_iter()
                .map(|a| (key(&a.user_id, &a.assistant_id), a))
                .collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    /// Persist the cache to disk
    ///
    /// Callers hold the cache write lock, so writes never interleave. The
    /// snapshot goes to a sibling temp file that is renamed over the target.
    async fn persist(&self, cache: &HashMap<AssistantKey, Assistant>) -> Result<()> {
        let mut assistants: Vec<&Assistant> = cache.values().collect();
        assistants.sort_by(|a, b| {
            (&a.user_id, &a.assistant_id).cmp(&(&b.user_id, &b.assistant_id))
        });
        let content = serde_json::to_string_pretty(&assistants)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    async fn list_owned(&self, user_id: &str) -> Vec<Assistant> {
        let cache = self.cache.read().await;
        let mut assistants: Vec<Assistant> = cache
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        assistants.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        assistants
    }
}

#[async_trait]
impl AssistantRepository for FileAssistantStore {
    async fn get(&self, user_id: &str, assistant_id: &str) -> Result<Option<Assistant>> {
        let cache = self.cache.read().await;
        Ok(cache.get(&key(user_id, assistant_id)).cloned())
    }

    async fn put(
        &self,
        user_id: &str,
        assistant_id: &str,
        request: PutAssistantRequest,
    ) -> Result<Assistant> {
        let assistant = Assistant::new(user_id, assistant_id, request.name, request.config)
            .with_public(request.public);

        {
            let mut cache = self.cache.write().await;
            cache.insert(key(user_id, assistant_id), assistant.clone());

            if assistant.public && user_id != PUBLIC_USER_ID {
                let mut shared = assistant.clone();
                shared.user_id = PUBLIC_USER_ID.to_string();
                cache.insert(key(PUBLIC_USER_ID, assistant_id), shared);
            }

            self.persist(&cache).await?;
        }

        tracing::debug!(user_id, assistant_id, public = assistant.public, "Saved assistant");
        Ok(assistant)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Assistant>> {
        Ok(self.list_owned(user_id).await)
    }

    async fn list_public(&self) -> Result<Vec<Assistant>> {
        Ok(self.list_owned(PUBLIC_USER_ID).await)
    }
}
