use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::UserInputError;
use crate::models::{Task, UserId};

/// Per-user ordered task lists. Insertion order is display order and the
/// index shown to the user is always `position + 1`.
#[async_trait]
pub trait TaskStorage: Send + Sync {
    async fn add(&self, user_id: UserId, text: &str) -> Result<Task, UserInputError>;
    async fn list(&self, user_id: UserId) -> Vec<Task>;
    async fn delete_by_index(&self, user_id: UserId, index: usize) -> Result<Task, UserInputError>;
    async fn delete_by_position(
        &self,
        user_id: UserId,
        position: usize,
    ) -> Result<Task, UserInputError>;
}

pub struct InMemoryTaskStorage {
    store: RwLock<HashMap<UserId, Vec<Task>>>,
}

impl InMemoryTaskStorage {
    pub fn new() -> Self {
        InMemoryTaskStorage {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryTaskStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStorage for InMemoryTaskStorage {
    async fn add(&self, user_id: UserId, text: &str) -> Result<Task, UserInputError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(UserInputError::EmptyTaskText);
        }

        let mut store = self.store.write().await;
        let tasks = store.entry(user_id).or_default();
        tasks.push(text.to_string());

        log::debug!("User {} now has {} tasks", user_id, tasks.len());
        Ok(text.to_string())
    }

    async fn list(&self, user_id: UserId) -> Vec<Task> {
        let store = self.store.read().await;
        store.get(&user_id).cloned().unwrap_or_default()
    }

    async fn delete_by_index(&self, user_id: UserId, index: usize) -> Result<Task, UserInputError> {
        let position = index.checked_sub(1).ok_or(UserInputError::InvalidIndex)?;
        self.delete_by_position(user_id, position).await
    }

    async fn delete_by_position(
        &self,
        user_id: UserId,
        position: usize,
    ) -> Result<Task, UserInputError> {
        let mut store = self.store.write().await;
        match store.get_mut(&user_id) {
            Some(tasks) if position < tasks.len() => Ok(tasks.remove(position)),
            _ => Err(UserInputError::InvalidIndex),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const USER: UserId = 42;

    #[tokio::test]
    async fn blank_text_is_rejected() {
        let storage = InMemoryTaskStorage::new();

        assert_eq!(
            storage.add(USER, "   ").await,
            Err(UserInputError::EmptyTaskText)
        );
        assert!(storage.list(USER).await.is_empty());
    }

    #[tokio::test]
    async fn delete_by_index_is_one_based() {
        let storage = InMemoryTaskStorage::new();
        storage.add(USER, "Buy milk").await.unwrap();
        storage.add(USER, "Call mom").await.unwrap();

        assert_eq!(
            storage.delete_by_index(USER, 0).await,
            Err(UserInputError::InvalidIndex)
        );
        assert_eq!(
            storage.delete_by_index(USER, 3).await,
            Err(UserInputError::InvalidIndex)
        );
        assert_eq!(
            storage.delete_by_index(USER, 1).await,
            Ok("Buy milk".to_string())
        );
        assert_eq!(storage.list(USER).await, vec!["Call mom".to_string()]);
    }

    #[tokio::test]
    async fn delete_by_position_is_zero_based() {
        let storage = InMemoryTaskStorage::new();
        storage.add(USER, "first").await.unwrap();
        storage.add(USER, "second").await.unwrap();

        assert_eq!(
            storage.delete_by_position(USER, 1).await,
            Ok("second".to_string())
        );
        assert_eq!(
            storage.delete_by_position(USER, 1).await,
            Err(UserInputError::InvalidIndex)
        );
    }

    #[tokio::test]
    async fn users_do_not_share_tasks() {
        let storage = InMemoryTaskStorage::new();
        storage.add(1, "mine").await.unwrap();

        assert!(storage.list(2).await.is_empty());
        assert_eq!(
            storage.delete_by_index(2, 1).await,
            Err(UserInputError::InvalidIndex)
        );
    }

    #[derive(Debug, Clone)]
    enum Operation {
        Add(String),
        Delete(usize),
    }

    fn operation_strategy() -> impl Strategy<Value = Operation> {
        prop_oneof![
            "[a-z]{1,8}".prop_map(Operation::Add),
            (0usize..6).prop_map(Operation::Delete),
        ]
    }

    proptest! {
        #[test]
        fn displayed_index_tracks_live_position(
            operations in proptest::collection::vec(operation_strategy(), 0..40)
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            runtime.block_on(async {
                let storage = InMemoryTaskStorage::new();
                let mut model: Vec<String> = Vec::new();

                for operation in operations {
                    match operation {
                        Operation::Add(text) => {
                            storage.add(USER, &text).await.unwrap();
                            model.push(text);
                        }
                        Operation::Delete(index) => {
                            let result = storage.delete_by_index(USER, index).await;
                            if index >= 1 && index <= model.len() {
                                prop_assert_eq!(result, Ok(model.remove(index - 1)));
                            } else {
                                prop_assert_eq!(result, Err(UserInputError::InvalidIndex));
                            }
                        }
                    }

                    let listed = storage.list(USER).await;
                    prop_assert_eq!(&listed, &model);
                }

                Ok(())
            })?;
        }
    }
}
