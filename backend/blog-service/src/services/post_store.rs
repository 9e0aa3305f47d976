//! In-memory post store
//!
//! All state lives behind one mutex. Every operation holds the lock for its
//! whole critical section, so id generation and insertion are a single unit
//! and no caller ever sees the map mid-mutation.
//!
//! Records handed back to callers are owned clones: a `Post` obtained from
//! `read` is a snapshot and does not change when the stored record is later
//! updated.

use crate::error::PostNotFound;
use crate::models::{NewPost, Post, PostChanges};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

const POST_ID_PREFIX: &str = "post-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

#[derive(Debug, Default)]
struct Inner {
    posts: HashMap<String, Post>,
    // Only ever increases, so ids are not reused after deletes
    next_seq: u64,
}

impl Inner {
    fn next_id(&mut self) -> String {
        self.next_seq += 1;
        format!("{}{}", POST_ID_PREFIX, self.next_seq)
    }
}

#[derive(Debug, Default)]
pub struct PostStore {
    inner: Mutex<Inner>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, new_post: NewPost) -> Post {
        let mut inner = self.inner.lock().await;
        let id = inner.next_id();
        let post = Post::from_new(id.clone(), new_post);
        inner.posts.insert(id, post.clone());
        debug!(post_id = %post.id, total = inner.posts.len(), "post stored");
        post
    }

    pub async fn read(&self, post_id: &str) -> Result<Post, PostNotFound> {
        let inner = self.inner.lock().await;
        inner
            .posts
            .get(post_id)
            .cloned()
            .ok_or_else(|| PostNotFound::new(post_id))
    }

    /// Overwrite title, content, author and tags of an existing post in place.
    pub async fn update(&self, post_id: &str, changes: PostChanges) -> Result<Post, PostNotFound> {
        let mut inner = self.inner.lock().await;
        let post = inner
            .posts
            .get_mut(post_id)
            .ok_or_else(|| PostNotFound::new(post_id))?;
        post.apply(changes);
        Ok(post.clone())
    }

    pub async fn delete(&self, post_id: &str) -> DeleteOutcome {
        let mut inner = self.inner.lock().await;
        match inner.posts.remove(post_id) {
            Some(_) => {
                debug!(post_id, total = inner.posts.len(), "post removed");
                DeleteOutcome::Deleted
            }
            None => DeleteOutcome::NotFound,
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.posts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.posts.is_empty()
    }
}
