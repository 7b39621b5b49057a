//! Community forum: the post list and single threads.

use super::resource::{Collection, ResourceScreen};
use crate::backend::api::client::Api;
use crate::backend::api::models::{Category, ForumPost, ForumThread, PostDraft, ReplyDraft};
use crate::utils::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::warn;

/// Posts, optionally narrowed to one category.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForumPosts;

pub type ForumScreen = ResourceScreen<ForumPosts>;

#[async_trait]
impl Collection for ForumPosts {
    type Scope = Option<Category>;
    type Items = Vec<ForumPost>;
    type Draft = PostDraft;

    fn label(&self) -> &'static str {
        "forum posts"
    }

    async fn fetch(&self, api: &Api, scope: &Option<Category>) -> Result<Vec<ForumPost>> {
        let mut posts = api.forum_posts(*scope).await?;
        if let Some(category) = scope {
            let before = posts.len();
            posts.retain(|post| post.category == *category);
            if posts.len() != before {
                warn!(
                    "Server returned {} posts outside category {category}",
                    before - posts.len()
                );
            }
        }
        Ok(posts)
    }

    async fn create(&self, api: &Api, _scope: &Option<Category>, draft: &PostDraft) -> Result<()> {
        api.create_post(draft).await.map(drop)
    }
}

/// One post with its replies; replies are append-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thread;

/// Id of the post a thread screen shows. Has no default, so a thread screen always
/// names its post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(pub i64);

pub type ThreadScreen = ResourceScreen<Thread>;

#[async_trait]
impl Collection for Thread {
    type Scope = PostId;
    type Items = Option<ForumThread>;
    type Draft = ReplyDraft;

    fn label(&self) -> &'static str {
        "forum thread"
    }

    async fn fetch(&self, api: &Api, post: &PostId) -> Result<Option<ForumThread>> {
        api.forum_post(post.0).await.map(Some)
    }

    async fn create(&self, api: &Api, post: &PostId, draft: &ReplyDraft) -> Result<()> {
        api.create_reply(post.0, draft).await.map(drop)
    }
}

impl ResourceScreen<Thread> {
    /// Screen for the thread of `post_id`.
    pub fn for_post(api: std::sync::Arc<Api>, post_id: i64) -> Self {
        Self::with_scope(Thread, api, PostId(post_id))
    }

    pub fn post_id(&self) -> i64 {
        self.scope().0
    }

    /// Posts a reply; on success the whole thread is fetched again.
    pub async fn reply(&self, content: impl Into<String>) -> Result<()> {
        self.create(ReplyDraft {
            content: content.into(),
        })
        .await
    }
}

/// Relative age of a post or reply, e.g. "5 minutes ago".
pub fn format_posted(created_at: NaiveDateTime, now: NaiveDateTime) -> String {
    let diff = (now - created_at).num_seconds().max(0);

    match diff {
        0..=59 => "Just now".to_string(),
        60..=3599 => format!("{} minutes ago", diff / 60),
        3600..=86399 => format!("{} hours ago", diff / 3600),
        86400..=604799 => format!("{} days ago", diff / 86400),
        _ => created_at.format("%m/%d/%Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn relative_ages() {
        let now = at("2025-06-01T12:00:00");
        assert_eq!(format_posted(at("2025-06-01T11:59:30"), now), "Just now");
        assert_eq!(format_posted(at("2025-06-01T11:45:00"), now), "15 minutes ago");
        assert_eq!(format_posted(at("2025-06-01T07:00:00"), now), "5 hours ago");
        assert_eq!(format_posted(at("2025-05-29T12:00:00"), now), "3 days ago");
        assert_eq!(format_posted(at("2025-04-02T09:00:00"), now), "04/02/2025");
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        let now = at("2025-06-01T12:00:00");
        assert_eq!(format_posted(at("2025-06-01T12:05:00"), now), "Just now");
    }
}
