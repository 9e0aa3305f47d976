// Domain models for the blog service

use chrono::{DateTime, Utc};

/// Caller-supplied publication time, kept exactly as received.
///
/// The store never interprets it, so values outside the protobuf Timestamp
/// range are carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicationDate {
    pub seconds: i64,
    pub nanos: i32,
}

impl PublicationDate {
    /// Calendar view for logging; `None` when the raw value is not a valid instant.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        let nanos = u32::try_from(self.nanos)
            .ok()
            .filter(|n| *n < 1_000_000_000)?;
        DateTime::<Utc>::from_timestamp(self.seconds, nanos)
    }
}

impl From<prost_types::Timestamp> for PublicationDate {
    fn from(ts: prost_types::Timestamp) -> Self {
        Self {
            seconds: ts.seconds,
            nanos: ts.nanos,
        }
    }
}

impl From<PublicationDate> for prost_types::Timestamp {
    fn from(date: PublicationDate) -> Self {
        prost_types::Timestamp {
            seconds: date.seconds,
            nanos: date.nanos,
        }
    }
}

/// A blog post as held by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub publication_date: Option<PublicationDate>,
    pub tags: Vec<String>,
}

/// Fields accepted when creating a post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: String,
    pub publication_date: Option<PublicationDate>,
    pub tags: Vec<String>,
}

/// Full replacement of the mutable fields of a post.
///
/// `id` and `publication_date` are not part of an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: String,
    pub content: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl Post {
    pub(crate) fn from_new(id: String, new_post: NewPost) -> Self {
        Self {
            id,
            title: new_post.title,
            content: new_post.content,
            author: new_post.author,
            publication_date: new_post.publication_date,
            tags: new_post.tags,
        }
    }

    pub(crate) fn apply(&mut self, changes: PostChanges) {
        self.title = changes.title;
        self.content = changes.content;
        self.author = changes.author;
        self.tags = changes.tags;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_apply_keeps_id_and_publication_date() {
        let published = PublicationDate {
            seconds: 1_709_294_400,
            nanos: 0,
        };
        let mut post = Post::from_new(
            "post-7".to_string(),
            NewPost {
                title: "Old Title".to_string(),
                content: "Old Content".to_string(),
                author: "Test Author".to_string(),
                publication_date: Some(published),
                tags: vec!["old".to_string()],
            },
        );

        post.apply(PostChanges {
            title: "New Title".to_string(),
            content: "New Content".to_string(),
            author: "Updated Author".to_string(),
            tags: vec!["updated".to_string(), "second".to_string()],
        });

        assert_eq!(post.id, "post-7");
        assert_eq!(post.publication_date, Some(published));
        assert_eq!(post.title, "New Title");
        assert_eq!(post.content, "New Content");
        assert_eq!(post.author, "Updated Author");
        assert_eq!(post.tags, vec!["updated", "second"]);
    }

    #[test]
    fn test_publication_date_as_datetime() {
        let valid = PublicationDate {
            seconds: 1_715_934_600,
            nanos: 0,
        };
        assert_eq!(
            valid.as_datetime(),
            Some(Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap())
        );

        let negative_nanos = PublicationDate {
            seconds: 0,
            nanos: -5,
        };
        assert_eq!(negative_nanos.as_datetime(), None);

        let overflowing_nanos = PublicationDate {
            seconds: 0,
            nanos: 1_500_000_000,
        };
        assert_eq!(overflowing_nanos.as_datetime(), None);

        let huge_seconds = PublicationDate {
            seconds: i64::MAX,
            nanos: 0,
        };
        assert_eq!(huge_seconds.as_datetime(), None);
    }

    #[test]
    fn test_publication_date_keeps_raw_timestamp() {
        let ts = prost_types::Timestamp {
            seconds: -42,
            nanos: 1_500_000_000,
        };
        let date = PublicationDate::from(ts);
        assert_eq!(date.seconds, -42);
        assert_eq!(date.nanos, 1_500_000_000);

        let back = prost_types::Timestamp::from(date);
        assert_eq!((back.seconds, back.nanos), (-42, 1_500_000_000));
    }
}
