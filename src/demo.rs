// Demo content for `serve --seed-demo`.
//
// Five sample confessions covering every feed/admin state: plain approved,
// read-once, emoji with locked comments, pending and flagged.

use chrono::{DateTime, Duration, Utc};

use crate::confession::{Comment, Confession, ConfessionStatus, PostType, Tone};

fn base(content: &str, created_at: DateTime<Utc>, status: ConfessionStatus) -> Confession {
    Confession {
        id: uuid::Uuid::new_v4().to_string(),
        content: content.to_string(),
        tone: None,
        post_type: PostType::Text,
        image_url: None,
        created_at,
        is_read_once: false,
        has_been_read: false,
        comments_locked: false,
        comments: Vec::new(),
        upvotes: 0,
        status,
        moderation_reason: None,
    }
}

/// Sample confessions, newest first, timestamped relative to `now`.
pub fn seed_confessions(now: DateTime<Utc>) -> Vec<Confession> {
    let pending = Confession {
        moderation_reason: Some("Potentially sensitive content.".to_string()),
        ..base(
            "This confession needs a human to look at it. It is not harmful, but it is borderline.",
            now,
            ConfessionStatus::Pending,
        )
    };

    let flagged = Confession {
        moderation_reason: Some("High-risk content related to self-harm.".to_string()),
        ..base(
            "This confession is very concerning and might violate policies about user safety.",
            now,
            ConfessionStatus::Flagged,
        )
    };

    let still_checking = Confession {
        upvotes: 12,
        comments: vec![Comment {
            id: uuid::Uuid::new_v4().to_string(),
            text: "Same here!".to_string(),
            created_at: now,
        }],
        ..base(
            "I still check my university email hoping for a notification, even though I graduated 5 years ago.",
            now - Duration::hours(4),
            ConfessionStatus::Approved,
        )
    };

    let fake_call = Confession {
        tone: Some(Tone::DarkHumor),
        is_read_once: true,
        upvotes: 45,
        ..base(
            "Sometimes I pretend to be on an important call to avoid talking to people in the hallway.",
            now - Duration::hours(12),
            ConfessionStatus::Approved,
        )
    };

    let shush = Confession {
        post_type: PostType::Emoji,
        comments_locked: true,
        upvotes: 8,
        ..base("🤫🤫🤫", now - Duration::hours(22), ConfessionStatus::Approved)
    };

    vec![pending, flagged, still_checking, fake_call, shush]
}
