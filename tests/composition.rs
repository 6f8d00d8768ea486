// Composition tests: the confession service wired to fakes.
//
// These exercise the full path a request takes:
//   draft -> sanitize -> moderation client -> grade mapping -> store
// with a scripted classifier and a manual clock. No network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::RwLock;

use whispervault::clock::{Clock, ManualClock};
use whispervault::confession::{
    AdminFilter, AdminSettings, ConfessionDraft, ConfessionStatus, PostType, Tone,
};
use whispervault::moderation::{ModerationClassifier, ModerationClient, ModerationError, RawVerdict};
use whispervault::retention::{run_sweep, spawn_retention_sweeper, SweepStatus};
use whispervault::service::{CommentError, ConfessionService, SettingsError, SubmissionError};
use whispervault::store::{ConfessionStore, MemoryStore};
use whispervault::tone::{error_placeholder, DisabledToneModel, ToneError, ToneModel, ToneRewriter};

// ============================================================
// Fakes
// ============================================================

enum Script {
    Grade(&'static str),
    Fail,
    Hang,
}

struct ScriptedClassifier {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModerationClassifier for ScriptedClassifier {
    async fn classify(&self, _text: &str) -> Result<RawVerdict, ModerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script {
            Script::Grade(grade) => Ok(RawVerdict {
                grade: grade.to_string(),
                reason: format!("scripted {grade}"),
            }),
            Script::Fail => Err(ModerationError::Unavailable("connection refused".to_string())),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Err(ModerationError::Unavailable("unreachable".to_string()))
            }
        }
    }
}

struct UppercaseTone;

#[async_trait]
impl ToneModel for UppercaseTone {
    async fn rewrite(&self, text: &str, _tone: Tone) -> Result<String, ToneError> {
        Ok(format!("  {}  ", text.to_uppercase()))
    }
}

struct Harness {
    service: Arc<ConfessionService>,
    classifier: Arc<ScriptedClassifier>,
    clock: Arc<ManualClock>,
}

fn harness(script: Script) -> Harness {
    harness_with(script, Arc::new(DisabledToneModel))
}

fn harness_with(script: Script, tone: Arc<dyn ToneModel>) -> Harness {
    let classifier = ScriptedClassifier::new(script);
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(),
    ));
    let service = ConfessionService::new(
        Arc::new(MemoryStore::new()),
        ModerationClient::new(classifier.clone(), Duration::from_millis(100)),
        ToneRewriter::new(tone, Duration::from_millis(100)),
        clock.clone(),
        AdminSettings::default(),
    );
    Harness {
        service: Arc::new(service),
        classifier,
        clock,
    }
}

// ============================================================
// Submission
// ============================================================

#[tokio::test]
async fn benign_confession_goes_live() {
    let h = harness(Script::Grade("A1"));
    let stored = h
        .service
        .submit(ConfessionDraft::text("hello"))
        .await
        .unwrap();

    assert_eq!(stored.status, ConfessionStatus::Approved);
    assert_eq!(stored.upvotes, 0);
    assert!(stored.comments.is_empty());
    assert_eq!(stored.created_at, h.clock.now());

    let feed = h.service.feed().await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, stored.id);
}

#[tokio::test]
async fn rejected_confession_is_never_stored() {
    let h = harness(Script::Grade("X"));
    let err = h
        .service
        .submit(ConfessionDraft::text("bad"))
        .await
        .unwrap_err();

    assert!(matches!(err, SubmissionError::Rejected));
    assert!(h.service.store().is_empty().await.unwrap());
    assert_eq!(h.classifier.calls(), 1);
}

#[tokio::test]
async fn high_risk_confession_is_flagged_for_review() {
    let h = harness(Script::Grade("C4"));
    let stored = h
        .service
        .submit(ConfessionDraft::text("borderline"))
        .await
        .unwrap();

    assert_eq!(stored.status, ConfessionStatus::Flagged);
    assert!(h.service.feed().await.unwrap().is_empty());
    let flagged = h.service.admin_queue(AdminFilter::Flagged).await.unwrap();
    assert_eq!(flagged.len(), 1);
}

#[tokio::test]
async fn classifier_failure_falls_back_to_manual_review() {
    let h = harness(Script::Fail);
    let stored = h
        .service
        .submit(ConfessionDraft::text("anything"))
        .await
        .unwrap();

    assert_eq!(stored.status, ConfessionStatus::Pending);
    let reason = stored.moderation_reason.unwrap();
    assert!(reason.contains("requires manual review"), "got {reason:?}");
}

#[tokio::test]
async fn classifier_timeout_falls_back_to_manual_review() {
    let h = harness(Script::Hang);
    let stored = h
        .service
        .submit(ConfessionDraft::text("slow"))
        .await
        .unwrap();

    assert_eq!(stored.status, ConfessionStatus::Pending);
    let reason = stored.moderation_reason.unwrap();
    assert!(reason.contains("requires manual review"));
    assert!(reason.contains("timed out"));
}

#[tokio::test]
async fn invented_grade_falls_back_to_manual_review() {
    let h = harness(Script::Grade("Q7"));
    let stored = h
        .service
        .submit(ConfessionDraft::text("odd"))
        .await
        .unwrap();

    assert_eq!(stored.status, ConfessionStatus::Pending);
    assert!(stored
        .moderation_reason
        .unwrap()
        .contains("requires manual review"));
}

#[tokio::test]
async fn off_enum_grades_wait_for_review() {
    for grade in ["a1", " A1", " A1\n", "X ", "x"] {
        let h = harness(Script::Grade(grade));
        let stored = h
            .service
            .submit(ConfessionDraft::text("ambiguous"))
            .await
            .unwrap_or_else(|e| panic!("grade {grade:?} was refused: {e}"));

        assert_eq!(stored.status, ConfessionStatus::Pending, "grade {grade:?}");
        assert!(stored
            .moderation_reason
            .unwrap()
            .contains("requires manual review"));
        assert!(h.service.feed().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn empty_content_never_reaches_the_classifier() {
    let h = harness(Script::Grade("A1"));
    for content in ["", "   \n\t"] {
        let err = h
            .service
            .submit(ConfessionDraft::text(content))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::EmptyContent));
    }
    assert_eq!(h.classifier.calls(), 0);
    assert!(h.service.store().is_empty().await.unwrap());
}

#[tokio::test]
async fn overlong_content_is_refused() {
    let classifier = ScriptedClassifier::new(Script::Grade("A1"));
    let service = ConfessionService::new(
        Arc::new(MemoryStore::new()),
        ModerationClient::new(classifier.clone(), Duration::from_millis(100)),
        ToneRewriter::new(Arc::new(DisabledToneModel), Duration::from_millis(100)),
        Arc::new(ManualClock::new(Utc::now())),
        AdminSettings::default(),
    )
    .with_max_content_chars(5);

    let err = service
        .submit(ConfessionDraft::text("too long"))
        .await
        .unwrap_err();
    assert!(matches!(err, SubmissionError::ContentTooLong { max: 5 }));
    assert_eq!(classifier.calls(), 0);

    // Limit counts characters, not bytes
    assert!(service.submit(ConfessionDraft::text("ééééé")).await.is_ok());
}

#[tokio::test]
async fn emoji_drafts_keep_only_emoji() {
    let h = harness(Script::Grade("A1"));
    let draft = ConfessionDraft {
        content: "I 🤫 did 🙈 it".to_string(),
        post_type: PostType::Emoji,
        ..ConfessionDraft::default()
    };
    let stored = h.service.submit(draft).await.unwrap();
    assert!(!stored.content.chars().any(|c| c.is_ascii_alphabetic()));
    assert!(stored.content.contains('🤫'));
    assert!(stored.content.contains('🙈'));
}

#[tokio::test]
async fn emoji_draft_without_emoji_is_empty() {
    let h = harness(Script::Grade("A1"));
    let draft = ConfessionDraft {
        content: "no emoji here".to_string(),
        post_type: PostType::Emoji,
        ..ConfessionDraft::default()
    };
    let err = h.service.submit(draft).await.unwrap_err();
    assert!(matches!(err, SubmissionError::EmptyContent));
}

#[tokio::test]
async fn newest_confession_comes_first() {
    let h = harness(Script::Grade("A1"));
    let first = h.service.submit(ConfessionDraft::text("first")).await.unwrap();
    h.clock.advance(chrono::Duration::minutes(1));
    let second = h.service.submit(ConfessionDraft::text("second")).await.unwrap();

    let feed = h.service.feed().await.unwrap();
    let ids: Vec<&str> = feed.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
}

// ============================================================
// Public actions
// ============================================================

#[tokio::test]
async fn read_once_confession_leaves_the_feed_after_reveal() {
    let h = harness(Script::Grade("A1"));
    let draft = ConfessionDraft {
        is_read_once: true,
        ..ConfessionDraft::text("only once")
    };
    let stored = h.service.submit(draft).await.unwrap();
    assert_eq!(h.service.feed().await.unwrap().len(), 1);

    let revealed = h.service.reveal(&stored.id).await.unwrap().unwrap();
    assert!(revealed.has_been_read);
    assert!(h.service.feed().await.unwrap().is_empty());

    // An update cannot flip the flag back
    let after = h
        .service
        .store()
        .update(
            &stored.id,
            Box::new(|mut c: whispervault::confession::Confession| {
                c.has_been_read = false;
                c.is_read_once = false;
                c
            }),
        )
        .await
        .unwrap()
        .unwrap();
    assert!(after.has_been_read);
    assert!(after.is_read_once);
    assert!(h.service.feed().await.unwrap().is_empty());
}

#[tokio::test]
async fn read_once_confession_opens_only_once() {
    let h = harness(Script::Grade("A1"));
    let draft = ConfessionDraft {
        is_read_once: true,
        ..ConfessionDraft::text("secret")
    };
    let stored = h.service.submit(draft).await.unwrap();

    let first = h.service.reveal(&stored.id).await.unwrap();
    assert_eq!(first.map(|c| c.content).as_deref(), Some("secret"));
    assert!(h.service.reveal(&stored.id).await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_reveals_open_once() {
    let h = harness(Script::Grade("A1"));
    let draft = ConfessionDraft {
        is_read_once: true,
        ..ConfessionDraft::text("race")
    };
    let id = h.service.submit(draft).await.unwrap().id;

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let service = h.service.clone();
        let id = id.clone();
        tasks.push(tokio::spawn(async move { service.reveal(&id).await.unwrap() }));
    }
    let mut opened = 0;
    for task in tasks {
        if task.await.unwrap().is_some() {
            opened += 1;
        }
    }
    assert_eq!(opened, 1);
}

#[tokio::test]
async fn read_once_confession_is_gone_after_reveal() {
    let h = harness(Script::Grade("A1"));
    let draft = ConfessionDraft {
        is_read_once: true,
        ..ConfessionDraft::text("once")
    };
    let stored = h.service.submit(draft).await.unwrap();
    h.service.reveal(&stored.id).await.unwrap().unwrap();

    assert_eq!(h.service.upvote(&stored.id).await.unwrap(), None);
    assert!(matches!(
        h.service.add_comment(&stored.id, "too late").await,
        Err(CommentError::NotFound)
    ));
    let c = h.service.store().get(&stored.id).await.unwrap().unwrap();
    assert_eq!(c.upvotes, 0);
    assert!(c.comments.is_empty());
}

#[tokio::test]
async fn ordinary_confession_can_be_revealed_again() {
    let h = harness(Script::Grade("A1"));
    let stored = h.service.submit(ConfessionDraft::text("open")).await.unwrap();

    assert!(h.service.reveal(&stored.id).await.unwrap().is_some());
    assert!(h.service.reveal(&stored.id).await.unwrap().is_some());
    assert_eq!(h.service.upvote(&stored.id).await.unwrap(), Some(1));
}

#[tokio::test]
async fn upvotes_accumulate() {
    let h = harness(Script::Grade("A1"));
    let stored = h.service.submit(ConfessionDraft::text("vote")).await.unwrap();

    for expected in 1..=3 {
        assert_eq!(h.service.upvote(&stored.id).await.unwrap(), Some(expected));
    }
}

#[tokio::test]
async fn actions_on_unknown_ids_are_no_ops() {
    let h = harness(Script::Grade("A1"));
    h.service.submit(ConfessionDraft::text("here")).await.unwrap();

    assert_eq!(h.service.upvote("missing").await.unwrap(), None);
    assert!(h.service.reveal("missing").await.unwrap().is_none());
    assert!(h.service.approve("missing").await.unwrap().is_none());
    assert!(!h.service.delete("missing").await.unwrap());
    assert!(matches!(
        h.service.add_comment("missing", "hi").await,
        Err(CommentError::NotFound)
    ));
    assert_eq!(h.service.store().len().await.unwrap(), 1);
}

#[tokio::test]
async fn pending_confessions_refuse_public_actions() {
    let h = harness(Script::Grade("B2"));
    let stored = h.service.submit(ConfessionDraft::text("wait")).await.unwrap();

    assert_eq!(h.service.upvote(&stored.id).await.unwrap(), None);
    assert!(h.service.reveal(&stored.id).await.unwrap().is_none());
    let untouched = h.service.store().get(&stored.id).await.unwrap().unwrap();
    assert_eq!(untouched.upvotes, 0);
}

#[tokio::test]
async fn comments_append_in_order() {
    let h = harness(Script::Grade("A1"));
    let stored = h.service.submit(ConfessionDraft::text("talk")).await.unwrap();

    h.service.add_comment(&stored.id, "first").await.unwrap();
    h.service.add_comment(&stored.id, "  second  ").await.unwrap();

    let c = h.service.store().get(&stored.id).await.unwrap().unwrap();
    let texts: Vec<&str> = c.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
}

#[tokio::test]
async fn locked_confessions_refuse_comments() {
    let h = harness(Script::Grade("A1"));
    let draft = ConfessionDraft {
        comments_locked: true,
        ..ConfessionDraft::text("quiet")
    };
    let stored = h.service.submit(draft).await.unwrap();

    assert!(matches!(
        h.service.add_comment(&stored.id, "hello?").await,
        Err(CommentError::Locked)
    ));
    assert!(matches!(
        h.service.add_comment(&stored.id, "   ").await,
        Err(CommentError::Empty)
    ));
    let c = h.service.store().get(&stored.id).await.unwrap().unwrap();
    assert!(c.comments.is_empty());
}

// ============================================================
// Admin
// ============================================================

#[tokio::test]
async fn approving_moves_a_pending_confession_into_the_feed() {
    let h = harness(Script::Grade("B2"));
    let stored = h.service.submit(ConfessionDraft::text("review me")).await.unwrap();
    assert!(h.service.feed().await.unwrap().is_empty());
    assert_eq!(
        h.service.admin_queue(AdminFilter::Pending).await.unwrap().len(),
        1
    );

    let approved = h.service.approve(&stored.id).await.unwrap().unwrap();
    assert_eq!(approved.status, ConfessionStatus::Approved);
    assert_eq!(h.service.feed().await.unwrap().len(), 1);
    assert!(h
        .service
        .admin_queue(AdminFilter::Pending)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(h.classifier.calls(), 1, "approve must not re-moderate");
}

#[tokio::test]
async fn delete_removes_exactly_one() {
    let h = harness(Script::Grade("A1"));
    let keep = h.service.submit(ConfessionDraft::text("keep")).await.unwrap();
    let gone = h.service.submit(ConfessionDraft::text("gone")).await.unwrap();

    assert!(h.service.delete(&gone.id).await.unwrap());
    assert!(!h.service.delete(&gone.id).await.unwrap());

    let all = h.service.admin_queue(AdminFilter::All).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, keep.id);
}

#[tokio::test]
async fn zero_day_retention_is_refused() {
    let h = harness(Script::Grade("A1"));
    assert!(matches!(
        h.service.set_retention_days(0).await,
        Err(SettingsError::NonPositiveRetention)
    ));
    assert_eq!(h.service.settings().await.retention_days, 30);
}

#[tokio::test]
async fn shortening_retention_sweeps_immediately() {
    let h = harness(Script::Grade("A1"));
    h.service.submit(ConfessionDraft::text("old")).await.unwrap();
    h.clock.advance(chrono::Duration::days(10));
    h.service.submit(ConfessionDraft::text("new")).await.unwrap();

    let swept = h.service.set_retention_days(7).await.unwrap();
    assert_eq!(swept, 1);
    assert_eq!(h.service.settings().await.retention_days, 7);

    let left = h.service.admin_queue(AdminFilter::All).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].content, "new");
}

// ============================================================
// Retention
// ============================================================

#[tokio::test]
async fn sweep_removes_expired_and_is_idempotent() {
    let h = harness(Script::Grade("B2"));
    h.service.submit(ConfessionDraft::text("a")).await.unwrap();
    h.clock.advance(chrono::Duration::days(2));
    h.service.submit(ConfessionDraft::text("b")).await.unwrap();

    // Nothing is old enough yet
    assert_eq!(h.service.sweep_expired().await.unwrap(), 0);

    h.clock.advance(chrono::Duration::days(29));
    assert_eq!(h.service.sweep_expired().await.unwrap(), 1);
    assert_eq!(h.service.sweep_expired().await.unwrap(), 0);
    assert_eq!(h.service.store().len().await.unwrap(), 1);
}

#[tokio::test]
async fn run_sweep_records_status() {
    let h = harness(Script::Grade("A1"));
    h.service.submit(ConfessionDraft::text("a")).await.unwrap();
    h.service.submit(ConfessionDraft::text("b")).await.unwrap();
    h.clock.advance(chrono::Duration::days(31));

    let status = RwLock::new(SweepStatus::default());
    run_sweep(&h.service, &status).await;
    {
        let s = status.read().await;
        assert!(s.last_run_at.is_some());
        assert_eq!(s.last_removed, 2);
        assert_eq!(s.total_removed, 2);
        assert!(s.last_error.is_none());
    }

    run_sweep(&h.service, &status).await;
    let s = status.read().await;
    assert_eq!(s.last_removed, 0);
    assert_eq!(s.total_removed, 2);
}

#[tokio::test]
async fn spawned_sweeper_runs_without_being_asked() {
    let h = harness(Script::Grade("A1"));
    h.service.submit(ConfessionDraft::text("stale")).await.unwrap();
    h.clock.advance(chrono::Duration::days(45));

    let status = Arc::new(RwLock::new(SweepStatus::default()));
    let handle = spawn_retention_sweeper(
        h.service.clone(),
        status.clone(),
        Duration::from_millis(20),
    );

    let mut removed = 0;
    for _ in 0..100 {
        removed = status.read().await.total_removed;
        if removed > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    handle.abort();

    assert_eq!(removed, 1, "sweeper never removed the expired confession");
    assert!(h.service.store().is_empty().await.unwrap());
}

// ============================================================
// Tone
// ============================================================

#[tokio::test]
async fn tone_rewrite_is_trimmed() {
    let h = harness_with(Script::Grade("A1"), Arc::new(UppercaseTone));
    let text = h.service.rewrite_tone("quiet", Tone::Caustic).await;
    assert_eq!(text, "QUIET");
}

#[tokio::test]
async fn tone_failure_returns_placeholder() {
    let h = harness(Script::Grade("A1"));
    let text = h.service.rewrite_tone("quiet", Tone::Poetic).await;
    assert_eq!(text, error_placeholder(Tone::Poetic));
    assert!(text.contains("Poetic"));
}
