mod common;

use common::{create_group, create_room, entry, meeting, setup_test_db};
use timetable::db::{self, repository};
use timetable::error::AppError;
use timetable::models::{DraftAction, DraftState, SaveDraftRequest};
use timetable::services::{DraftService, ScheduleService};

fn named(name: &str) -> SaveDraftRequest {
    SaveDraftRequest {
        draft_name: Some(name.to_string()),
    }
}

async fn count(pool: &sqlx::SqlitePool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

#[tokio::test]
async fn test_second_save_conflicts() {
    let pool = setup_test_db().await;
    let schedule = ScheduleService::new(pool.clone());
    let drafts = DraftService::new(pool.clone());
    let group = create_group(&schedule).await;

    let first = drafts.save(&group.id, named("Fall review")).await.expect("first save");
    assert_eq!(first.group_id, group.id);
    assert_eq!(first.draft_name, "Fall review");

    let second = drafts.save(&group.id, named("Again")).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert_eq!(count(&pool, "drafts").await, 1);
}

#[tokio::test]
async fn test_concurrent_saves_yield_one_draft() {
    let pool = setup_test_db().await;
    let schedule = ScheduleService::new(pool.clone());
    let group = create_group(&schedule).await;

    let a = DraftService::new(pool.clone());
    let b = DraftService::new(pool.clone());
    let (ra, rb) = tokio::join!(
        a.save(&group.id, named("a")),
        b.save(&group.id, named("b"))
    );

    let ok = [ra.is_ok(), rb.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(ok, 1);
    assert!(matches!(ra.err().or(rb.err()), Some(AppError::Conflict(_))));
    assert_eq!(count(&pool, "drafts").await, 1);
}

#[tokio::test]
async fn test_duplicate_draft_insert_maps_to_conflict() {
    let pool = setup_test_db().await;
    let schedule = ScheduleService::new(pool.clone());
    let group = create_group(&schedule).await;

    // Skip the service lookup and hit the unique index directly.
    repository::insert_draft(&pool, &group.id, "first")
        .await
        .expect("first insert");
    let err = repository::insert_draft(&pool, &group.id, "second")
        .await
        .expect_err("second insert must violate UNIQUE(group_id)");

    let mapped = AppError::conflict_on_unique(err, "draft already exists");
    assert!(matches!(mapped, AppError::Conflict(_)));
    assert_eq!(count(&pool, "drafts").await, 1);
}

#[tokio::test]
async fn test_default_draft_name_and_missing_group() {
    let pool = setup_test_db().await;
    let schedule = ScheduleService::new(pool.clone());
    let drafts = DraftService::new(pool.clone());
    let group = create_group(&schedule).await;

    let draft = drafts.save(&group.id, SaveDraftRequest::default()).await.unwrap();
    assert_eq!(draft.draft_name, "2026-2027 1st Semester CS");

    let missing = drafts.save("missing", SaveDraftRequest::default()).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    let listed = drafts.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].group.id, group.id);
}

#[tokio::test]
async fn test_approve_keeps_schedule() {
    let pool = setup_test_db().await;
    let schedule = ScheduleService::new(pool.clone());
    let drafts = DraftService::new(pool.clone());
    let group = create_group(&schedule).await;
    schedule
        .create_entry(&group.id, entry("CS101", "A", vec![meeting("Mon", "08:00", "09:00", None)]))
        .await
        .unwrap();

    let draft = drafts.save(&group.id, named("review")).await.unwrap();
    let transition = drafts.approve(&draft.id).await.unwrap();
    assert_eq!(transition.action, DraftAction::Approve);
    assert_eq!(transition.state, DraftState::NoDraft);
    assert_eq!(transition.group_id, group.id);

    assert_eq!(count(&pool, "drafts").await, 0);
    assert_eq!(count(&pool, "schedule_entries").await, 1);
    assert_eq!(count(&pool, "schedule_meetings").await, 1);

    assert!(matches!(drafts.approve(&draft.id).await, Err(AppError::NotFound(_))));

    // The group can be staged again once the previous draft is gone.
    drafts.save(&group.id, named("second round")).await.unwrap();
}

#[tokio::test]
async fn test_reject_cascades() {
    let pool = setup_test_db().await;
    let schedule = ScheduleService::new(pool.clone());
    let drafts = DraftService::new(pool.clone());
    let room = create_room(&schedule, "Room 101", false).await;

    let rejected = create_group(&schedule).await;
    let kept = create_group(&schedule).await;
    schedule
        .create_entry(
            &rejected.id,
            entry(
                "CS101",
                "A",
                vec![
                    meeting("Mon", "08:00", "09:00", Some(&room)),
                    meeting("Wed", "08:00", "09:00", Some(&room)),
                ],
            ),
        )
        .await
        .unwrap();
    schedule
        .create_entry(&kept.id, entry("CS102", "A", vec![meeting("Tue", "08:00", "09:00", None)]))
        .await
        .unwrap();

    let draft = drafts.save(&rejected.id, named("to reject")).await.unwrap();
    let transition = drafts.reject(&draft.id).await.unwrap();
    assert_eq!(transition.action, DraftAction::Reject);
    assert_eq!(transition.entries_deleted, 1);
    assert_eq!(transition.meetings_deleted, 2);

    assert_eq!(count(&pool, "drafts").await, 0);
    assert_eq!(count(&pool, "schedule_groups").await, 1);
    assert_eq!(count(&pool, "schedule_entries").await, 1);
    assert_eq!(count(&pool, "schedule_meetings").await, 1);
    assert_eq!(count(&pool, "rooms").await, 1);

    assert!(matches!(schedule.timetable(&rejected.id).await, Err(AppError::NotFound(_))));
    assert!(matches!(drafts.reject(&draft.id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_reject_with_unresolvable_group_deletes_nothing() {
    let pool = setup_test_db().await;

    // Plant a draft whose group row does not exist.
    sqlx::query("PRAGMA foreign_keys = OFF")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO drafts (id, group_id, draft_name, created_at) \
         VALUES ('d1', 'ghost', 'orphan', '2026-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let drafts = DraftService::new(pool.clone());
    let result = drafts.reject("d1").await;
    assert!(matches!(result, Err(AppError::Integrity(_))));
    assert_eq!(count(&pool, "drafts").await, 1);
}

#[tokio::test]
async fn test_group_read_is_a_snapshot_across_reject() {
    let path = std::env::temp_dir().join(format!("timetable-{}.db", uuid::Uuid::new_v4()));
    let pool = db::connect(&format!("sqlite://{}", path.display()), 2)
        .await
        .expect("Failed to create file db");
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await
        .unwrap();

    let schedule = ScheduleService::new(pool.clone());
    let drafts = DraftService::new(pool.clone());
    let group = create_group(&schedule).await;
    schedule
        .create_entry(
            &group.id,
            entry(
                "CS101",
                "A",
                vec![
                    meeting("Mon", "08:00", "09:00", None),
                    meeting("Wed", "08:00", "09:00", None),
                ],
            ),
        )
        .await
        .unwrap();
    let draft = drafts.save(&group.id, named("to reject")).await.unwrap();

    let mut reader = pool.begin().await.unwrap();
    let before = repository::fetch_group_entries(&mut reader, &group.id)
        .await
        .unwrap();
    assert_eq!(before.len(), 1);

    // Commits on the other connection while the read transaction is open.
    drafts.reject(&draft.id).await.unwrap();

    let during = repository::fetch_group_entries(&mut reader, &group.id)
        .await
        .unwrap();
    assert_eq!(during.len(), 1);
    assert_eq!(during[0].meetings.len(), 2);
    reader.commit().await.unwrap();

    assert!(matches!(
        schedule.timetable(&group.id).await,
        Err(AppError::NotFound(_))
    ));

    pool.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}
