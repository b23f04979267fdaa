use chrono::Duration;
use skill_core::model::{LessonId, User, UserId};
use skill_core::time::fixed_now;
use storage::repository::{LessonNotes, NotesRepository, SessionRecord, SessionRepository};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let repo = SqliteRepository::connect(&url).await.expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

fn user() -> User {
    User {
        id: UserId::new(3),
        name: "Grace".into(),
        email: "grace@example.com".into(),
        avatar_url: Some("https://cdn.example.com/g.png".into()),
        email_verified: false,
    }
}

#[tokio::test]
async fn sqlite_session_survives_reload_and_clears() {
    let repo = connect("memdb_session").await;
    assert_eq!(repo.load_session().await.unwrap(), None);

    let record = SessionRecord {
        token: "header.payload.sig".into(),
        user: Some(user()),
        signed_in_at: fixed_now(),
    };
    repo.save_session(&record).await.unwrap();
    assert_eq!(repo.load_session().await.unwrap(), Some(record.clone()));

    let refreshed = SessionRecord {
        token: "next.token".into(),
        user: None,
        signed_in_at: fixed_now() + Duration::minutes(5),
    };
    repo.save_session(&refreshed).await.unwrap();
    let loaded = repo.load_session().await.unwrap().unwrap();
    assert_eq!(loaded.token, "next.token");
    assert_eq!(loaded.user, None);

    repo.clear_session().await.unwrap();
    assert_eq!(repo.load_session().await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_notes_upsert_and_delete() {
    let repo = connect("memdb_notes").await;
    let lesson = LessonId::new(21);
    let first = LessonNotes {
        lesson_id: lesson,
        text: "warm up the clay".into(),
        updated_at: fixed_now(),
    };
    repo.save_notes(&first).await.unwrap();

    let second = LessonNotes {
        text: "wedge longer".into(),
        updated_at: fixed_now() + Duration::hours(1),
        ..first.clone()
    };
    repo.save_notes(&second).await.unwrap();
    assert_eq!(repo.get_notes(lesson).await.unwrap(), Some(second));

    repo.delete_notes(lesson).await.unwrap();
    assert_eq!(repo.get_notes(lesson).await.unwrap(), None);
    repo.delete_notes(lesson).await.unwrap();
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = connect("memdb_migrate").await;
    repo.migrate().await.expect("second migrate");
}
