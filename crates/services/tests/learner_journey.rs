use std::sync::Arc;

use services::{
    AppServices, ClientConfig, CompletionOutcome, CompletionTrigger, InMemoryAuthApi,
    InMemoryClassApi, SessionContext,
};
use skill_core::model::{Class, ClassId, Lesson, LessonId, User, UserId};
use skill_core::time::fixed_clock;
use skill_core::validation::SignInForm;
use storage::repository::{InMemoryRepository, Storage};

fn class(id: u64, title: &str) -> Class {
    serde_json::from_value(serde_json::json!({ "id": id, "title": title })).unwrap()
}

fn app(repo: &InMemoryRepository, classes: &InMemoryClassApi) -> (AppServices, InMemoryAuthApi) {
    let storage = Storage::from_in_memory(repo);
    let session = SessionContext::new(fixed_clock(), Arc::clone(&storage.sessions));
    let auth = InMemoryAuthApi::new(session.clone());
    auth.insert_account(
        User {
            id: UserId::new(1),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            avatar_url: None,
            email_verified: true,
        },
        "Str0ng!pass",
    );
    let services = AppServices::from_parts(
        fixed_clock(),
        ClientConfig::default(),
        &storage,
        session,
        Arc::new(classes.clone()),
        Arc::new(auth.clone()),
    );
    (services, auth)
}

#[tokio::test]
async fn learner_signs_in_enrolls_and_finishes_a_class() {
    let repo = InMemoryRepository::new();
    let classes = InMemoryClassApi::new();
    let lessons = (0..3)
        .map(|i| Lesson::new(LessonId::new(20 + i), format!("Wheel throwing {i}")))
        .collect();
    classes.insert_class(class(7, "Pottery"), lessons);
    let (services, _) = app(&repo, &classes);

    services
        .auth()
        .sign_in(&SignInForm {
            email: "ada@example.com".into(),
            password: "Str0ng!pass".into(),
        })
        .await
        .unwrap();

    let enrolled = services.catalog().enroll(ClassId::new(7)).await.unwrap();
    assert!(enrolled.enrolled);

    let progress_service = services.progress();
    let mut progress = progress_service.load(ClassId::new(7)).await.unwrap();
    let mut index = 0;
    loop {
        progress_service.open_lesson(&progress, index).unwrap();
        let outcome = progress_service
            .complete_lesson(&mut progress, index, CompletionTrigger::Ended { position: 90.0 })
            .await
            .unwrap();
        match outcome {
            CompletionOutcome::Completed { next: Some(next), .. } => index = next,
            CompletionOutcome::Completed { next: None, .. } => break,
            CompletionOutcome::AlreadyCompleted => panic!("lesson {index} was already completed"),
        }
    }
    assert!(progress.state().is_class_complete());

    let overview = progress_service.enrolled_overview().await.unwrap();
    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].percent_complete, 100);
}

#[tokio::test]
async fn session_survives_restart_until_sign_out() {
    let repo = InMemoryRepository::new();
    let classes = InMemoryClassApi::new();
    let (services, _) = app(&repo, &classes);
    services
        .auth()
        .sign_in(&SignInForm {
            email: "ada@example.com".into(),
            password: "Str0ng!pass".into(),
        })
        .await
        .unwrap();

    let restored = SessionContext::init(fixed_clock(), Arc::new(repo.clone()))
        .await
        .unwrap();
    assert_eq!(
        restored.current_user().map(|user| user.id),
        Some(UserId::new(1))
    );

    services.auth().sign_out().await.unwrap();
    let restored = SessionContext::init(fixed_clock(), Arc::new(repo.clone()))
        .await
        .unwrap();
    assert!(!restored.is_authenticated());
}

#[tokio::test]
async fn sqlite_composition_starts_signed_out() {
    let services = AppServices::new_sqlite(
        "sqlite:file:app_services_boot?mode=memory&cache=shared",
        fixed_clock(),
        ClientConfig::default(),
    )
    .await
    .unwrap();
    assert!(!services.session().is_authenticated());
    services
        .notes()
        .save(LessonId::new(3), "center the clay first")
        .await
        .unwrap();
    assert_eq!(
        services.notes().load(LessonId::new(3)).await.unwrap(),
        "center the clay first"
    );
}
