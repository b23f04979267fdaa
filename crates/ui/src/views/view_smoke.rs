use skill_core::model::{
    Class, ClassId, Lesson, LessonId, LessonProgressRecord, User, UserId,
};
use skill_core::validation::SignUpForm;

use super::test_harness::{TestBackend, ViewKind};

fn class(id: u64, title: &str) -> Class {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": title,
        "description": "Loose washes, wet-on-wet and color mixing.",
        "category": "Art",
        "level": "Beginner",
        "durationMinutes": 95,
        "requirements": ["A round brush"],
        "sections": [{ "title": "Materials", "description": "" }],
        "contactEmail": "instructor@example.com"
    }))
    .expect("class fixture")
}

fn lessons() -> Vec<Lesson> {
    vec![
        Lesson::new(LessonId::new(11), "Paper and paint"),
        Lesson::new(LessonId::new(12), "First wash"),
        Lesson::new(LessonId::new(13), "Layering"),
    ]
}

fn learner() -> User {
    User {
        id: UserId::new(7),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        avatar_url: None,
        email_verified: true,
    }
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_lists_published_classes() {
    let backend = TestBackend::new();
    backend.classes.insert_class(class(1, "Watercolor basics"), lessons());
    backend.classes.insert_class(class(2, "Ink sketching"), Vec::new());

    let mut harness = backend.mount(ViewKind::Catalog);
    let html = harness.settle().await;
    assert!(html.contains("Watercolor basics"), "missing class in {html}");
    assert!(html.contains("Ink sketching"), "missing class in {html}");
    assert!(html.contains("1h 35m"), "missing duration tag in {html}");
    assert!(html.contains("Enroll"), "missing enroll button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_surfaces_server_errors_with_retry() {
    let backend = TestBackend::new();
    backend.classes.fail_all(true);

    let mut harness = backend.mount(ViewKind::Catalog);
    let html = harness.settle().await;
    assert!(html.contains("Service unavailable"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn class_details_for_guests_offer_enrollment_without_lessons() {
    let backend = TestBackend::new();
    backend.classes.insert_class(class(1, "Watercolor basics"), lessons());

    let mut harness = backend.mount(ViewKind::ClassDetails(1));
    let html = harness.settle().await;
    assert!(html.contains("Watercolor basics"), "missing title in {html}");
    assert!(html.contains("A round brush"), "missing requirements in {html}");
    assert!(html.contains("Enroll"), "missing enroll in {html}");
    assert!(!html.contains("First wash"), "guests should not see lessons in {html}");
    assert!(!html.contains("Edit class"), "guests cannot edit in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn class_details_gate_lessons_behind_completion() {
    let backend = TestBackend::new();
    backend.classes.insert_class(class(1, "Watercolor basics"), lessons());
    backend.sign_in(learner()).await;
    backend
        .services
        .catalog()
        .enroll(ClassId::new(1))
        .await
        .expect("enroll");
    backend.classes.set_progress(
        ClassId::new(1),
        vec![LessonProgressRecord::completed(LessonId::new(11))],
    );

    let mut harness = backend.mount(ViewKind::ClassDetails(1));
    let html = harness.settle().await;
    assert!(html.contains("First wash"), "missing lesson list in {html}");
    assert!(html.contains("Completed"), "missing completed badge in {html}");
    assert!(html.contains("Locked"), "missing locked badge in {html}");
    assert!(html.contains("lesson-row--locked"), "third lesson should be locked in {html}");
    assert!(html.contains("Continue"), "missing resume link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn class_details_let_the_author_edit() {
    let backend = TestBackend::new();
    backend.classes.insert_class(class(1, "Watercolor basics"), lessons());
    backend
        .sign_in(User {
            email: "Instructor@Example.com".into(),
            ..learner()
        })
        .await;

    let mut harness = backend.mount(ViewKind::ClassDetails(1));
    let html = harness.settle().await;
    assert!(html.contains("Edit class"), "missing edit link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn unknown_class_shows_not_found() {
    let backend = TestBackend::new();

    let mut harness = backend.mount(ViewKind::ClassDetails(404));
    let html = harness.settle().await;
    assert!(html.contains("Back to classes"), "missing back link in {html}");
    assert!(!html.contains("Enroll"), "no enroll for a missing class in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn your_classes_prompts_guests_to_sign_in() {
    let backend = TestBackend::new();

    let mut harness = backend.mount(ViewKind::YourClasses);
    let html = harness.settle().await;
    assert!(
        html.contains("Sign in to see the classes"),
        "missing sign-in prompt in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn your_classes_lists_enrollments_with_progress() {
    let backend = TestBackend::new();
    backend.classes.insert_class(class(1, "Watercolor basics"), lessons());
    backend.classes.insert_class(class(2, "Ink sketching"), lessons());
    backend.sign_in(learner()).await;
    backend
        .services
        .catalog()
        .enroll(ClassId::new(1))
        .await
        .expect("enroll");
    backend.classes.set_progress(
        ClassId::new(1),
        vec![LessonProgressRecord::completed(LessonId::new(11))],
    );

    let mut harness = backend.mount(ViewKind::YourClasses);
    let html = harness.settle().await;
    assert!(html.contains("Watercolor basics"), "missing enrollment in {html}");
    assert!(!html.contains("Ink sketching"), "not enrolled in {html}");
    assert!(
        html.contains("1 of 3 lessons completed"),
        "missing progress label in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn verify_email_confirms_a_pending_account() {
    let backend = TestBackend::new();
    backend.accounts.require_verification(true);
    let form = SignUpForm {
        name: "Grace".into(),
        email: "grace@example.com".into(),
        password: "Penguin#42".into(),
        confirm_password: "Penguin#42".into(),
    };
    backend.services.auth().sign_up(&form).await.expect("sign up");
    let token = backend
        .accounts
        .verification_token("grace@example.com")
        .expect("pending token");

    let mut harness = backend.mount(ViewKind::VerifyEmail(token));
    let html = harness.settle().await;
    assert!(
        html.contains("Your email address has been verified."),
        "missing confirmation in {html}"
    );
    assert!(html.contains("Sign in"), "missing sign-in action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn verify_email_rejects_unknown_tokens() {
    let backend = TestBackend::new();

    let mut harness = backend.mount(ViewKind::VerifyEmail("verify-999".into()));
    let html = harness.settle().await;
    assert!(
        html.contains("Verification link is invalid or has expired"),
        "missing error in {html}"
    );

    let mut harness = backend.mount(ViewKind::VerifyEmail(String::new()));
    let html = harness.settle().await;
    assert!(html.contains("incomplete"), "missing blank-token error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn not_found_echoes_the_path() {
    let backend = TestBackend::new();

    let mut harness =
        backend.mount(ViewKind::NotFound(vec!["teach".into(), "nowhere".into()]));
    let html = harness.settle().await;
    assert!(html.contains("Page not found"), "missing heading in {html}");
    assert!(html.contains("/teach/nowhere"), "missing path in {html}");
}
