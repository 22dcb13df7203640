use tempfile::TempDir;

use super::*;
use crate::{
    chat::GENERAL_INTRO,
    models::{Analysis, Jurisdiction},
    params::{GeneralQuestion, NewCase, StepRef},
    workspace::Workspace,
};

async fn create_test_desk() -> (Desk, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let desk = DeskBuilder::new()
        .with_database_path(Some(&db_path))
        // Nothing listens here, so remote calls fail fast.
        .with_base_url(Some("http://127.0.0.1:9"))
        .build()
        .await
        .expect("Failed to create desk");
    (desk, temp_dir)
}

fn analysed(case_id: &str) -> Workspace {
    Workspace::from_analysis(
        case_id,
        "Employer has not paid two months of salary.",
        &Analysis {
            strategy: Some("1. Send notice: to employer. 2. Approach labour office.".to_string()),
            ..Default::default()
        },
    )
}

#[tokio::test]
async fn test_open_workspace_without_cache_is_placeholder() {
    let (desk, _temp_dir) = create_test_desk().await;

    let workspace = desk.open_workspace("unknown", None).await.unwrap();

    assert_eq!(workspace.case_id(), "unknown");
    assert_eq!(workspace.len(), 1);
    assert_eq!(workspace.steps()[0].title, "Case Initialization");
}

#[tokio::test]
async fn test_fresh_workspace_wins_over_cache() {
    let (desk, _temp_dir) = create_test_desk().await;

    let mut cached = analysed("case-7");
    cached.complete_step(0).unwrap();
    desk.save_workspace(&cached).await.unwrap();

    let fresh = analysed("case-7");
    let opened = desk.open_workspace("case-7", Some(fresh)).await.unwrap();
    assert_eq!(opened.position(), 0);

    let reopened = desk.open_workspace("case-7", None).await.unwrap();
    assert_eq!(reopened.position(), 0);
    assert_eq!(reopened.situation(), "Employer has not paid two months of salary.");
}

#[tokio::test]
async fn test_cached_workspace_is_restored_per_case() {
    let (desk, _temp_dir) = create_test_desk().await;

    let mut first = analysed("a");
    first.complete_step(0).unwrap();
    desk.save_workspace(&first).await.unwrap();
    desk.save_workspace(&analysed("b")).await.unwrap();

    assert_eq!(desk.workspace("a").await.unwrap().position(), 1);
    assert_eq!(desk.workspace("b").await.unwrap().position(), 0);
}

#[tokio::test]
async fn test_show_step_refuses_locked_and_zero() {
    let (desk, _temp_dir) = create_test_desk().await;
    desk.save_workspace(&analysed("c")).await.unwrap();

    let step = desk
        .show_step(&StepRef {
            case_id: "c".to_string(),
            number: 1,
        })
        .await
        .unwrap();
    assert_eq!(step.title, "Send notice");

    for number in [0, 2] {
        let result = desk
            .show_step(&StepRef {
                case_id: "c".to_string(),
                number,
            })
            .await;
        assert!(result.is_err());
    }
}

#[tokio::test]
async fn test_remote_operations_require_login() {
    let (desk, _temp_dir) = create_test_desk().await;

    assert!(matches!(
        desk.list_cases().await,
        Err(DocketError::NotLoggedIn)
    ));
    assert!(matches!(
        desk.complete_step("c").await,
        Err(DocketError::NotLoggedIn)
    ));
    assert!(matches!(
        desk.new_case(&NewCase {
            situation: "Neighbour blocked my driveway".to_string(),
            ..Default::default()
        })
        .await,
        Err(DocketError::NotLoggedIn)
    ));
}

#[tokio::test]
async fn test_new_case_requires_situation() {
    let (desk, _temp_dir) = create_test_desk().await;
    let result = desk.new_case(&NewCase::default()).await;
    assert!(matches!(result, Err(DocketError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_jurisdiction_round_trip() {
    let (desk, _temp_dir) = create_test_desk().await;
    assert!(!desk.jurisdiction().await.unwrap().is_set());

    desk.set_jurisdiction(Jurisdiction::new("Kerala", "Kochi"))
        .await
        .unwrap();
    assert_eq!(
        desk.jurisdiction().await.unwrap(),
        Jurisdiction::new("Kerala", "Kochi")
    );

    assert!(desk
        .set_jurisdiction(Jurisdiction::new(" ", "Kochi"))
        .await
        .is_err());
}

#[tokio::test]
async fn test_logout_without_session() {
    let (desk, _temp_dir) = create_test_desk().await;
    assert!(!desk.logout().await.unwrap());
    assert_eq!(desk.current_session().await.unwrap(), None);
}

#[tokio::test]
async fn test_general_chat_falls_back_when_offline() {
    let (desk, _temp_dir) = create_test_desk().await;

    let intro = desk.general_history().await.unwrap();
    assert_eq!(intro.len(), 1);
    assert_eq!(intro.messages()[0].text, GENERAL_INTRO);

    let log = desk
        .general_chat(&GeneralQuestion {
            query: "What is an FIR?".to_string(),
            case_context: None,
        })
        .await
        .unwrap();
    assert_eq!(log.len(), 3);
    assert_eq!(log.messages()[1].text, "What is an FIR?");
    assert_eq!(
        log.last().map(|m| m.text.as_str()),
        Some(crate::chat::GENERAL_FALLBACK_REPLY)
    );

    assert_eq!(desk.general_history().await.unwrap().len(), 3);
    assert!(desk.clear_general_history().await.unwrap());
    assert_eq!(desk.general_history().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_load_draft_from_file() {
    let (desk, temp_dir) = create_test_desk().await;
    desk.save_workspace(&analysed("d")).await.unwrap();

    let path = temp_dir.path().join("notice.txt");
    std::fs::write(&path, "To the Manager,").unwrap();

    let workspace = desk.load_draft("d", &path).await.unwrap();
    assert_eq!(workspace.draft(), "To the Manager,");
    assert_eq!(desk.workspace("d").await.unwrap().draft(), "To the Manager,");

    let missing = desk.load_draft("d", &temp_dir.path().join("nope.txt")).await;
    assert!(matches!(missing, Err(DocketError::FileSystem { .. })));
}

#[tokio::test]
async fn test_set_fact_updates_timeline() {
    let (desk, _temp_dir) = create_test_desk().await;
    desk.save_workspace(&analysed("t")).await.unwrap();

    let workspace = desk
        .set_fact("t", "date_of_joining", "12 June 2023")
        .await
        .unwrap();
    assert_eq!(workspace.facts()["date_of_joining"], "12 June 2023");

    let events = desk.timeline("t").await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "DATE OF JOINING");

    assert!(desk.set_fact("t", " ", "x").await.is_err());
}
