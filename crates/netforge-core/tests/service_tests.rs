//! CRUD flows over the service surface.

use std::sync::Arc;

use netforge_core::{CoreConfig, CoreError, ErrorStatus, ProjectService};
use netforge_model::{EventAction, Project, ScenarioId, UserId};
use netforge_store::{MemoryStore, ReferenceStore};
use netforge_test_utils::{
    sample_format, seed_project, setup_test_service, StaticBuilder, UnreliableStore,
};
use serde_json::json;

#[tokio::test]
async fn user_registration_and_listing() {
    let harness = setup_test_service();
    let alice = harness
        .service
        .register_user("alice", "alice@example.com", "h1")
        .await
        .unwrap();
    harness
        .service
        .register_user("bob", "bob@example.com", "h2")
        .await
        .unwrap();

    let users = harness.service.list_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].username, "alice");
    assert_eq!(users[0].id, alice.id);
    assert_eq!(users[1].username, "bob");
}

#[tokio::test]
async fn project_lifecycle() {
    let harness = setup_test_service();
    let owner = harness
        .service
        .register_user("carol", "carol@example.com", "h")
        .await
        .unwrap();

    let created = harness.service.create_project(owner.id).await.unwrap();
    assert!(created.name.is_empty());
    assert!(created.scenarios.is_empty());

    harness
        .service
        .rename_project(owner.id, created.id, "lab")
        .await
        .unwrap();
    harness
        .service
        .update_packet_format(owner.id, created.id, sample_format())
        .await
        .unwrap();

    let fetched = harness
        .service
        .get_project(owner.id, created.id)
        .await
        .unwrap();
    assert_eq!(fetched.name, "lab");
    assert_eq!(fetched.packet_format, sample_format());
}

#[tokio::test]
async fn scenario_and_event_views() {
    let harness = setup_test_service();
    let owner = harness
        .service
        .register_user("dave", "dave@example.com", "h")
        .await
        .unwrap();
    let project = harness.service.create_project(owner.id).await.unwrap();
    harness
        .service
        .update_packet_format(owner.id, project.id, sample_format())
        .await
        .unwrap();

    let view = harness
        .service
        .create_scenario(owner.id, project.id)
        .await
        .unwrap();
    assert_eq!(view.packet_format, sample_format());
    assert!(view.events.is_empty());

    let renamed = harness
        .service
        .rename_scenario(owner.id, view.scenario_id, "syn flood")
        .await
        .unwrap();
    assert_eq!(renamed.name, "syn flood");

    // A new event is seeded from the project's format defaults.
    let view = harness
        .service
        .create_event(owner.id, view.scenario_id)
        .await
        .unwrap();
    assert_eq!(view.events.len(), 1);
    assert_eq!(view.events[0].packet, sample_format());
    assert_eq!(view.events[0].action, EventAction::Drop);
    let event_id = view.events[0].id;

    let view = harness
        .service
        .edit_event(
            owner.id,
            event_id,
            json!({"1": "0x86dd", "2": "0x00", "3": "255"}),
            json!({"Forward": {"port": "eth7"}}),
        )
        .await
        .unwrap();
    assert_eq!(
        view.events[0].action,
        EventAction::Forward {
            port: "eth7".to_string()
        }
    );
    assert_eq!(view.events[0].packet.get("1"), Some(&json!("0x86dd")));

    // The single-event read returns the same document.
    let event = harness.service.get_event(owner.id, event_id).await.unwrap();
    assert_eq!(event.id, event_id);
    assert_eq!(event.packet.get("1"), Some(&json!("0x86dd")));

    let view = harness.service.delete_event(owner.id, event_id).await.unwrap();
    assert!(view.events.is_empty());
}

#[tokio::test]
async fn delete_project_cascades_to_every_child() {
    let harness = setup_test_service();
    let seeded = seed_project(&harness.store).await;

    harness
        .service
        .delete_project(seeded.owner.id, seeded.project.id)
        .await
        .unwrap();

    let err = harness.store.get_project(seeded.project.id).await.unwrap_err();
    assert!(err.is_not_found());
    for scenario in &seeded.scenarios {
        assert!(harness
            .store
            .get_scenario(scenario.id)
            .await
            .unwrap_err()
            .is_not_found());
    }
    for event in seeded.events.iter().flatten() {
        assert!(harness
            .store
            .get_event(event.id)
            .await
            .unwrap_err()
            .is_not_found());
    }
}

#[tokio::test]
async fn delete_scenario_updates_the_project_list() {
    let harness = setup_test_service();
    let seeded = seed_project(&harness.store).await;
    let (first, second) = (&seeded.scenarios[0], &seeded.scenarios[1]);

    harness
        .service
        .delete_scenario(seeded.owner.id, first.id)
        .await
        .unwrap();

    let project = harness.store.get_project(seeded.project.id).await.unwrap();
    assert_eq!(project.scenario_ids, vec![second.id]);
    for event in &seeded.events[0] {
        assert!(harness
            .store
            .get_event(event.id)
            .await
            .unwrap_err()
            .is_not_found());
    }
    // The surviving scenario keeps its events.
    for event in &seeded.events[1] {
        assert!(harness.store.get_event(event.id).await.is_ok());
    }
}

#[tokio::test]
async fn foreign_documents_collapse_to_not_found() {
    let harness = setup_test_service();
    let seeded = seed_project(&harness.store).await;
    let intruder = harness
        .service
        .register_user("mallory", "m@example.com", "h")
        .await
        .unwrap();

    let err = harness
        .service
        .get_project(intruder.id, seeded.project.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), ErrorStatus::NotFound);

    let err = harness
        .service
        .get_scenario(intruder.id, seeded.scenarios[0].id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), ErrorStatus::NotFound);

    let err = harness
        .service
        .get_event(intruder.id, seeded.events[0][0].id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden { .. }));
    assert_eq!(err.status(), ErrorStatus::NotFound);

    let err = harness
        .service
        .edit_event(
            intruder.id,
            seeded.events[0][0].id,
            json!({}),
            json!("Drop"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), ErrorStatus::NotFound);

    let err = harness
        .service
        .delete_project(intruder.id, seeded.project.id)
        .await
        .unwrap_err();
    assert_eq!(err.status(), ErrorStatus::NotFound);

    // Nothing was deleted.
    assert!(harness.store.get_project(seeded.project.id).await.is_ok());
}

#[tokio::test]
async fn listing_reports_broken_projects_without_hiding_healthy_ones() {
    let harness = setup_test_service();
    let seeded = seed_project(&harness.store).await;

    let mut broken = Project::new(seeded.owner.id);
    broken.push_scenario(ScenarioId::new());
    harness.store.insert_project(&broken).await.unwrap();

    let results = harness.service.list_projects(seeded.owner.id).await.unwrap();
    assert_eq!(results.len(), 2);

    let healthy: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(healthy.len(), 1);
    assert_eq!(healthy[0].id, seeded.project.id);

    let failures: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
    assert_eq!(failures.len(), 1);
    assert!(matches!(failures[0], CoreError::DanglingReference { .. }));
}

fn unreliable_service() -> (Arc<UnreliableStore>, ProjectService<UnreliableStore, StaticBuilder>) {
    let store = Arc::new(UnreliableStore::new());
    let service = ProjectService::new(
        Arc::clone(&store),
        Arc::new(StaticBuilder::ok(json!({}))),
        CoreConfig::default(),
    );
    (store, service)
}

#[tokio::test]
async fn failed_project_update_removes_the_provisional_scenario() {
    let (store, service) = unreliable_service();
    let owner = UserId::new();
    let project = service.create_project(owner).await.unwrap();

    store.fail_next_save_project();
    let err = service.create_scenario(owner, project.id).await.unwrap_err();
    assert!(matches!(err, CoreError::Store(_)));

    // The parent list never named the scenario, and the provisional
    // document was removed again.
    let stored = store.get_project(project.id).await.unwrap();
    assert!(stored.scenario_ids.is_empty());
    let provisional = store.inserted_scenarios();
    assert_eq!(provisional.len(), 1);
    assert!(store
        .get_scenario(provisional[0])
        .await
        .unwrap_err()
        .is_not_found());

    // The same call succeeds once the store recovers.
    let view = service.create_scenario(owner, project.id).await.unwrap();
    let stored = store.get_project(project.id).await.unwrap();
    assert_eq!(stored.scenario_ids, vec![view.scenario_id]);
}

#[tokio::test]
async fn failed_scenario_update_removes_the_provisional_event() {
    let (store, service) = unreliable_service();
    let owner = UserId::new();
    let project = service.create_project(owner).await.unwrap();
    let view = service.create_scenario(owner, project.id).await.unwrap();

    store.fail_next_save_scenario();
    let err = service.create_event(owner, view.scenario_id).await.unwrap_err();
    assert!(matches!(err, CoreError::Store(_)));

    // The event list is unchanged, the provisional event is gone, and the
    // scenario still assembles.
    let refreshed = service.get_scenario(owner, view.scenario_id).await.unwrap();
    assert!(refreshed.events.is_empty());
    let provisional = store.inserted_events();
    assert_eq!(provisional.len(), 1);
    assert!(store
        .get_event(provisional[0])
        .await
        .unwrap_err()
        .is_not_found());

    // Creation goes through once the store recovers.
    let view = service.create_event(owner, view.scenario_id).await.unwrap();
    assert_eq!(view.events.len(), 1);
}

fn service() -> ProjectService<MemoryStore, StaticBuilder> {
    ProjectService::new(
        Arc::new(MemoryStore::new()),
        Arc::new(StaticBuilder::ok(json!({"status": "built"}))),
        CoreConfig::default(),
    )
}

#[tokio::test]
async fn foreign_project_reads_as_not_found() {
    let service = service();
    let owner = UserId::new();
    let intruder = UserId::new();
    let project = service.create_project(owner).await.unwrap();

    let err = service.get_project(intruder, project.id).await.unwrap_err();
    assert!(matches!(err, CoreError::Forbidden { .. }));
    assert_eq!(err.status(), ErrorStatus::NotFound);
}

#[tokio::test]
async fn duplicate_username_is_a_validation_error() {
    let service = service();
    service
        .register_user("alice", "a@example.com", "hash")
        .await
        .unwrap();

    let err = service
        .register_user("alice", "other@example.com", "hash")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn malformed_edit_payload_is_rejected_before_any_write() {
    let service = service();
    let owner = UserId::new();
    let project = service.create_project(owner).await.unwrap();
    let view = service.create_scenario(owner, project.id).await.unwrap();
    let view = service.create_event(owner, view.scenario_id).await.unwrap();
    let event_id = view.events[0].id;

    let err = service
        .edit_event(
            owner,
            event_id,
            json!(["not", "an", "object"]),
            json!("Drop"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), ErrorStatus::InvalidRequest);

    let err = service
        .edit_event(
            owner,
            event_id,
            json!({}),
            json!({"actionString": "fwd", "p": "eth0"}),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), ErrorStatus::InvalidRequest);

    // The event is untouched.
    let view = service.get_scenario(owner, view.scenario_id).await.unwrap();
    assert_eq!(view.events[0].action, EventAction::Drop);
}
