//! End-to-end assembly properties over a seeded document tree.

use netforge_core::{Assembler, CoreError};
use netforge_model::{Project, ScenarioId};
use netforge_store::{MemoryStore, ReferenceStore};
use netforge_test_utils::{init_test_logging, seed_project};

#[tokio::test]
async fn assembled_tree_mirrors_reference_order() {
    init_test_logging();
    let store = MemoryStore::new();
    let seeded = seed_project(&store).await;

    let assembled = Assembler::new(&store)
        .project(&seeded.project)
        .await
        .unwrap();

    assert_eq!(assembled.scenarios.len(), seeded.project.scenario_ids.len());
    for (scenario, sid) in assembled.scenarios.iter().zip(&seeded.project.scenario_ids) {
        assert_eq!(scenario.id, *sid);
    }
    for (assembled_scenario, scenario) in assembled.scenarios.iter().zip(&seeded.scenarios) {
        assert_eq!(assembled_scenario.events.len(), scenario.event_ids.len());
        for (event, eid) in assembled_scenario.events.iter().zip(&scenario.event_ids) {
            assert_eq!(event.id, *eid);
        }
    }
}

#[tokio::test]
async fn reassembly_yields_the_same_order() {
    let store = MemoryStore::new();
    let seeded = seed_project(&store).await;
    let assembler = Assembler::new(&store);

    let first = assembler.project(&seeded.project).await.unwrap();
    let second = assembler.project(&seeded.project).await.unwrap();

    let order = |tree: &netforge_core::AssembledProject| {
        tree.scenarios
            .iter()
            .map(|s| (s.id, s.events.iter().map(|e| e.id).collect::<Vec<_>>()))
            .collect::<Vec<_>>()
    };
    assert_eq!(order(&first), order(&second));
}

#[tokio::test]
async fn deleting_an_event_breaks_only_its_scenario() {
    let store = MemoryStore::new();
    let seeded = seed_project(&store).await;
    store.remove_event(seeded.events[0][0].id).await.unwrap();

    let assembler = Assembler::new(&store);
    let err = assembler
        .scenario(seeded.scenarios[0].id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::DanglingReference { .. }));

    // The sibling scenario still assembles cleanly.
    let intact = assembler.scenario(seeded.scenarios[1].id).await.unwrap();
    assert_eq!(intact.events.len(), 1);
}

#[tokio::test]
async fn batch_reports_failures_without_hiding_siblings() {
    let store = MemoryStore::new();
    let seeded = seed_project(&store).await;

    let mut broken = Project::new(seeded.owner.id);
    broken.push_scenario(ScenarioId::new());
    store.insert_project(&broken).await.unwrap();

    let projects = store.list_projects(seeded.owner.id).await.unwrap();
    assert_eq!(projects.len(), 2);

    let results = Assembler::new(&store).batch(&projects).await;
    let ok_count = results.iter().filter(|r| r.is_ok()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.is_err()).collect();

    assert_eq!(ok_count, 1);
    assert_eq!(failed.len(), 1);
    assert!(matches!(
        failed[0].as_ref().unwrap_err(),
        CoreError::DanglingReference { .. }
    ));
}
