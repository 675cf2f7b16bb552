mod helpers;

use helpers::{test_db, test_project};
use memoria::store::memories::{query_memories, MemoryFilter};
use memoria::store::types::ChainStatus;
use memoria::thinking::{abandon_chain, add_step, create_chain, get_chain, list_chains, Stage};

#[test]
fn chain_walks_stages_and_completes_on_reflection() {
    let mut conn = test_db();
    let project = test_project(&conn);
    let chain = create_chain(&conn, &project.id, "speed up the test suite").unwrap();
    assert_eq!(chain.status, ChainStatus::Active);

    let outcome = add_step(&mut conn, &chain.id, "analysis", "Profile", "tests spend 80% in setup", "measured with a profiler", 0.8).unwrap();
    assert_eq!(outcome.next_stage, Some(Stage::Planning));
    assert!(!outcome.chain_completed);

    let outcome = add_step(&mut conn, &chain.id, "planning", "Share fixtures", "reuse one database per module", "", 0.7).unwrap();
    assert_eq!(outcome.next_stage, Some(Stage::Execution));

    let outcome = add_step(&mut conn, &chain.id, "reflection", "Wrap up", "suite is 4x faster", "", 0.9).unwrap();
    assert_eq!(outcome.next_stage, None, "reflection is terminal");
    assert!(outcome.chain_completed);

    let detail = get_chain(&conn, &chain.id).unwrap();
    assert_eq!(detail.chain.status, ChainStatus::Completed);
    assert_eq!(detail.steps.len(), 3);
    assert_eq!(detail.steps[0].stage, "analysis");
    assert_eq!(detail.steps[2].stage, "reflection");
    assert!((detail.average_confidence - 0.8).abs() < 1e-9);
    assert!(detail.total_tokens > 0);
}

#[test]
fn unknown_stage_is_accepted_and_steered_to_analysis() {
    let mut conn = test_db();
    let project = test_project(&conn);
    let chain = create_chain(&conn, &project.id, "objective").unwrap();

    let outcome = add_step(&mut conn, &chain.id, "brainstorm", "Free-form", "some content", "", 0.5).unwrap();
    assert_eq!(outcome.next_stage, Some(Stage::Analysis));
    assert!(!outcome.chain_completed);

    let detail = get_chain(&conn, &chain.id).unwrap();
    assert_eq!(detail.steps[0].stage, "brainstorm", "stage stored as given");
}

#[test]
fn out_of_order_stages_are_recorded_in_arrival_order() {
    let mut conn = test_db();
    let project = test_project(&conn);
    let chain = create_chain(&conn, &project.id, "objective").unwrap();

    add_step(&mut conn, &chain.id, "validation", "v", "c1", "", 0.5).unwrap();
    add_step(&mut conn, &chain.id, "analysis", "a", "c2", "", 0.5).unwrap();

    let detail = get_chain(&conn, &chain.id).unwrap();
    assert_eq!(detail.steps[0].stage, "validation");
    assert_eq!(detail.steps[1].stage, "analysis");
}

#[test]
fn steps_are_mirrored_as_memories() {
    let mut conn = test_db();
    let project = test_project(&conn);
    let chain = create_chain(&conn, &project.id, "objective").unwrap();

    add_step(&mut conn, &chain.id, "analysis", "Root cause", "the cache is stale", "lru eviction is off", 0.6).unwrap();

    let mirrored = query_memories(
        &conn,
        &project.id,
        &MemoryFilter {
            memory_type: Some("thinking_step".to_string()),
            session_id: None,
        },
        10,
    )
    .unwrap();
    assert_eq!(mirrored.len(), 1);
    assert_eq!(mirrored[0].title, "Analysis Step: Root cause");
    assert!(mirrored[0].content.contains("Content: the cache is stale"));
    assert!(mirrored[0].content.contains("Reasoning: lru eviction is off"));
    assert!((mirrored[0].importance - 0.6).abs() < 1e-9);
}

#[test]
fn steps_survive_abandonment() {
    let mut conn = test_db();
    let project = test_project(&conn);
    let chain = create_chain(&conn, &project.id, "objective").unwrap();
    add_step(&mut conn, &chain.id, "analysis", "t", "c", "", 0.5).unwrap();

    let abandoned = abandon_chain(&conn, &chain.id).unwrap();
    assert_eq!(abandoned.status, ChainStatus::Abandoned);

    let detail = get_chain(&conn, &chain.id).unwrap();
    assert_eq!(detail.steps.len(), 1, "steps remain readable");
}

#[test]
fn empty_objective_is_rejected() {
    let conn = test_db();
    let project = test_project(&conn);
    assert!(create_chain(&conn, &project.id, "  ").is_err());
}

#[test]
fn chains_list_newest_first() {
    let mut conn = test_db();
    let project = test_project(&conn);
    let first = create_chain(&conn, &project.id, "one").unwrap();
    let second = create_chain(&conn, &project.id, "two").unwrap();
    add_step(&mut conn, &first.id, "analysis", "t", "c", "", 0.5).unwrap();

    let chains = list_chains(&conn, &project.id, 10).unwrap();
    assert_eq!(chains.len(), 2);
    assert_eq!(chains[0].id, second.id);
}
