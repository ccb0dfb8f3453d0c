//! Ordering and aggregation rules over recording agents.
//!
//! Dependencies name agents, not tasks. These tests pin down what that
//! means when graphs repeat agents, reference missing ones, or fail.

use switchboard::core::{TaskGraph, TaskStatus};
use switchboard::orchestration::RunEvent;

use crate::fixtures::{calls, graph, log_agents, recorder_registry, Harness};

/// Test: dependencies run first
/// Given [b(deps={a}), a]
/// When the graph runs
/// Then a is pulled forward and each task runs once
#[tokio::test]
async fn test_dependency_pulled_ahead_of_declaration_order() {
    let (registry, log) = recorder_registry(&["a", "b"]);
    let harness = Harness::with_registry(registry);

    let g = graph(&[("b", "work", &["a"]), ("a", "work", &[])]);
    let (response, _) = harness.run_graph_with_events(&g).await;

    assert_eq!(calls(&log), vec!["a.work", "b.work"]);
    assert_eq!(log_agents(&response), vec!["a", "b"]);
    assert_eq!(response.subtasks.len(), g.len(), "each task runs exactly once");
}

#[tokio::test]
async fn test_chain_runs_in_dependency_order() {
    let (registry, log) = recorder_registry(&["a", "b", "c"]);
    let harness = Harness::with_registry(registry);

    let g = graph(&[
        ("a", "work", &[]),
        ("b", "work", &["a"]),
        ("c", "work", &["a", "b"]),
    ]);
    let (response, _) = harness.run_graph_with_events(&g).await;

    assert_eq!(calls(&log), vec!["a.work", "b.work", "c.work"]);
    for (i, entry) in response.subtasks.iter().enumerate() {
        assert_eq!(entry.position, i);
        assert_eq!(entry.status, TaskStatus::Done);
    }
}

#[tokio::test]
async fn test_self_dependency_runs_once() {
    let (registry, log) = recorder_registry(&["a"]);
    let harness = Harness::with_registry(registry);

    let g = graph(&[("a", "work", &["a"])]);
    harness.run_graph_with_events(&g).await;

    assert_eq!(calls(&log), vec!["a.work"]);
}

/// Test: first pending task satisfies a dependency
/// Given [b(deps={a}), a.fail, a.work]
/// When the graph runs
/// Then the first a task runs ahead of b, the second a runs last,
///      and results keep only the last a
#[tokio::test]
async fn test_repeated_agent_first_match_and_last_write() {
    let (registry, log) = recorder_registry(&["a", "b"]);
    let harness = Harness::with_registry(registry);

    let g = graph(&[
        ("b", "work", &["a"]),
        ("a", "fail", &[]),
        ("a", "work", &[]),
    ]);
    let (response, _) = harness.run_graph_with_events(&g).await;

    assert_eq!(calls(&log), vec!["a.fail", "b.work", "a.work"]);
    assert_eq!(response.subtasks.len(), 3);
    assert_eq!(response.results.len(), 2);

    // a was first inserted before b, and keeps that slot when replaced.
    let order: Vec<&str> = response.results.iter().map(|(agent, _)| agent).collect();
    assert_eq!(order, vec!["a", "b"]);
    let a = response.results.get("a").unwrap();
    assert!(a.is_success());
    assert_eq!(a.message, "a call 3");
    assert!(!response.chat_response.contains("❌"));
}

#[tokio::test]
async fn test_dependency_already_in_log_is_not_rerun() {
    let (registry, log) = recorder_registry(&["a", "b"]);
    let harness = Harness::with_registry(registry);

    let g = graph(&[
        ("a", "work", &[]),
        ("b", "work", &["a"]),
        ("a", "work", &[]),
        ("b", "work", &["a"]),
    ]);
    harness.run_graph_with_events(&g).await;

    assert_eq!(calls(&log), vec!["a.work", "b.work", "a.work", "b.work"]);
}

#[tokio::test]
async fn test_failed_dependency_does_not_block_dependent() {
    let (registry, log) = recorder_registry(&["a", "b"]);
    let harness = Harness::with_registry(registry);

    let g = graph(&[("a", "fail", &[]), ("b", "work", &["a"])]);
    let (response, _) = harness.run_graph_with_events(&g).await;

    assert_eq!(calls(&log), vec!["a.fail", "b.work"]);
    assert!(!response.results.get("a").unwrap().is_success());
    assert!(response.results.get("b").unwrap().is_success());
    assert!(response.chat_response.contains("• A: ❌ a refused"));
}

#[tokio::test]
async fn test_missing_dependency_agent_is_ignored() {
    let (registry, log) = recorder_registry(&["b"]);
    let harness = Harness::with_registry(registry);

    let g = graph(&[("b", "work", &["ghost"])]);
    let (response, _) = harness.run_graph_with_events(&g).await;

    assert_eq!(calls(&log), vec!["b.work"]);
    assert_eq!(log_agents(&response), vec!["b"]);
}

#[tokio::test]
async fn test_unknown_agent_and_action_become_error_results() {
    let (registry, log) = recorder_registry(&["a"]);
    let harness = Harness::with_registry(registry);

    let g = graph(&[("ghost", "work", &[]), ("a", "dance", &[]), ("a", "work", &[])]);
    let (response, _) = harness.run_graph_with_events(&g).await;

    assert_eq!(response.subtasks.len(), 3);
    assert_eq!(response.subtasks[0].result.message, "Agent ghost not found");
    assert_eq!(
        response.subtasks[1].result.message,
        "Action dance not supported by a"
    );
    // Only the supported call reached the agent.
    assert_eq!(calls(&log), vec!["a.work"]);
    assert!(response.chat_response.contains("• Ghost: ❌ Agent ghost not found"));
}

#[tokio::test]
async fn test_panicking_agent_is_contained() {
    let (registry, log) = recorder_registry(&["a", "b"]);
    let harness = Harness::with_registry(registry);

    let g = graph(&[("a", "panic", &[]), ("b", "work", &["a"])]);
    let (response, _) = harness.run_graph_with_events(&g).await;

    assert_eq!(calls(&log), vec!["a.panic", "b.work"]);
    assert_eq!(
        response.results.get("a").unwrap().message,
        "Error executing panic: a blew up"
    );
    assert!(response.results.get("b").unwrap().is_success());
}

#[tokio::test]
async fn test_events_follow_execution_order() {
    let (registry, _log) = recorder_registry(&["a", "b"]);
    let harness = Harness::with_registry(registry);

    let g = graph(&[("b", "work", &["a"]), ("a", "work", &[])]);
    let (response, events) = harness.run_graph_with_events(&g).await;

    assert_eq!(events.len(), 3 * response.subtasks.len());
    let finished: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            RunEvent::TaskFinished { agent, .. } => Some(agent.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(finished, vec!["a", "b"]);
    assert!(matches!(
        events.first(),
        Some(RunEvent::TaskStatusChanged {
            status: TaskStatus::Running,
            ..
        })
    ));
}

/// Test: resolution is one level deep
/// Given [c(deps={b}), b(deps={a}), a]
/// When the graph runs
/// Then b is pulled ahead of c without first running a,
///      so a runs last even though b names it
#[tokio::test]
async fn test_pulled_dependency_skips_its_own_dependencies() {
    let (registry, log) = recorder_registry(&["a", "b", "c"]);
    let harness = Harness::with_registry(registry);

    let g = graph(&[("c", "work", &["b"]), ("b", "work", &["a"]), ("a", "work", &[])]);
    let (response, _) = harness.run_graph_with_events(&g).await;

    assert_eq!(calls(&log), vec!["b.work", "c.work", "a.work"]);
    assert_eq!(log_agents(&response), vec!["b", "c", "a"]);
}

#[test]
fn test_runs_are_deterministic() {
    let signatures = |g: &TaskGraph| -> Vec<String> {
        let (registry, log) = recorder_registry(&["a", "b", "c"]);
        let harness = Harness::with_registry(registry);
        let (response, _) = tokio_test::block_on(harness.run_graph_with_events(g));
        assert_eq!(log_agents(&response).len(), calls(&log).len());
        calls(&log)
    };

    // b is pulled ahead of c without chasing its own dependency on a.
    let g = graph(&[
        ("c", "work", &["b"]),
        ("b", "work", &["a"]),
        ("a", "work", &[]),
        ("a", "fail", &[]),
    ]);
    let first = signatures(&g);
    assert_eq!(first, vec!["b.work", "c.work", "a.work", "a.fail"]);
    for _ in 0..5 {
        assert_eq!(signatures(&g), first);
    }
}
