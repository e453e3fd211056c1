//! Tests for forest construction

use std::collections::HashSet;

use rstest::rstest;

use orgtree::domain::{
    build_tree, DomainError, DuplicateIdPolicy, Employee, OrgForest, PromotionReason, TreeBuilder,
};
use orgtree::util::testing::init_test_setup;

fn emp(id: &str, salary: f64, manager: Option<&str>) -> Employee {
    Employee::new(id, format!("First{id}"), format!("Last{id}"), salary, manager)
}

/// Ids of a node's children, in order.
fn child_ids(forest: &OrgForest, id: &str) -> Vec<String> {
    forest
        .direct_reports(id)
        .iter()
        .map(|n| n.id().to_string())
        .collect()
}

// ============================================================
// Basic construction
// ============================================================

#[test]
fn given_ceo_and_two_reports_when_building_then_single_root_with_two_children() {
    init_test_setup();
    // Arrange
    let records = vec![
        Employee::new("1", "J", "D", 60000.0, None),
        Employee::new("2", "A", "S", 40000.0, Some("1")),
        Employee::new("3", "B", "S", 50000.0, Some("1")),
    ];

    // Act
    let forest = build_tree(records);

    // Assert
    assert_eq!(forest.root_node_count(), 1);
    assert_eq!(forest.total_employee_count(), 3);
    let root = forest.roots().next().expect("one root");
    assert_eq!(root.id(), "1");
    assert_eq!(child_ids(&forest, "1"), vec!["2", "3"]);
}

#[test]
fn given_empty_input_when_building_then_forest_is_empty() {
    init_test_setup();
    let forest = build_tree(Vec::new());

    assert!(forest.is_empty());
    assert_eq!(forest.root_node_count(), 0);
    assert_eq!(forest.total_employee_count(), 0);
    assert_eq!(forest.height(), 0);
    assert!(forest.all_nodes().is_empty());
}

#[test]
fn given_reports_listed_before_manager_when_building_then_forward_references_resolve() {
    init_test_setup();
    // Arrange
    let records = vec![
        emp("3", 1.0, Some("1")),
        emp("2", 1.0, Some("1")),
        emp("1", 1.0, None),
    ];

    // Act
    let forest = build_tree(records);

    // Assert
    assert_eq!(forest.root_node_count(), 1);
    assert_eq!(child_ids(&forest, "1"), vec!["3", "2"]);
    assert!(forest.promoted_roots().is_empty());
}

#[test]
fn given_siblings_when_building_then_children_follow_input_order() {
    init_test_setup();
    let records = vec![
        emp("1", 1.0, None),
        emp("c", 1.0, Some("1")),
        emp("a", 1.0, Some("1")),
        emp("b", 1.0, Some("1")),
    ];

    let forest = build_tree(records);

    assert_eq!(child_ids(&forest, "1"), vec!["c", "a", "b"]);
}

#[test]
fn given_several_rootless_records_when_building_then_roots_follow_input_order() {
    init_test_setup();
    let records = vec![emp("z", 1.0, None), emp("a", 1.0, None), emp("m", 1.0, None)];

    let forest = build_tree(records);

    let roots: Vec<_> = forest.roots().map(|n| n.id().to_string()).collect();
    assert_eq!(roots, vec!["z", "a", "m"]);
}

// ============================================================
// Orphans and cycles
// ============================================================

#[test]
fn given_dangling_manager_when_building_then_record_becomes_root() {
    init_test_setup();
    // Arrange
    let records = vec![emp("1", 1.0, Some("999"))];

    // Act
    let forest = build_tree(records);

    // Assert
    assert_eq!(forest.total_employee_count(), 1);
    assert_eq!(forest.root_node_count(), 1);
    assert_eq!(forest.promoted_roots().len(), 1);
    assert_eq!(forest.promoted_roots()[0].employee_id, "1");
    assert_eq!(
        forest.promoted_roots()[0].reason,
        PromotionReason::MissingManager("999".to_string())
    );
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(3)]
fn given_n_orphans_when_building_then_root_count_grows_by_n(#[case] orphans: usize) {
    init_test_setup();
    // Arrange
    let mut records = vec![emp("ceo", 1.0, None), emp("a", 1.0, Some("ceo"))];
    for i in 0..orphans {
        records.push(emp(&format!("o{i}"), 1.0, Some(&format!("missing{i}"))));
    }
    let expected_total = records.len();

    // Act
    let forest = build_tree(records);

    // Assert
    assert_eq!(forest.total_employee_count(), expected_total);
    assert_eq!(forest.root_node_count(), 1 + orphans);
}

#[test]
fn given_self_managed_record_when_building_then_promoted_as_cycle() {
    init_test_setup();
    let forest = build_tree(vec![emp("1", 1.0, Some("1"))]);

    assert_eq!(forest.root_node_count(), 1);
    assert!(forest.node_by_id("1").expect("node").is_root());
    assert_eq!(
        forest.promoted_roots()[0].reason,
        PromotionReason::ReportingCycle("1".to_string())
    );
}

#[test]
fn given_two_node_cycle_when_building_then_one_member_becomes_root() {
    init_test_setup();
    // Arrange: 1 reports to 2, 2 reports to 1
    let records = vec![emp("1", 1.0, Some("2")), emp("2", 1.0, Some("1"))];

    // Act
    let forest = build_tree(records);

    // Assert: 1 attaches under 2, then 2 -> 1 would close the loop
    assert_eq!(forest.root_node_count(), 1);
    assert_eq!(forest.roots().next().expect("root").id(), "2");
    assert_eq!(child_ids(&forest, "2"), vec!["1"]);
    assert_eq!(forest.iter().count(), 2);
    assert!(matches!(
        forest.promoted_roots()[0].reason,
        PromotionReason::ReportingCycle(_)
    ));
}

// ============================================================
// Duplicate ids
// ============================================================

#[test]
fn given_duplicate_ids_when_building_then_last_record_wins() {
    init_test_setup();
    // Arrange
    let records = vec![
        emp("1", 1.0, None),
        Employee::new("2", "Old", "Record", 10.0, Some("1")),
        Employee::new("2", "New", "Record", 20.0, Some("1")),
    ];

    // Act
    let forest = build_tree(records);

    // Assert
    assert_eq!(forest.total_employee_count(), 2);
    let node = forest.node_by_id("2").expect("node 2");
    assert_eq!(node.employee.first_name(), "New");
    assert_eq!(child_ids(&forest, "1"), vec!["2"]);
    assert_eq!(forest.duplicate_ids(), ["2".to_string()]);
    assert_eq!(forest.iter().count(), 2);
}

#[test]
fn given_reject_policy_when_ids_collide_then_build_fails() {
    init_test_setup();
    let builder = TreeBuilder::with_duplicate_policy(DuplicateIdPolicy::Reject);

    let result = builder.build(vec![emp("1", 1.0, None), emp("1", 2.0, None)]);

    assert_eq!(
        result.unwrap_err(),
        DomainError::DuplicateEmployeeId("1".to_string())
    );
}

#[test]
fn given_reject_policy_when_ids_unique_then_builds() {
    init_test_setup();
    let builder = TreeBuilder::with_duplicate_policy(DuplicateIdPolicy::Reject);

    let forest = builder
        .build(vec![emp("1", 1.0, None), emp("2", 1.0, Some("1"))])
        .expect("build");

    assert_eq!(forest.total_employee_count(), 2);
}

// ============================================================
// Structural properties
// ============================================================

#[test]
fn given_mixed_roster_when_building_then_forest_is_well_formed() {
    init_test_setup();
    // Arrange
    let records = vec![
        emp("1", 1.0, None),
        emp("2", 1.0, Some("1")),
        emp("3", 1.0, Some("2")),
        emp("4", 1.0, Some("404")),
        emp("5", 1.0, Some("4")),
        emp("6", 1.0, Some("6")),
        emp("7", 1.0, Some("1")),
    ];
    let count = records.len();

    // Act
    let forest = build_tree(records);

    // Assert: every node visited exactly once from the roots
    let visited: Vec<_> = forest.iter().map(|(_, n)| n.id().to_string()).collect();
    let unique: HashSet<_> = visited.iter().cloned().collect();
    assert_eq!(visited.len(), count);
    assert_eq!(unique.len(), count);

    let non_roots = forest.iter().filter(|(_, n)| !n.is_root()).count();
    assert_eq!(forest.root_node_count() + non_roots, count);

    // every non-root is listed exactly once among its parent's children
    for (idx, node) in forest.iter() {
        if let Some(parent) = node.parent {
            let siblings = &forest.get(parent).expect("parent").children;
            assert_eq!(siblings.iter().filter(|&&c| c == idx).count(), 1);
        }
    }
}

#[test]
fn given_two_builds_when_second_has_disjoint_ids_then_only_second_resolves() {
    init_test_setup();
    let builder = TreeBuilder::new();
    let first = builder
        .build(vec![emp("a", 1.0, None), emp("b", 1.0, Some("a"))])
        .expect("first");
    assert!(first.node_by_id("a").is_some());

    let second = builder
        .build(vec![emp("x", 1.0, None), emp("y", 1.0, Some("x"))])
        .expect("second");

    assert!(second.node_by_id("a").is_none());
    assert!(second.node_by_id("b").is_none());
    assert!(second.node_by_id("x").is_some());
    assert_eq!(second.total_employee_count(), 2);
}
