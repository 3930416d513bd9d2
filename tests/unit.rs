//! Unit tests for core keiro types: display impls, condition predicates and
//! the error taxonomy.
mod common;
use keiro::prelude::*;

#[test]
fn test_id_display() {
    let flow = common::create_approval_flow();
    assert_eq!(format!("{}", flow.start), "n0");
    assert_eq!(format!("{}", flow.done), "n3");
}

#[test]
fn test_edge_output_display() {
    assert_eq!(format!("{}", EdgeOutput::Default), "default");
    assert_eq!(
        format!("{}", EdgeOutput::Decision(Decision::Rejected)),
        "rejected"
    );
    assert_eq!(
        format!("{}", EdgeOutput::Branch(BranchId("b-1".to_string()))),
        "branch:b-1"
    );
}

#[test]
fn test_field_value_display() {
    assert_eq!(format!("{}", FieldValue::Number(42.0)), "42");
    assert_eq!(format!("{}", FieldValue::Number(2.5)), "2.5");
    assert_eq!(format!("{}", FieldValue::Bool(true)), "true");
    assert_eq!(
        format!(
            "{}",
            FieldValue::Selection(vec!["a".to_string(), "b".to_string()])
        ),
        "a, b"
    );
    assert_eq!(format!("{}", FieldValue::Empty), "");
}

#[test]
fn test_field_value_numeric_view() {
    assert_eq!(FieldValue::Number(7.0).as_number(), Some(7.0));
    assert_eq!(FieldValue::Text(" 7.5 ".to_string()).as_number(), Some(7.5));
    assert_eq!(FieldValue::Text("seven".to_string()).as_number(), None);
    assert_eq!(FieldValue::Bool(true).as_number(), None);
}

#[test]
fn test_field_value_emptiness() {
    assert!(FieldValue::Empty.is_empty());
    assert!(FieldValue::Text("   ".to_string()).is_empty());
    assert!(FieldValue::Selection(vec![]).is_empty());
    assert!(!FieldValue::Number(0.0).is_empty());
    assert!(!FieldValue::Bool(false).is_empty());
}

#[test]
fn test_string_conditions_are_case_sensitive() {
    let value = FieldValue::Text("Procurement".to_string());
    assert!(
        Condition::Contains {
            value: "cure".to_string()
        }
        .matches(&value)
    );
    assert!(
        !Condition::Contains {
            value: "CURE".to_string()
        }
        .matches(&value)
    );
    assert!(
        Condition::StartsWith {
            value: "Pro".to_string()
        }
        .matches(&value)
    );
    assert!(
        Condition::EndsWith {
            value: "ment".to_string()
        }
        .matches(&value)
    );
}

#[test]
fn test_numeric_conditions_parse_before_comparing() {
    let value = FieldValue::Text("12".to_string());
    assert!(
        Condition::GreaterThan {
            value: "10".to_string()
        }
        .matches(&value)
    );
    assert!(
        !Condition::LessThan {
            value: "10".to_string()
        }
        .matches(&value)
    );
    // An unparsable side makes the predicate false, not a fault.
    assert!(
        !Condition::GreaterThan {
            value: "ten".to_string()
        }
        .matches(&value)
    );
    assert!(
        !Condition::GreaterThan {
            value: "10".to_string()
        }
        .matches(&FieldValue::Text("many".to_string()))
    );
}

#[test]
fn test_between_is_inclusive() {
    let between = Condition::Between {
        low: "5".to_string(),
        high: "10".to_string(),
    };
    assert!(between.matches(&FieldValue::Number(5.0)));
    assert!(between.matches(&FieldValue::Number(10.0)));
    assert!(between.matches(&FieldValue::Number(7.3)));
    assert!(!between.matches(&FieldValue::Number(10.1)));
}

#[test]
fn test_equals_compares_numerically_when_possible() {
    let equals_ten = Condition::Equals {
        value: "10.0".to_string(),
    };
    assert!(equals_ten.matches(&FieldValue::Text("10".to_string())));
    assert!(equals_ten.matches(&FieldValue::Number(10.0)));
    assert!(!equals_ten.matches(&FieldValue::Text("10x".to_string())));

    let equals_text = Condition::Equals {
        value: "yes".to_string(),
    };
    assert!(equals_text.matches(&FieldValue::Text("yes".to_string())));
    assert!(!equals_text.matches(&FieldValue::Text("Yes".to_string())));
}

#[test]
fn test_multiselect_membership() {
    let selection = FieldValue::Selection(vec!["ab".to_string(), "cd".to_string()]);
    assert!(
        Condition::Contains {
            value: "ab".to_string()
        }
        .matches(&selection)
    );
    // Membership, not substring: "a" must not match a selection of "ab".
    assert!(
        !Condition::Contains {
            value: "a".to_string()
        }
        .matches(&selection)
    );
    let single = FieldValue::Selection(vec!["ab".to_string()]);
    assert!(
        Condition::Equals {
            value: "ab".to_string()
        }
        .matches(&single)
    );
    assert!(
        !Condition::Equals {
            value: "ab".to_string()
        }
        .matches(&selection)
    );
}

#[test]
fn test_checkbox_conditions() {
    assert!(Condition::IsChecked.matches(&FieldValue::Bool(true)));
    assert!(!Condition::IsChecked.matches(&FieldValue::Bool(false)));
    assert!(Condition::IsNotChecked.matches(&FieldValue::Bool(false)));
    // A blank checkbox counts as not checked.
    assert!(Condition::IsNotChecked.matches(&FieldValue::Empty));
}

#[test]
fn test_issue_classification() {
    let warning = ValidationIssue::UnconfiguredConditional {
        node: NodeId(0),
        label: "Gate".to_string(),
    };
    assert!(warning.is_warning());
    assert_eq!(warning.code(), "unconfigured_conditional");

    let error = ValidationIssue::MissingStart;
    assert!(!error.is_warning());
    assert_eq!(error.code(), "missing_start");
}

#[test]
fn test_duplicate_output_is_rejected() {
    let mut flow = common::create_approval_flow();
    let extra = flow.graph.add_node("Extra end", NodeKind::End).unwrap();
    let err = flow
        .graph
        .add_edge(flow.draft, extra, EdgeOutput::Default)
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::DuplicateHandleTarget {
            source_node: flow.draft,
            output: "default".to_string(),
            existing_target: flow.review,
        }
    );
    assert!(err.to_string().contains("default"));
    assert!(err.to_string().contains(&flow.draft.to_string()));

    // Re-adding the exact same edge is refused too.
    let same = flow
        .graph
        .add_edge(flow.draft, flow.review, EdgeOutput::Default)
        .unwrap_err();
    assert!(matches!(same, GraphError::DuplicateHandleTarget { .. }));
}

#[test]
fn test_error_display() {
    let fault = RoutingFault::NoRouteForDecision {
        node: NodeId(4),
        decision: Decision::Rejected,
    };
    assert!(fault.to_string().contains("n4"));
    assert!(fault.to_string().contains("rejected"));

    let err = GraphError::UnknownNode(NodeId(9));
    assert!(err.to_string().contains("n9"));
}
