//! Tests for position ordering and ancestry.

use form_model::{AncestorChain, FailureKind, PathStep, Position, ValidationOutcome};

fn pos(steps: &[(usize, Option<usize>)]) -> Position {
    Position::node(
        steps
            .iter()
            .map(|&(index, instance)| PathStep { index, instance })
            .collect(),
    )
}

#[test]
fn sentinels_bracket_every_node() {
    let node = pos(&[(4, None), (1, Some(7))]);
    assert!(Position::BeginningOfForm < node);
    assert!(node < Position::EndOfForm);
}

#[test]
fn ancestor_precedes_descendants() {
    let group = pos(&[(1, None)]);
    let inner = pos(&[(1, None), (0, None)]);
    let sibling = pos(&[(2, None)]);
    assert!(group < inner);
    assert!(inner < sibling);
}

#[test]
fn repeat_instances_precede_their_prompt() {
    let first = pos(&[(0, Some(0)), (3, None)]);
    let second = pos(&[(0, Some(1))]);
    let prompt = pos(&[(0, Some(2))]);
    assert!(first < second);
    assert!(second < prompt);
}

#[test]
fn sub_position_is_strict() {
    let group = pos(&[(1, None)]);
    let inner = pos(&[(1, None), (0, None)]);
    assert!(inner.is_sub_position_of(&group));
    assert!(!group.is_sub_position_of(&group));
    assert!(!group.is_sub_position_of(&inner));
    assert!(!inner.is_sub_position_of(&Position::BeginningOfForm));
}

#[test]
fn instance_mismatch_is_not_nested() {
    let first = pos(&[(0, Some(0))]);
    let in_second = pos(&[(0, Some(1)), (0, None)]);
    assert!(!in_second.is_sub_position_of(&first));
}

#[test]
fn depth_and_parent() {
    let inner = pos(&[(1, None), (2, Some(0)), (0, None)]);
    assert_eq!(inner.depth(), 3);
    assert_eq!(inner.parent(), Some(pos(&[(1, None), (2, Some(0))])));
    assert_eq!(pos(&[(1, None)]).parent(), None);
    assert_eq!(Position::EndOfForm.depth(), 0);
}

#[test]
fn ancestor_chain_accessors() {
    let inner = pos(&[(1, None), (2, Some(0)), (0, None)]);
    let chain = AncestorChain::new(inner.ancestors());
    assert_eq!(chain.len(), 3);
    assert_eq!(chain.target(), Some(&inner));
    assert_eq!(chain.immediate_parent(), Some(&pos(&[(1, None), (2, Some(0))])));
    assert_eq!(chain.outermost(), Some(&pos(&[(1, None)])));
    assert_eq!(chain.enclosing().len(), 2);
    let with_instance = chain.outermost_matching(|p| {
        p.last_step().and_then(|step| step.instance).is_some()
    });
    assert_eq!(with_instance, Some(&pos(&[(1, None), (2, Some(0))])));
}

#[test]
fn chain_iterates_from_either_end() {
    let inner = pos(&[(1, None), (2, Some(0)), (0, None)]);
    let chain = AncestorChain::new(inner.ancestors());
    let innermost_instance = chain
        .iter()
        .rev()
        .find(|p| p.last_step().and_then(|step| step.instance).is_some());
    assert_eq!(innermost_instance, Some(&pos(&[(1, None), (2, Some(0))])));
    assert_eq!(chain.iter().next(), chain.outermost());
    assert_eq!(chain.iter().next_back(), Some(&inner));
}

#[test]
fn top_level_chain_has_no_parent() {
    let chain = AncestorChain::new(pos(&[(0, None)]).ancestors());
    assert_eq!(chain.immediate_parent(), None);
    assert!(chain.enclosing().is_empty());
}

#[test]
fn outcome_serializes_with_status_tag() {
    let outcome = ValidationOutcome::failed(pos(&[(0, None)]), FailureKind::RequiredButEmpty);
    let json = serde_json::to_value(&outcome).expect("serialize outcome");
    assert_eq!(json["status"], "failed");
    assert_eq!(json["kind"], "required_but_empty");
    assert!(!outcome.is_valid());
    assert_eq!(
        outcome.failure().map(|(_, kind)| kind),
        Some(FailureKind::RequiredButEmpty)
    );
}
