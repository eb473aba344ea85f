//! Property tests for commit ordering and traversal symmetry.

use form_engine::{Navigator, PendingAnswers};
use form_model::{AnswerValue, FailureKind, PathStep, Position, ValidationOutcome};
use form_tree::{Condition, Constraint, FormDefinition, FormTree, NodeDef};
use proptest::prelude::*;

const LIMIT: i64 = 10;

fn single_screen(count: usize) -> FormTree {
    let questions = (0..count)
        .map(|i| {
            NodeDef::question(format!("q{i}")).with_constraint(
                Constraint::Range {
                    min: None,
                    max: Some(LIMIT as f64),
                },
                None,
            )
        })
        .collect();
    FormTree::from_definition(FormDefinition::new(
        "Single",
        vec![NodeDef::field_list("all", questions)],
    ))
    .expect("valid form")
}

/// Shape of one top-level block in a generated form.
#[derive(Debug, Clone, Copy)]
enum Block {
    Question { hidden: bool },
    Group { size: usize, hidden: bool },
    FieldList { size: usize, hidden: bool },
}

fn block() -> impl Strategy<Value = Block> {
    prop_oneof![
        any::<bool>().prop_map(|hidden| Block::Question { hidden }),
        (0usize..3, any::<bool>()).prop_map(|(size, hidden)| Block::Group { size, hidden }),
        (0usize..3, any::<bool>()).prop_map(|(size, hidden)| Block::FieldList { size, hidden }),
    ]
}

/// A form whose hidden questions depend on a gate question nobody answers.
fn generated(blocks: &[Block]) -> FormTree {
    let mut counter = 0;
    let mut question = |hidden: bool| {
        counter += 1;
        let node = NodeDef::question(format!("n{counter}"));
        if hidden {
            node.relevant_when(Condition::Answered {
                question: "gate".to_string(),
            })
        } else {
            node
        }
    };
    let mut children = vec![NodeDef::question("gate")];
    for (i, block) in blocks.iter().enumerate() {
        children.push(match *block {
            Block::Question { hidden } => question(hidden),
            Block::Group { size, hidden } => {
                NodeDef::group(format!("g{i}"), (0..size).map(|_| question(hidden)).collect())
            }
            Block::FieldList { size, hidden } => {
                NodeDef::field_list(format!("f{i}"), (0..size).map(|_| question(hidden)).collect())
            }
        });
    }
    FormTree::from_definition(FormDefinition::new("Generated", children)).expect("valid form")
}

fn walk(nav: &mut Navigator<FormTree>, forward: bool) -> Vec<Position> {
    let none = PendingAnswers::new();
    let mut visited = Vec::new();
    loop {
        if forward {
            nav.move_forward(&none, true).expect("forward step");
        } else {
            nav.move_backward(&none).expect("backward step");
        }
        let position = nav.current_position().clone();
        if !position.is_in_form() {
            return visited;
        }
        visited.push(position);
    }
}

proptest! {
    #[test]
    fn first_failure_is_the_earliest_in_document_order(
        values in prop::collection::vec(0i64..20, 1..8)
    ) {
        let tree = single_screen(values.len());
        let anchor = Position::node(vec![PathStep::child(0)]);
        let mut nav = Navigator::resume(tree, anchor.clone());
        let pending: PendingAnswers = values
            .iter()
            .enumerate()
            .map(|(i, &value)| (anchor.child(PathStep::child(i)), AnswerValue::Integer(value)))
            .collect();

        let outcome = nav.move_forward(&pending, true).expect("no engine error");
        let expected = values
            .iter()
            .position(|&value| value > LIMIT)
            .map(|i| ValidationOutcome::failed(anchor.child(PathStep::child(i)), FailureKind::ConstraintViolated))
            .unwrap_or(ValidationOutcome::Valid);
        prop_assert_eq!(outcome, expected);
    }

    #[test]
    fn backward_walk_mirrors_forward_walk(blocks in prop::collection::vec(block(), 0..6)) {
        let mut nav = Navigator::new(generated(&blocks));
        let forward = walk(&mut nav, true);
        prop_assert!(nav.current_position().is_end());

        let mut backward = walk(&mut nav, false);
        prop_assert!(nav.current_position().is_beginning());
        backward.reverse();
        prop_assert_eq!(backward, forward);
    }
}
