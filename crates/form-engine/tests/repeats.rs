//! Adding, declining and deleting repeat instances through the navigator.

use form_engine::{EngineError, Navigator, PendingAnswers, Screen};
use form_model::{AnswerValue, FormModel, NodeKind, Position};
use form_tree::{FormDefinition, FormTree, NodeDef};

fn at(nav: &Navigator<FormTree>, reference: &str) -> Position {
    nav.model()
        .find(reference)
        .unwrap_or_else(|| panic!("no node at {reference}"))
}

/// `[intro, member*{name, age} (max 2), visit*(field-list){date, place}, consent]`
fn household() -> Navigator<FormTree> {
    let definition = FormDefinition::new(
        "Household",
        vec![
            NodeDef::question("intro"),
            NodeDef::repeat(
                "member",
                vec![NodeDef::question("name"), NodeDef::question("age")],
            )
            .with_instances(0, Some(2)),
            NodeDef::repeat(
                "visit",
                vec![NodeDef::question("date"), NodeDef::question("place")],
            )
            .with_appearance("field-list"),
            NodeDef::question("consent"),
        ],
    );
    Navigator::new(FormTree::from_definition(definition).expect("valid form"))
}

fn forward(nav: &mut Navigator<FormTree>) {
    nav.move_forward(&PendingAnswers::new(), true)
        .expect("forward step");
}

#[test]
fn adding_enters_the_new_instance() {
    let mut nav = household();
    forward(&mut nav);
    forward(&mut nav);
    let prompt = at(&nav, "/member[new]");
    assert_eq!(nav.current_position(), &prompt);

    assert_eq!(nav.add_repeat(), Ok(NodeKind::Question));
    assert_eq!(nav.current_position(), &at(&nav, "/member[1]/name"));
    assert_eq!(nav.session().jump_back(), None);
    assert!(nav.can_delete_repeat());
}

#[test]
fn adding_a_field_list_instance_shows_it_as_one_screen() {
    let mut nav = household();
    nav.jump_to(at(&nav, "/visit[new]"));
    assert_eq!(nav.add_repeat(), Ok(NodeKind::Repeat));
    let instance = at(&nav, "/visit[1]");
    assert_eq!(nav.current_position(), &instance);
    assert_eq!(
        nav.current_screen(),
        Ok(Screen::Questions {
            anchor: instance,
            questions: vec![at(&nav, "/visit[1]/date"), at(&nav, "/visit[1]/place")],
        })
    );
}

#[test]
fn prompting_remembers_where_to_return() {
    let mut nav = household();
    nav.jump_to(at(&nav, "/member[new]"));
    nav.add_repeat().expect("add member");
    forward(&mut nav);
    let age = at(&nav, "/member[1]/age");
    assert_eq!(nav.current_position(), &age);

    assert_eq!(nav.prompt_for_new_repeat(), Ok(NodeKind::RepeatInstancePrompt));
    assert_eq!(nav.current_position(), &at(&nav, "/member[new]"));
    assert_eq!(nav.session().jump_back(), Some(&age));

    assert_eq!(nav.cancel_repeat_prompt(), Ok(NodeKind::Question));
    assert_eq!(nav.current_position(), &age);
    assert_eq!(nav.session().jump_back(), None);
}

#[test]
fn declining_without_a_jump_back_moves_on() {
    let mut nav = household();
    forward(&mut nav);
    forward(&mut nav);
    assert_eq!(nav.cancel_repeat_prompt(), Ok(NodeKind::RepeatInstancePrompt));
    assert_eq!(nav.current_position(), &at(&nav, "/visit[new]"));
}

#[test]
fn prompting_outside_a_repeat_does_nothing() {
    let mut nav = household();
    forward(&mut nav);
    let intro = at(&nav, "/intro");
    assert_eq!(nav.prompt_for_new_repeat(), Ok(NodeKind::Question));
    assert_eq!(nav.current_position(), &intro);
    assert_eq!(nav.session().jump_back(), None);
}

#[test]
fn rejected_additions_leave_the_session_alone() {
    let mut nav = household();
    for _ in 0..2 {
        nav.jump_to(at(&nav, "/member[new]"));
        nav.add_repeat().expect("within the limit");
    }
    let prompt = at(&nav, "/member[new]");
    nav.jump_to(prompt.clone());

    let error = nav.add_repeat().expect_err("limit reached");
    assert!(matches!(error, EngineError::NonFatal { .. }));
    assert_eq!(nav.current_position(), &prompt);
    assert_eq!(nav.last_error(), Some(&error));
    assert_eq!(nav.model().repeat_reference(&prompt).as_deref(), Some("/member"));
}

#[test]
fn add_then_delete_returns_to_the_prompt() {
    let mut nav = household();
    for reference in ["/member[new]", "/visit[new]"] {
        let prompt = at(&nav, reference);
        nav.jump_to(prompt.clone());
        nav.add_repeat().expect("add");
        assert_eq!(nav.delete_repeat(), Ok(NodeKind::RepeatInstancePrompt));
        assert_eq!(nav.current_position(), &prompt);
    }
}

#[test]
fn moving_away_from_a_prompt_forgets_the_jump_back() {
    let mut nav = household();
    nav.jump_to(at(&nav, "/member[new]"));
    nav.add_repeat().expect("add member");
    forward(&mut nav);
    nav.prompt_for_new_repeat().expect("prompt");
    assert!(nav.session().jump_back().is_some());

    nav.move_backward(&PendingAnswers::new()).expect("back to age");
    assert_eq!(nav.current_position(), &at(&nav, "/member[1]/age"));
    assert_eq!(nav.session().jump_back(), None);
    nav.move_backward(&PendingAnswers::new()).expect("back to name");
    forward(&mut nav);
    forward(&mut nav);
    assert_eq!(nav.current_position(), &at(&nav, "/member[new]"));

    assert_eq!(nav.cancel_repeat_prompt(), Ok(NodeKind::RepeatInstancePrompt));
    assert_eq!(nav.current_position(), &at(&nav, "/visit[new]"));
}

#[test]
fn deleting_a_middle_member_shows_the_one_that_moved_up() {
    let mut nav = household();
    for name in ["Ann", "Bob"] {
        nav.jump_to(at(&nav, "/member[new]"));
        nav.add_repeat().expect("add member");
        let pending = [(nav.current_position().clone(), AnswerValue::text(name))]
            .into_iter()
            .collect();
        nav.move_forward(&pending, true).expect("answer name");
    }
    nav.jump_to(at(&nav, "/member[1]/name"));

    assert_eq!(nav.delete_repeat(), Ok(NodeKind::Question));
    let name = at(&nav, "/member[1]/name");
    assert_eq!(nav.current_position(), &name);
    assert_eq!(nav.model().answer_at(&name), Some(AnswerValue::text("Bob")));
    assert_eq!(
        nav.current_screen(),
        Ok(Screen::Questions {
            anchor: name.clone(),
            questions: vec![name],
        })
    );
    assert_eq!(nav.model().find("/member[2]/name"), None);
}

#[test]
fn deleting_a_field_list_instance_shows_the_next_instance_screen() {
    let mut nav = household();
    for _ in 0..2 {
        nav.jump_to(at(&nav, "/visit[new]"));
        nav.add_repeat().expect("add visit");
    }
    nav.jump_to(at(&nav, "/visit[1]"));

    assert_eq!(nav.delete_repeat(), Ok(NodeKind::Question));
    let screen = nav.current_screen().expect("renderable after delete");
    assert_eq!(screen.anchor(), at(&nav, "/visit[1]"));
    assert_eq!(screen.questions().len(), 2);
}

#[test]
fn deleting_outside_a_repeat_is_non_fatal() {
    let mut nav = household();
    forward(&mut nav);
    let intro = at(&nav, "/intro");
    assert!(!nav.can_delete_repeat());
    assert!(matches!(nav.delete_repeat(), Err(EngineError::NonFatal { .. })));
    assert_eq!(nav.current_position(), &intro);
}

#[test]
fn prompts_are_matched_by_depth_in_nested_repeats() {
    let definition = FormDefinition::new(
        "Nested",
        vec![NodeDef::repeat(
            "household",
            vec![
                NodeDef::question("hh"),
                NodeDef::repeat("person", vec![NodeDef::question("pname")])
                    .with_instances(1, None),
            ],
        )
        .with_instances(1, None)],
    );
    let mut nav = Navigator::new(FormTree::from_definition(definition).expect("valid form"));

    nav.jump_to(at(&nav, "/household[1]/person[1]/pname"));
    nav.prompt_for_new_repeat().expect("prompt");
    assert_eq!(nav.current_position(), &at(&nav, "/household[1]/person[new]"));
    nav.cancel_repeat_prompt().expect("cancel");

    nav.jump_to(at(&nav, "/household[1]/hh"));
    nav.prompt_for_new_repeat().expect("prompt");
    assert_eq!(nav.current_position(), &at(&nav, "/household[new]"));
}
