//! Outline rendering and scripted filling against a JSON form.

use form_cli::outline::{outline_rows, render_outline};
use form_cli::script::{AnswerScript, Failure, FillOptions, Stage, fill};
use form_engine::Navigator;
use form_model::{FailureKind, FormModel};
use form_tree::FormTree;

const INTAKE: &str = r#"{
    "title": "Intake",
    "children": [
        { "type": "question", "name": "name", "required": true },
        { "type": "group", "name": "details", "appearance": "field-list", "children": [
            { "type": "question", "name": "age",
              "constraint": { "kind": "range", "min": 0, "max": 120 },
              "constraint_message": "Age must be between 0 and 120" },
            { "type": "question", "name": "weight" }
        ] },
        { "type": "repeat", "name": "member", "children": [
            { "type": "question", "name": "member_name" }
        ] },
        { "type": "question", "name": "consent" }
    ]
}"#;

fn intake() -> Navigator<FormTree> {
    Navigator::new(FormTree::from_json(INTAKE).expect("valid intake form"))
}

fn script(json: &str) -> AnswerScript {
    AnswerScript::from_json(json).expect("valid script")
}

#[test]
fn outline_renders_every_screen() {
    let nav = intake();
    let screens = nav.outline().expect("outline");
    insta::assert_snapshot!(render_outline(nav.model(), &screens), @r"
    1. question /name
    2. field-list /details
       - /details/age
       - /details/weight
    3. repeat prompt /member[new] (0 existing)
    4. question /consent
    5. end
    ");
}

#[test]
fn outline_rows_number_screens_from_one() {
    let nav = intake();
    let rows = outline_rows(nav.model(), &nav.outline().expect("outline"));
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[1].kind, "field-list");
    assert_eq!(rows[1].questions, ["/details/age", "/details/weight"]);
    assert_eq!(rows[2].note.as_deref(), Some("0 existing"));
}

#[test]
fn fill_adds_requested_instances_and_validates() {
    let mut nav = intake();
    let script = script(
        r#"{
            "values": {
                "/name": "Ann",
                "/details/age": 40,
                "/member[1]/member_name": "Bob",
                "/member[2]/member_name": "Cy",
                "/consent": "yes"
            },
            "repeats": { "/member": 2 }
        }"#,
    );
    let options = FillOptions {
        mark_completed: true,
        ..FillOptions::default()
    };

    let report = fill(&mut nav, &script, options).expect("fill");
    assert!(report.is_valid());
    assert_eq!(report.instances_added, 2);
    assert_eq!(report.answers, 5);
    assert_eq!(report.screens, 8);

    let payload = nav.model().payload();
    assert_eq!(payload["completed"], true);
    assert_eq!(payload["answers"]["/member[2]/member_name"], "Cy");
    assert_eq!(payload["answers"]["/details/age"], 40);
}

#[test]
fn fill_stops_at_a_rejected_commit() {
    let mut nav = intake();
    let script = script(r#"{ "values": { "/name": "Ann", "/details/age": 150 } }"#);

    let report = fill(&mut nav, &script, FillOptions::default()).expect("fill");
    assert_eq!(
        report.failure,
        Some(Failure {
            stage: Stage::Commit,
            reference: "/details/age".to_string(),
            kind: FailureKind::ConstraintViolated,
            message: Some("Age must be between 0 and 120".to_string()),
        })
    );
    assert_eq!(nav.model().reference(nav.current_position()).as_deref(), Some("/details"));
}

#[test]
fn missing_required_answers_fail_on_commit() {
    let mut nav = intake();
    let report = fill(&mut nav, &script("{}"), FillOptions::default()).expect("fill");
    let failure = report.failure.expect("name is required");
    assert_eq!(failure.reference, "/name");
    assert_eq!(failure.kind, FailureKind::RequiredButEmpty);
    assert_eq!(report.screens, 1);
}

#[test]
fn skipped_constraints_are_caught_by_final_validation() {
    let mut nav = intake();
    let script = script(r#"{ "values": { "/name": "Ann", "/details/age": 150 } }"#);
    let options = FillOptions {
        evaluate_constraints: false,
        mark_completed: true,
    };

    let report = fill(&mut nav, &script, options).expect("fill");
    let failure = report.failure.expect("age is out of range");
    assert_eq!(failure.stage, Stage::Validation);
    assert_eq!(failure.reference, "/details/age");
    assert_eq!(nav.model().reference(nav.current_position()).as_deref(), Some("/details"));
    assert!(!nav.model().is_completed());
    assert!(nav.model().answer_at(&nav.model().find("/details/age").expect("age")).is_some());
}
