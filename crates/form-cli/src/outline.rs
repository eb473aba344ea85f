//! Screen outlines for display.

use form_engine::Screen;
use form_model::Position;
use form_tree::FormTree;

/// One screen of an outline, described by references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    pub number: usize,
    pub kind: &'static str,
    pub reference: String,
    pub questions: Vec<String>,
    pub note: Option<String>,
}

fn reference_of(tree: &FormTree, position: &Position) -> String {
    tree.reference(position)
        .unwrap_or_else(|| position.to_string())
}

pub fn outline_rows(tree: &FormTree, screens: &[Screen]) -> Vec<OutlineRow> {
    screens
        .iter()
        .filter(|screen| !matches!(screen, Screen::BeginningOfForm))
        .enumerate()
        .map(|(i, screen)| {
            let number = i + 1;
            match screen {
                Screen::Questions { anchor, questions } => {
                    let single = questions.len() == 1 && &questions[0] == anchor;
                    OutlineRow {
                        number,
                        kind: if single { "question" } else { "field-list" },
                        reference: reference_of(tree, anchor),
                        questions: if single {
                            Vec::new()
                        } else {
                            questions.iter().map(|q| reference_of(tree, q)).collect()
                        },
                        note: None,
                    }
                }
                Screen::RepeatPrompt {
                    position, existing, ..
                } => OutlineRow {
                    number,
                    kind: "repeat prompt",
                    reference: reference_of(tree, position),
                    questions: Vec::new(),
                    note: Some(format!("{existing} existing")),
                },
                Screen::BeginningOfForm | Screen::EndOfForm => OutlineRow {
                    number,
                    kind: "end",
                    reference: String::new(),
                    questions: Vec::new(),
                    note: None,
                },
            }
        })
        .collect()
}

/// Plain-text outline, one screen per line with field-list questions
/// indented beneath.
pub fn render_outline(tree: &FormTree, screens: &[Screen]) -> String {
    let mut lines = Vec::new();
    for row in outline_rows(tree, screens) {
        let mut line = format!("{}. {}", row.number, row.kind);
        if !row.reference.is_empty() {
            line.push(' ');
            line.push_str(&row.reference);
        }
        if let Some(note) = &row.note {
            line.push_str(&format!(" ({note})"));
        }
        lines.push(line);
        lines.extend(row.questions.iter().map(|q| format!("   - {q}")));
    }
    lines.join("\n")
}
