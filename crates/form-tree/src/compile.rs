//! Compilation of definitions into the runtime node tree.

use std::collections::HashMap;

use form_model::AnswerValue;
use regex::Regex;

use crate::definition::{Condition, Constraint, NodeDef};
use crate::error::{Result, TreeError};

pub(crate) struct Node {
    pub name: String,
    pub label: Option<String>,
    pub appearance: Option<String>,
    pub relevant: Option<Condition>,
    pub shape: Shape,
    pub children: Vec<Node>,
}

pub(crate) enum Shape {
    Question(QuestionRules),
    Group,
    Repeat(RepeatRules),
}

pub(crate) struct QuestionRules {
    pub required: bool,
    pub check: Option<Check>,
    pub message: Option<String>,
}

pub(crate) struct RepeatRules {
    pub fixed: Option<usize>,
    pub max: Option<usize>,
    pub initial: usize,
}

impl RepeatRules {
    pub fn has_prompt(&self) -> bool {
        self.fixed.is_none()
    }
}

pub(crate) enum Check {
    Range { min: Option<f64>, max: Option<f64> },
    Pattern(Regex),
    OneOf(Vec<String>),
    MaxLength(usize),
}

impl Check {
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        match self {
            Self::Range { min, max } => {
                let Some(number) = value.as_number() else {
                    return false;
                };
                min.is_none_or(|min| number >= min) && max.is_none_or(|max| number <= max)
            }
            Self::Pattern(regex) => regex.is_match(&value.to_string()),
            Self::OneOf(values) => match value {
                AnswerValue::Choices(choices) => choices.iter().all(|choice| values.contains(choice)),
                other => values.contains(&other.to_string()),
            },
            Self::MaxLength(len) => value.to_string().chars().count() <= *len,
        }
    }
}

/// The compiled tree plus an index from node name to definition path.
pub(crate) struct Compiled {
    pub nodes: Vec<Node>,
    pub names: HashMap<String, Vec<usize>>,
}

pub(crate) fn compile(defs: Vec<NodeDef>) -> Result<Compiled> {
    let mut names = HashMap::new();
    let mut path = Vec::new();
    let nodes = compile_children(defs, &mut path, &mut names)?;
    let compiled = Compiled { nodes, names };
    check_conditions(&compiled.nodes, &compiled)?;
    Ok(compiled)
}

fn compile_children(
    defs: Vec<NodeDef>,
    path: &mut Vec<usize>,
    names: &mut HashMap<String, Vec<usize>>,
) -> Result<Vec<Node>> {
    let mut nodes = Vec::with_capacity(defs.len());
    for (index, def) in defs.into_iter().enumerate() {
        path.push(index);
        let name = def.name().trim().to_string();
        if name.is_empty() {
            return Err(TreeError::EmptyName);
        }
        if names.insert(name.clone(), path.clone()).is_some() {
            return Err(TreeError::DuplicateName { name });
        }
        let node = match def {
            NodeDef::Question(question) => {
                let check = question
                    .constraint
                    .map(|constraint| compile_check(&name, constraint))
                    .transpose()?;
                Node {
                    name,
                    label: question.label,
                    appearance: None,
                    relevant: question.relevant,
                    shape: Shape::Question(QuestionRules {
                        required: question.required,
                        check,
                        message: question.constraint_message,
                    }),
                    children: Vec::new(),
                }
            }
            NodeDef::Group(group) => Node {
                name,
                label: group.label,
                appearance: group.appearance,
                relevant: group.relevant,
                shape: Shape::Group,
                children: compile_children(group.children, path, names)?,
            },
            NodeDef::Repeat(repeat) => Node {
                name,
                label: repeat.label,
                appearance: repeat.appearance,
                relevant: repeat.relevant,
                shape: Shape::Repeat(RepeatRules {
                    fixed: repeat.count,
                    max: repeat.max,
                    initial: repeat.initial,
                }),
                children: compile_children(repeat.children, path, names)?,
            },
        };
        nodes.push(node);
        path.pop();
    }
    Ok(nodes)
}

fn compile_check(question: &str, constraint: Constraint) -> Result<Check> {
    Ok(match constraint {
        Constraint::Range { min, max } => Check::Range { min, max },
        Constraint::Pattern { regex } => {
            Check::Pattern(Regex::new(&regex).map_err(|source| TreeError::InvalidPattern {
                question: question.to_string(),
                source,
            })?)
        }
        Constraint::OneOf { values } => Check::OneOf(values),
        Constraint::MaxLength { len } => Check::MaxLength(len),
    })
}

fn check_conditions(nodes: &[Node], compiled: &Compiled) -> Result<()> {
    for node in nodes {
        if let Some(condition) = &node.relevant {
            let target = condition.question();
            let is_question = compiled
                .names
                .get(target)
                .and_then(|path| node_at(&compiled.nodes, path))
                .is_some_and(|found| matches!(found.shape, Shape::Question(_)));
            if !is_question {
                return Err(TreeError::UnknownQuestion {
                    name: target.to_string(),
                    referenced_by: node.name.clone(),
                });
            }
        }
        check_conditions(&node.children, compiled)?;
    }
    Ok(())
}

/// Follows a definition path of child indices.
pub(crate) fn node_at<'a>(nodes: &'a [Node], path: &[usize]) -> Option<&'a Node> {
    let (first, rest) = path.split_first()?;
    let mut node = nodes.get(*first)?;
    for index in rest {
        node = node.children.get(*index)?;
    }
    Some(node)
}
