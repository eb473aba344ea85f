//! Serializable form definitions.
//!
//! A definition is the static shape of a form: questions, groups and
//! repeats with their display hints, relevance conditions and constraints.
//! It is compiled into a [`FormTree`](crate::FormTree) before use.

use form_model::AnswerValue;
use serde::{Deserialize, Serialize};

/// A complete form definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormDefinition {
    pub title: String,
    #[serde(default)]
    pub children: Vec<NodeDef>,
}

impl FormDefinition {
    pub fn new(title: impl Into<String>, children: Vec<NodeDef>) -> Self {
        Self {
            title: title.into(),
            children,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeDef {
    Question(QuestionDef),
    Group(GroupDef),
    Repeat(RepeatDef),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionDef {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub constraint: Option<Constraint>,
    #[serde(default)]
    pub constraint_message: Option<String>,
    #[serde(default)]
    pub relevant: Option<Condition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupDef {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub appearance: Option<String>,
    #[serde(default)]
    pub relevant: Option<Condition>,
    #[serde(default)]
    pub children: Vec<NodeDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepeatDef {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub appearance: Option<String>,
    #[serde(default)]
    pub relevant: Option<Condition>,
    /// Fixed number of instances. Fixed repeats have no prompt and cannot
    /// be deleted.
    #[serde(default)]
    pub count: Option<usize>,
    /// Upper bound on instances created through the prompt.
    #[serde(default)]
    pub max: Option<usize>,
    /// Instances present when the form is opened.
    #[serde(default)]
    pub initial: usize,
    #[serde(default)]
    pub children: Vec<NodeDef>,
}

/// Answer checks applied when a question is answered with validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    Range {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Pattern {
        regex: String,
    },
    OneOf {
        values: Vec<String>,
    },
    MaxLength {
        len: usize,
    },
}

/// Relevance conditions. Question names resolve from the position being
/// tested, reusing the repeat instances the two share.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum Condition {
    Answered { question: String },
    Equals { question: String, value: AnswerValue },
    NotEquals { question: String, value: AnswerValue },
}

impl Condition {
    pub fn question(&self) -> &str {
        match self {
            Self::Answered { question }
            | Self::Equals { question, .. }
            | Self::NotEquals { question, .. } => question,
        }
    }
}

impl NodeDef {
    pub fn question(name: impl Into<String>) -> Self {
        Self::Question(QuestionDef {
            name: name.into(),
            ..QuestionDef::default()
        })
    }

    pub fn group(name: impl Into<String>, children: Vec<NodeDef>) -> Self {
        Self::Group(GroupDef {
            name: name.into(),
            children,
            ..GroupDef::default()
        })
    }

    pub fn field_list(name: impl Into<String>, children: Vec<NodeDef>) -> Self {
        Self::group(name, children).with_appearance("field-list")
    }

    pub fn repeat(name: impl Into<String>, children: Vec<NodeDef>) -> Self {
        Self::Repeat(RepeatDef {
            name: name.into(),
            children,
            ..RepeatDef::default()
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Question(def) => &def.name,
            Self::Group(def) => &def.name,
            Self::Repeat(def) => &def.name,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = Some(label.into());
        match &mut self {
            Self::Question(def) => def.label = label,
            Self::Group(def) => def.label = label,
            Self::Repeat(def) => def.label = label,
        }
        self
    }

    /// Sets the display hint of a group or repeat; ignored on questions.
    #[must_use]
    pub fn with_appearance(mut self, appearance: impl Into<String>) -> Self {
        match &mut self {
            Self::Question(_) => {}
            Self::Group(def) => def.appearance = Some(appearance.into()),
            Self::Repeat(def) => def.appearance = Some(appearance.into()),
        }
        self
    }

    #[must_use]
    pub fn relevant_when(mut self, condition: Condition) -> Self {
        match &mut self {
            Self::Question(def) => def.relevant = Some(condition),
            Self::Group(def) => def.relevant = Some(condition),
            Self::Repeat(def) => def.relevant = Some(condition),
        }
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        if let Self::Question(def) = &mut self {
            def.required = true;
        }
        self
    }

    #[must_use]
    pub fn with_constraint(mut self, constraint: Constraint, message: Option<&str>) -> Self {
        if let Self::Question(def) = &mut self {
            def.constraint = Some(constraint);
            def.constraint_message = message.map(str::to_string);
        }
        self
    }

    /// Sets repeat instance bounds; ignored on questions and groups.
    #[must_use]
    pub fn with_instances(mut self, initial: usize, max: Option<usize>) -> Self {
        if let Self::Repeat(def) = &mut self {
            def.initial = initial;
            def.max = max;
        }
        self
    }

    #[must_use]
    pub fn with_fixed_count(mut self, count: usize) -> Self {
        if let Self::Repeat(def) = &mut self {
            def.count = Some(count);
        }
        self
    }
}
