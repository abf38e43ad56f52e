//! Canonical activity labels and raw classifier outputs.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Activity classes, with ids fixed by training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Label {
    Downstairs = 0,
    Upstairs = 1,
    Walking = 2,
    Running = 3,
    Standing = 4,
}

impl Label {
    /// All labels in id order.
    pub const ALL: [Label; 5] = [
        Label::Downstairs,
        Label::Upstairs,
        Label::Walking,
        Label::Running,
        Label::Standing,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Label::Downstairs => "downstairs",
            Label::Upstairs => "upstairs",
            Label::Walking => "walking",
            Label::Running => "running",
            Label::Standing => "standing",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.name() == name)
    }

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|l| i64::from(l.id()) == id)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output of a classifier before mapping: a class name or a class id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLabel {
    Name(String),
    Id(i64),
}

impl fmt::Display for RawLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawLabel::Name(name) => write!(f, "{name:?}"),
            RawLabel::Id(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for RawLabel {
    fn from(name: &str) -> Self {
        RawLabel::Name(name.to_string())
    }
}

impl From<i64> for RawLabel {
    fn from(id: i64) -> Self {
        RawLabel::Id(id)
    }
}

impl From<Label> for RawLabel {
    fn from(label: Label) -> Self {
        RawLabel::Id(i64::from(label.id()))
    }
}

/// The classifier produced something outside the label vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("classifier output {raw} is not a known activity label")]
pub struct UnmappableLabelError {
    pub raw: RawLabel,
}

impl TryFrom<RawLabel> for Label {
    type Error = UnmappableLabelError;

    fn try_from(raw: RawLabel) -> Result<Self, Self::Error> {
        let mapped = match &raw {
            RawLabel::Name(name) => Label::from_name(name),
            RawLabel::Id(id) => Label::from_id(*id),
        };
        mapped.ok_or(UnmappableLabelError { raw })
    }
}
