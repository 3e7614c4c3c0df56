use std::fmt::{Display, Formatter};
use std::str::FromStr;

use mongodb::bson::{to_bson, Bson};
use rocket::request::FromParam;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The elected positions on the ballot.
///
/// The declaration order is the order in which the wizard walks through the
/// positions and the order in which the review lists them, so the derived
/// `Ord` is meaningful.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionPosition {
    VicePresident,
    Secretary,
    JointSecretary,
    AssociateSecretary,
    JointTreasurer,
}

/// Number of positions on the ballot.
pub const POSITION_COUNT: usize = ElectionPosition::ORDER.len();

impl ElectionPosition {
    /// Every position, in ballot order.
    pub const ORDER: [ElectionPosition; 5] = [
        Self::VicePresident,
        Self::Secretary,
        Self::JointSecretary,
        Self::AssociateSecretary,
        Self::JointTreasurer,
    ];

    /// The position at the given ballot index, if any.
    pub fn at(index: usize) -> Option<Self> {
        Self::ORDER.get(index).copied()
    }

    /// Index of this position in ballot order.
    pub fn index(self) -> usize {
        // Variants are declared in ballot order.
        self as usize
    }

    /// Is this the final position on the ballot?
    pub fn is_last(self) -> bool {
        self.index() == POSITION_COUNT - 1
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::VicePresident => "Vice President",
            Self::Secretary => "Secretary",
            Self::JointSecretary => "Joint Secretary",
            Self::AssociateSecretary => "Associate Secretary",
            Self::JointTreasurer => "Joint Treasurer",
        }
    }

    /// Wire and storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VicePresident => "vice_president",
            Self::Secretary => "secretary",
            Self::JointSecretary => "joint_secretary",
            Self::AssociateSecretary => "associate_secretary",
            Self::JointTreasurer => "joint_treasurer",
        }
    }
}

impl Display for ElectionPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown election position '{0}'")]
pub struct UnknownPosition(pub String);

impl FromStr for ElectionPosition {
    type Err = UnknownPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .into_iter()
            .find(|position| position.as_str() == s)
            .ok_or_else(|| UnknownPosition(s.to_string()))
    }
}

impl<'a> FromParam<'a> for ElectionPosition {
    type Error = UnknownPosition;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param.parse()
    }
}

impl From<ElectionPosition> for Bson {
    fn from(position: ElectionPosition) -> Self {
        to_bson(&position).expect("Serialisation is infallible")
    }
}
