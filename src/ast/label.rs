use super::{NodeId, NodeKind};
use std::fmt;
use std::str::FromStr;

/// Jump target: `$$<purpose>_<kind>_<id>$$`, or `$$<purpose>_<kind>$$`
/// when no id disambiguates it.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Label(String);

impl Label {
    pub fn new(purpose: &str, kind: NodeKind, id: Option<NodeId>) -> Self {
        match id {
            Some(id) => Self(format!("$${purpose}_{kind}_{id}$$")),
            None => Self(format!("$${purpose}_{kind}$$")),
        }
    }

    pub fn function(name: &str) -> Self {
        Self(format!("$$Function_{name}$$"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() > 4 && s.starts_with("$$") && s.ends_with("$$") {
            Ok(Self(s.to_owned()))
        } else {
            Err(format!("invalid label: {s}"))
        }
    }
}
