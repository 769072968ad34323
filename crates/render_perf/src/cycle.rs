//! Render-cycle identity and mark labels

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a single render cycle (one mount or one update).
///
/// Uses UUID v4 so concurrently open cycles never share an id. Displayed in
/// simple (unhyphenated) form so mark labels split cleanly on `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleId(Uuid);

impl CycleId {
    /// Mint a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parse an id from either simple or hyphenated UUID text.
    pub fn from_string(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Which end of a cycle a mark records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkPhase {
    Start,
    End,
}

impl MarkPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkPhase::Start => "start",
            MarkPhase::End => "end",
        }
    }
}

/// A mark label of the form `<component>-<cycle>-start|end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkLabel {
    pub component: String,
    pub cycle: CycleId,
    pub phase: MarkPhase,
}

impl MarkLabel {
    pub fn start(component: impl Into<String>, cycle: CycleId) -> Self {
        Self {
            component: component.into(),
            cycle,
            phase: MarkPhase::Start,
        }
    }

    pub fn end(component: impl Into<String>, cycle: CycleId) -> Self {
        Self {
            component: component.into(),
            cycle,
            phase: MarkPhase::End,
        }
    }

    /// Parse a label produced by this module.
    ///
    /// The component name may itself contain `-`; the id and phase are taken
    /// from the right.
    pub fn parse(label: &str) -> Option<Self> {
        let mut parts = label.rsplitn(3, '-');
        let phase = match parts.next()? {
            "start" => MarkPhase::Start,
            "end" => MarkPhase::End,
            _ => return None,
        };
        let cycle = CycleId::from_string(parts.next()?)?;
        let component = parts.next()?;
        Some(Self {
            component: component.to_string(),
            cycle,
            phase,
        })
    }
}

impl fmt::Display for MarkLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.component, self.cycle, self.phase.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<CycleId> = (0..1000).map(|_| CycleId::new()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_uuid_round_trip() {
        let id = CycleId::new();
        assert_eq!(id.as_uuid().get_version_num(), 4);
        assert_eq!(CycleId::from_string(&id.as_uuid().to_string()), Some(id));
        assert_eq!(CycleId::from_string(&id.to_string()), Some(id));
    }

    #[test]
    fn test_label_format() {
        let id = CycleId::new();
        let label = MarkLabel::start("A", id).to_string();
        assert_eq!(label, format!("A-{}-start", id));
        assert!(!id.to_string().contains('-'));

        let label = MarkLabel::end("A", id).to_string();
        assert!(label.ends_with("-end"));
    }

    #[test]
    fn test_parse_rejects_foreign_labels() {
        assert_eq!(MarkLabel::parse("navigationStart"), None);
        assert_eq!(MarkLabel::parse("A-notanid-start"), None);
        assert_eq!(MarkLabel::parse("A-1234-middle"), None);
    }

    proptest! {
        #[test]
        fn prop_label_parses_back(name in "[A-Za-z][A-Za-z0-9_-]{0,16}", start in any::<bool>()) {
            let id = CycleId::new();
            let label = if start { MarkLabel::start(name.clone(), id) } else { MarkLabel::end(name.clone(), id) };
            let parsed = MarkLabel::parse(&label.to_string());
            prop_assert_eq!(parsed, Some(label));
        }
    }
}
