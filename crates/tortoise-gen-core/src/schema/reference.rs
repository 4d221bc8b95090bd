use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Deletion policy of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceAction {
    Cascade,
    Restrict,
    SetNull,
    SetDefault,
    NoAction,
}

impl ReferenceAction {
    /// Name of the action as written in the schema language.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceAction::Cascade => "Cascade",
            ReferenceAction::Restrict => "Restrict",
            ReferenceAction::SetNull => "SetNull",
            ReferenceAction::SetDefault => "SetDefault",
            ReferenceAction::NoAction => "NoAction",
        }
    }

    /// Parse the schema-language spelling of an action.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Cascade" => Some(ReferenceAction::Cascade),
            "Restrict" => Some(ReferenceAction::Restrict),
            "SetNull" => Some(ReferenceAction::SetNull),
            "SetDefault" => Some(ReferenceAction::SetDefault),
            "NoAction" => Some(ReferenceAction::NoAction),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ReferenceAction::Cascade)]
    #[case(ReferenceAction::Restrict)]
    #[case(ReferenceAction::SetNull)]
    #[case(ReferenceAction::SetDefault)]
    #[case(ReferenceAction::NoAction)]
    fn parse_accepts_schema_spelling(#[case] action: ReferenceAction) {
        assert_eq!(ReferenceAction::parse(action.as_str()), Some(action));
    }

    #[test]
    fn parse_rejects_unknown_action() {
        assert_eq!(ReferenceAction::parse("set_null"), None);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&ReferenceAction::SetNull).unwrap();
        assert_eq!(json, "\"set_null\"");
    }
}
