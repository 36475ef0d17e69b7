//! Tests for #[derive(Action)] macro

use tidy_macros::Action;

#[derive(Action, Clone, Debug, PartialEq)]
enum ListAction {
    AddItem { label: String },

    SetChecked(u64, bool),

    #[action(rename = "RESET")]
    ClearAll,

    Unrecognized,
}

#[test]
fn test_named_variant_type() {
    let action = ListAction::AddItem {
        label: "milk".to_string(),
    };
    assert_eq!(action.action_type(), "ADD_ITEM");
}

#[test]
fn test_tuple_variant_type() {
    assert_eq!(ListAction::SetChecked(1, true).action_type(), "SET_CHECKED");
}

#[test]
fn test_renamed_variant_type() {
    assert_eq!(ListAction::ClearAll.action_type(), "RESET");
}

#[test]
fn test_unit_variant_type() {
    assert_eq!(ListAction::Unrecognized.action_type(), "UNRECOGNIZED");
}

#[test]
fn test_action_types_in_declaration_order() {
    assert_eq!(
        ListAction::ACTION_TYPES,
        &["ADD_ITEM", "SET_CHECKED", "RESET", "UNRECOGNIZED"]
    );
}

#[test]
fn test_action_trait_matches_inherent() {
    fn via_trait<A: tidy_core::action::Action>(action: &A) -> &'static str {
        action.action_type()
    }

    assert_eq!(via_trait(&ListAction::ClearAll), "RESET");
    assert_eq!(
        via_trait(&ListAction::SetChecked(2, false)),
        ListAction::SetChecked(2, false).action_type()
    );
}
