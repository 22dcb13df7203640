use docket_core::{
    models::{decode_history, encode_history},
    progress::{local_position, remote_step},
    strategy::{parse_strategy, TITLE_ELLIPSIS, TITLE_LIMIT},
    workspace::derive_statuses,
    Advance, Analysis, ChatMessage, DocketError, StepStatus, Workspace,
};
use proptest::prelude::*;

fn numbered_strategy(len: usize) -> String {
    (1..=len)
        .map(|n| format!("{n}. Step {n}: do the {n}th thing."))
        .collect::<Vec<_>>()
        .join(" ")
}

fn workspace_with(len: usize) -> Workspace {
    Workspace::from_analysis(
        "case-1",
        "Neighbour built a wall on my land.",
        &Analysis {
            strategy: Some(numbered_strategy(len)),
            ..Default::default()
        },
    )
}

fn message() -> impl Strategy<Value = ChatMessage> {
    (any::<bool>(), ".{0,40}").prop_map(|(from_user, text)| {
        if from_user {
            ChatMessage::user(text)
        } else {
            ChatMessage::ai(text)
        }
    })
}

#[test]
fn test_numbered_strategy_parses_to_requested_length() {
    for len in 1..6 {
        assert_eq!(parse_strategy(Some(&numbered_strategy(len))).len(), len);
    }
}

proptest! {
    #[test]
    fn prop_parse_strategy_always_yields_one_active_first_step(text in ".{0,200}") {
        let steps = parse_strategy(Some(&text));

        prop_assert!(!steps.is_empty());
        prop_assert_eq!(steps[0].status, StepStatus::Active);
        prop_assert!(steps[1..].iter().all(|step| step.status == StepStatus::Locked));
        for (index, step) in steps.iter().enumerate() {
            prop_assert_eq!(step.id, index);
            prop_assert!(
                step.title.chars().count() <= TITLE_LIMIT + TITLE_ELLIPSIS.len()
            );
        }
    }

    #[test]
    fn prop_statuses_follow_position(len in 0usize..50, offset in 0usize..60) {
        let position = offset.min(len);
        let statuses = derive_statuses(position, len);

        prop_assert_eq!(statuses.len(), len);
        let done = statuses.iter().filter(|s| **s == StepStatus::Done).count();
        let active = statuses.iter().filter(|s| **s == StepStatus::Active).count();
        prop_assert_eq!(done, position);
        prop_assert_eq!(active, usize::from(position < len));
        prop_assert_eq!(derive_statuses(position, len), statuses);
    }

    #[test]
    fn prop_remote_step_round_trips(position in 0usize..100_000) {
        prop_assert_eq!(local_position(remote_step(position)), Some(position));
        prop_assert!(remote_step(position) >= 1);
    }

    #[test]
    fn prop_chat_roles_survive_the_wire(messages in prop::collection::vec(message(), 0..20)) {
        prop_assert_eq!(decode_history(encode_history(&messages)), messages);
    }

    #[test]
    fn prop_completing_every_step_finishes_exactly_once(len in 1usize..12) {
        let mut workspace = workspace_with(len);
        prop_assert_eq!(workspace.len(), len);

        for expected in 1..len {
            let index = workspace.active_index().unwrap();
            let advance = workspace.complete_step(index).unwrap();
            let advanced_to_expected =
                matches!(advance, Advance::Next { index, .. } if index == expected);
            prop_assert!(advanced_to_expected);
            prop_assert_eq!(advance.progress().step, remote_step(expected));
        }

        let last = workspace.active_index().unwrap();
        let advance = workspace.complete_step(last).unwrap();
        prop_assert!(advance.is_finished());
        prop_assert!(workspace.is_finished());
        prop_assert!(workspace.active_index().is_none());
        prop_assert!(workspace.steps().iter().all(|step| step.status == StepStatus::Done));

        let again = workspace.complete_step(last);
        let is_invalid = matches!(again, Err(DocketError::InvalidInput { .. }));
        prop_assert!(is_invalid);
    }

    #[test]
    fn prop_snapshot_restores_position(len in 1usize..8, completed in 0usize..8) {
        let mut workspace = workspace_with(len);
        for _ in 0..completed.min(len) {
            let index = workspace.active_index().unwrap();
            workspace.complete_step(index).unwrap();
        }

        let restored = Workspace::from_snapshot(workspace.snapshot());
        prop_assert_eq!(restored.position(), workspace.position());
        prop_assert_eq!(restored.steps(), workspace.steps());
    }
}
