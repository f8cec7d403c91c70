use anyhow::Result;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::types::ChatId;

use fitness_tracker::dialogue::{ConversationState, SetupDraft, TrackerDialogue};
use fitness_tracker::goals::WorkoutKind;

/// A chat with no stored dialogue starts idle
#[tokio::test]
async fn test_new_chat_starts_idle() -> Result<()> {
    let storage = InMemStorage::<ConversationState>::new();
    let dialogue = TrackerDialogue::new(storage, ChatId(1));

    assert_eq!(dialogue.get_or_default().await?, ConversationState::Idle);
    Ok(())
}

/// Dialogue states are kept per chat
#[tokio::test]
async fn test_states_are_kept_per_chat() -> Result<()> {
    let storage = InMemStorage::<ConversationState>::new();
    let first = TrackerDialogue::new(storage.clone(), ChatId(1));
    let second = TrackerDialogue::new(storage, ChatId(2));

    let draft = SetupDraft {
        weight: Some(70.0),
        ..Default::default()
    };
    first
        .update(ConversationState::AwaitingHeight { draft: draft.clone() })
        .await?;
    second
        .update(ConversationState::AwaitingWorkoutMinutes {
            kind: WorkoutKind::Strength,
        })
        .await?;

    assert_eq!(
        first.get_or_default().await?,
        ConversationState::AwaitingHeight { draft }
    );
    assert_eq!(
        second.get_or_default().await?,
        ConversationState::AwaitingWorkoutMinutes {
            kind: WorkoutKind::Strength
        }
    );
    Ok(())
}

/// Going back to idle overwrites a finished flow
#[tokio::test]
async fn test_update_to_idle_replaces_flow() -> Result<()> {
    let storage = InMemStorage::<ConversationState>::new();
    let dialogue = TrackerDialogue::new(storage, ChatId(42));

    dialogue
        .update(ConversationState::AwaitingGrams {
            calories_per_100g: 52.0,
        })
        .await?;
    dialogue.update(ConversationState::Idle).await?;

    assert_eq!(dialogue.get_or_default().await?, ConversationState::Idle);
    Ok(())
}

/// States survive a serde round trip, so a persistent dialogue storage could hold them
#[test]
fn test_dialogue_state_serialization() -> Result<()> {
    let state = ConversationState::AwaitingConfirmation {
        draft: SetupDraft {
            weight: Some(70.0),
            height: Some(175.0),
            age: Some(25),
            activity: Some(60),
            city: Some("Москва".to_string()),
            temperature: Some(-3.5),
            water_goal: Some(3600),
            calorie_goal: Some(1668),
        },
    };

    let json = serde_json::to_string(&state)?;
    let restored: ConversationState = serde_json::from_str(&json)?;
    assert_eq!(restored, state);
    Ok(())
}
