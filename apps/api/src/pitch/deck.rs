//! Loading and versioned saving of startups and their pitch decks.

use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::pitch::PitchDeckRecord;
use crate::models::startup::StartupRecord;
use crate::pitch::analyzer::Pitch;
use crate::store::{self, RecordStore, PITCHES, STARTUPS};

pub async fn load_startup(
    store: &dyn RecordStore,
    startup_id: Uuid,
) -> Result<StartupRecord, AppError> {
    store::load(store, STARTUPS, &startup_id.to_string())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Startup {startup_id} not found")))
}

pub async fn load_deck(
    store: &dyn RecordStore,
    startup_id: Uuid,
) -> Result<PitchDeckRecord, AppError> {
    store::load(store, PITCHES, &startup_id.to_string())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No pitch deck for startup {startup_id}")))
}

/// Writes `pitch` as the next version of the startup's deck (version 1 if none exists).
pub async fn save_next_version(
    store: &dyn RecordStore,
    startup_id: Uuid,
    pitch: Pitch,
    user_inputs: Vec<String>,
) -> Result<PitchDeckRecord, AppError> {
    let existing: Option<PitchDeckRecord> =
        store::load(store, PITCHES, &startup_id.to_string()).await?;

    let (id, version) = match existing {
        Some(deck) => (deck.id, deck.version + 1),
        None => (Uuid::new_v4(), 1),
    };

    let deck = PitchDeckRecord {
        id,
        startup_id,
        pitch,
        user_inputs,
        version,
        updated_at: Utc::now(),
    };
    store::save(store, PITCHES, &startup_id.to_string(), &deck).await?;
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonFileStore;

    #[tokio::test]
    async fn test_versions_increment_and_keep_deck_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let startup_id = Uuid::new_v4();

        let v1 = save_next_version(&store, startup_id, Pitch::new(), vec!["Acme".into()])
            .await
            .unwrap();
        let v2 = save_next_version(&store, startup_id, Pitch::new(), vec!["Acme".into()])
            .await
            .unwrap();

        assert_eq!(v1.version, 1);
        assert_eq!(v2.version, 2);
        assert_eq!(v1.id, v2.id);
        assert_eq!(load_deck(&store, startup_id).await.unwrap().version, 2);
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let id = Uuid::new_v4();
        assert!(matches!(
            load_deck(&store, id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            load_startup(&store, id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
