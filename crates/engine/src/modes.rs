use crate::error::{EngineError, Result};
use tokenmove_store::{Collection, VariableStore};

/// Mapping from one source mode to its counterpart on the target collection.
///
/// `new_mode_id` is `None` when the mode could not be resolved after
/// creation; downstream value transfer skips that mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModePairing {
    pub old_mode_id: String,
    pub new_mode_id: Option<String>,
}

/// Align the target collection's mode axis with the source's.
///
/// Mode names are the de-duplication key: a same-named target mode is reused,
/// otherwise one is created and its fresh id re-resolved by name (the host's
/// mode-creation call does not return the id, so the re-fetch round-trip is
/// required). Idempotent: a second run finds the modes created by the first
/// and creates no duplicates.
pub async fn reconcile_modes(
    store: &dyn VariableStore,
    source: &Collection,
    target_id: &str,
) -> Result<Vec<ModePairing>> {
    let mut target = store
        .collection(target_id)
        .await?
        .ok_or_else(|| EngineError::CollectionNotFound(target_id.to_string()))?;

    let mut pairings = Vec::with_capacity(source.modes.len());
    for old_mode in &source.modes {
        let new_mode_id = match target.mode_named(&old_mode.name) {
            Some(existing) => Some(existing.mode_id.clone()),
            None => {
                store.add_mode(target_id, &old_mode.name).await?;
                target = store
                    .collection(target_id)
                    .await?
                    .ok_or_else(|| EngineError::CollectionNotFound(target_id.to_string()))?;
                target
                    .mode_named(&old_mode.name)
                    .map(|mode| mode.mode_id.clone())
            }
        };

        if new_mode_id.is_none() {
            log::warn!(
                "mode '{}' did not resolve on collection {} after creation",
                old_mode.name,
                target_id
            );
        }
        pairings.push(ModePairing {
            old_mode_id: old_mode.mode_id.clone(),
            new_mode_id,
        });
    }

    Ok(pairings)
}
