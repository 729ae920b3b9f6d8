use crate::alias::AliasIndex;
use crate::error::{EngineError, Result};
use crate::modes::reconcile_modes;
use std::fmt;
use tokenmove_protocol::ProposedFix;
use tokenmove_store::{Variable, VariableStore};

/// Structured relocation request.
///
/// The wire form joins `variable_id` and `path` into one delimited token;
/// the boundary decodes it before the engine sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocateRequest {
    /// Any variable of the source collection; used only to locate it
    pub variable_id: String,
    /// Name prefix selecting the variables to move
    pub path: String,
    pub target_collection_id: String,
    /// Whether to propose alias rewires for references at the moved variables
    pub update_dependencies: bool,
}

/// Pairing of a moved variable's old identity with its replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedVariable {
    pub old_id: String,
    pub new_id: String,
}

/// Non-fatal per-item failure during a relocation batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocationWarning {
    /// A source value's mode had no counterpart in the reconciled mapping;
    /// that one value was not transferred.
    ModeUnmapped {
        variable_name: String,
        mode_id: String,
    },
    /// The variable could not be created at the destination at all.
    VariableSkipped {
        variable_name: String,
        reason: String,
    },
}

impl fmt::Display for RelocationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelocationWarning::ModeUnmapped {
                variable_name,
                mode_id,
            } => write!(
                f,
                "No mode mapping for mode {mode_id} of '{variable_name}'; value not transferred"
            ),
            RelocationWarning::VariableSkipped {
                variable_name,
                reason,
            } => write!(f, "'{variable_name}' skipped: {reason}"),
        }
    }
}

/// Result of one relocation batch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelocationOutcome {
    /// Old/new pairings, in enumeration order
    pub moved: Vec<MovedVariable>,
    /// Alias rewires proposed for user confirmation; empty unless
    /// `update_dependencies` was requested
    pub proposed_fixes: Vec<ProposedFix>,
    /// Per-item failures the batch continued past
    pub warnings: Vec<RelocationWarning>,
}

/// Relocate every variable of the source collection whose name starts with
/// the request path into the target collection.
///
/// Preconditions abort before any mutation; past that point the batch is
/// best-effort with no rollback. Already-created variables from earlier
/// iterations survive a later per-item failure. Alias values are copied
/// verbatim and still point at their original targets; the proposed fixes
/// (emitted only when requested) are how dependents get repointed, applied
/// later by [`crate::rewire::apply_fixes`] after user confirmation.
pub async fn relocate(
    store: &dyn VariableStore,
    request: &RelocateRequest,
) -> Result<RelocationOutcome> {
    if request.path.is_empty() {
        return Err(EngineError::EmptyPath);
    }

    let source_variable = store
        .variable(&request.variable_id)
        .await?
        .ok_or_else(|| EngineError::VariableNotFound(request.variable_id.clone()))?;
    let source_collection = store
        .collection(&source_variable.collection_id)
        .await?
        .ok_or_else(|| EngineError::CollectionNotFound(source_variable.collection_id.clone()))?;
    let target_collection = store
        .collection(&request.target_collection_id)
        .await?
        .ok_or_else(|| EngineError::CollectionNotFound(request.target_collection_id.clone()))?;

    let all_variables = store.variables().await?;
    let to_move: Vec<&Variable> = all_variables
        .iter()
        .filter(|variable| {
            variable.collection_id == source_collection.id
                && variable.name.starts_with(&request.path)
        })
        .collect();
    if to_move.is_empty() {
        return Err(EngineError::NoVariablesMatched(request.path.clone()));
    }

    // Pre-move alias topology, captured before any mutation. Built even when
    // dependency updates are off so the operation reads the same state either
    // way.
    let alias_index = AliasIndex::build(&all_variables);

    let pairings = reconcile_modes(store, &source_collection, &target_collection.id).await?;

    let mut outcome = RelocationOutcome::default();
    for variable in to_move {
        let new_id = match store
            .create_variable(&variable.name, &target_collection.id, variable.resolved_type)
            .await
        {
            Ok(id) => id,
            Err(err) => {
                log::warn!("skipping '{}': {}", variable.name, err);
                outcome.warnings.push(RelocationWarning::VariableSkipped {
                    variable_name: variable.name.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        for (old_mode_id, value) in &variable.values_by_mode {
            let new_mode_id = pairings
                .iter()
                .find(|pairing| pairing.old_mode_id == *old_mode_id)
                .and_then(|pairing| pairing.new_mode_id.as_deref());
            let Some(new_mode_id) = new_mode_id else {
                outcome.warnings.push(RelocationWarning::ModeUnmapped {
                    variable_name: variable.name.clone(),
                    mode_id: old_mode_id.clone(),
                });
                continue;
            };
            // Aliases transfer verbatim here; they still point at their old
            // targets until the proposed fixes are applied.
            store.set_value(&new_id, new_mode_id, value.clone()).await?;
        }

        if request.update_dependencies {
            for record in alias_index.references_to(&variable.id) {
                outcome.proposed_fixes.push(ProposedFix {
                    variable_id: record.holder_id.clone(),
                    variable_name: record.holder_name.clone(),
                    mode_id: record.mode_id.clone(),
                    new_variable_id: new_id.clone(),
                    collection_name: source_collection.name.clone(),
                    new_variable_collection_name: target_collection.name.clone(),
                });
            }
        }

        outcome.moved.push(MovedVariable {
            old_id: variable.id.clone(),
            new_id,
        });
    }

    log::info!(
        "relocated {} variables from '{}' to '{}' ({} warnings)",
        outcome.moved.len(),
        source_collection.name,
        target_collection.name,
        outcome.warnings.len()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokenmove_store::{MemoryStore, ResolvedType, Value};

    struct World {
        store: MemoryStore,
        primitives: String,
        semantic: String,
        bg: String,
        fg: String,
        spacing: String,
    }

    /// Two collections: "Primitives" (Light/Dark) holding color/bg, color/fg
    /// and spacing/sm; "Semantic" (Light only), empty.
    async fn seed() -> World {
        let store = MemoryStore::new();
        let primitives = store.create_collection("Primitives").await.unwrap();
        store.add_mode(&primitives, "Light").await.unwrap();
        store.add_mode(&primitives, "Dark").await.unwrap();
        let light = store.mode_id(&primitives, "Light").unwrap();
        let dark = store.mode_id(&primitives, "Dark").unwrap();

        let bg = store
            .create_variable("color/bg", &primitives, ResolvedType::Color)
            .await
            .unwrap();
        store
            .set_value(&bg, &light, Value::Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 })
            .await
            .unwrap();
        store
            .set_value(&bg, &dark, Value::Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 })
            .await
            .unwrap();

        let fg = store
            .create_variable("color/fg", &primitives, ResolvedType::Color)
            .await
            .unwrap();
        store
            .set_value(&fg, &light, Value::alias(&bg))
            .await
            .unwrap();

        let spacing = store
            .create_variable("spacing/sm", &primitives, ResolvedType::Float)
            .await
            .unwrap();
        store
            .set_value(&spacing, &light, Value::Float { value: 4.0 })
            .await
            .unwrap();

        let semantic = store.create_collection("Semantic").await.unwrap();
        store.add_mode(&semantic, "Light").await.unwrap();

        World {
            store,
            primitives,
            semantic,
            bg,
            fg,
            spacing,
        }
    }

    fn request(world: &World, path: &str, update_dependencies: bool) -> RelocateRequest {
        RelocateRequest {
            variable_id: world.bg.clone(),
            path: path.to_string(),
            target_collection_id: world.semantic.clone(),
            update_dependencies,
        }
    }

    #[tokio::test]
    async fn selects_exactly_the_prefix_matches() {
        let world = seed().await;

        let outcome = relocate(&world.store, &request(&world, "color/", false))
            .await
            .unwrap();

        let old_ids: Vec<&str> = outcome
            .moved
            .iter()
            .map(|moved| moved.old_id.as_str())
            .collect();
        assert_eq!(old_ids, vec![world.bg.as_str(), world.fg.as_str()]);

        // spacing/sm stays where it was, and nothing of it appears in Semantic
        let variables = world.store.variables().await.unwrap();
        let in_semantic: Vec<&str> = variables
            .iter()
            .filter(|variable| variable.collection_id == world.semantic)
            .map(|variable| variable.name.as_str())
            .collect();
        assert_eq!(in_semantic, vec!["color/bg", "color/fg"]);
        assert!(variables
            .iter()
            .any(|variable| variable.id == world.spacing
                && variable.collection_id == world.primitives));
    }

    #[tokio::test]
    async fn selects_by_raw_prefix_not_path_segment() {
        let world = seed().await;
        let colorful = world
            .store
            .create_variable("colorful-button", &world.primitives, ResolvedType::Color)
            .await
            .unwrap();

        let outcome = relocate(&world.store, &request(&world, "color", false))
            .await
            .unwrap();

        let old_ids: Vec<&str> = outcome
            .moved
            .iter()
            .map(|moved| moved.old_id.as_str())
            .collect();
        assert_eq!(
            old_ids,
            vec![world.bg.as_str(), world.fg.as_str(), colorful.as_str()]
        );
    }

    #[tokio::test]
    async fn empty_path_aborts() {
        let world = seed().await;
        let err = relocate(&world.store, &request(&world, "", false))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::EmptyPath));
    }

    #[tokio::test]
    async fn missing_source_variable_aborts() {
        let world = seed().await;
        let mut req = request(&world, "color/", false);
        req.variable_id = "variable-99".to_string();

        let err = relocate(&world.store, &req).await.unwrap_err();
        assert!(matches!(err, EngineError::VariableNotFound(id) if id == "variable-99"));
    }

    #[tokio::test]
    async fn missing_target_collection_aborts() {
        let world = seed().await;
        let mut req = request(&world, "color/", false);
        req.target_collection_id = "collection-99".to_string();

        let err = relocate(&world.store, &req).await.unwrap_err();
        assert!(matches!(err, EngineError::CollectionNotFound(id) if id == "collection-99"));
    }

    #[tokio::test]
    async fn no_matches_aborts_without_mutating_anything() {
        let world = seed().await;
        let collections_before = world.store.collections().await.unwrap();
        let variables_before = world.store.variables().await.unwrap();

        let err = relocate(&world.store, &request(&world, "shadow/", false))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NoVariablesMatched(path) if path == "shadow/"));

        assert_eq!(world.store.collections().await.unwrap(), collections_before);
        assert_eq!(world.store.variables().await.unwrap(), variables_before);
    }

    #[tokio::test]
    async fn copies_values_through_the_mode_mapping() {
        let world = seed().await;

        let outcome = relocate(&world.store, &request(&world, "color/bg", false))
            .await
            .unwrap();
        assert!(outcome.warnings.is_empty());

        let new_bg = world
            .store
            .variable(&outcome.moved[0].new_id)
            .await
            .unwrap()
            .unwrap();
        let semantic = world
            .store
            .collection(&world.semantic)
            .await
            .unwrap()
            .unwrap();
        let light = semantic.mode_named("Light").unwrap().mode_id.clone();
        let dark = semantic.mode_named("Dark").unwrap().mode_id.clone();

        assert_eq!(
            new_bg.values_by_mode[&light],
            Value::Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 }
        );
        assert_eq!(
            new_bg.values_by_mode[&dark],
            Value::Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 }
        );
    }

    #[tokio::test]
    async fn aliases_transfer_verbatim_still_pointing_at_old_targets() {
        let world = seed().await;

        let outcome = relocate(&world.store, &request(&world, "color/", true))
            .await
            .unwrap();

        let new_fg_id = &outcome
            .moved
            .iter()
            .find(|moved| moved.old_id == world.fg)
            .unwrap()
            .new_id;
        let new_fg = world.store.variable(new_fg_id).await.unwrap().unwrap();
        let alias_targets: Vec<&str> = new_fg
            .values_by_mode
            .values()
            .filter_map(|value| value.alias_target())
            .collect();
        assert_eq!(alias_targets, vec![world.bg.as_str()]);
    }

    #[tokio::test]
    async fn unmapped_mode_skips_one_value_and_warns() {
        let world = seed().await;
        // A value parked on a mode id the source collection no longer defines
        world
            .store
            .set_value(&world.fg, "mode-stale", Value::Float { value: 1.0 })
            .await
            .unwrap();

        let outcome = relocate(&world.store, &request(&world, "color/", false))
            .await
            .unwrap();

        // Both variables are still created
        assert_eq!(outcome.moved.len(), 2);
        assert_eq!(
            outcome.warnings,
            vec![RelocationWarning::ModeUnmapped {
                variable_name: "color/fg".to_string(),
                mode_id: "mode-stale".to_string(),
            }]
        );

        // Only the stale-mode value is missing; everything else transferred
        let new_bg = world
            .store
            .variable(&outcome.moved[0].new_id)
            .await
            .unwrap()
            .unwrap();
        let new_fg = world
            .store
            .variable(&outcome.moved[1].new_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(new_bg.values_by_mode.len(), 2);
        assert_eq!(new_fg.values_by_mode.len(), 1);
    }

    #[tokio::test]
    async fn proposes_fixes_for_direct_references_when_requested() {
        let world = seed().await;
        // button/bg in Semantic aliases color/bg in Primitives
        let light = world.store.mode_id(&world.semantic, "Light").unwrap();
        let button = world
            .store
            .create_variable("button/bg", &world.semantic, ResolvedType::Color)
            .await
            .unwrap();
        world
            .store
            .set_value(&button, &light, Value::alias(&world.bg))
            .await
            .unwrap();

        let outcome = relocate(&world.store, &request(&world, "color/bg", true))
            .await
            .unwrap();

        // color/fg (seeded) and button/bg both reference color/bg directly
        let new_bg_id = &outcome.moved[0].new_id;
        let holders: Vec<(&str, &str)> = outcome
            .proposed_fixes
            .iter()
            .map(|fix| (fix.variable_id.as_str(), fix.new_variable_id.as_str()))
            .collect();
        assert_eq!(
            holders,
            vec![
                (world.fg.as_str(), new_bg_id.as_str()),
                (button.as_str(), new_bg_id.as_str()),
            ]
        );

        let fix = &outcome.proposed_fixes[1];
        assert_eq!(fix.variable_name, "button/bg");
        assert_eq!(fix.mode_id, light);
        assert_eq!(fix.collection_name, "Primitives");
        assert_eq!(fix.new_variable_collection_name, "Semantic");
    }

    #[tokio::test]
    async fn no_fixes_proposed_without_the_flag() {
        let world = seed().await;

        // color/fg aliases color/bg, so moving color/bg has a dependent
        let outcome = relocate(&world.store, &request(&world, "color/bg", false))
            .await
            .unwrap();
        assert!(outcome.proposed_fixes.is_empty());
    }

    #[tokio::test]
    async fn alias_chains_propose_one_hop_only() {
        let world = seed().await;
        // card/bg aliases color/fg, which itself aliases color/bg
        let light = world.store.mode_id(&world.primitives, "Light").unwrap();
        let card = world
            .store
            .create_variable("card/bg", &world.primitives, ResolvedType::Color)
            .await
            .unwrap();
        world
            .store
            .set_value(&card, &light, Value::alias(&world.fg))
            .await
            .unwrap();

        let outcome = relocate(&world.store, &request(&world, "color/bg", true))
            .await
            .unwrap();

        // Only color/fg references color/bg directly; card/bg is one hop away
        let holders: Vec<&str> = outcome
            .proposed_fixes
            .iter()
            .map(|fix| fix.variable_id.as_str())
            .collect();
        assert_eq!(holders, vec![world.fg.as_str()]);
    }
}
