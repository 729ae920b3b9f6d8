use crate::notify::Notifier;
use anyhow::Result;
use std::sync::Arc;
use tokenmove_engine::{
    apply_fixes, list_collections_with_variables, relocate, EngineError, RelocateRequest,
};
use tokenmove_protocol::{Command, DependencyFix, Event, SourceToken};
use tokenmove_store::VariableStore;

/// Dispatches panel commands against the host store.
///
/// Every command re-reads fresh store state at its start; nothing is cached
/// across commands, so a failed command never corrupts the next one. Errors
/// are folded into user notifications at this boundary and never panic.
pub struct PluginServer {
    store: Arc<dyn VariableStore>,
    notifier: Arc<dyn Notifier>,
}

impl PluginServer {
    pub fn new(store: Arc<dyn VariableStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Handle one inbound command, returning the events to send back.
    pub async fn handle(&self, command: Command) -> Vec<Event> {
        match command {
            Command::FetchCollections => self
                .fetch_collections()
                .await
                .unwrap_or_else(|err| self.report("Error loading collections", err)),
            Command::DuplicateCollection { collection_id } => self
                .duplicate_collection(&collection_id)
                .await
                .unwrap_or_else(|err| self.report("Error duplicating collection", err)),
            Command::RelocateVariables {
                from,
                to,
                update_dependencies,
            } => self
                .relocate_variables(&from, &to, update_dependencies)
                .await
                .unwrap_or_else(|err| self.report("Error moving variables", err)),
            Command::ApplyDependencyFixes { fixes } => self
                .apply_dependency_fixes(&fixes)
                .await
                .unwrap_or_else(|err| self.report("Error updating dependencies", err)),
        }
    }

    /// Outermost catch: notify the user, emit nothing.
    fn report(&self, context: &str, err: anyhow::Error) -> Vec<Event> {
        self.notifier.notify(&format!("{context}; {err}"), true);
        Vec::new()
    }

    async fn listing(&self) -> Result<Event> {
        let collections = list_collections_with_variables(self.store.as_ref()).await?;
        Ok(Event::CollectionsResult { collections })
    }

    async fn fetch_collections(&self) -> Result<Vec<Event>> {
        Ok(vec![self.listing().await?])
    }

    async fn duplicate_collection(&self, collection_id: &str) -> Result<Vec<Event>> {
        let Some(collection) = self.store.collection(collection_id).await? else {
            self.notifier.notify("Collection not found", true);
            return Ok(Vec::new());
        };

        // Same name, no suffixing
        self.store.create_collection(&collection.name).await?;
        Ok(vec![self.listing().await?])
    }

    async fn relocate_variables(
        &self,
        from: &str,
        to: &str,
        update_dependencies: bool,
    ) -> Result<Vec<Event>> {
        let token = SourceToken::decode(from)?;
        let request = RelocateRequest {
            variable_id: token.variable_id,
            path: token.path,
            target_collection_id: to.to_string(),
            update_dependencies,
        };

        let outcome = match relocate(self.store.as_ref(), &request).await {
            Ok(outcome) => outcome,
            // Precondition report, not an unexpected error
            Err(EngineError::NoVariablesMatched(_)) => {
                self.notifier.notify("No variables found to move", true);
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        self.notifier.notify(
            &format!("Successfully duplicated {} variables", outcome.moved.len()),
            false,
        );

        let mut events = Vec::new();
        if !outcome.proposed_fixes.is_empty() {
            events.push(Event::DependencyFixesProposed {
                fixes: outcome.proposed_fixes,
            });
        }
        events.push(self.listing().await?);
        events.push(Event::RelocationResult {
            moved: outcome
                .moved
                .into_iter()
                .map(|moved| moved.old_id)
                .collect(),
            warnings: outcome
                .warnings
                .iter()
                .map(|warning| warning.to_string())
                .collect(),
        });
        Ok(events)
    }

    async fn apply_dependency_fixes(&self, fixes: &[DependencyFix]) -> Result<Vec<Event>> {
        apply_fixes(self.store.as_ref(), fixes).await?;
        Ok(Vec::new())
    }
}
