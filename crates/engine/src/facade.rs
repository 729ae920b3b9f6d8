use crate::error::Result;
use tokenmove_protocol::{CollectionListing, VariableListing};
use tokenmove_store::VariableStore;

/// Read the full collection listing, each collection annotated with its own
/// variables (matched by collection id).
///
/// No pagination; a design-tool workspace's full variable set fits in memory.
pub async fn list_collections_with_variables(
    store: &dyn VariableStore,
) -> Result<Vec<CollectionListing>> {
    let collections = store.collections().await?;
    let variables = store.variables().await?;

    let listing = collections
        .into_iter()
        .map(|collection| {
            let rows = variables
                .iter()
                .filter(|variable| variable.collection_id == collection.id)
                .map(|variable| VariableListing {
                    id: variable.id.clone(),
                    name: variable.name.clone(),
                    resolved_type: variable.resolved_type,
                    collection_id: variable.collection_id.clone(),
                })
                .collect();
            CollectionListing {
                id: collection.id,
                name: collection.name,
                variables: rows,
            }
        })
        .collect();

    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokenmove_store::{MemoryStore, ResolvedType};

    #[tokio::test]
    async fn groups_variables_under_their_collection() {
        let store = MemoryStore::new();
        let primitives = store.create_collection("Primitives").await.unwrap();
        let semantic = store.create_collection("Semantic").await.unwrap();
        store
            .create_variable("color/bg", &primitives, ResolvedType::Color)
            .await
            .unwrap();
        store
            .create_variable("button/bg", &semantic, ResolvedType::Color)
            .await
            .unwrap();
        store
            .create_variable("color/fg", &primitives, ResolvedType::Color)
            .await
            .unwrap();

        let listing = list_collections_with_variables(&store).await.unwrap();

        assert_eq!(listing.len(), 2);
        let names: Vec<&str> = listing[0]
            .variables
            .iter()
            .map(|row| row.name.as_str())
            .collect();
        assert_eq!(names, vec!["color/bg", "color/fg"]);
        assert_eq!(listing[1].variables.len(), 1);
        assert_eq!(listing[1].variables[0].collection_id, semantic);
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let store = MemoryStore::new();
        assert!(list_collections_with_variables(&store)
            .await
            .unwrap()
            .is_empty());
    }
}
