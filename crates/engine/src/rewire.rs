use crate::error::Result;
use tokenmove_protocol::DependencyFix;
use tokenmove_store::{Value, VariableStore};

/// Apply confirmed dependency fixes: repoint each holder's value at the given
/// mode to an alias targeting the relocated variable.
///
/// Each fix is applied independently, best-effort: a holder that no longer
/// resolves is skipped, the rest proceed. No batching, no rollback. Returns
/// the number of fixes actually applied.
pub async fn apply_fixes(store: &dyn VariableStore, fixes: &[DependencyFix]) -> Result<usize> {
    let mut applied = 0;
    for fix in fixes {
        let Some(holder) = store.variable(&fix.variable_id).await? else {
            log::debug!(
                "skipping dependency fix: holder {} not found",
                fix.variable_id
            );
            continue;
        };
        store
            .set_value(&holder.id, &fix.mode_id, Value::alias(&fix.new_variable_id))
            .await?;
        applied += 1;
    }

    log::info!("applied {applied} of {} dependency fixes", fixes.len());
    Ok(applied)
}
