use crate::model::SelectionSet;

/// Remembers the last selection seen and runs a reconciliation only when its key set changes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionWatcher {
    last: Option<SelectionSet>,
}

impl SelectionWatcher {
    /// Starts out already in sync with `selection`.
    pub fn primed(selection: &SelectionSet) -> Self {
        Self {
            last: Some(selection.clone()),
        }
    }

    /// Calls `reconcile` once if `selection` adds or removes keys relative to the
    /// previous observation. Pure reorderings are recorded but do not trigger it.
    pub fn observe<R>(
        &mut self,
        selection: &SelectionSet,
        reconcile: impl FnOnce(&SelectionSet) -> R,
    ) -> Option<R> {
        let changed = match &self.last {
            Some(prev) => !prev.same_keys(selection),
            None => true,
        };
        self.last = Some(selection.clone());
        changed.then(|| reconcile(selection))
    }
}
