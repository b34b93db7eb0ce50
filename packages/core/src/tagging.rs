//! Handler tagging: stamp every handler with the name it is registered under.
//!
//! Tagging runs once per module, when the module is registered with a
//! container and before any wrapper binds its handlers. It walks the getter,
//! mutation, and action tables (and those of mounted child modules) and
//! writes each entry's name into the handler's shared tag. Handlers keep
//! behaving exactly as before; only the tag changes.

use std::collections::BTreeMap;

use crate::module::{ErasedModule, HandlerTable, ModuleDescriptor};

/// Counts of handlers seen by a tagging pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TagReport {
    pub getters: usize,
    pub mutations: usize,
    pub actions: usize,
    /// Handlers already carrying a different key. They keep their first key.
    pub conflicts: usize,
}

impl TagReport {
    pub fn total(&self) -> usize {
        self.getters + self.mutations + self.actions
    }
}

/// Tag every handler of `module` and of its child modules.
///
/// Tagging the same descriptor again is harmless: each handler keeps the
/// key it already has.
pub fn tag_handlers<S, R>(module: &ModuleDescriptor<S, R>) -> TagReport
where
    S: Send + Sync + 'static,
    R: 'static,
{
    let mut report = TagReport::default();
    report.getters += tag_table(module.getters(), &mut report.conflicts);
    report.mutations += tag_table(module.mutations(), &mut report.conflicts);
    report.actions += tag_table(module.actions(), &mut report.conflicts);
    tag_children(module.modules(), &mut report);

    tracing::debug!(
        getters = report.getters,
        mutations = report.mutations,
        actions = report.actions,
        "tagged module handlers"
    );
    report
}

fn tag_children(modules: &BTreeMap<String, ErasedModule>, report: &mut TagReport) {
    for child in modules.values() {
        report.getters += tag_table(&child.getters, &mut report.conflicts);
        report.mutations += tag_table(&child.mutations, &mut report.conflicts);
        report.actions += tag_table(&child.actions, &mut report.conflicts);
        tag_children(&child.modules, report);
    }
}

fn tag_table<E>(table: &HandlerTable<E>, conflicts: &mut usize) -> usize {
    for (name, entry) in table.iter() {
        let key = entry.tag().stamp(name);
        if key != name {
            *conflicts += 1;
            tracing::warn!(
                kind = %table.kind(),
                name,
                key,
                "handler is already registered under another key; keeping the first"
            );
        }
    }
    table.len()
}
