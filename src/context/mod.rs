// Cross-reference bookkeeping for one encode or decode run.
//
// Codeplugs reference objects by device index (channel 12, contact 3);
// the configuration references them by list position. A `Context` holds the
// index-to-slot bijection per object kind while a single translation runs.
// It is created fresh for every run and thrown away afterwards.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ContextError {
    #[error("no table registered for {0:?}")]
    MissingTable(ObjectKind),

    #[error("index {index} already taken in {kind:?} table")]
    IndexTaken { kind: ObjectKind, index: usize },

    #[error("slot {slot} already registered in {kind:?} table")]
    SlotTaken { kind: ObjectKind, slot: usize },
}

pub type Result<T> = std::result::Result<T, ContextError>;

/// Object kinds a codeplug can cross-reference.
///
/// Specialized kinds share their parent's table: an analog and a digital
/// channel live in the same device channel index space, so
/// `AnalogChannel`/`DigitalChannel` resolve to the `Channel` table. Same for
/// the contact kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Channel,
    AnalogChannel,
    DigitalChannel,
    Contact,
    DmrContact,
    DtmfContact,
    GroupList,
    ScanList,
    Zone,
    RadioId,
}

impl ObjectKind {
    /// The kind whose table this kind shares, if any.
    pub fn parent(&self) -> Option<ObjectKind> {
        match self {
            ObjectKind::AnalogChannel | ObjectKind::DigitalChannel => Some(ObjectKind::Channel),
            ObjectKind::DmrContact => Some(ObjectKind::Contact),
            _ => None,
        }
    }

    /// Walk to the nearest kind that owns a table in `ctx`.
    fn resolve(&self, ctx: &Context) -> Option<ObjectKind> {
        let mut kind = *self;
        loop {
            if ctx.tables.contains_key(&kind) {
                return Some(kind);
            }
            kind = kind.parent()?;
        }
    }
}

/// One index-to-slot bijection.
#[derive(Debug, Default)]
struct Table {
    forward: HashMap<usize, usize>,
    inverse: HashMap<usize, usize>,
}

/// Per-run registry of index-to-slot tables.
#[derive(Debug, Default)]
pub struct Context {
    tables: HashMap<ObjectKind, Table>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table for `kind`. Idempotent, and a no-op when an ancestor
    /// kind already owns a table this kind would resolve to.
    pub fn add_table(&mut self, kind: ObjectKind) {
        if kind.resolve(self).is_some() {
            return;
        }
        self.tables.insert(kind, Table::default());
    }

    pub fn has_table(&self, kind: ObjectKind) -> bool {
        kind.resolve(self).is_some()
    }

    /// Record that device index `index` is configuration slot `slot`.
    /// Fails on a missing table or when either side is already mapped; a
    /// failed add leaves the table unchanged.
    pub fn add(&mut self, kind: ObjectKind, slot: usize, index: usize) -> Result<()> {
        let owner = kind.resolve(self).ok_or(ContextError::MissingTable(kind))?;
        let table = self
            .tables
            .get_mut(&owner)
            .ok_or(ContextError::MissingTable(owner))?;
        if table.forward.contains_key(&index) {
            return Err(ContextError::IndexTaken { kind: owner, index });
        }
        if table.inverse.contains_key(&slot) {
            return Err(ContextError::SlotTaken { kind: owner, slot });
        }
        table.forward.insert(index, slot);
        table.inverse.insert(slot, index);
        Ok(())
    }

    /// Configuration slot mapped to device index `index`, if registered.
    pub fn obj(&self, kind: ObjectKind, index: usize) -> Option<usize> {
        let owner = kind.resolve(self)?;
        self.tables[&owner].forward.get(&index).copied()
    }

    /// Device index mapped to configuration slot `slot`, if registered.
    pub fn index(&self, kind: ObjectKind, slot: usize) -> Option<usize> {
        let owner = kind.resolve(self)?;
        self.tables[&owner].inverse.get(&slot).copied()
    }

    /// Number of registered mappings for `kind`.
    pub fn count(&self, kind: ObjectKind) -> usize {
        match kind.resolve(self) {
            Some(owner) => self.tables[&owner].forward.len(),
            None => 0,
        }
    }

    /// All `(slot, index)` pairs for `kind`, ordered by device index.
    pub fn entries(&self, kind: ObjectKind) -> Vec<(usize, usize)> {
        let Some(owner) = kind.resolve(self) else {
            return Vec::new();
        };
        let mut pairs: Vec<(usize, usize)> = self.tables[&owner]
            .forward
            .iter()
            .map(|(&index, &slot)| (slot, index))
            .collect();
        pairs.sort_by_key(|&(_, index)| index);
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bijection() {
        let mut ctx = Context::new();
        ctx.add_table(ObjectKind::Channel);
        ctx.add(ObjectKind::Channel, 0, 12).unwrap();
        ctx.add(ObjectKind::Channel, 1, 7).unwrap();

        assert_eq!(ctx.obj(ObjectKind::Channel, 12), Some(0));
        assert_eq!(ctx.index(ObjectKind::Channel, 0), Some(12));
        assert_eq!(ctx.obj(ObjectKind::Channel, 7), Some(1));
        assert_eq!(ctx.count(ObjectKind::Channel), 2);
        assert_eq!(ctx.obj(ObjectKind::Channel, 99), None);
    }

    #[test]
    fn test_collisions_leave_table_unchanged() {
        let mut ctx = Context::new();
        ctx.add_table(ObjectKind::Contact);
        ctx.add(ObjectKind::Contact, 0, 5).unwrap();

        assert_eq!(
            ctx.add(ObjectKind::Contact, 1, 5),
            Err(ContextError::IndexTaken { kind: ObjectKind::Contact, index: 5 })
        );
        assert_eq!(
            ctx.add(ObjectKind::Contact, 0, 6),
            Err(ContextError::SlotTaken { kind: ObjectKind::Contact, slot: 0 })
        );
        assert_eq!(ctx.count(ObjectKind::Contact), 1);
        assert_eq!(ctx.obj(ObjectKind::Contact, 5), Some(0));
        assert_eq!(ctx.index(ObjectKind::Contact, 1), None);
    }

    #[test]
    fn test_specialized_kinds_share_parent_table() {
        let mut ctx = Context::new();
        ctx.add_table(ObjectKind::Channel);
        // Registering a sub-kind after the parent changes nothing.
        ctx.add_table(ObjectKind::AnalogChannel);
        assert!(ctx.has_table(ObjectKind::DigitalChannel));

        ctx.add(ObjectKind::AnalogChannel, 0, 1).unwrap();
        ctx.add(ObjectKind::DigitalChannel, 1, 2).unwrap();
        // Both land in the shared channel index space.
        assert_eq!(
            ctx.add(ObjectKind::DigitalChannel, 2, 1),
            Err(ContextError::IndexTaken { kind: ObjectKind::Channel, index: 1 })
        );
        assert_eq!(ctx.obj(ObjectKind::Channel, 2), Some(1));
        assert_eq!(ctx.count(ObjectKind::Channel), 2);
    }

    #[test]
    fn test_separate_dtmf_table() {
        let mut ctx = Context::new();
        ctx.add_table(ObjectKind::Contact);
        ctx.add_table(ObjectKind::DtmfContact);

        // DTMF contacts keep their own index space next to DMR contacts.
        ctx.add(ObjectKind::DmrContact, 0, 0).unwrap();
        ctx.add(ObjectKind::DtmfContact, 1, 0).unwrap();
        assert_eq!(ctx.obj(ObjectKind::Contact, 0), Some(0));
        assert_eq!(ctx.obj(ObjectKind::DtmfContact, 0), Some(1));
    }

    #[test]
    fn test_entries_ordered_by_index() {
        let mut ctx = Context::new();
        ctx.add_table(ObjectKind::ScanList);
        ctx.add(ObjectKind::ScanList, 2, 7).unwrap();
        ctx.add(ObjectKind::ScanList, 0, 3).unwrap();
        ctx.add(ObjectKind::ScanList, 1, 5).unwrap();
        assert_eq!(
            ctx.entries(ObjectKind::ScanList),
            vec![(0, 3), (1, 5), (2, 7)]
        );
        assert!(ctx.entries(ObjectKind::Zone).is_empty());
    }

    #[test]
    fn test_missing_table() {
        let mut ctx = Context::new();
        assert!(!ctx.has_table(ObjectKind::Zone));
        assert_eq!(
            ctx.add(ObjectKind::Zone, 0, 0),
            Err(ContextError::MissingTable(ObjectKind::Zone))
        );
        assert_eq!(ctx.obj(ObjectKind::Zone, 0), None);
        assert_eq!(ctx.count(ObjectKind::Zone), 0);
    }
}
