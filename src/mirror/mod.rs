//! Mirroring between the home directory and the backup tree.
//!
//! The backup tree's structure matches a fragment of home: an entry at
//! `<backup>/<rel>` belongs at `<home>/<rel>`.  [`export`] copies home paths
//! into the tree; [`reconcile`] links the tree back into home.
pub mod conflict;
pub mod export;
pub mod path_map;
pub mod reconcile;

pub use conflict::{Action, DestinationState, EntryKind, LinkEntry};
pub use export::{ExportReport, export};
pub use reconcile::{LinkReport, Outcome, reconcile};
