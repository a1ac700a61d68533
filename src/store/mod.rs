//! Store Module
//!
//! The shared in-memory key-value table.
//!
//! ## Responsibilities
//! - Map byte-string keys to byte-string values (last write wins)
//! - Serialize every operation behind one exclusive lock
//! - Live for the whole process; never persisted
//!
//! ## Data Structure Choice
//! A `HashMap` behind a single `parking_lot::Mutex`:
//! - No ordering requirements between entries
//! - No reader/writer split and no sharding; correctness over throughput
//! - `parking_lot` locks do not poison, so acquisition cannot fail

mod table;

pub use table::Table;
