//! # fruitpunch-client
//!
//! Client-side model of a FruitPunchFS operator session.
//!
//! The service exposes a hierarchy of disks → partitions → filesystem paths
//! and a script execution endpoint. This crate provides:
//!
//! - [`Session`] - authentication state, established by login and injected
//!   into every gated operation (no process-wide flag).
//! - [`Navigator`] - disk/partition listing and per-path search, plus
//!   [`FilesystemView`] which issues the initial `"/"` search when a
//!   partition's filesystem is first opened.
//! - [`ExecutionSession`] - the load → execute → save cycle for `.smia`
//!   script payloads, with failures captured as output text.
//!
//! All remote calls go through [`fruitpunch_api::ApiClient`]; nothing here
//! performs ad hoc transport logic. One request per operation is allowed in
//! flight at a time; duplicates fail with [`Error::InFlight`].

pub mod error;
pub mod exec;
pub mod hierarchy;
pub mod session;

mod inflight;

pub use error::Error;
pub use exec::{ExecState, ExecutionOutcome, ExecutionSession, ScriptPayload};
pub use hierarchy::{Disk, EntryKind, FilesystemView, FsEntry, Navigator, Partition};
pub use session::{Credentials, Session};
