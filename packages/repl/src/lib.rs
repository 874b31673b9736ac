//! # fruitpunch-repl
//!
//! Interactive shell over the FruitPunchFS client: login, browse the
//! disk → partition → filesystem hierarchy, and run `.smia` scripts against
//! the remote execution endpoint.
//!
//! ## Usage
//!
//! ```bash
//! # Point at the service (defaults to http://localhost:5000)
//! fruitpunch --url http://localhost:5000
//!
//! # Inside the shell:
//! > login A1 root 123
//! > disks
//! > partitions A1
//! > fs P1
//! > search /home
//! > load setup.smia
//! > run
//! > save .
//! ```

pub mod commands;
pub mod context;
pub mod shell;

pub use context::AppContext;
pub use shell::run;
