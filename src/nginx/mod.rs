//! Load balancer config subsystem.
//!
//! # Data Flow
//! ```text
//! lb.conf on disk
//!     → upstream.rs (parse the upstream block into an ordered entry list)
//!     → synchronizer.rs (reconcile / mutate / reload)
//!     → serialized back into the same byte span of the file
//! ```
//!
//! # Design Decisions
//! - All mutation logic operates on the structured entry list; text is
//!   only touched at the file boundary
//! - Discovery is additive: entries found in the file are adopted, but a
//!   tracked worker is never dropped because its entry went missing
//! - The file is read-modify-written with no guard against concurrent
//!   external edits; the scaler is the assumed single writer

pub mod synchronizer;
pub mod upstream;

pub use synchronizer::{ConfigSynchronizer, UpstreamAction};
pub use upstream::{UpstreamBlock, UpstreamEntry};
