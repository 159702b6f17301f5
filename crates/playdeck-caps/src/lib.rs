//! Playdeck-Caps: Asynchronous capability-request broker.
//!
//! This crate wraps a platform's runtime-permission subsystem behind a small
//! broker that coordinates concurrent capability requests:
//!
//! - **Coalescing**: at most one outstanding platform prompt per capability
//!   name; concurrent callers share the in-flight prompt and all receive the
//!   same terminal outcome
//! - **Batching**: all not-yet-requested names of one call go to the platform
//!   in a single prompt issuance
//! - **Name-keyed results**: outcomes are resolved by capability name, so
//!   out-of-order, merged, or partial platform callbacks still resolve the
//!   right waiters
//!
//! # Examples
//!
//! ```rust,ignore
//! let broker = CapabilityBroker::new(Arc::new(platform));
//!
//! if broker.request_all(&["storage.read", "player.external"]).await? {
//!     // every capability in the batch was granted
//! }
//!
//! for cap in broker.request_each(&["storage.read"]).await? {
//!     println!("{}: {}", cap.name, cap.granted);
//! }
//! ```

pub mod broker;
pub mod error;
pub mod platform;
pub mod types;

pub use broker::CapabilityBroker;
pub use error::{Error, Result};
pub use platform::Platform;
pub use types::{Capability, PromptCompletion};
