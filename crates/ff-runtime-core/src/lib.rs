//! Initialization orchestration for Fieldform webforms.
//!
//! Hosts the offline and online startup pipelines, the controller
//! handoff, and the emergency flush path. Everything that touches the
//! page, the network, or storage sits behind a collaborator trait so the
//! sequencing logic runs unchanged under wasm and in native tests.

pub mod bootstrap;
pub mod branding;
pub mod pipeline;
pub mod policy;
pub mod recovery;
pub mod settings;
pub mod traits;

pub use pipeline::Runtime;
pub use settings::Settings;
pub use traits::*;

#[cfg(test)]
pub(crate) mod mock;
