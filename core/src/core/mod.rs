pub mod content;
pub mod path;
pub mod task;

// Re-export key types for easier access from other trellis modules (and lib.rs)
pub use content::is_binary;
pub use path::{decompose, PathParts};
pub use task::{StepHandler, Task};
