pub mod completion;
pub mod drag;
pub mod identity;
pub mod session;
pub mod step_ops;
pub mod validate;
