//! 答题会话生命周期：开始、作答、防抖自动保存、提交/自动提交、重新作答

pub mod registry;
pub mod session;

pub use registry::SessionRegistry;
pub use session::{AssignmentSession, SessionOptions};
