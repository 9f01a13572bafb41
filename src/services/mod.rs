pub mod assignments;
pub mod submissions;
pub mod system;
pub mod taking;

pub use assignments::AssignmentService;
pub use submissions::SubmissionService;
pub use system::SystemService;
pub use taking::TakingService;
