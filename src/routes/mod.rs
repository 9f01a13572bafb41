pub mod assignments;
pub mod submissions;
pub mod system;
pub mod taking;

pub use assignments::configure_assignments_routes;
pub use submissions::configure_submissions_routes;
pub use system::configure_system_routes;
pub use taking::configure_taking_routes;
