pub mod password_reset;
pub mod tasks;
pub mod users;

pub use password_reset::{PasswordResetService, GENERIC_RESET_MESSAGE};
pub use tasks::TaskService;
pub use users::AuthService;
