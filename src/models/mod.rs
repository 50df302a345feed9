pub mod password_reset;
pub mod task;
pub mod user;

pub use password_reset::PasswordResetToken;
pub use task::{Task, TaskCreate, TaskPage, TaskQuery, TaskUpdate};
pub use user::{User, UserResponse, UserRole};
