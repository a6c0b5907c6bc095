pub mod project;
pub mod task;
pub mod user;

pub use project::{Project, ProjectInput, ProjectResponse, ProjectWithTasks};
pub use task::{Task, TaskInput, TaskResponse};
pub use user::{NewUser, User, UserProfile};
