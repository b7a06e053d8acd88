pub mod health;
pub mod list;
pub mod create;
pub mod delete_all;
pub mod get;
pub mod comment;
pub mod delete;

pub use health::health_handler;
pub use list::list_handler;
pub use create::create_handler;
pub use delete_all::delete_all_handler;
pub use get::get_handler;
pub use comment::comment_handler;
pub use delete::delete_handler;
