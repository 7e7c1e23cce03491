pub mod roles;
pub mod users;
