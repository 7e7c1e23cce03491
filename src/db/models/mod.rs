pub mod category;
pub mod role;
pub mod setting;
pub mod user;

pub use category::EcommerceCategory;
pub use role::UserRole;
pub use setting::SystemSetting;
pub use user::{User, UserStatus};
