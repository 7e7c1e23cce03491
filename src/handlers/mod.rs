pub mod ecommerce;
pub mod health;
pub mod system;
pub mod user;
