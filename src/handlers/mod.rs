pub mod common;
pub mod health;
pub mod users;
pub mod work_orders;
