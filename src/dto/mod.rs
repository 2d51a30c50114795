pub mod users;
pub mod work_orders;
