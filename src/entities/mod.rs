pub mod supporting_document;
pub mod user;
pub mod work_order;
pub mod work_order_item;
pub mod work_order_vendor;
