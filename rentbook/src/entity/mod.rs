pub mod app_user;
pub mod payment;
pub mod property;
pub mod tenant;
