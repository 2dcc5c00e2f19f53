pub mod db;
pub mod jobdb;
pub mod kycdb;
pub mod notificationdb;
pub mod techdb;
pub mod userdb;
