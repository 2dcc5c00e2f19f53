pub mod jobmodel;
pub mod kycmodel;
pub mod notificationmodel;
pub mod techmodel;
pub mod usermodel;
