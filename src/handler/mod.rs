pub mod admin;
pub mod auth;
pub mod jobs;
pub mod kyc;
pub mod technicians;
pub mod users;
