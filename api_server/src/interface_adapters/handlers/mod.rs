pub mod admin;
pub mod auth;
pub mod leads;
pub mod payments;
pub mod settings;
pub mod webinar;
