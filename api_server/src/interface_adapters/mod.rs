pub mod clients;
pub mod cookies;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod protocol;
pub mod routes;
pub mod security;
pub mod state;
