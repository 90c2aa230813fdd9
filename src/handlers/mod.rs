// handlers/mod.rs - request handlers
//
// Public: /login, /health
// Protected (bearer token): /dealerships/**
pub mod auth;
pub mod cars;
pub mod dealerships;
pub mod health;
pub mod payload;
