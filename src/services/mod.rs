pub mod auth_service;
pub mod conflito;
pub mod jwt_service;
