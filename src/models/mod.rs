pub mod auth;
pub mod carona;
pub mod chat;
pub mod usuario;
pub mod veiculo;
pub mod viagem;
