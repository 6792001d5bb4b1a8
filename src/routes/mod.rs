pub mod auth_routes;
pub mod carona_routes;
pub mod chat_routes;
pub mod veiculo_routes;
pub mod viagem_routes;
