pub mod auth_controller;
pub mod carona_controller;
pub mod veiculo_controller;
pub mod viagem_controller;
