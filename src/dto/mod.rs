pub mod auth_dto;
pub mod carona_dto;
pub mod respostas;
pub mod veiculo_dto;
pub mod viagem_dto;
