pub mod carona_repository;
pub mod mensagem_repository;
pub mod usuario_repository;
pub mod veiculo_repository;
pub mod viagem_repository;
