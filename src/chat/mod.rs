pub mod broker;
pub mod presenca;
pub mod ws;
