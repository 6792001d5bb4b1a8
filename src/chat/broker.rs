//! Broker de salas e presença do chat
//!
//! Roteia frames entre usuários comuns e a sala de suporte (gestores e
//! administradores). Cada identidade comum tem uma sala privada; o suporte
//! compartilha uma sala única que recebe, além das mensagens, os snapshots
//! de presença a cada conexão/desconexão.

use std::collections::HashMap;

use serde_json::json;
use tokio::sync::{broadcast, Mutex};

use crate::chat::presenca::{Identidade, PresencaTracker, UsuarioAtivo};

const CAPACIDADE_SALA: usize = 100;

pub struct ChatBroker {
    presenca: Mutex<PresencaTracker>,
    salas: Mutex<HashMap<Identidade, broadcast::Sender<String>>>,
    suporte: broadcast::Sender<String>,
}

impl Default for ChatBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatBroker {
    pub fn new() -> Self {
        let (suporte, _rx) = broadcast::channel(CAPACIDADE_SALA);
        Self {
            presenca: Mutex::new(PresencaTracker::new()),
            salas: Mutex::new(HashMap::new()),
            suporte,
        }
    }

    /// Entrada de um principal de suporte: assina a sala compartilhada.
    /// Suporte não entra no mapa de presença.
    pub fn entrar_suporte(&self) -> broadcast::Receiver<String> {
        self.suporte.subscribe()
    }

    /// Entrada de um usuário comum: assina (criando se preciso) sua sala
    /// privada, incrementa a presença e publica o snapshot atualizado para
    /// o suporte.
    pub async fn entrar_usuario(
        &self,
        identidade: Identidade,
        nome: String,
    ) -> broadcast::Receiver<String> {
        let rx = {
            let mut salas = self.salas.lock().await;
            let sala = salas
                .entry(identidade.clone())
                .or_insert_with(|| broadcast::channel(CAPACIDADE_SALA).0);
            sala.subscribe()
        };

        {
            let mut presenca = self.presenca.lock().await;
            let conexoes = presenca.conectar(identidade.clone(), nome);
            log::info!("👤 Chat: '{}' conectado ({} conexões)", identidade.chave(), conexoes);
        }

        self.publicar_snapshot().await;
        rx
    }

    /// Saída de um usuário comum. O chamador deve soltar seu receiver
    /// antes, para que a sala vazia possa ser recolhida.
    pub async fn sair_usuario(&self, identidade: &Identidade) {
        let removido = {
            let mut presenca = self.presenca.lock().await;
            presenca.desconectar(identidade)
        };

        if removido {
            let mut salas = self.salas.lock().await;
            if let Some(sala) = salas.get(identidade) {
                if sala.receiver_count() == 0 {
                    salas.remove(identidade);
                }
            }
            log::info!("👋 Chat: '{}' saiu (última conexão)", identidade.chave());
        }

        self.publicar_snapshot().await;
    }

    pub async fn snapshot(&self) -> Vec<UsuarioAtivo> {
        self.presenca.lock().await.snapshot()
    }

    /// Publica o snapshot de presença na sala de suporte
    pub async fn publicar_snapshot(&self) {
        let snapshot = self.snapshot().await;
        let frame = json!({
            "evento": "chat:active_users",
            "dados": snapshot,
        })
        .to_string();
        // Sem assinantes não é erro: ninguém do suporte online
        let _ = self.suporte.send(frame);
    }

    /// Entrega um frame na sala privada de uma identidade.
    /// Devolve false se ninguém estava ouvindo.
    pub async fn emitir_usuario(&self, identidade: &Identidade, frame: String) -> bool {
        let salas = self.salas.lock().await;
        match salas.get(identidade) {
            Some(sala) => sala.send(frame).is_ok(),
            None => false,
        }
    }

    /// Entrega um frame na sala de suporte
    pub fn emitir_suporte(&self, frame: String) {
        let _ = self.suporte.send(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_teste() -> String {
        json!({"evento": "chat:message", "dados": {"texto": "olá"}}).to_string()
    }

    #[tokio::test]
    async fn suporte_recebe_snapshot_ao_conectar_usuario() {
        let broker = ChatBroker::new();
        let mut suporte_rx = broker.entrar_suporte();

        let _rx = broker
            .entrar_usuario(Identidade::Usuario(42), "Ana".to_string())
            .await;

        let frame = suporte_rx.recv().await.unwrap();
        assert!(frame.contains("chat:active_users"));
        assert!(frame.contains("\"42\""));
    }

    #[tokio::test]
    async fn snapshot_apos_ultima_desconexao_nao_contem_usuario() {
        let broker = ChatBroker::new();

        let rx1 = broker
            .entrar_usuario(Identidade::Usuario(42), "Ana".to_string())
            .await;
        let rx2 = broker
            .entrar_usuario(Identidade::Usuario(42), "Ana".to_string())
            .await;

        drop(rx1);
        broker.sair_usuario(&Identidade::Usuario(42)).await;
        assert_eq!(broker.snapshot().await.len(), 1);

        let mut suporte_rx = broker.entrar_suporte();
        drop(rx2);
        broker.sair_usuario(&Identidade::Usuario(42)).await;
        assert!(broker.snapshot().await.is_empty());

        let frame = suporte_rx.recv().await.unwrap();
        assert!(frame.contains("chat:active_users"));
        assert!(!frame.contains("\"42\""));
    }

    #[tokio::test]
    async fn frame_chega_na_sala_privada() {
        let broker = ChatBroker::new();
        let mut rx = broker
            .entrar_usuario(Identidade::Usuario(7), "Bruno".to_string())
            .await;

        assert!(broker.emitir_usuario(&Identidade::Usuario(7), frame_teste()).await);
        let recebido = rx.recv().await.unwrap();
        assert!(recebido.contains("olá"));
    }

    #[tokio::test]
    async fn emitir_para_sala_inexistente_nao_entrega() {
        let broker = ChatBroker::new();
        assert!(!broker.emitir_usuario(&Identidade::Usuario(99), frame_teste()).await);
    }
}
