//! Rastreamento de presença
//!
//! Mantém o mapa de usuários finais conectados ao chat. O contador de cada
//! entrada é o número de conexões vivas daquela identidade; a entrada some
//! quando o contador chega a zero. Estado efêmero: nunca é autoridade sobre
//! nada persistido e pode ser reconstruído das conexões ativas.

use std::collections::HashMap;

use serde::Serialize;

/// Identidade estável de um principal do chat: usuário autenticado (id
/// numérico) ou conexão anônima (id de conexão).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identidade {
    Usuario(i64),
    Conexao(String),
}

impl Identidade {
    /// Chave textual usada nas salas e nos snapshots
    pub fn chave(&self) -> String {
        match self {
            Identidade::Usuario(id) => id.to_string(),
            Identidade::Conexao(id) => format!("anon:{}", id),
        }
    }
}

#[derive(Debug)]
struct EntradaPresenca {
    nome: String,
    conexoes: u32,
}

/// Entrada do snapshot enviado à sala de suporte
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UsuarioAtivo {
    pub id: String,
    pub nome: String,
    pub conexoes: u32,
}

/// Rastreador de presença, injetado no broker (e mockável em teste)
#[derive(Debug, Default)]
pub struct PresencaTracker {
    entradas: HashMap<Identidade, EntradaPresenca>,
}

impl PresencaTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra uma conexão; devolve o contador atualizado
    pub fn conectar(&mut self, identidade: Identidade, nome: String) -> u32 {
        let entrada = self
            .entradas
            .entry(identidade)
            .or_insert(EntradaPresenca { nome, conexoes: 0 });
        entrada.conexoes += 1;
        entrada.conexoes
    }

    /// Registra uma desconexão; devolve true se a entrada foi removida
    /// (última conexão daquela identidade).
    pub fn desconectar(&mut self, identidade: &Identidade) -> bool {
        if let Some(entrada) = self.entradas.get_mut(identidade) {
            entrada.conexoes = entrada.conexoes.saturating_sub(1);
            if entrada.conexoes == 0 {
                self.entradas.remove(identidade);
                return true;
            }
        }
        false
    }

    /// Snapshot completo, ordenado pela chave para saída estável
    pub fn snapshot(&self) -> Vec<UsuarioAtivo> {
        let mut ativos: Vec<UsuarioAtivo> = self
            .entradas
            .iter()
            .map(|(identidade, entrada)| UsuarioAtivo {
                id: identidade.chave(),
                nome: entrada.nome.clone(),
                conexoes: entrada.conexoes,
            })
            .collect();
        ativos.sort_by(|a, b| a.id.cmp(&b.id));
        ativos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duas_conexoes_uma_desconexao_mantem_entrada() {
        let mut presenca = PresencaTracker::new();
        presenca.conectar(Identidade::Usuario(42), "Ana".to_string());
        presenca.conectar(Identidade::Usuario(42), "Ana".to_string());

        assert!(!presenca.desconectar(&Identidade::Usuario(42)));

        let snapshot = presenca.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "42");
        assert_eq!(snapshot[0].conexoes, 1);
    }

    #[test]
    fn ultima_desconexao_remove_entrada() {
        let mut presenca = PresencaTracker::new();
        presenca.conectar(Identidade::Usuario(42), "Ana".to_string());
        presenca.conectar(Identidade::Usuario(42), "Ana".to_string());
        presenca.desconectar(&Identidade::Usuario(42));

        assert!(presenca.desconectar(&Identidade::Usuario(42)));
        assert!(presenca.snapshot().is_empty());
    }

    #[test]
    fn desconectar_identidade_desconhecida_e_inocuo() {
        let mut presenca = PresencaTracker::new();
        assert!(!presenca.desconectar(&Identidade::Usuario(99)));
    }

    #[test]
    fn snapshot_ordena_por_chave() {
        let mut presenca = PresencaTracker::new();
        presenca.conectar(Identidade::Usuario(7), "Bruno".to_string());
        presenca.conectar(Identidade::Usuario(12), "Carla".to_string());
        presenca.conectar(Identidade::Conexao("abc".to_string()), "Visitante".to_string());

        let ids: Vec<String> = presenca.snapshot().into_iter().map(|u| u.id).collect();
        let mut ordenado = ids.clone();
        ordenado.sort();
        assert_eq!(ids, ordenado);
    }
}
