//! Endpoint WebSocket do chat
//!
//! Cada conexão é classificada na fronteira: principal de suporte (gestor
//! ou administrador) entra na sala compartilhada e recebe o snapshot de
//! presença na hora; usuário comum (autenticado ou anônimo) entra na sua
//! sala privada e conta presença.
//!
//! Todo pedido do cliente é respondido por um frame de ack `{ok, erro?}`
//! na própria conexão — erro de chat nunca derruba o socket.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::chat::broker::ChatBroker;
use crate::chat::presenca::Identidade;
use crate::config::environment::EnvironmentConfig;
use crate::models::chat::ChatMensagem;
use crate::repositories::mensagem_repository::MensagemRepository;
use crate::services::auth_service::AuthService;
use crate::state::AppState;

/// Principal classificado na conexão
#[derive(Debug, Clone)]
struct PrincipalChat {
    identidade: Identidade,
    nome: String,
    suporte: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    token: Option<String>,
}

/// Eventos aceitos do cliente
#[derive(Debug, Deserialize)]
#[serde(tag = "evento", content = "dados")]
enum EventoCliente {
    #[serde(rename = "chat:message")]
    Mensagem {
        texto: String,
        #[serde(default)]
        para_usuario_id: Option<i64>,
    },
    #[serde(rename = "chat:history")]
    Historico {
        #[serde(default)]
        usuario_id: Option<i64>,
        #[serde(default)]
        limite: Option<i64>,
        #[serde(default)]
        antes: Option<DateTime<Utc>>,
    },
    #[serde(rename = "chat:typing")]
    Digitando {
        #[serde(default)]
        para_usuario_id: Option<i64>,
    },
}

/// Forma de uma mensagem no fio
#[derive(Debug, Serialize)]
struct MensagemFrame {
    id: i64,
    usuario_id: Option<i64>,
    nome: String,
    texto: String,
    suporte: bool,
    criado_em: DateTime<Utc>,
}

impl From<ChatMensagem> for MensagemFrame {
    fn from(m: ChatMensagem) -> Self {
        Self {
            id: m.id,
            usuario_id: m.usuario_id,
            nome: m.nome,
            texto: m.texto,
            suporte: m.suporte,
            criado_em: m.criado_em,
        }
    }
}

fn ack_ok(de: &str, dados: Option<serde_json::Value>) -> String {
    json!({"evento": "ack", "de": de, "ok": true, "dados": dados}).to_string()
}

fn ack_erro(de: &str, erro: &str) -> String {
    json!({"evento": "ack", "de": de, "ok": false, "erro": erro}).to_string()
}

/// Corpo de mensagem válido: não vazio depois do trim
fn validar_texto(texto: &str) -> Result<&str, &'static str> {
    let aparado = texto.trim();
    if aparado.is_empty() {
        return Err("Mensagem vazia");
    }
    Ok(aparado)
}

/// GET /api/chat/ws — upgrade da conexão de chat
pub async fn chat_ws(
    State(state): State<AppState>,
    Query(query): Query<ChatQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    // Token inválido derruba o upgrade; token ausente vira conexão anônima
    let principal = match classificar(&state, query.token.as_deref()) {
        Ok(principal) => principal,
        Err(err) => return err.into_response(),
    };

    ws.on_upgrade(move |socket| conduzir_conexao(socket, state, principal))
        .into_response()
}

fn classificar(
    state: &AppState,
    token: Option<&str>,
) -> Result<PrincipalChat, crate::utils::errors::AppError> {
    match token {
        Some(token) => {
            let auth = AuthService::new(state.pool.clone(), &state.config);
            let usuario = auth.identificar(token)?;
            Ok(PrincipalChat {
                identidade: Identidade::Usuario(usuario.id),
                suporte: usuario.papel.is_suporte(),
                nome: usuario.nome,
            })
        }
        None => Ok(PrincipalChat {
            identidade: Identidade::Conexao(Uuid::new_v4().to_string()),
            nome: "Visitante".to_string(),
            suporte: false,
        }),
    }
}

async fn conduzir_conexao(socket: WebSocket, state: AppState, principal: PrincipalChat) {
    let broker = state.broker.clone();
    let mensagens = MensagemRepository::new(state.pool.clone());
    let (mut sink, mut stream) = socket.split();

    let mut sala_rx = if principal.suporte {
        let rx = broker.entrar_suporte();
        // Snapshot imediato, só para esta conexão
        let frame = json!({
            "evento": "chat:active_users",
            "dados": broker.snapshot().await,
        })
        .to_string();
        if sink.send(Message::Text(frame)).await.is_err() {
            return;
        }
        rx
    } else {
        broker
            .entrar_usuario(principal.identidade.clone(), principal.nome.clone())
            .await
    };

    loop {
        tokio::select! {
            frame = sala_rx.recv() => match frame {
                Ok(frame) => {
                    if sink.send(Message::Text(frame)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(perdidos)) => {
                    log::warn!(
                        "⚠️ Chat: conexão '{}' perdeu {} frames",
                        principal.identidade.chave(),
                        perdidos
                    );
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            entrada = stream.next() => match entrada {
                Some(Ok(Message::Text(bruto))) => {
                    let resposta =
                        tratar_evento(&broker, &mensagens, &state.config, &principal, &bruto).await;
                    if sink.send(Message::Text(resposta)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    log::warn!("⚠️ Chat: erro no socket de '{}': {}", principal.identidade.chave(), e);
                    break;
                }
            },
        }
    }

    // A sala só é recolhida depois que o receiver é solto
    drop(sala_rx);
    if !principal.suporte {
        broker.sair_usuario(&principal.identidade).await;
    }
}

async fn tratar_evento(
    broker: &ChatBroker,
    mensagens: &MensagemRepository,
    config: &EnvironmentConfig,
    principal: &PrincipalChat,
    bruto: &str,
) -> String {
    let evento: EventoCliente = match serde_json::from_str(bruto) {
        Ok(evento) => evento,
        Err(_) => return ack_erro("desconhecido", "Evento inválido"),
    };

    match evento {
        EventoCliente::Mensagem { texto, para_usuario_id } => {
            match tratar_mensagem(broker, mensagens, principal, &texto, para_usuario_id).await {
                Ok(dados) => ack_ok("chat:message", Some(dados)),
                Err(erro) => ack_erro("chat:message", &erro),
            }
        }
        EventoCliente::Historico { usuario_id, limite, antes } => {
            match tratar_historico(mensagens, config, principal, usuario_id, limite, antes).await {
                Ok(dados) => ack_ok("chat:history", Some(dados)),
                Err(erro) => ack_erro("chat:history", &erro),
            }
        }
        EventoCliente::Digitando { para_usuario_id } => {
            match tratar_digitando(broker, principal, para_usuario_id).await {
                Ok(()) => ack_ok("chat:typing", None),
                Err(erro) => ack_erro("chat:typing", &erro),
            }
        }
    }
}

/// Destino de uma mensagem, resolvido antes de persistir ou rotear
#[derive(Debug, PartialEq)]
struct DestinoMensagem {
    usuario_id: Option<i64>,
    suporte: bool,
    sala: Identidade,
}

/// Mensagem de suporte exige destino explícito; mensagem de usuário comum
/// vai para a própria sala. Pedido inválido é recusado aqui, antes de
/// qualquer escrita.
fn destino_mensagem(
    principal: &PrincipalChat,
    para_usuario_id: Option<i64>,
) -> Result<DestinoMensagem, String> {
    if principal.suporte {
        let alvo = para_usuario_id.ok_or_else(|| "Informe o usuário de destino".to_string())?;
        Ok(DestinoMensagem {
            usuario_id: Some(alvo),
            suporte: true,
            sala: Identidade::Usuario(alvo),
        })
    } else {
        let usuario_id = match &principal.identidade {
            Identidade::Usuario(id) => Some(*id),
            Identidade::Conexao(_) => None,
        };
        Ok(DestinoMensagem {
            usuario_id,
            suporte: false,
            sala: principal.identidade.clone(),
        })
    }
}

/// Mensagem de usuário comum: persistida e entregue na própria sala + no
/// suporte. Mensagem de suporte: exige destino; persistida e entregue na
/// sala do destino + ecoada no suporte.
async fn tratar_mensagem(
    broker: &ChatBroker,
    mensagens: &MensagemRepository,
    principal: &PrincipalChat,
    texto: &str,
    para_usuario_id: Option<i64>,
) -> Result<serde_json::Value, String> {
    let texto = validar_texto(texto).map_err(|e| e.to_string())?;
    let destino = destino_mensagem(principal, para_usuario_id)?;

    let registro = mensagens
        .inserir(destino.usuario_id, &principal.nome, texto, destino.suporte)
        .await
        .map_err(|e| {
            log::error!("❌ Chat: falha ao persistir mensagem: {}", e);
            "Erro ao salvar mensagem".to_string()
        })?;

    let dados = serde_json::to_value(MensagemFrame::from(registro))
        .map_err(|_| "Erro ao serializar mensagem".to_string())?;
    let frame = json!({"evento": "chat:message", "dados": dados.clone()}).to_string();

    broker.emitir_usuario(&destino.sala, frame.clone()).await;
    broker.emitir_suporte(frame);

    Ok(dados)
}

/// Usuário comum só consulta o próprio histórico; suporte precisa nomear o
/// alvo explicitamente (consulta sem escopo não existe).
async fn tratar_historico(
    mensagens: &MensagemRepository,
    config: &EnvironmentConfig,
    principal: &PrincipalChat,
    usuario_id: Option<i64>,
    limite: Option<i64>,
    antes: Option<DateTime<Utc>>,
) -> Result<serde_json::Value, String> {
    let alvo = if principal.suporte {
        usuario_id.ok_or_else(|| "Informe o usuário para consultar o histórico".to_string())?
    } else {
        match &principal.identidade {
            Identidade::Usuario(id) => {
                if usuario_id.is_some() && usuario_id != Some(*id) {
                    return Err("Sem permissão para consultar esse histórico".to_string());
                }
                *id
            }
            Identidade::Conexao(_) => {
                return Err("Histórico disponível apenas para usuários autenticados".to_string());
            }
        }
    };

    let limite = limite.unwrap_or(config.chat_history_limit).clamp(1, 200);

    let historico = mensagens
        .historico(alvo, limite, antes)
        .await
        .map_err(|e| {
            log::error!("❌ Chat: falha ao consultar histórico: {}", e);
            "Erro ao consultar histórico".to_string()
        })?;

    let frames: Vec<MensagemFrame> = historico.into_iter().map(MensagemFrame::from).collect();
    serde_json::to_value(frames).map_err(|_| "Erro ao serializar histórico".to_string())
}

/// Indicador de digitação: transitório, não persiste; segue a mesma
/// direção das mensagens.
async fn tratar_digitando(
    broker: &ChatBroker,
    principal: &PrincipalChat,
    para_usuario_id: Option<i64>,
) -> Result<(), String> {
    let frame = json!({
        "evento": "chat:typing",
        "dados": {"de": principal.identidade.chave(), "nome": principal.nome},
    })
    .to_string();

    if principal.suporte {
        let alvo = para_usuario_id.ok_or_else(|| "Informe o usuário de destino".to_string())?;
        broker.emitir_usuario(&Identidade::Usuario(alvo), frame).await;
    } else {
        broker.emitir_suporte(frame);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texto_vazio_e_rejeitado() {
        assert_eq!(validar_texto(""), Err("Mensagem vazia"));
        assert_eq!(validar_texto("   \n\t"), Err("Mensagem vazia"));
        assert_eq!(validar_texto("  oi  "), Ok("oi"));
    }

    #[test]
    fn evento_de_mensagem_e_desserializado() {
        let bruto = r#"{"evento":"chat:message","dados":{"texto":"olá","para_usuario_id":7}}"#;
        let evento: EventoCliente = serde_json::from_str(bruto).unwrap();
        match evento {
            EventoCliente::Mensagem { texto, para_usuario_id } => {
                assert_eq!(texto, "olá");
                assert_eq!(para_usuario_id, Some(7));
            }
            _ => panic!("evento errado"),
        }
    }

    #[test]
    fn historico_aceita_campos_opcionais() {
        let bruto = r#"{"evento":"chat:history","dados":{}}"#;
        let evento: EventoCliente = serde_json::from_str(bruto).unwrap();
        assert!(matches!(
            evento,
            EventoCliente::Historico { usuario_id: None, limite: None, antes: None }
        ));
    }

    fn principal(identidade: Identidade, suporte: bool) -> PrincipalChat {
        PrincipalChat {
            identidade,
            nome: "Teste".to_string(),
            suporte,
        }
    }

    #[test]
    fn suporte_sem_destino_e_rejeitado_antes_de_qualquer_escrita() {
        let suporte = principal(Identidade::Usuario(1), true);
        let err = destino_mensagem(&suporte, None).unwrap_err();
        assert_eq!(err, "Informe o usuário de destino");
    }

    #[test]
    fn suporte_com_destino_roteia_para_a_sala_do_alvo() {
        let suporte = principal(Identidade::Usuario(1), true);
        let destino = destino_mensagem(&suporte, Some(42)).unwrap();
        assert_eq!(destino.sala, Identidade::Usuario(42));
        assert_eq!(destino.usuario_id, Some(42));
        assert!(destino.suporte);
    }

    #[test]
    fn usuario_comum_roteia_para_a_propria_sala() {
        // `para_usuario_id` de usuário comum é ignorado, não redireciona
        let usuario = principal(Identidade::Usuario(7), false);
        let destino = destino_mensagem(&usuario, Some(42)).unwrap();
        assert_eq!(destino.sala, Identidade::Usuario(7));
        assert_eq!(destino.usuario_id, Some(7));
        assert!(!destino.suporte);
    }

    #[test]
    fn anonimo_envia_sem_usuario_persistido() {
        let anonimo = principal(Identidade::Conexao("abc".to_string()), false);
        let destino = destino_mensagem(&anonimo, None).unwrap();
        assert_eq!(destino.usuario_id, None);
        assert_eq!(destino.sala, Identidade::Conexao("abc".to_string()));
    }

    #[test]
    fn ack_de_erro_carrega_mensagem() {
        let ack = ack_erro("chat:message", "Mensagem vazia");
        let valor: serde_json::Value = serde_json::from_str(&ack).unwrap();
        assert_eq!(valor["ok"], false);
        assert_eq!(valor["erro"], "Mensagem vazia");
        assert_eq!(valor["de"], "chat:message");
    }
}
