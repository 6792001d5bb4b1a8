//! Checagem de conflito de intervalos
//!
//! Um recurso (veículo ou motorista) não pode estar comprometido em duas
//! viagens cujas janelas [saida, retorno) se sobreponham, considerando
//! apenas viagens em status bloqueante (Agendada, Andamento).
//!
//! A semântica é de intervalo aberto à direita: janelas que apenas se
//! tocam na borda não conflitam.

use chrono::{DateTime, Utc};

use crate::utils::errors::AppError;

/// Janela de tempo candidata a alocação
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Janela {
    pub inicio: DateTime<Utc>,
    pub fim: DateTime<Utc>,
}

impl Janela {
    /// Constrói uma janela validando a ordem das pontas.
    /// Datas malformadas já foram rejeitadas na desserialização; aqui só
    /// resta garantir inicio < fim antes de qualquer consulta.
    pub fn nova(inicio: DateTime<Utc>, fim: DateTime<Utc>) -> Result<Janela, AppError> {
        if inicio >= fim {
            return Err(AppError::Validation(
                "A data de saída deve ser anterior à data de retorno".to_string(),
            ));
        }
        Ok(Janela { inicio, fim })
    }
}

/// Sobreposição de intervalos semiabertos [a_ini, a_fim) e [b_ini, b_fim).
///
/// `a_ini < b_fim && a_fim > b_ini` — tocar a borda (fim de um == início
/// do outro) NÃO é conflito.
pub fn intervalos_conflitam(
    a_ini: DateTime<Utc>,
    a_fim: DateTime<Utc>,
    b_ini: DateTime<Utc>,
    b_fim: DateTime<Utc>,
) -> bool {
    a_ini < b_fim && a_fim > b_ini
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::Rng;

    fn hora(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, h, m, 0).unwrap()
    }

    #[test]
    fn bordas_que_se_tocam_nao_conflitam() {
        // [10:00,12:00) e [12:00,14:00)
        assert!(!intervalos_conflitam(hora(10, 0), hora(12, 0), hora(12, 0), hora(14, 0)));
        assert!(!intervalos_conflitam(hora(12, 0), hora(14, 0), hora(10, 0), hora(12, 0)));
    }

    #[test]
    fn sobreposicao_parcial_conflita() {
        // [10:00,12:00) e [11:59,13:00)
        assert!(intervalos_conflitam(hora(10, 0), hora(12, 0), hora(11, 59), hora(13, 0)));
    }

    #[test]
    fn contencao_total_conflita() {
        assert!(intervalos_conflitam(hora(9, 0), hora(18, 0), hora(10, 0), hora(11, 0)));
        assert!(intervalos_conflitam(hora(10, 0), hora(11, 0), hora(9, 0), hora(18, 0)));
    }

    #[test]
    fn intervalos_disjuntos_nao_conflitam() {
        assert!(!intervalos_conflitam(hora(8, 0), hora(9, 0), hora(10, 0), hora(11, 0)));
    }

    #[test]
    fn janela_invertida_e_rejeitada() {
        let err = Janela::nova(hora(12, 0), hora(10, 0)).unwrap_err();
        assert!(matches!(err, crate::utils::errors::AppError::Validation(_)));
        let err = Janela::nova(hora(12, 0), hora(12, 0)).unwrap_err();
        assert!(matches!(err, crate::utils::errors::AppError::Validation(_)));
    }

    /// Oráculo independente: existe algum minuto contido nos dois
    /// intervalos semiabertos?
    fn oraculo(a: (i64, i64), b: (i64, i64)) -> bool {
        (a.0..a.1).any(|x| (b.0..b.1).contains(&x))
    }

    #[test]
    fn propriedade_conflito_equivale_a_intersecao_nao_vazia() {
        let mut rng = rand::thread_rng();
        for _ in 0..2000 {
            let a0 = rng.gen_range(0..100);
            let a1 = rng.gen_range(a0 + 1..=101);
            let b0 = rng.gen_range(0..100);
            let b1 = rng.gen_range(b0 + 1..=101);

            let base = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
            let t = |mins: i64| base + chrono::Duration::minutes(mins);

            assert_eq!(
                intervalos_conflitam(t(a0), t(a1), t(b0), t(b1)),
                oraculo((a0, a1), (b0, b1)),
                "divergência para [{},{}) x [{},{})",
                a0,
                a1,
                b0,
                b1
            );
        }
    }
}
