// src/usuarios/auth_middleware.rs

use std::fmt;

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

// Importa as Claims do módulo de structs de usuário
use super::usuario_structs::Claims;
use crate::shared::erros::CatalogoError;
// Importa o AppState do módulo raiz (lib.rs)
use crate::AppState;

/// Usuário autenticado, extraído das claims do JWT.
/// Declarar este tipo como argumento de uma rota a torna protegida.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
    pub role: Option<String>,
}

/// Identificação usada nos logs de auditoria: `nome (id N, perfil P)`.
impl fmt::Display for AuthenticatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (id {}, perfil {})",
            self.username,
            self.user_id,
            self.role.as_deref().unwrap_or("-")
        )
    }
}

/// Gera um token HS256 válido por `validade_horas`.
pub fn gerar_token(
    secret: &str,
    user_id: i64,
    username: &str,
    role: Option<String>,
    validade_horas: i64,
) -> Result<String, CatalogoError> {
    let claims = Claims {
        sub: user_id,
        name: username.to_string(),
        role,
        exp: (Utc::now() + Duration::hours(validade_horas)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| CatalogoError::Interno(format!("falha ao gerar token: {}", e)))
}

/// Valida o token e devolve as claims.
pub fn validar_token(secret: &str, token: &str) -> Result<Claims, CatalogoError> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &validation)
        .map(|token_data| token_data.claims)
        .map_err(|e| {
            log::warn!("Erro ao decodificar/validar JWT: {:?}", e);
            let mensagem = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expirado.",
                jsonwebtoken::errors::ErrorKind::InvalidSignature => "Assinatura do token inválida.",
                jsonwebtoken::errors::ErrorKind::InvalidToken => "Token malformado.",
                _ => "Token de autenticação inválido.",
            };
            CatalogoError::NaoAutorizado(mensagem.to_string())
        })
}

fn autenticar(req: &HttpRequest) -> Result<AuthenticatedUser, CatalogoError> {
    // Acessa o AppState para obter a chave secreta JWT
    let app_state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        CatalogoError::Interno("AppState não disponível no extrator de autenticação".into())
    })?;

    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| CatalogoError::NaoAutorizado("Token de autenticação ausente.".into()))?
        .to_str()
        .map_err(|_| CatalogoError::NaoAutorizado("Token de autenticação inválido.".into()))?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        CatalogoError::NaoAutorizado("Formato de token inválido. Esperado 'Bearer <token>'.".into())
    })?;

    let claims = validar_token(&app_state.jwt_secret, token)?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        username: claims.name,
        role: claims.role,
    })
}

/// Extrator de autenticação para Actix Web.
/// Valida o token JWT presente no cabeçalho Authorization.
impl FromRequest for AuthenticatedUser {
    type Error = CatalogoError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(autenticar(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_gerado_e_aceito() {
        let token = gerar_token("segredo", 7, "maria", Some("admin".into()), 1).unwrap();
        let claims = validar_token("segredo", &token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.name, "maria");
        assert_eq!(claims.role.as_deref(), Some("admin"));
    }

    #[test]
    fn identificacao_para_auditoria() {
        let admin = AuthenticatedUser {
            user_id: 3,
            username: "joao".into(),
            role: Some("admin".into()),
        };
        assert_eq!(admin.to_string(), "joao (id 3, perfil admin)");

        let sem_perfil = AuthenticatedUser {
            role: None,
            ..admin
        };
        assert_eq!(sem_perfil.to_string(), "joao (id 3, perfil -)");
    }

    #[test]
    fn assinatura_de_outra_chave_e_rejeitada() {
        let token = gerar_token("segredo", 7, "maria", None, 1).unwrap();
        assert!(matches!(
            validar_token("outra", &token),
            Err(CatalogoError::NaoAutorizado(_))
        ));
    }

    #[test]
    fn token_expirado_e_rejeitado() {
        // Bem além da tolerância padrão de 60 segundos
        let token = gerar_token("segredo", 7, "maria", None, -2).unwrap();
        assert!(matches!(
            validar_token("segredo", &token),
            Err(CatalogoError::NaoAutorizado(_))
        ));
    }
}
