// src/shared/erros.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use super::shared_structs::ErrorResponse;

/// Erros que as operações do catálogo devolvem ao chamador.
///
/// Uma operação rejeitada não deixa nenhuma alteração no banco: as escritas
/// acontecem dentro de uma transação que é desfeita quando o erro é propagado.
#[derive(Debug, Error)]
pub enum CatalogoError {
    /// Categoria, item, usuário ou perfil referenciado não existe.
    #[error("{0}")]
    NaoEncontrado(String),

    /// Argumento malformado: `tab` negativo, `mic` fora de {0, 1}, preço negativo...
    #[error("{0}")]
    ArgumentoInvalido(String),

    /// Violação das regras de tipo de conteúdo da árvore de categorias.
    #[error("{0}")]
    ConflitoTipoConteudo(String),

    /// Nome repetido dentro do mesmo escopo.
    #[error("{0}")]
    NomeDuplicado(String),

    #[error("{0}")]
    NaoAutorizado(String),

    #[error("erro de banco de dados: {0}")]
    Banco(#[from] sqlx::Error),

    #[error("erro de armazenamento: {0}")]
    Armazenamento(#[from] std::io::Error),

    #[error("erro interno: {0}")]
    Interno(String),
}

impl CatalogoError {
    /// Identificador estável do tipo de erro, usado no corpo JSON.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogoError::NaoEncontrado(_) => "not_found",
            CatalogoError::ArgumentoInvalido(_) => "invalid_argument",
            CatalogoError::ConflitoTipoConteudo(_) => "conflicting_content_kind",
            CatalogoError::NomeDuplicado(_) => "duplicate_name",
            CatalogoError::NaoAutorizado(_) => "unauthorized",
            CatalogoError::Banco(_) | CatalogoError::Armazenamento(_) | CatalogoError::Interno(_) => {
                "internal"
            }
        }
    }

    /// Violação de UNIQUE vira `NomeDuplicado` com a mensagem dada; o resto segue como `Banco`.
    pub fn de_unicidade(e: sqlx::Error, mensagem: impl Into<String>) -> Self {
        let unico = match &e {
            sqlx::Error::Database(db) => {
                db.code().as_deref() == Some(SQLITE_CONSTRAINT_UNIQUE)
                    || db.message().starts_with("UNIQUE constraint failed")
            }
            _ => false,
        };
        if unico {
            CatalogoError::NomeDuplicado(mensagem.into())
        } else {
            CatalogoError::Banco(e)
        }
    }
}

/// Código estendido do SQLite para UNIQUE constraint failed.
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";

impl From<actix_web::error::BlockingError> for CatalogoError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        CatalogoError::Interno(e.to_string())
    }
}

impl From<bcrypt::BcryptError> for CatalogoError {
    fn from(e: bcrypt::BcryptError) -> Self {
        CatalogoError::Interno(format!("falha ao processar senha: {}", e))
    }
}

impl From<actix_multipart::MultipartError> for CatalogoError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        CatalogoError::ArgumentoInvalido(format!("Formulário multipart inválido: {}", e))
    }
}

impl ResponseError for CatalogoError {
    fn status_code(&self) -> StatusCode {
        match self {
            CatalogoError::NaoEncontrado(_) => StatusCode::NOT_FOUND,
            CatalogoError::ArgumentoInvalido(_) => StatusCode::BAD_REQUEST,
            CatalogoError::ConflitoTipoConteudo(_) | CatalogoError::NomeDuplicado(_) => {
                StatusCode::CONFLICT
            }
            CatalogoError::NaoAutorizado(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Detalhes de falhas internas ficam no log, não na resposta
        let message = if status.is_server_error() {
            log::error!("{}", self);
            "Erro interno do servidor.".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(ErrorResponse {
            status: "error".to_string(),
            kind: self.kind().to_string(),
            message,
        })
    }
}
