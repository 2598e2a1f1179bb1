// src/shared/config.rs

use std::path::PathBuf;

use ::config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

/// Chave usada quando JWT_SECRET não está definida. Serve apenas para desenvolvimento.
const JWT_SECRET_PADRAO: &str = "minha_chave_secreta_para_testes_123";

/// Configuração da aplicação, lida das variáveis de ambiente
/// (DATABASE_URL, BIND_ADDR, JWT_SECRET, JWT_VALIDADE_HORAS, BCRYPT_CUSTO,
/// DIRETORIO_SERVIDOR, IMAGEM_PADRAO).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(rename = "bind_addr", default = "default_endereco")]
    pub endereco: String,
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_jwt_validade_horas")]
    pub jwt_validade_horas: i64,
    #[serde(default = "default_bcrypt_custo")]
    pub bcrypt_custo: u32,
    #[serde(default = "default_diretorio_servidor")]
    pub diretorio_servidor: PathBuf,
    #[serde(default)]
    pub imagem_padrao: Option<PathBuf>,
}

fn default_database_url() -> String {
    "sqlite://servidor/back.db".to_string()
}

fn default_endereco() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_jwt_validade_horas() -> i64 {
    24
}

fn default_bcrypt_custo() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_diretorio_servidor() -> PathBuf {
    PathBuf::from("servidor")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("falha ao ler a configuração: {0}")]
    Leitura(#[from] ::config::ConfigError),
    #[error("valor inválido para {variavel}: '{valor}' ({motivo})")]
    ValorInvalido {
        variavel: &'static str,
        valor: String,
        motivo: &'static str,
    },
}

impl AppConfig {
    /// Lê a configuração do ambiente do processo.
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(Environment::default())
            .build()?;
        Self::from_config(settings)
    }

    /// Desserializa e valida uma configuração já montada.
    pub fn from_config(settings: Config) -> Result<Self, ConfigError> {
        let mut config: AppConfig = settings.try_deserialize()?;

        if config.jwt_secret.is_empty() {
            log::warn!("JWT_SECRET não definida; usando chave de desenvolvimento");
            config.jwt_secret = JWT_SECRET_PADRAO.to_string();
        }
        if config.jwt_validade_horas <= 0 {
            return Err(ConfigError::ValorInvalido {
                variavel: "JWT_VALIDADE_HORAS",
                valor: config.jwt_validade_horas.to_string(),
                motivo: "esperado inteiro positivo",
            });
        }
        if !(4..=31).contains(&config.bcrypt_custo) {
            return Err(ConfigError::ValorInvalido {
                variavel: "BCRYPT_CUSTO",
                valor: config.bcrypt_custo.to_string(),
                motivo: "esperado inteiro entre 4 e 31",
            });
        }

        Ok(config)
    }

    /// Caminho do arquivo SQLite, ou None para bancos em memória.
    pub fn arquivo_banco(&self) -> Option<PathBuf> {
        caminho_do_banco(&self.database_url)
    }
}

/// Extrai o caminho do arquivo de uma URL `sqlite:`.
pub fn caminho_do_banco(database_url: &str) -> Option<PathBuf> {
    let resto = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let caminho = resto.split('?').next().unwrap_or_default();
    if caminho.is_empty() || caminho == ":memory:" {
        return None;
    }
    Some(PathBuf::from(caminho))
}
