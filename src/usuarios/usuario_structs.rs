// src/usuarios/usuario_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estrutura que representa um usuário no banco de dados.
/// A senha é armazenada como hash bcrypt.
#[derive(FromRow)]
pub struct Usuario {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub role_id: i64,
}

/// Usuário como é devolvido pela API, com o nome do perfil resolvido.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct UsuarioResponse {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub role: Option<String>,
}

/// Estrutura para receber dados de um novo usuário na requisição de cadastro.
#[derive(Deserialize)]
pub struct NovoUsuario {
    pub username: String,
    pub full_name: String,
    pub password: String, // Senha em texto claro (será hashed antes de salvar)
    pub role_id: i64,
}

/// Campos alteráveis de um usuário. Campos ausentes ficam como estão.
#[derive(Default, Deserialize)]
pub struct AtualizacaoUsuario {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub role_id: Option<i64>,
    pub password: Option<String>,
}

/// Estrutura para receber dados de login do usuário.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String, // Senha em texto claro
}

/// Estrutura para o payload do JWT (Claims).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,             // Subject (ID do usuário)
    pub name: String,         // Nome de login
    pub role: Option<String>, // Perfil do usuário
    pub exp: i64,             // Expiration Time (timestamp Unix)
}

/// Estrutura para a resposta de sucesso do login.
#[derive(Serialize)]
pub struct AuthResponse {
    pub status: String,
    pub message: String,
    pub user_id: i64,
    pub username: String,
    pub full_name: String,
    pub role: Option<String>,
    pub token: String,
}

/// Perfil de acesso (ex.: admin, agente).
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Perfil {
    pub id: i64,
    pub name: String,
}

/// Corpo das requisições de criação e renomeação de perfil.
#[derive(Deserialize)]
pub struct NovoPerfil {
    pub name: String,
}
