// src/usuarios/usuario_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use bcrypt::{hash, verify};
use sqlx::{query, query_as, query_scalar, SqlitePool};

// Importa as structs do módulo de usuários
use super::auth_middleware::{gerar_token, AuthenticatedUser};
use super::usuario_structs::{
    AtualizacaoUsuario, AuthResponse, LoginRequest, NovoUsuario, Usuario, UsuarioResponse,
};
use crate::shared::erros::CatalogoError;
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

const SELECT_USUARIO_RESPONSE: &str = "SELECT u.id, u.username, u.full_name, r.name AS role \
     FROM users u LEFT JOIN roles r ON r.id = u.role_id";

async fn usuario_response(pool: &SqlitePool, id: i64) -> Result<UsuarioResponse, CatalogoError> {
    query_as::<_, UsuarioResponse>(&format!("{} WHERE u.id = ?", SELECT_USUARIO_RESPONSE))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CatalogoError::NaoEncontrado(format!("Usuário com ID {} não encontrado.", id)))
}

async fn garantir_username_livre(
    pool: &SqlitePool,
    username: &str,
    exceto_id: Option<i64>,
) -> Result<(), CatalogoError> {
    let existente: Option<i64> = query_scalar("SELECT id FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    match existente {
        Some(id) if Some(id) != exceto_id => Err(CatalogoError::NomeDuplicado(
            "Nome de usuário já cadastrado.".into(),
        )),
        _ => Ok(()),
    }
}

async fn garantir_perfil_existe(pool: &SqlitePool, role_id: i64) -> Result<(), CatalogoError> {
    let existe: Option<i64> = query_scalar("SELECT id FROM roles WHERE id = ?")
        .bind(role_id)
        .fetch_optional(pool)
        .await?;
    existe
        .map(|_| ())
        .ok_or_else(|| CatalogoError::NaoEncontrado(format!("Perfil com ID {} não existe.", role_id)))
}

/// Gera o hash bcrypt fora das threads do servidor.
async fn gerar_hash(senha: String, custo: u32) -> Result<String, CatalogoError> {
    Ok(web::block(move || hash(senha, custo)).await??)
}

/// Rota para cadastrar um novo usuário.
#[post("/register")]
pub async fn cadastrar_usuario(
    data: web::Data<AppState>,
    novo_usuario: web::Json<NovoUsuario>,
) -> Result<HttpResponse, CatalogoError> {
    let novo_usuario = novo_usuario.into_inner();

    // 1. Verificar se o nome de usuário já está em uso e se o perfil existe
    garantir_username_livre(&data.db_pool, &novo_usuario.username, None).await?;
    garantir_perfil_existe(&data.db_pool, novo_usuario.role_id).await?;

    // 2. Hash da senha
    let hashed_password = gerar_hash(novo_usuario.password, data.bcrypt_custo).await?;

    // 3. Inserir o novo usuário no banco de dados
    let id = query("INSERT INTO users (username, password, full_name, role_id) VALUES (?, ?, ?, ?)")
        .bind(&novo_usuario.username)
        .bind(&hashed_password)
        .bind(&novo_usuario.full_name)
        .bind(novo_usuario.role_id)
        .execute(&data.db_pool)
        .await
        .map_err(|e| CatalogoError::de_unicidade(e, "Nome de usuário já cadastrado."))?
        .last_insert_rowid();

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Usuário cadastrado com sucesso! ID: {}", id),
        usuario_response(&data.db_pool, id).await?,
    )))
}

/// Rota para login de usuário. Devolve um JWT para as rotas protegidas.
#[post("/login")]
pub async fn login_usuario(
    data: web::Data<AppState>,
    login_request: web::Json<LoginRequest>,
) -> Result<HttpResponse, CatalogoError> {
    let credenciais_invalidas = || CatalogoError::NaoAutorizado("Credenciais inválidas.".into());

    // 1. Buscar o usuário pelo nome de login
    let user = query_as::<_, Usuario>(
        "SELECT id, username, password, full_name, role_id FROM users WHERE username = ?",
    )
    .bind(&login_request.username)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(credenciais_invalidas)?;

    // 2. Verificar a senha
    let senha = login_request.password.clone();
    let hash_salvo = user.password.clone();
    if !web::block(move || verify(senha, &hash_salvo)).await?? {
        return Err(credenciais_invalidas());
    }

    // 3. Gerar o token de autenticação
    let resumo = usuario_response(&data.db_pool, user.id).await?;
    let token = gerar_token(
        &data.jwt_secret,
        user.id,
        &user.username,
        resumo.role.clone(),
        data.jwt_validade_horas,
    )?;
    log::info!("Login de {}", user.username);

    Ok(HttpResponse::Ok().json(AuthResponse {
        status: "success".to_string(),
        message: "Login bem-sucedido!".to_string(),
        user_id: user.id,
        username: user.username,
        full_name: user.full_name,
        role: resumo.role,
        token,
    }))
}

#[get("/users")]
pub async fn buscar_usuarios(data: web::Data<AppState>) -> Result<HttpResponse, CatalogoError> {
    let usuarios = query_as::<_, UsuarioResponse>(&format!("{} ORDER BY u.id", SELECT_USUARIO_RESPONSE))
        .fetch_all(&data.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Usuários listados com sucesso!",
        usuarios,
    )))
}

#[get("/users/{id}")]
pub async fn buscar_usuario_por_id(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, CatalogoError> {
    let id = path.into_inner();
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Usuário com ID {} encontrado.", id),
        usuario_response(&data.db_pool, id).await?,
    )))
}

/// Rota para atualizar um usuário. Aplica as mesmas validações do cadastro.
#[put("/users/{id}")]
pub async fn atualizar_usuario(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i64>,
    patch: web::Json<AtualizacaoUsuario>,
) -> Result<HttpResponse, CatalogoError> {
    let id = path.into_inner();
    let patch = patch.into_inner();

    let mut user = query_as::<_, Usuario>(
        "SELECT id, username, password, full_name, role_id FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&data.db_pool)
    .await?
    .ok_or_else(|| CatalogoError::NaoEncontrado(format!("Usuário com ID {} não encontrado.", id)))?;

    if let Some(username) = patch.username {
        garantir_username_livre(&data.db_pool, &username, Some(id)).await?;
        user.username = username;
    }
    if let Some(role_id) = patch.role_id {
        garantir_perfil_existe(&data.db_pool, role_id).await?;
        user.role_id = role_id;
    }
    if let Some(full_name) = patch.full_name {
        user.full_name = full_name;
    }
    if let Some(password) = patch.password {
        user.password = gerar_hash(password, data.bcrypt_custo).await?;
    }

    query("UPDATE users SET username = ?, password = ?, full_name = ?, role_id = ? WHERE id = ?")
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.full_name)
        .bind(user.role_id)
        .bind(id)
        .execute(&data.db_pool)
        .await
        .map_err(|e| CatalogoError::de_unicidade(e, "Nome de usuário já cadastrado."))?;

    log::info!("{} atualizou o usuário {}", usuario, id);

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Usuário com ID {} atualizado com sucesso.", id),
        usuario_response(&data.db_pool, id).await?,
    )))
}

#[delete("/users/{id}")]
pub async fn deletar_usuario(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, CatalogoError> {
    let id = path.into_inner();
    let resultado = query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&data.db_pool)
        .await?;

    if resultado.rows_affected() == 0 {
        return Err(CatalogoError::NaoEncontrado(format!(
            "Usuário com ID {} não encontrado para exclusão.",
            id
        )));
    }
    log::info!("{} excluiu o usuário {}", usuario, id);

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso_sem_corpo(format!(
        "Usuário com ID {} deletado com sucesso.",
        id
    ))))
}
