// src/usuarios/perfil_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::{query, query_as, query_scalar, SqlitePool};

use super::auth_middleware::AuthenticatedUser;
use super::usuario_structs::{NovoPerfil, Perfil};
use crate::shared::erros::CatalogoError;
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

async fn garantir_nome_livre(pool: &SqlitePool, nome: &str, exceto_id: i64) -> Result<(), CatalogoError> {
    let existente: Option<i64> = query_scalar("SELECT id FROM roles WHERE name = ? AND id != ?")
        .bind(nome)
        .bind(exceto_id)
        .fetch_optional(pool)
        .await?;
    if existente.is_some() {
        return Err(CatalogoError::NomeDuplicado(format!("O perfil '{}' já existe.", nome)));
    }
    Ok(())
}

#[post("/roles")]
pub async fn cadastrar_perfil(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    novo: web::Json<NovoPerfil>,
) -> Result<HttpResponse, CatalogoError> {
    garantir_nome_livre(&data.db_pool, &novo.name, 0).await?;

    let id = query("INSERT INTO roles (name) VALUES (?)")
        .bind(&novo.name)
        .execute(&data.db_pool)
        .await
        .map_err(|e| CatalogoError::de_unicidade(e, format!("O perfil '{}' já existe.", novo.name)))?
        .last_insert_rowid();

    log::info!("{} cadastrou o perfil {}", usuario, id);

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Perfil cadastrado com sucesso! ID: {}", id),
        Perfil {
            id,
            name: novo.into_inner().name,
        },
    )))
}

#[get("/roles")]
pub async fn buscar_perfis(data: web::Data<AppState>) -> Result<HttpResponse, CatalogoError> {
    let perfis = query_as::<_, Perfil>("SELECT id, name FROM roles ORDER BY id")
        .fetch_all(&data.db_pool)
        .await?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Perfis listados com sucesso!", perfis)))
}

#[get("/roles/{id}")]
pub async fn buscar_perfil_por_id(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, CatalogoError> {
    let id = path.into_inner();
    let perfil = query_as::<_, Perfil>("SELECT id, name FROM roles WHERE id = ?")
        .bind(id)
        .fetch_optional(&data.db_pool)
        .await?
        .ok_or_else(|| CatalogoError::NaoEncontrado(format!("Perfil com ID {} não encontrado.", id)))?;
    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Perfil com ID {} encontrado.", id),
        perfil,
    )))
}

#[put("/roles/{id}")]
pub async fn atualizar_perfil(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i64>,
    novo: web::Json<NovoPerfil>,
) -> Result<HttpResponse, CatalogoError> {
    let id = path.into_inner();
    garantir_nome_livre(&data.db_pool, &novo.name, id).await?;

    let resultado = query("UPDATE roles SET name = ? WHERE id = ?")
        .bind(&novo.name)
        .bind(id)
        .execute(&data.db_pool)
        .await
        .map_err(|e| CatalogoError::de_unicidade(e, format!("O perfil '{}' já existe.", novo.name)))?;
    if resultado.rows_affected() == 0 {
        return Err(CatalogoError::NaoEncontrado(format!("Perfil com ID {} não encontrado.", id)));
    }

    log::info!("{} atualizou o perfil {}", usuario, id);

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Perfil com ID {} atualizado com sucesso.", id),
        Perfil {
            id,
            name: novo.into_inner().name,
        },
    )))
}

/// Perfis ainda atribuídos a algum usuário não podem ser excluídos.
#[delete("/roles/{id}")]
pub async fn deletar_perfil(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, CatalogoError> {
    let id = path.into_inner();
    let em_uso: i64 = query_scalar("SELECT COUNT(*) FROM users WHERE role_id = ?")
        .bind(id)
        .fetch_one(&data.db_pool)
        .await?;
    if em_uso > 0 {
        return Err(CatalogoError::ArgumentoInvalido(format!(
            "O perfil com ID {} está atribuído a {} usuário(s).",
            id, em_uso
        )));
    }

    let resultado = query("DELETE FROM roles WHERE id = ?")
        .bind(id)
        .execute(&data.db_pool)
        .await?;
    if resultado.rows_affected() == 0 {
        return Err(CatalogoError::NaoEncontrado(format!("Perfil com ID {} não encontrado.", id)));
    }
    log::info!("{} excluiu o perfil {}", usuario, id);

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso_sem_corpo(format!(
        "Perfil com ID {} deletado com sucesso.",
        id
    ))))
}
