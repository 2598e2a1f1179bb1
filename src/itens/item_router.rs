// src/itens/item_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::query_as;

use super::item_structs::{AtualizacaoItem, BuscaItens, FiltroItens, Item, NovoItem};
use crate::catalogo::motor_arvore;
use crate::catalogo::subarvore::padrao_contem;
use crate::shared::erros::CatalogoError;
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// Rota para cadastrar um novo item numa categoria.
#[post("/items")]
pub async fn cadastrar_item(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    novo: web::Json<NovoItem>,
) -> Result<HttpResponse, CatalogoError> {
    let item = motor_arvore::criar_item(&data.db_pool, &novo).await?;
    log::info!("{} cadastrou o item {}", usuario, item.id);

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Item cadastrado com sucesso! ID: {}", item.id),
        item,
    )))
}

/// Rota para buscar itens pelo nome.
#[get("/items/search")]
pub async fn pesquisar_itens(
    data: web::Data<AppState>,
    busca: web::Query<BuscaItens>,
) -> Result<HttpResponse, CatalogoError> {
    let itens = query_as::<_, Item>(
        "SELECT id, name, category_id, parameter_value, unit, cost_price, selling_price, mic, image_id \
         FROM items WHERE name LIKE ? ESCAPE '\\' ORDER BY id",
    )
    .bind(padrao_contem(&busca.query))
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("{} itens encontrados.", itens.len()),
        itens,
    )))
}

/// Rota para listar itens, opcionalmente só os de uma categoria.
#[get("/items")]
pub async fn buscar_itens(
    data: web::Data<AppState>,
    filtro: web::Query<FiltroItens>,
) -> Result<HttpResponse, CatalogoError> {
    let itens = query_as::<_, Item>(
        "SELECT id, name, category_id, parameter_value, unit, cost_price, selling_price, mic, image_id \
         FROM items WHERE (? IS NULL OR category_id = ?) ORDER BY id",
    )
    .bind(filtro.category_id)
    .bind(filtro.category_id)
    .fetch_all(&data.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso("Itens listados com sucesso!", itens)))
}

/// Rota para buscar um item por ID.
#[get("/items/{id}")]
pub async fn buscar_item_por_id(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, CatalogoError> {
    let id = path.into_inner();
    let mut conn = data.db_pool.acquire().await?;
    let item = motor_arvore::buscar_item(&mut conn, id)
        .await?
        .ok_or_else(|| CatalogoError::NaoEncontrado(format!("Item com ID {} não encontrado.", id)))?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Item com ID {} encontrado.", id),
        item,
    )))
}

/// Rota para atualizar um item existente.
#[put("/items/{id}")]
pub async fn atualizar_item(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i64>,
    patch: web::Json<AtualizacaoItem>,
) -> Result<HttpResponse, CatalogoError> {
    let id = path.into_inner();
    let item = motor_arvore::atualizar_item(&data.db_pool, id, &patch).await?;

    log::info!("{} atualizou o item {}", usuario, id);

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Item com ID {} atualizado com sucesso.", id),
        item,
    )))
}

/// Rota para deletar um item.
#[delete("/items/{id}")]
pub async fn deletar_item(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, CatalogoError> {
    let id = path.into_inner();
    motor_arvore::deletar_item(&data.db_pool, id).await?;

    log::info!("{} excluiu o item {}", usuario, id);

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso_sem_corpo(format!(
        "Item com ID {} deletado com sucesso.",
        id
    ))))
}
