// src/categorias/categoria_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::{query_as, SqlitePool};

// Importa as structs de categoria
use super::categoria_structs::{
    AtualizacaoCategoria, Categoria, CategoriaDetalhada, FiltroCategorias, NovaCategoria,
};
use crate::catalogo::motor_arvore;
use crate::catalogo::subarvore::{itens_da_subarvore, FiltroSubarvore};
use crate::itens::item_structs::Item;
use crate::shared::erros::CatalogoError;
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;

// Importa o AppState do módulo raiz (lib.rs)
use crate::AppState;

/// Carrega os filhos diretos (subcategorias e itens) de uma categoria.
async fn detalhar(pool: &SqlitePool, categoria: Categoria) -> Result<CategoriaDetalhada, sqlx::Error> {
    let children = query_as::<_, Categoria>(
        "SELECT id, name, parameter, unit, tab, parent_id, content_kind \
         FROM categories WHERE parent_id = ? ORDER BY id",
    )
    .bind(categoria.id)
    .fetch_all(pool)
    .await?;

    let items = query_as::<_, Item>(
        "SELECT id, name, category_id, parameter_value, unit, cost_price, selling_price, mic, image_id \
         FROM items WHERE category_id = ? ORDER BY id",
    )
    .bind(categoria.id)
    .fetch_all(pool)
    .await?;

    Ok(CategoriaDetalhada {
        categoria,
        children,
        items,
    })
}

/// Rota para cadastrar uma nova categoria.
#[post("/categories")]
pub async fn cadastrar_categoria(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    nova: web::Json<NovaCategoria>,
) -> Result<HttpResponse, CatalogoError> {
    let categoria = motor_arvore::criar_categoria(&data.db_pool, &nova).await?;
    log::info!("{} cadastrou a categoria {}", usuario, categoria.id);

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Categoria cadastrada com sucesso! ID: {}", categoria.id),
        categoria,
    )))
}

/// Rota para listar as categorias de um nível da árvore.
///
/// Sem `parent_id` devolve as raízes; `tab` restringe a uma aba.
#[get("/categories")]
pub async fn buscar_categorias(
    data: web::Data<AppState>,
    filtro: web::Query<FiltroCategorias>,
) -> Result<HttpResponse, CatalogoError> {
    let categorias = query_as::<_, Categoria>(
        "SELECT id, name, parameter, unit, tab, parent_id, content_kind FROM categories \
         WHERE parent_id IS ? AND (? IS NULL OR tab = ?) ORDER BY id",
    )
    .bind(filtro.parent_id)
    .bind(filtro.tab)
    .bind(filtro.tab)
    .fetch_all(&data.db_pool)
    .await?;

    let mut detalhadas = Vec::with_capacity(categorias.len());
    for categoria in categorias {
        detalhadas.push(detalhar(&data.db_pool, categoria).await?);
    }

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Categorias listadas com sucesso!",
        detalhadas,
    )))
}

/// Rota para buscar uma categoria por ID.
#[get("/categories/{id}")]
pub async fn buscar_categoria_por_id(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, CatalogoError> {
    let id = path.into_inner();
    let mut conn = data.db_pool.acquire().await?;
    let categoria = motor_arvore::buscar_categoria(&mut conn, id)
        .await?
        .ok_or_else(|| CatalogoError::NaoEncontrado(format!("Categoria com ID {} não encontrada.", id)))?;
    drop(conn);

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Categoria com ID {} encontrada.", id),
        detalhar(&data.db_pool, categoria).await?,
    )))
}

/// Rota para atualizar uma categoria existente.
#[put("/categories/{id}")]
pub async fn atualizar_categoria(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i64>,
    patch: web::Json<AtualizacaoCategoria>,
) -> Result<HttpResponse, CatalogoError> {
    let id = path.into_inner();
    let categoria = motor_arvore::atualizar_categoria(&data.db_pool, id, &patch).await?;

    log::info!("{} atualizou a categoria {}", usuario, id);

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Categoria com ID {} atualizada com sucesso.", id),
        categoria,
    )))
}

/// Rota para deletar uma categoria junto com toda a sua subárvore.
#[delete("/categories/{id}")]
pub async fn deletar_categoria(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, CatalogoError> {
    let id = path.into_inner();
    let (categorias, itens) = motor_arvore::deletar_categoria(&data.db_pool, id).await?;
    log::info!("{} excluiu a categoria {}", usuario, id);

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("Categoria com ID {} deletada com sucesso.", id),
        serde_json::json!({ "categories_deleted": categorias, "items_deleted": itens }),
    )))
}

/// Rota com todos os itens da categoria e das suas descendentes.
/// Categoria inexistente devolve lista vazia, não 404.
#[get("/categories/{id}/items")]
pub async fn buscar_itens_da_subarvore(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    filtro: web::Query<FiltroSubarvore>,
) -> Result<HttpResponse, CatalogoError> {
    let id = path.into_inner();
    let itens = itens_da_subarvore(&data.db_pool, id, &filtro).await?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        format!("{} itens encontrados.", itens.len()),
        itens,
    )))
}
