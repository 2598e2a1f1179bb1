// src/catalogo/subarvore.rs

use serde::Deserialize;
use sqlx::{query_as, SqlitePool};

use crate::itens::item_structs::ItemComCategoria;

/// CTE com a categoria informada (único parâmetro) e todas as suas descendentes.
/// `UNION` descarta repetições, então a recursão termina mesmo com dados corrompidos.
pub(crate) const CTE_SUBARVORE: &str = "WITH RECURSIVE subarvore(id) AS ( \
        SELECT id FROM categories WHERE id = ? \
        UNION \
        SELECT c.id FROM categories c INNER JOIN subarvore s ON c.parent_id = s.id \
    )";

/// Padrão LIKE para "contém `texto`", com `%`, `_` e `\` tratados como literais.
/// Usar com `ESCAPE '\'`.
pub(crate) fn padrao_contem(texto: &str) -> String {
    let mut padrao = String::with_capacity(texto.len() + 2);
    padrao.push('%');
    for c in texto.chars() {
        if matches!(c, '%' | '_' | '\\') {
            padrao.push('\\');
        }
        padrao.push(c);
    }
    padrao.push('%');
    padrao
}

/// Filtros opcionais da consulta de itens da subárvore.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroSubarvore {
    /// Trecho do nome do item, sem diferenciar maiúsculas (ASCII).
    pub query: Option<String>,
    pub mic: Option<i64>,
}

/// Todos os itens da categoria e das suas descendentes, em qualquer profundidade,
/// cada um com o nome e o parâmetro da categoria dona.
///
/// Uma categoria inexistente resulta numa lista vazia. A ordem é por ID do item.
pub async fn itens_da_subarvore(
    pool: &SqlitePool,
    categoria_id: i64,
    filtro: &FiltroSubarvore,
) -> Result<Vec<ItemComCategoria>, sqlx::Error> {
    let sql = format!(
        "{} SELECT i.id, i.name, i.category_id, i.parameter_value, i.unit, \
                i.cost_price, i.selling_price, i.mic, i.image_id, \
                c.name AS category_name, c.parameter AS category_parameter \
         FROM items i \
         INNER JOIN categories c ON i.category_id = c.id \
         WHERE i.category_id IN (SELECT id FROM subarvore) \
           AND (? IS NULL OR i.name LIKE ? ESCAPE '\\') \
           AND (? IS NULL OR i.mic = ?) \
         ORDER BY i.id",
        CTE_SUBARVORE
    );

    let padrao = filtro.query.as_deref().map(padrao_contem);

    query_as::<_, ItemComCategoria>(&sql)
        .bind(categoria_id)
        .bind(&padrao)
        .bind(&padrao)
        .bind(filtro.mic)
        .bind(filtro.mic)
        .fetch_all(pool)
        .await
}
