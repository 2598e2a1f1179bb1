// src/categorias/categoria_structs.rs

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::catalogo::tipo_conteudo::TipoConteudo;
use crate::itens::item_structs::Item;

/// Estrutura para receber dados de uma nova categoria na requisição POST.
/// O tipo de conteúdo não é aceito aqui: toda categoria nasce vazia.
#[derive(Debug, Clone, Deserialize)]
pub struct NovaCategoria {
    pub name: String,
    pub unit: String,
    pub tab: i64,
    #[serde(default)]
    pub parameter: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// Distingue campo ausente (`None`) de `null` explícito (`Some(None)`).
fn campo_anulavel<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Campos que podem ser alterados no PUT. Campos ausentes ficam como estão;
/// `"parameter": null` apaga o parâmetro.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AtualizacaoCategoria {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "campo_anulavel")]
    pub parameter: Option<Option<String>>,
    pub unit: Option<String>,
    pub tab: Option<i64>,
    pub content_kind: Option<TipoConteudo>,
}

/// Estrutura que representa uma categoria no banco de dados
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Categoria {
    pub id: i64,
    pub name: String,
    pub parameter: Option<String>,
    pub unit: String,
    pub tab: i64,
    pub parent_id: Option<i64>,
    pub content_kind: TipoConteudo,
}

/// Categoria com seus filhos diretos, usada nas respostas de consulta.
#[derive(Debug, Serialize)]
pub struct CategoriaDetalhada {
    #[serde(flatten)]
    pub categoria: Categoria,
    pub children: Vec<Categoria>,
    pub items: Vec<Item>,
}

/// Parâmetros de consulta de GET /categories.
/// Sem `parent_id`, lista as raízes.
#[derive(Debug, Default, Deserialize)]
pub struct FiltroCategorias {
    pub parent_id: Option<i64>,
    pub tab: Option<i64>,
}
