// src/itens/item_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estrutura para receber dados de um novo item na requisição POST
#[derive(Debug, Clone, Deserialize)]
pub struct NovoItem {
    pub name: String,
    pub category_id: i64,
    pub parameter_value: String,
    pub unit: String,
    pub cost_price: i64,
    pub selling_price: i64,
    #[serde(alias = "has_microphone")]
    pub mic: i64,
    #[serde(default)]
    pub image_id: Option<String>,
}

/// Campos que podem ser alterados no PUT. Campos ausentes ficam como estão.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AtualizacaoItem {
    pub name: Option<String>,
    pub category_id: Option<i64>,
    pub parameter_value: Option<String>,
    pub unit: Option<String>,
    pub cost_price: Option<i64>,
    pub selling_price: Option<i64>,
    #[serde(alias = "has_microphone")]
    pub mic: Option<i64>,
    pub image_id: Option<String>,
}

/// Estrutura que representa um item no banco de dados.
/// Preços em unidades mínimas da moeda (centavos).
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub parameter_value: String,
    pub unit: String,
    pub cost_price: i64,
    pub selling_price: i64,
    pub mic: i64,
    pub image_id: Option<String>,
}

/// Item acompanhado do nome e do parâmetro da categoria dona,
/// para que o cliente não precise buscar a categoria de cada item.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ItemComCategoria {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub parameter_value: String,
    pub unit: String,
    pub cost_price: i64,
    pub selling_price: i64,
    pub mic: i64,
    pub image_id: Option<String>,
    pub category_name: String,
    pub category_parameter: Option<String>,
}

/// Parâmetros de GET /items
#[derive(Debug, Default, Deserialize)]
pub struct FiltroItens {
    pub category_id: Option<i64>,
}

/// Parâmetros de GET /items/search
#[derive(Debug, Deserialize)]
pub struct BuscaItens {
    pub query: String,
}
