// src/catalogo/tipo_conteudo.rs

use serde::{Deserialize, Serialize};

use crate::shared::erros::CatalogoError;

/// O que uma categoria pode conter.
///
/// Uma categoria nasce `Empty` e é promovida na primeira vez que recebe um
/// filho: para `HoldsCategories` com a primeira subcategoria, para `HoldsItems`
/// com o primeiro item. Os dois estados ocupados são mutuamente exclusivos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TipoConteudo {
    Empty,
    HoldsCategories,
    HoldsItems,
}

/// O tipo de filho sendo anexado a uma categoria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anexo {
    Subcategoria,
    Item,
}

/// Contagem do que a categoria realmente contém no momento da leitura.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ocupacao {
    pub subcategorias: i64,
    pub itens: i64,
}

impl TipoConteudo {
    /// Valida o anexo de um novo filho e devolve o tipo resultante da categoria.
    ///
    /// Devolver o mesmo tipo significa que nenhuma promoção é necessária.
    pub fn anexar(self, anexo: Anexo, ocupacao: Ocupacao) -> Result<TipoConteudo, CatalogoError> {
        match (self, anexo) {
            (TipoConteudo::HoldsItems, Anexo::Subcategoria) => Err(CatalogoError::ConflitoTipoConteudo(
                "Não é possível adicionar subcategoria a uma categoria que contém apenas itens.".into(),
            )),
            (TipoConteudo::HoldsCategories, Anexo::Item) => Err(CatalogoError::ConflitoTipoConteudo(
                "Não é possível adicionar item a uma categoria que contém apenas subcategorias.".into(),
            )),
            // Estado desatualizado: ainda marcada como vazia, mas já ocupada pelo outro tipo
            (TipoConteudo::Empty, Anexo::Subcategoria) if ocupacao.itens > 0 => {
                Err(CatalogoError::ConflitoTipoConteudo(
                    "A categoria já contém itens; não é possível adicionar subcategorias.".into(),
                ))
            }
            (TipoConteudo::Empty, Anexo::Item) if ocupacao.subcategorias > 0 => {
                Err(CatalogoError::ConflitoTipoConteudo(
                    "A categoria já contém subcategorias; não é possível adicionar itens.".into(),
                ))
            }
            (TipoConteudo::Empty, Anexo::Subcategoria) => Ok(TipoConteudo::HoldsCategories),
            (TipoConteudo::Empty, Anexo::Item) => Ok(TipoConteudo::HoldsItems),
            (atual, _) => Ok(atual),
        }
    }

    /// Valida uma mudança explícita de tipo pedida numa atualização.
    pub fn transicionar(
        self,
        destino: TipoConteudo,
        ocupacao: Ocupacao,
    ) -> Result<TipoConteudo, CatalogoError> {
        if destino == self {
            return Ok(self);
        }
        match destino {
            TipoConteudo::HoldsItems if ocupacao.subcategorias > 0 => {
                Err(CatalogoError::ConflitoTipoConteudo(
                    "Não é possível mudar para 'holds_items' com subcategorias existentes.".into(),
                ))
            }
            TipoConteudo::HoldsCategories if ocupacao.itens > 0 => {
                Err(CatalogoError::ConflitoTipoConteudo(
                    "Não é possível mudar para 'holds_categories' com itens existentes.".into(),
                ))
            }
            TipoConteudo::Empty if ocupacao.subcategorias > 0 || ocupacao.itens > 0 => {
                Err(CatalogoError::ConflitoTipoConteudo(
                    "Não é possível mudar para 'empty' enquanto a categoria tiver conteúdo.".into(),
                ))
            }
            _ => Ok(destino),
        }
    }

    /// Uma categoria só recebe itens transferidos de outra se já for de itens.
    pub fn aceitar_transferencia_de_item(self) -> Result<(), CatalogoError> {
        if self == TipoConteudo::HoldsItems {
            Ok(())
        } else {
            Err(CatalogoError::ConflitoTipoConteudo(
                "A nova categoria do item precisa ter content_kind 'holds_items'.".into(),
            ))
        }
    }

    /// Verifica se o tipo declarado é compatível com o conteúdo real.
    pub fn consistente_com(self, ocupacao: Ocupacao) -> bool {
        match self {
            TipoConteudo::Empty => ocupacao.subcategorias == 0 && ocupacao.itens == 0,
            TipoConteudo::HoldsCategories => ocupacao.itens == 0,
            TipoConteudo::HoldsItems => ocupacao.subcategorias == 0,
        }
    }
}
