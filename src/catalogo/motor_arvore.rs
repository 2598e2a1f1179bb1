// src/catalogo/motor_arvore.rs

//! Escritas na árvore de categorias e itens.
//!
//! Cada operação roda numa transação própria: lê o estado atual, consulta a
//! guarda de `tipo_conteudo` e só então grava. Qualquer erro propagado com `?`
//! descarta a transação, então uma operação rejeitada não altera nada.

use sqlx::{query, query_as, query_scalar, SqliteConnection, SqlitePool};

use super::tipo_conteudo::{Anexo, Ocupacao, TipoConteudo};
use crate::categorias::categoria_structs::{AtualizacaoCategoria, Categoria, NovaCategoria};
use crate::itens::item_structs::{AtualizacaoItem, Item, NovoItem};
use crate::shared::erros::CatalogoError;

const COLUNAS_CATEGORIA: &str = "id, name, parameter, unit, tab, parent_id, content_kind";
const COLUNAS_ITEM: &str =
    "id, name, category_id, parameter_value, unit, cost_price, selling_price, mic, image_id";

fn validar_tab(tab: i64) -> Result<(), CatalogoError> {
    if tab < 0 {
        return Err(CatalogoError::ArgumentoInvalido(
            "tab deve ser um número não negativo.".into(),
        ));
    }
    Ok(())
}

fn validar_mic(mic: i64) -> Result<(), CatalogoError> {
    if mic != 0 && mic != 1 {
        return Err(CatalogoError::ArgumentoInvalido("mic deve ser 0 ou 1.".into()));
    }
    Ok(())
}

fn validar_preco(campo: &str, valor: i64) -> Result<(), CatalogoError> {
    if valor < 0 {
        return Err(CatalogoError::ArgumentoInvalido(format!(
            "{} não pode ser negativo.",
            campo
        )));
    }
    Ok(())
}

/// Busca uma categoria pelo ID.
pub async fn buscar_categoria(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Categoria>, sqlx::Error> {
    query_as::<_, Categoria>(&format!(
        "SELECT {} FROM categories WHERE id = ?",
        COLUNAS_CATEGORIA
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}

/// Busca um item pelo ID.
pub async fn buscar_item(conn: &mut SqliteConnection, id: i64) -> Result<Option<Item>, sqlx::Error> {
    query_as::<_, Item>(&format!("SELECT {} FROM items WHERE id = ?", COLUNAS_ITEM))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// Conta subcategorias diretas e itens diretos de uma categoria.
pub async fn ocupacao(conn: &mut SqliteConnection, categoria_id: i64) -> Result<Ocupacao, sqlx::Error> {
    let subcategorias: i64 = query_scalar("SELECT COUNT(*) FROM categories WHERE parent_id = ?")
        .bind(categoria_id)
        .fetch_one(&mut *conn)
        .await?;
    let itens: i64 = query_scalar("SELECT COUNT(*) FROM items WHERE category_id = ?")
        .bind(categoria_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(Ocupacao { subcategorias, itens })
}

async fn gravar_tipo(
    conn: &mut SqliteConnection,
    categoria_id: i64,
    tipo: TipoConteudo,
) -> Result<(), sqlx::Error> {
    query("UPDATE categories SET content_kind = ? WHERE id = ?")
        .bind(tipo)
        .bind(categoria_id)
        .execute(&mut *conn)
        .await?;
    log::info!("Categoria {} promovida para {:?}", categoria_id, tipo);
    Ok(())
}

/// Lê a categoria e o seu conteúdo e pede à guarda o tipo resultante do anexo.
/// Devolve `Some(tipo)` quando a categoria precisa ser promovida.
async fn preparar_anexo(
    conn: &mut SqliteConnection,
    categoria: &Categoria,
    anexo: Anexo,
) -> Result<Option<TipoConteudo>, CatalogoError> {
    let ocupacao = ocupacao(conn, categoria.id).await?;
    let novo_tipo = categoria.content_kind.anexar(anexo, ocupacao)?;
    Ok((novo_tipo != categoria.content_kind).then_some(novo_tipo))
}

/// Cria uma categoria, opcionalmente sob uma categoria pai.
///
/// A nova categoria nasce `Empty`. Um pai ainda vazio passa a `HoldsCategories`.
pub async fn criar_categoria(
    pool: &SqlitePool,
    nova: &NovaCategoria,
) -> Result<Categoria, CatalogoError> {
    validar_tab(nova.tab)?;

    let mut transaction = pool.begin().await?;

    let mut promocao = None;
    if let Some(parent_id) = nova.parent_id {
        let pai = buscar_categoria(&mut transaction, parent_id)
            .await?
            .ok_or_else(|| {
                CatalogoError::NaoEncontrado(format!(
                    "Categoria pai com ID {} não encontrada.",
                    parent_id
                ))
            })?;
        promocao = preparar_anexo(&mut transaction, &pai, Anexo::Subcategoria)
            .await?
            .map(|tipo| (parent_id, tipo));
    }

    let id = query(
        "INSERT INTO categories (name, parameter, unit, tab, parent_id, content_kind) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&nova.name)
    .bind(&nova.parameter)
    .bind(&nova.unit)
    .bind(nova.tab)
    .bind(nova.parent_id)
    .bind(TipoConteudo::Empty)
    .execute(&mut *transaction)
    .await?
    .last_insert_rowid();

    if let Some((parent_id, tipo)) = promocao {
        gravar_tipo(&mut transaction, parent_id, tipo).await?;
    }

    let criada = buscar_categoria(&mut transaction, id)
        .await?
        .ok_or_else(|| CatalogoError::Interno("categoria recém-criada não encontrada".into()))?;

    transaction.commit().await?;
    Ok(criada)
}

/// Cria um item numa categoria. Uma categoria ainda vazia passa a `HoldsItems`.
pub async fn criar_item(pool: &SqlitePool, novo: &NovoItem) -> Result<Item, CatalogoError> {
    validar_mic(novo.mic)?;
    validar_preco("cost_price", novo.cost_price)?;
    validar_preco("selling_price", novo.selling_price)?;

    let mut transaction = pool.begin().await?;

    let categoria = buscar_categoria(&mut transaction, novo.category_id)
        .await?
        .ok_or_else(|| {
            CatalogoError::NaoEncontrado(format!(
                "Categoria com ID {} não encontrada.",
                novo.category_id
            ))
        })?;
    let promocao = preparar_anexo(&mut transaction, &categoria, Anexo::Item).await?;

    let id = query(
        "INSERT INTO items (name, category_id, parameter_value, unit, cost_price, selling_price, mic, image_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&novo.name)
    .bind(novo.category_id)
    .bind(&novo.parameter_value)
    .bind(&novo.unit)
    .bind(novo.cost_price)
    .bind(novo.selling_price)
    .bind(novo.mic)
    .bind(&novo.image_id)
    .execute(&mut *transaction)
    .await?
    .last_insert_rowid();

    if let Some(tipo) = promocao {
        gravar_tipo(&mut transaction, categoria.id, tipo).await?;
    }

    let criado = buscar_item(&mut transaction, id)
        .await?
        .ok_or_else(|| CatalogoError::Interno("item recém-criado não encontrado".into()))?;

    transaction.commit().await?;
    Ok(criado)
}

/// Aplica um patch numa categoria.
///
/// Um novo nome não pode repetir o de outra categoria com o mesmo pai, e uma
/// troca explícita de `content_kind` passa pela guarda de transições.
pub async fn atualizar_categoria(
    pool: &SqlitePool,
    id: i64,
    patch: &AtualizacaoCategoria,
) -> Result<Categoria, CatalogoError> {
    if let Some(tab) = patch.tab {
        validar_tab(tab)?;
    }

    let mut transaction = pool.begin().await?;

    let mut categoria = buscar_categoria(&mut transaction, id)
        .await?
        .ok_or_else(|| CatalogoError::NaoEncontrado(format!("Categoria com ID {} não encontrada.", id)))?;

    if let Some(nome) = &patch.name {
        // `IS` compara NULL com NULL, necessário para categorias raiz
        let repetida: Option<i64> = query_scalar(
            "SELECT id FROM categories WHERE name = ? AND parent_id IS ? AND id != ? LIMIT 1",
        )
        .bind(nome)
        .bind(categoria.parent_id)
        .bind(id)
        .fetch_optional(&mut *transaction)
        .await?;
        if repetida.is_some() {
            return Err(CatalogoError::NomeDuplicado(format!(
                "Já existe uma categoria chamada '{}' neste nível.",
                nome
            )));
        }
        categoria.name = nome.clone();
    }

    if let Some(destino) = patch.content_kind {
        let ocupacao = ocupacao(&mut transaction, id).await?;
        categoria.content_kind = categoria.content_kind.transicionar(destino, ocupacao)?;
    }
    if let Some(parameter) = &patch.parameter {
        categoria.parameter = parameter.clone();
    }
    if let Some(unit) = &patch.unit {
        categoria.unit = unit.clone();
    }
    if let Some(tab) = patch.tab {
        categoria.tab = tab;
    }

    query(
        "UPDATE categories SET name = ?, parameter = ?, unit = ?, tab = ?, content_kind = ? \
         WHERE id = ?",
    )
    .bind(&categoria.name)
    .bind(&categoria.parameter)
    .bind(&categoria.unit)
    .bind(categoria.tab)
    .bind(categoria.content_kind)
    .bind(id)
    .execute(&mut *transaction)
    .await?;

    transaction.commit().await?;
    Ok(categoria)
}

/// Aplica um patch num item. Mover o item exige categoria de destino `HoldsItems`.
pub async fn atualizar_item(
    pool: &SqlitePool,
    id: i64,
    patch: &AtualizacaoItem,
) -> Result<Item, CatalogoError> {
    if let Some(mic) = patch.mic {
        validar_mic(mic)?;
    }
    if let Some(preco) = patch.cost_price {
        validar_preco("cost_price", preco)?;
    }
    if let Some(preco) = patch.selling_price {
        validar_preco("selling_price", preco)?;
    }

    let mut transaction = pool.begin().await?;

    let mut item = buscar_item(&mut transaction, id)
        .await?
        .ok_or_else(|| CatalogoError::NaoEncontrado(format!("Item com ID {} não encontrado.", id)))?;

    if let Some(category_id) = patch.category_id {
        let destino = buscar_categoria(&mut transaction, category_id)
            .await?
            .ok_or_else(|| {
                CatalogoError::NaoEncontrado(format!(
                    "Nova categoria com ID {} não encontrada.",
                    category_id
                ))
            })?;
        destino.content_kind.aceitar_transferencia_de_item()?;
        item.category_id = category_id;
    }

    if let Some(name) = &patch.name {
        item.name = name.clone();
    }
    if let Some(parameter_value) = &patch.parameter_value {
        item.parameter_value = parameter_value.clone();
    }
    if let Some(unit) = &patch.unit {
        item.unit = unit.clone();
    }
    if let Some(preco) = patch.cost_price {
        item.cost_price = preco;
    }
    if let Some(preco) = patch.selling_price {
        item.selling_price = preco;
    }
    if let Some(mic) = patch.mic {
        item.mic = mic;
    }
    if let Some(image_id) = &patch.image_id {
        item.image_id = Some(image_id.clone());
    }

    query(
        "UPDATE items SET name = ?, category_id = ?, parameter_value = ?, unit = ?, \
         cost_price = ?, selling_price = ?, mic = ?, image_id = ? WHERE id = ?",
    )
    .bind(&item.name)
    .bind(item.category_id)
    .bind(&item.parameter_value)
    .bind(&item.unit)
    .bind(item.cost_price)
    .bind(item.selling_price)
    .bind(item.mic)
    .bind(&item.image_id)
    .bind(id)
    .execute(&mut *transaction)
    .await?;

    transaction.commit().await?;
    Ok(item)
}

/// Exclui uma categoria com toda a sua subárvore: subcategorias de qualquer
/// profundidade e os itens de cada uma delas.
///
/// Devolve quantas categorias e quantos itens foram removidos.
pub async fn deletar_categoria(pool: &SqlitePool, id: i64) -> Result<(u64, u64), CatalogoError> {
    let mut transaction = pool.begin().await?;

    if buscar_categoria(&mut transaction, id).await?.is_none() {
        return Err(CatalogoError::NaoEncontrado(format!(
            "Categoria com ID {} não encontrada para exclusão.",
            id
        )));
    }

    let itens = query(&format!(
        "{} DELETE FROM items WHERE category_id IN (SELECT id FROM subarvore)",
        super::subarvore::CTE_SUBARVORE
    ))
    .bind(id)
    .execute(&mut *transaction)
    .await?
    .rows_affected();

    let categorias = query(&format!(
        "{} DELETE FROM categories WHERE id IN (SELECT id FROM subarvore)",
        super::subarvore::CTE_SUBARVORE
    ))
    .bind(id)
    .execute(&mut *transaction)
    .await?
    .rows_affected();

    transaction.commit().await?;
    log::info!(
        "Categoria {} excluída: {} categorias e {} itens removidos",
        id,
        categorias,
        itens
    );
    Ok((categorias, itens))
}

pub async fn deletar_item(pool: &SqlitePool, id: i64) -> Result<(), CatalogoError> {
    let resultado = query("DELETE FROM items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if resultado.rows_affected() == 0 {
        return Err(CatalogoError::NaoEncontrado(format!(
            "Item com ID {} não encontrado para exclusão.",
            id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::banco::banco_em_memoria;

    fn nova_categoria(nome: &str, parent_id: Option<i64>) -> NovaCategoria {
        NovaCategoria {
            name: nome.to_string(),
            unit: "un".to_string(),
            tab: 0,
            parameter: Some("Cor".to_string()),
            parent_id,
        }
    }

    fn novo_item(nome: &str, category_id: i64) -> NovoItem {
        NovoItem {
            name: nome.to_string(),
            category_id,
            parameter_value: "Azul".to_string(),
            unit: "un".to_string(),
            cost_price: 1000,
            selling_price: 1500,
            mic: 0,
            image_id: None,
        }
    }

    async fn tipo_de(pool: &SqlitePool, id: i64) -> TipoConteudo {
        let mut conn = pool.acquire().await.unwrap();
        buscar_categoria(&mut conn, id).await.unwrap().unwrap().content_kind
    }

    /// Confere o invariante de tipo de conteúdo em todas as categorias.
    async fn assert_arvore_consistente(pool: &SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let categorias = query_as::<_, Categoria>(&format!(
            "SELECT {} FROM categories",
            COLUNAS_CATEGORIA
        ))
        .fetch_all(&mut *conn)
        .await
        .unwrap();
        for categoria in categorias {
            let ocupacao = ocupacao(&mut conn, categoria.id).await.unwrap();
            assert!(
                categoria.content_kind.consistente_com(ocupacao),
                "categoria {} inconsistente: {:?} com {:?}",
                categoria.id,
                categoria.content_kind,
                ocupacao
            );
        }
    }

    #[actix_web::test]
    async fn cenario_completo_de_promocoes() {
        let pool = banco_em_memoria().await.unwrap();

        let a = criar_categoria(&pool, &nova_categoria("A", None)).await.unwrap();
        assert_eq!(a.content_kind, TipoConteudo::Empty);

        let b = criar_categoria(&pool, &nova_categoria("B", Some(a.id))).await.unwrap();
        assert_eq!(tipo_de(&pool, a.id).await, TipoConteudo::HoldsCategories);
        assert_eq!(b.content_kind, TipoConteudo::Empty);

        let erro = criar_item(&pool, &novo_item("X", a.id)).await.unwrap_err();
        assert!(matches!(erro, CatalogoError::ConflitoTipoConteudo(_)));

        criar_item(&pool, &novo_item("Y", b.id)).await.unwrap();
        assert_eq!(tipo_de(&pool, b.id).await, TipoConteudo::HoldsItems);

        assert_arvore_consistente(&pool).await;
    }

    #[actix_web::test]
    async fn segundo_filho_so_insere() {
        let pool = banco_em_memoria().await.unwrap();
        let a = criar_categoria(&pool, &nova_categoria("A", None)).await.unwrap();
        criar_categoria(&pool, &nova_categoria("B", Some(a.id))).await.unwrap();
        criar_categoria(&pool, &nova_categoria("C", Some(a.id))).await.unwrap();

        assert_eq!(tipo_de(&pool, a.id).await, TipoConteudo::HoldsCategories);
        let mut conn = pool.acquire().await.unwrap();
        assert_eq!(ocupacao(&mut conn, a.id).await.unwrap().subcategorias, 2);
    }

    #[actix_web::test]
    async fn subcategoria_em_categoria_de_itens_e_rejeitada() {
        let pool = banco_em_memoria().await.unwrap();
        let a = criar_categoria(&pool, &nova_categoria("A", None)).await.unwrap();
        criar_item(&pool, &novo_item("X", a.id)).await.unwrap();

        let erro = criar_categoria(&pool, &nova_categoria("B", Some(a.id)))
            .await
            .unwrap_err();
        assert!(matches!(erro, CatalogoError::ConflitoTipoConteudo(_)));

        let total: i64 = query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(total, 1);
    }

    #[actix_web::test]
    async fn estado_vazio_desatualizado_e_rejeitado_sem_efeito() {
        let pool = banco_em_memoria().await.unwrap();
        let a = criar_categoria(&pool, &nova_categoria("A", None)).await.unwrap();
        criar_item(&pool, &novo_item("X", a.id)).await.unwrap();
        // Simula outra sessão que deixou a categoria marcada como vazia
        query("UPDATE categories SET content_kind = 'empty' WHERE id = ?")
            .bind(a.id)
            .execute(&pool)
            .await
            .unwrap();

        let erro = criar_categoria(&pool, &nova_categoria("B", Some(a.id)))
            .await
            .unwrap_err();
        assert!(matches!(erro, CatalogoError::ConflitoTipoConteudo(_)));
        assert_eq!(tipo_de(&pool, a.id).await, TipoConteudo::Empty);
    }

    #[actix_web::test]
    async fn item_em_vazia_com_subcategorias_e_rejeitado_sem_efeito() {
        let pool = banco_em_memoria().await.unwrap();
        let a = criar_categoria(&pool, &nova_categoria("A", None)).await.unwrap();
        criar_categoria(&pool, &nova_categoria("B", Some(a.id))).await.unwrap();
        query("UPDATE categories SET content_kind = 'empty' WHERE id = ?")
            .bind(a.id)
            .execute(&pool)
            .await
            .unwrap();

        let erro = criar_item(&pool, &novo_item("X", a.id)).await.unwrap_err();
        assert!(matches!(erro, CatalogoError::ConflitoTipoConteudo(_)));
        assert_eq!(tipo_de(&pool, a.id).await, TipoConteudo::Empty);

        let total: i64 = query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(total, 0);
    }

    #[actix_web::test]
    async fn pai_inexistente_e_nao_encontrado() {
        let pool = banco_em_memoria().await.unwrap();
        let erro = criar_categoria(&pool, &nova_categoria("B", Some(99)))
            .await
            .unwrap_err();
        assert!(matches!(erro, CatalogoError::NaoEncontrado(_)));

        let erro = criar_item(&pool, &novo_item("X", 99)).await.unwrap_err();
        assert!(matches!(erro, CatalogoError::NaoEncontrado(_)));
    }

    #[actix_web::test]
    async fn argumentos_invalidos_sao_rejeitados() {
        let pool = banco_em_memoria().await.unwrap();
        let mut categoria = nova_categoria("A", None);
        categoria.tab = -1;
        assert!(matches!(
            criar_categoria(&pool, &categoria).await.unwrap_err(),
            CatalogoError::ArgumentoInvalido(_)
        ));

        let a = criar_categoria(&pool, &nova_categoria("A", None)).await.unwrap();
        let mut item = novo_item("X", a.id);
        item.mic = 2;
        assert!(matches!(
            criar_item(&pool, &item).await.unwrap_err(),
            CatalogoError::ArgumentoInvalido(_)
        ));
        let mut item = novo_item("X", a.id);
        item.selling_price = -5;
        assert!(matches!(
            criar_item(&pool, &item).await.unwrap_err(),
            CatalogoError::ArgumentoInvalido(_)
        ));

        // Nada foi gravado e a categoria continua vazia
        assert_eq!(tipo_de(&pool, a.id).await, TipoConteudo::Empty);
    }

    #[actix_web::test]
    async fn troca_de_tipo_incompativel_nao_altera_nada() {
        let pool = banco_em_memoria().await.unwrap();
        let b = criar_categoria(&pool, &nova_categoria("B", None)).await.unwrap();
        criar_item(&pool, &novo_item("X", b.id)).await.unwrap();

        let patch = AtualizacaoCategoria {
            name: Some("B renomeada".to_string()),
            content_kind: Some(TipoConteudo::HoldsCategories),
            ..Default::default()
        };
        let erro = atualizar_categoria(&pool, b.id, &patch).await.unwrap_err();
        assert!(matches!(erro, CatalogoError::ConflitoTipoConteudo(_)));

        let mut conn = pool.acquire().await.unwrap();
        let atual = buscar_categoria(&mut conn, b.id).await.unwrap().unwrap();
        assert_eq!(atual.content_kind, TipoConteudo::HoldsItems);
        assert_eq!(atual.name, "B");
    }

    #[actix_web::test]
    async fn reset_explicito_para_vazio_apos_remover_conteudo() {
        let pool = banco_em_memoria().await.unwrap();
        let a = criar_categoria(&pool, &nova_categoria("A", None)).await.unwrap();
        let x = criar_item(&pool, &novo_item("X", a.id)).await.unwrap();

        let para_vazio = AtualizacaoCategoria {
            content_kind: Some(TipoConteudo::Empty),
            ..Default::default()
        };
        assert!(atualizar_categoria(&pool, a.id, &para_vazio).await.is_err());

        deletar_item(&pool, x.id).await.unwrap();
        // Remover o último item não rebaixa o tipo sozinho
        assert_eq!(tipo_de(&pool, a.id).await, TipoConteudo::HoldsItems);

        let atualizada = atualizar_categoria(&pool, a.id, &para_vazio).await.unwrap();
        assert_eq!(atualizada.content_kind, TipoConteudo::Empty);
    }

    #[actix_web::test]
    async fn parametro_pode_ser_apagado_ou_mantido() {
        let pool = banco_em_memoria().await.unwrap();
        let a = criar_categoria(&pool, &nova_categoria("A", None)).await.unwrap();
        assert_eq!(a.parameter.as_deref(), Some("Cor"));

        let so_nome = AtualizacaoCategoria {
            name: Some("A2".to_string()),
            ..Default::default()
        };
        let mantida = atualizar_categoria(&pool, a.id, &so_nome).await.unwrap();
        assert_eq!(mantida.parameter.as_deref(), Some("Cor"));

        let apagar = AtualizacaoCategoria {
            parameter: Some(None),
            ..Default::default()
        };
        let apagada = atualizar_categoria(&pool, a.id, &apagar).await.unwrap();
        assert_eq!(apagada.parameter, None);
        assert_eq!(apagada.name, "A2");
    }

    #[actix_web::test]
    async fn nome_duplicado_no_mesmo_pai() {
        let pool = banco_em_memoria().await.unwrap();
        let a = criar_categoria(&pool, &nova_categoria("A", None)).await.unwrap();
        let b = criar_categoria(&pool, &nova_categoria("B", None)).await.unwrap();
        let filho = criar_categoria(&pool, &nova_categoria("Filho", Some(a.id))).await.unwrap();

        let patch = AtualizacaoCategoria {
            name: Some("A".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            atualizar_categoria(&pool, b.id, &patch).await.unwrap_err(),
            CatalogoError::NomeDuplicado(_)
        ));

        // Mesmo nome sob outro pai é permitido
        let atualizado = atualizar_categoria(&pool, filho.id, &patch).await.unwrap();
        assert_eq!(atualizado.name, "A");

        // Manter o próprio nome também
        let mesmo = AtualizacaoCategoria {
            name: Some("B".to_string()),
            tab: Some(1),
            ..Default::default()
        };
        let b = atualizar_categoria(&pool, b.id, &mesmo).await.unwrap();
        assert_eq!(b.tab, 1);
    }

    #[actix_web::test]
    async fn mover_item_exige_categoria_de_itens() {
        let pool = banco_em_memoria().await.unwrap();
        let origem = criar_categoria(&pool, &nova_categoria("Origem", None)).await.unwrap();
        let vazia = criar_categoria(&pool, &nova_categoria("Vazia", None)).await.unwrap();
        let destino = criar_categoria(&pool, &nova_categoria("Destino", None)).await.unwrap();
        let item = criar_item(&pool, &novo_item("X", origem.id)).await.unwrap();
        criar_item(&pool, &novo_item("Y", destino.id)).await.unwrap();

        let para = |category_id| AtualizacaoItem {
            category_id: Some(category_id),
            ..Default::default()
        };
        assert!(matches!(
            atualizar_item(&pool, item.id, &para(vazia.id)).await.unwrap_err(),
            CatalogoError::ConflitoTipoConteudo(_)
        ));
        assert!(matches!(
            atualizar_item(&pool, item.id, &para(404)).await.unwrap_err(),
            CatalogoError::NaoEncontrado(_)
        ));

        let movido = atualizar_item(&pool, item.id, &para(destino.id)).await.unwrap();
        assert_eq!(movido.category_id, destino.id);

        let mic_invalido = AtualizacaoItem {
            mic: Some(3),
            ..Default::default()
        };
        assert!(matches!(
            atualizar_item(&pool, item.id, &mic_invalido).await.unwrap_err(),
            CatalogoError::ArgumentoInvalido(_)
        ));
        assert_arvore_consistente(&pool).await;
    }

    #[actix_web::test]
    async fn exclusao_remove_a_subarvore_inteira() {
        let pool = banco_em_memoria().await.unwrap();
        let a = criar_categoria(&pool, &nova_categoria("A", None)).await.unwrap();
        let b = criar_categoria(&pool, &nova_categoria("B", Some(a.id))).await.unwrap();
        let c = criar_categoria(&pool, &nova_categoria("C", Some(b.id))).await.unwrap();
        let d = criar_categoria(&pool, &nova_categoria("D", Some(a.id))).await.unwrap();
        criar_item(&pool, &novo_item("X", c.id)).await.unwrap();
        criar_item(&pool, &novo_item("Y", d.id)).await.unwrap();
        let outra = criar_categoria(&pool, &nova_categoria("Outra", None)).await.unwrap();
        criar_item(&pool, &novo_item("Z", outra.id)).await.unwrap();

        let (categorias, itens) = deletar_categoria(&pool, a.id).await.unwrap();
        assert_eq!((categorias, itens), (4, 2));

        let restantes: Vec<String> = query_scalar("SELECT name FROM categories")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(restantes, vec!["Outra".to_string()]);
        let itens: Vec<String> = query_scalar("SELECT name FROM items")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(itens, vec!["Z".to_string()]);

        assert!(matches!(
            deletar_categoria(&pool, a.id).await.unwrap_err(),
            CatalogoError::NaoEncontrado(_)
        ));
        assert!(matches!(
            deletar_item(&pool, 12345).await.unwrap_err(),
            CatalogoError::NaoEncontrado(_)
        ));
    }
}
