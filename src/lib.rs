// src/lib.rs

use actix_web::web;
use sqlx::SqlitePool;

// Importa os módulos
pub mod arquivos;   // Módulo de imagens, contratos e sincronização
pub mod catalogo;   // Regras da árvore de categorias e itens
pub mod categorias; // Módulo de categorias
pub mod itens;      // Módulo de itens
pub mod shared;     // Módulo shared
pub mod usuarios;   // Módulo de usuários e perfis

use arquivos::armazenamento::Armazenamento;
use shared::erros::CatalogoError;

/// Tamanho máximo dos uploads de imagens e contratos.
pub const LIMITE_UPLOAD: usize = 16 * 1024 * 1024;

// Estado compartilhado entre as rotas.
pub struct AppState {
    pub db_pool: SqlitePool,
    pub jwt_secret: String, // Chave secreta para JWT
    pub jwt_validade_horas: i64,
    pub bcrypt_custo: u32,
    pub armazenamento: Armazenamento,
}

/// Registra todas as rotas da API e a configuração dos extratores.
pub fn configurar_rotas(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(LIMITE_UPLOAD))
        // Corpos JSON e query strings malformados viram `invalid_argument`
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            CatalogoError::ArgumentoInvalido(format!("JSON inválido: {}", err)).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            CatalogoError::ArgumentoInvalido(format!("Parâmetros inválidos: {}", err)).into()
        }))
        .app_data(web::PathConfig::default().error_handler(|err, _req| {
            CatalogoError::ArgumentoInvalido(format!("Caminho inválido: {}", err)).into()
        }))
        // Módulo de Categorias
        .service(categorias::categoria_router::cadastrar_categoria)
        .service(categorias::categoria_router::buscar_categorias)
        .service(categorias::categoria_router::buscar_itens_da_subarvore)
        .service(categorias::categoria_router::buscar_categoria_por_id)
        .service(categorias::categoria_router::atualizar_categoria)
        .service(categorias::categoria_router::deletar_categoria)
        // Módulo de Itens (/items/search antes de /items/{id})
        .service(itens::item_router::cadastrar_item)
        .service(itens::item_router::pesquisar_itens)
        .service(itens::item_router::buscar_itens)
        .service(itens::item_router::buscar_item_por_id)
        .service(itens::item_router::atualizar_item)
        .service(itens::item_router::deletar_item)
        // Módulo de Usuários
        .service(usuarios::usuario_router::cadastrar_usuario)
        .service(usuarios::usuario_router::login_usuario)
        .service(usuarios::usuario_router::buscar_usuarios)
        .service(usuarios::usuario_router::buscar_usuario_por_id)
        .service(usuarios::usuario_router::atualizar_usuario)
        .service(usuarios::usuario_router::deletar_usuario)
        // Perfis
        .service(usuarios::perfil_router::cadastrar_perfil)
        .service(usuarios::perfil_router::buscar_perfis)
        .service(usuarios::perfil_router::buscar_perfil_por_id)
        .service(usuarios::perfil_router::atualizar_perfil)
        .service(usuarios::perfil_router::deletar_perfil)
        // Arquivos
        .service(arquivos::arquivo_router::enviar_imagem)
        .service(arquivos::arquivo_router::buscar_imagem)
        .service(arquivos::arquivo_router::baixar_imagem)
        .service(arquivos::arquivo_router::listar_imagens)
        .service(arquivos::arquivo_router::baixar_banco)
        .service(arquivos::arquivo_router::hash_banco)
        .service(arquivos::arquivo_router::enviar_contrato);
}
