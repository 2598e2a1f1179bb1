// src/arquivos/mod.rs

// Gravação e leitura de imagens, contratos e do arquivo do banco
pub mod armazenamento;
// Rotas de upload e download usadas na sincronização dos clientes
pub mod arquivo_router;
