// src/shared/mod.rs

// Estruturas de resposta comuns a todas as rotas
pub mod shared_structs;
// Erros do domínio e sua conversão para respostas HTTP
pub mod erros;
// Configuração carregada do ambiente
pub mod config;
// Conexão com o SQLite e criação do esquema
pub mod banco;
