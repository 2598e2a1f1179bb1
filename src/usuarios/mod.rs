// src/usuarios/mod.rs

// Declara o submódulo que contém as definições das structs de usuários e perfis
pub mod usuario_structs;
// Declara o submódulo que contém as funções de rota relacionadas a usuários
pub mod usuario_router;
// Rotas de perfis (roles) dos usuários
pub mod perfil_router;
// Extrator de autenticação e emissão de tokens JWT
pub mod auth_middleware;
