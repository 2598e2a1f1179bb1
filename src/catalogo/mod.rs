// src/catalogo/mod.rs

// Tipo de conteúdo das categorias e a tabela de transições permitidas
pub mod tipo_conteudo;
// Criação, atualização e exclusão de categorias e itens, sempre passando pela guarda
pub mod motor_arvore;
// Resolução de todos os itens de uma subárvore de categorias
pub mod subarvore;
