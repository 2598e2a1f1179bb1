// src/shared/banco.rs

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Comandos de criação do esquema. Executados um a um na inicialização.
const ESQUEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS roles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        full_name TEXT NOT NULL,
        role_id INTEGER NOT NULL REFERENCES roles(id)
    )",
    "CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        parameter TEXT,
        unit TEXT NOT NULL,
        tab INTEGER NOT NULL DEFAULT 0,
        parent_id INTEGER REFERENCES categories(id),
        content_kind TEXT NOT NULL DEFAULT 'empty'
    )",
    "CREATE INDEX IF NOT EXISTS idx_categories_parent ON categories(parent_id)",
    "CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        category_id INTEGER NOT NULL REFERENCES categories(id),
        parameter_value TEXT NOT NULL,
        unit TEXT NOT NULL,
        cost_price INTEGER NOT NULL,
        selling_price INTEGER NOT NULL,
        mic INTEGER NOT NULL DEFAULT 0,
        image_id TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_items_category ON items(category_id)",
    "INSERT OR IGNORE INTO roles (name) VALUES ('admin'), ('agente')",
];

/// Abre o pool de conexões para a URL informada.
///
/// Bancos em memória usam uma única conexão que nunca expira; caso contrário
/// cada nova conexão enxergaria um banco vazio.
pub async fn conectar(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let opcoes = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opcoes)
            .await
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opcoes)
            .await
    }
}

/// Cria as tabelas que ainda não existem e os perfis padrão.
pub async fn inicializar_esquema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for comando in ESQUEMA {
        sqlx::query(comando).execute(pool).await?;
    }
    log::info!("Esquema do banco verificado");
    Ok(())
}

/// Pool em memória já com o esquema criado.
pub async fn banco_em_memoria() -> Result<SqlitePool, sqlx::Error> {
    let pool = conectar("sqlite::memory:").await?;
    inicializar_esquema(&pool).await?;
    Ok(pool)
}
