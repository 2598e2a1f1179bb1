// src/main.rs

use actix_web::{middleware::Logger, web, App, HttpServer};

use catalogo::arquivos::armazenamento::Armazenamento;
use catalogo::shared::{banco, config::AppConfig};
use catalogo::{configurar_rotas, AppState};

// Função principal da aplicação Actix Web.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    // O diretório do arquivo do banco precisa existir antes da conexão
    if let Some(pasta) = config.arquivo_banco().as_deref().and_then(|p| p.parent()) {
        if !pasta.as_os_str().is_empty() {
            std::fs::create_dir_all(pasta)?;
        }
    }

    let db_pool = banco::conectar(&config.database_url)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    banco::inicializar_esquema(&db_pool)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let armazenamento = Armazenamento::preparar(
        &config.diretorio_servidor,
        config.imagem_padrao.clone(),
        config.arquivo_banco(),
    )?;

    // web::Data é usado para compartilhar o estado entre as rotas.
    let app_state = web::Data::new(AppState {
        db_pool,
        jwt_secret: config.jwt_secret.clone(),
        jwt_validade_horas: config.jwt_validade_horas,
        bcrypt_custo: config.bcrypt_custo,
        armazenamento,
    });

    log::info!("Iniciando API do catálogo em {}...", config.endereco);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            // .clone() é necessário porque a closure pode ser executada várias vezes.
            .app_data(app_state.clone())
            .configure(configurar_rotas)
    })
    .bind(&config.endereco)?
    .run()
    .await
}
