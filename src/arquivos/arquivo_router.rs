// src/arquivos/arquivo_router.rs

use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpResponse};
use futures::TryStreamExt;

use crate::shared::erros::CatalogoError;
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::{AppState, LIMITE_UPLOAD};

/// Arquivo recebido num campo de um formulário multipart.
struct ArquivoEnviado {
    nome: Option<String>,
    bytes: Vec<u8>,
}

/// Lê o primeiro campo `campo` do formulário. Os demais campos são descartados.
async fn ler_campo(mut payload: Multipart, campo: &str) -> Result<ArquivoEnviado, CatalogoError> {
    let mut encontrado: Option<ArquivoEnviado> = None;

    while let Some(mut parte) = payload.try_next().await? {
        let e_o_campo = encontrado.is_none() && parte.name() == campo;
        let nome = parte
            .content_disposition()
            .get_filename()
            .map(|n| n.to_string());

        let mut bytes = Vec::new();
        while let Some(pedaco) = parte.try_next().await? {
            if !e_o_campo {
                continue;
            }
            if bytes.len() + pedaco.len() > LIMITE_UPLOAD {
                return Err(CatalogoError::ArgumentoInvalido(format!(
                    "Arquivo excede o limite de {} bytes.",
                    LIMITE_UPLOAD
                )));
            }
            bytes.extend_from_slice(&pedaco);
        }

        if e_o_campo {
            encontrado = Some(ArquivoEnviado { nome, bytes });
        }
    }

    encontrado.ok_or_else(|| {
        CatalogoError::ArgumentoInvalido(format!("Campo '{}' ausente no formulário.", campo))
    })
}

/// Recebe a imagem no campo `image` de um formulário multipart e devolve o `image_id` gerado.
#[post("/upload_image")]
pub async fn enviar_imagem(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    payload: Multipart,
) -> Result<HttpResponse, CatalogoError> {
    let arquivo = ler_campo(payload, "image").await?;
    if arquivo.bytes.is_empty() {
        return Err(CatalogoError::ArgumentoInvalido("Imagem vazia.".into()));
    }
    let armazenamento = data.armazenamento.clone();
    let image_id = web::block(move || armazenamento.salvar_imagem(&arquivo.bytes)).await??;
    log::info!("Imagem {} recebida de {}", image_id, usuario);

    Ok(HttpResponse::Ok().json(serde_json::json!({ "image_id": image_id })))
}

async fn servir_imagem(data: &AppState, image_id: String) -> Result<HttpResponse, CatalogoError> {
    let armazenamento = data.armazenamento.clone();
    let nome = image_id.clone();
    let bytes = web::block(move || armazenamento.ler_imagem(&nome))
        .await??
        .ok_or_else(|| CatalogoError::NaoEncontrado(format!("Imagem '{}' não encontrada.", image_id)))?;

    Ok(HttpResponse::Ok().content_type("image/jpeg").body(bytes))
}

#[get("/imgs/{image_id}")]
pub async fn buscar_imagem(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, CatalogoError> {
    servir_imagem(&data, path.into_inner()).await
}

/// Mesmo conteúdo de /imgs, pelo nome do arquivo (`<id>.jpg`) listado em /list_imgs.
#[get("/download_img/{arquivo}")]
pub async fn baixar_imagem(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, CatalogoError> {
    servir_imagem(&data, path.into_inner()).await
}

#[get("/list_imgs")]
pub async fn listar_imagens(data: web::Data<AppState>) -> Result<HttpResponse, CatalogoError> {
    let armazenamento = data.armazenamento.clone();
    let files = web::block(move || armazenamento.listar_imagens()).await??;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "files": files })))
}

#[get("/download_db")]
pub async fn baixar_banco(data: web::Data<AppState>) -> Result<HttpResponse, CatalogoError> {
    let armazenamento = data.armazenamento.clone();
    let bytes = web::block(move || armazenamento.ler_banco())
        .await??
        .ok_or_else(|| CatalogoError::NaoEncontrado("Arquivo do banco não encontrado.".into()))?;

    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .insert_header(("Content-Disposition", "attachment; filename=\"back.db\""))
        .body(bytes))
}

/// Hash do arquivo do banco; os clientes comparam com o da cópia local.
#[get("/db_hash")]
pub async fn hash_banco(data: web::Data<AppState>) -> Result<HttpResponse, CatalogoError> {
    let armazenamento = data.armazenamento.clone();
    let hash = web::block(move || armazenamento.hash_banco())
        .await??
        .ok_or_else(|| CatalogoError::NaoEncontrado("Arquivo do banco não encontrado.".into()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "hash": hash })))
}

/// Recebe um contrato no campo `file` de um formulário multipart e guarda em `history/`
/// com o nome informado no próprio campo.
#[post("/upload_contract")]
pub async fn enviar_contrato(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    payload: Multipart,
) -> Result<HttpResponse, CatalogoError> {
    let arquivo = ler_campo(payload, "file").await?;
    let nome = arquivo.nome.ok_or_else(|| {
        CatalogoError::ArgumentoInvalido("Contrato enviado sem nome de arquivo.".into())
    })?;
    let bytes = arquivo.bytes;
    let armazenamento = data.armazenamento.clone();
    let salvo = web::block(move || armazenamento.salvar_contrato(&nome, &bytes)).await??;
    log::info!("Contrato {} enviado por {}", salvo, usuario);

    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "success", "filename": salvo })))
}
