// src/arquivos/armazenamento.rs

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::shared::erros::CatalogoError;

/// Diretórios do servidor onde ficam as imagens dos itens e os contratos enviados.
#[derive(Debug, Clone)]
pub struct Armazenamento {
    imagens: PathBuf,
    contratos: PathBuf,
    imagem_padrao: Option<PathBuf>,
    arquivo_banco: Option<PathBuf>,
}

/// Aceita apenas identificadores simples, sem separadores de caminho.
fn validar_nome(nome: &str) -> Result<(), CatalogoError> {
    let valido = !nome.is_empty()
        && nome != "."
        && !nome.contains("..")
        && !nome.contains('/')
        && !nome.contains('\\');
    if valido {
        Ok(())
    } else {
        Err(CatalogoError::ArgumentoInvalido(format!(
            "Nome de arquivo inválido: '{}'.",
            nome
        )))
    }
}

fn ler_se_existir(caminho: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(caminho) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

impl Armazenamento {
    /// Cria (se preciso) `Imgs/` e `history/` dentro de `raiz`.
    pub fn preparar(
        raiz: &Path,
        imagem_padrao: Option<PathBuf>,
        arquivo_banco: Option<PathBuf>,
    ) -> io::Result<Self> {
        let imagens = raiz.join("Imgs");
        let contratos = raiz.join("history");
        fs::create_dir_all(&imagens)?;
        fs::create_dir_all(&contratos)?;

        Ok(Armazenamento {
            imagens,
            contratos,
            imagem_padrao,
            arquivo_banco,
        })
    }

    /// Grava a imagem com um identificador novo e devolve esse identificador.
    pub fn salvar_imagem(&self, bytes: &[u8]) -> io::Result<String> {
        let image_id = Uuid::new_v4().to_string();
        fs::write(self.imagens.join(format!("{}.jpg", image_id)), bytes)?;
        Ok(image_id)
    }

    /// Lê uma imagem por `<id>` ou `<id>.jpg`. Sem a imagem, usa a imagem padrão, se houver.
    pub fn ler_imagem(&self, image_id: &str) -> Result<Option<Vec<u8>>, CatalogoError> {
        validar_nome(image_id)?;
        let id = image_id.strip_suffix(".jpg").unwrap_or(image_id);

        if let Some(bytes) = ler_se_existir(&self.imagens.join(format!("{}.jpg", id)))? {
            return Ok(Some(bytes));
        }
        match &self.imagem_padrao {
            Some(padrao) => Ok(ler_se_existir(padrao)?),
            None => Ok(None),
        }
    }

    /// Nomes dos arquivos `.jpg` em `Imgs/`, em ordem alfabética.
    pub fn listar_imagens(&self) -> io::Result<Vec<String>> {
        let mut arquivos = Vec::new();
        for entrada in fs::read_dir(&self.imagens)? {
            let entrada = entrada?;
            if !entrada.file_type()?.is_file() {
                continue;
            }
            if let Some(nome) = entrada.file_name().to_str() {
                if nome.ends_with(".jpg") {
                    arquivos.push(nome.to_string());
                }
            }
        }
        arquivos.sort();
        Ok(arquivos)
    }

    /// Grava um contrato em `history/` usando só o último componente do nome.
    pub fn salvar_contrato(&self, nome: &str, bytes: &[u8]) -> Result<String, CatalogoError> {
        let nome_final = Path::new(nome)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                CatalogoError::ArgumentoInvalido(format!("Nome de contrato inválido: '{}'.", nome))
            })?;
        validar_nome(nome_final)?;

        fs::write(self.contratos.join(nome_final), bytes)?;
        Ok(nome_final.to_string())
    }

    /// Conteúdo do arquivo do banco. None para bancos em memória ou arquivo ausente.
    pub fn ler_banco(&self) -> io::Result<Option<Vec<u8>>> {
        match &self.arquivo_banco {
            Some(caminho) => ler_se_existir(caminho),
            None => Ok(None),
        }
    }

    /// SHA-256 em hexadecimal do arquivo do banco.
    pub fn hash_banco(&self) -> io::Result<Option<String>> {
        Ok(self
            .ler_banco()?
            .map(|bytes| hex::encode(Sha256::digest(&bytes))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armazenamento(raiz: &Path) -> Armazenamento {
        Armazenamento::preparar(raiz, None, None).unwrap()
    }

    #[test]
    fn imagem_salva_pode_ser_lida_com_ou_sem_extensao() {
        let dir = tempfile::tempdir().unwrap();
        let arm = armazenamento(dir.path());

        let id = arm.salvar_imagem(b"jpeg").unwrap();
        assert_eq!(arm.ler_imagem(&id).unwrap(), Some(b"jpeg".to_vec()));
        assert_eq!(
            arm.ler_imagem(&format!("{}.jpg", id)).unwrap(),
            Some(b"jpeg".to_vec())
        );
        assert_eq!(arm.listar_imagens().unwrap(), vec![format!("{}.jpg", id)]);
    }

    #[test]
    fn imagem_ausente_usa_a_padrao() {
        let dir = tempfile::tempdir().unwrap();
        let padrao = dir.path().join("default.jpg");
        fs::write(&padrao, b"padrao").unwrap();

        let sem_padrao = armazenamento(dir.path());
        assert_eq!(sem_padrao.ler_imagem("nao-existe").unwrap(), None);

        let com_padrao = Armazenamento::preparar(dir.path(), Some(padrao), None).unwrap();
        assert_eq!(
            com_padrao.ler_imagem("nao-existe").unwrap(),
            Some(b"padrao".to_vec())
        );
    }

    #[test]
    fn nomes_com_caminho_sao_rejeitados() {
        let dir = tempfile::tempdir().unwrap();
        let arm = armazenamento(dir.path());
        assert!(matches!(
            arm.ler_imagem("../back.db"),
            Err(CatalogoError::ArgumentoInvalido(_))
        ));
        assert!(matches!(
            arm.salvar_contrato("..", b"x"),
            Err(CatalogoError::ArgumentoInvalido(_))
        ));
    }

    #[test]
    fn contrato_fica_em_history_com_o_nome_final() {
        let dir = tempfile::tempdir().unwrap();
        let arm = armazenamento(dir.path());
        let nome = arm.salvar_contrato("pasta/contrato.xlsx", b"planilha").unwrap();
        assert_eq!(nome, "contrato.xlsx");
        assert_eq!(
            fs::read(dir.path().join("history").join("contrato.xlsx")).unwrap(),
            b"planilha"
        );
    }

    #[test]
    fn hash_do_banco_muda_com_o_conteudo() {
        let dir = tempfile::tempdir().unwrap();
        let banco = dir.path().join("back.db");
        fs::write(&banco, b"v1").unwrap();
        let arm = Armazenamento::preparar(dir.path(), None, Some(banco.clone())).unwrap();

        let h1 = arm.hash_banco().unwrap().unwrap();
        assert_eq!(h1.len(), 64);
        fs::write(&banco, b"v2").unwrap();
        assert_ne!(arm.hash_banco().unwrap().unwrap(), h1);

        assert_eq!(armazenamento(dir.path()).hash_banco().unwrap(), None);
    }
}
