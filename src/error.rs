/*
 * Responsibility
 * - 起動時エラー (設定 / 認証情報 / bind / serve) の統一
 * - リクエスト処理中のエラーはここには来ない (すべて 401 に畳む)
 */
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::firebase::CredentialsError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to initialize firebase client: {0}")]
    Credentials(#[from] CredentialsError),
    #[error("server i/o error: {0}")]
    Io(#[from] std::io::Error),
}
