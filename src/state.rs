/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier: 起動時に一度だけ生成した SessionVerifier (Firebase client)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::session::SessionVerifier;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn SessionVerifier>,
}

impl AppState {
    pub fn new(verifier: Arc<dyn SessionVerifier>) -> Self {
        Self { verifier }
    }
}
