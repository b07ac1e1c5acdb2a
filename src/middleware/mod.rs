/*
 * Responsibility
 * - middleware の公開インターフェース
 * - cors::apply(...), http::apply(...), content_type::require_json_content_type
 */
pub mod content_type;
pub mod cors;
pub mod http;
