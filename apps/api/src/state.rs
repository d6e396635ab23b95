use std::sync::Arc;

use crate::auth::AuthService;
use crate::extraction::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    /// Pluggable document parser. Default: DocumentExtractor (PDF + DOCX).
    pub extractor: Arc<dyn TextExtractor>,
}
