// src/models/api.rs

use serde::{Deserialize, Serialize};

// Todas as listagens paginam de 20 em 20.
pub const PAGE_SIZE: i64 = 20;

/// Filtro de status das listagens: `all` só é aceito onde existe fluxo de
/// reativação (usuários); o padrão em todo o resto é só registros ativos.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    /// `None` significa "não filtrar por is_active".
    pub fn as_flag(self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Active => Some(true),
            StatusFilter::Inactive => Some(false),
        }
    }
}

/// Parâmetros de query comuns às listagens (`?search=&status=&page=`).
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<StatusFilter>,
    pub page: Option<i64>,
}

impl ListParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * PAGE_SIZE
    }

    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s))
    }
}

/// Envelope de resposta das listagens.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: i64) -> Self {
        Self {
            items,
            page,
            per_page: PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_maps_to_is_active_flag() {
        assert_eq!(StatusFilter::All.as_flag(), None);
        assert_eq!(StatusFilter::Active.as_flag(), Some(true));
        assert_eq!(StatusFilter::Inactive.as_flag(), Some(false));
    }

    #[test]
    fn page_defaults_to_first_and_never_underflows() {
        let params = ListParams { search: None, status: None, page: None };
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(), 0);

        let params = ListParams { search: None, status: None, page: Some(-3) };
        assert_eq!(params.page(), 1);

        let params = ListParams { search: None, status: None, page: Some(3) };
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn search_term_is_trimmed_and_wrapped() {
        let params = ListParams { search: Some("  maria ".into()), status: None, page: None };
        assert_eq!(params.search_term().as_deref(), Some("%maria%"));

        let params = ListParams { search: Some("   ".into()), status: None, page: None };
        assert_eq!(params.search_term(), None);
    }
}
