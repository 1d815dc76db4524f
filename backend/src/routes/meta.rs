use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api_client::PriceSeriesProvider;
use crate::i18n::{Language, Texts};
use crate::lookup::SymbolLookup;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TextsQuery {
    pub lang: Option<String>,
}

#[derive(Serialize)]
pub struct TextsResponse {
    pub language: Language,
    pub texts: Texts,
}

pub async fn get_symbols<P: PriceSeriesProvider>(State(state): State<AppState<P>>) -> Json<SymbolLookup> {
    Json(state.lookup.as_ref().clone())
}

pub async fn get_texts<P: PriceSeriesProvider>(
    State(state): State<AppState<P>>,
    Query(query): Query<TextsQuery>,
) -> Json<TextsResponse> {
    let (language, texts) = state.texts.for_code(query.lang.as_deref());
    Json(TextsResponse {
        language,
        texts: texts.clone(),
    })
}
