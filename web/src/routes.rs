use std::sync::Arc;

use askama::Template;
use axum::extract::State;
use axum::response::Html;
use axum::Form;
use chrono::Utc;
use serde::Deserialize;
use shared::{build_merged_series, render_chart, Config, FlowPageClient, IndexClient};
use tracing::{info, warn};

use crate::error::AppError;
use crate::templates::{DashboardTemplate, EntryTemplate};

#[derive(Deserialize)]
pub struct LoginForm {
    pub senha: String,
}

pub async fn entry() -> Result<Html<String>, AppError> {
    render(EntryTemplate { failed: false })
}

pub async fn login(
    State(config): State<Arc<Config>>,
    Form(form): Form<LoginForm>,
) -> Result<Html<String>, AppError> {
    if form.senha == config.senha {
        render(DashboardTemplate {
            imagem: None,
            resumo: Vec::new(),
        })
    } else {
        warn!("rejected login attempt");
        render(EntryTemplate { failed: true })
    }
}

/// Runs both ingestion adapters and the full pipeline, sequentially,
/// from scratch. Nothing is cached between requests.
pub async fn generate_chart(
    State(config): State<Arc<Config>>,
) -> Result<Html<String>, AppError> {
    let start = config.window_start;
    let end = Utc::now().date_naive();

    let index = IndexClient::new(
        config.market_data_base_url.as_str(),
        config.index_symbol.as_str(),
    )
    .daily_series(start, end)
    .await?;
    let flow = FlowPageClient::new(config.flow_url.as_str())
        .first_table()
        .await?;

    let merged = build_merged_series(&flow, &index, start, end, config.date_policy)?;
    let imagem = render_chart(&merged, &config.chart)?;
    let resumo = merged.summary();

    info!(
        rows = merged.rows.len(),
        categories = merged.categories.len(),
        "chart generated"
    );

    render(DashboardTemplate {
        imagem: Some(imagem),
        resumo,
    })
}

fn render<T: Template>(template: T) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}
