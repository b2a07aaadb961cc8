use askama::Template;

/// Entry page: the password form, optionally with the wrong-password
/// indicator after a failed attempt.
#[derive(Template)]
#[template(path = "entry.html.jinja")]
pub struct EntryTemplate {
    pub failed: bool,
}

/// Gated dashboard: generate button, and after generation the embedded
/// chart plus the category summary in canonical order.
#[derive(Template)]
#[template(path = "dashboard.html.jinja")]
pub struct DashboardTemplate {
    /// Base64 PNG, present after a generation run.
    pub imagem: Option<String>,
    /// (label, latest cumulative value in R$ billions).
    pub resumo: Vec<(&'static str, f64)>,
}

#[derive(Template)]
#[template(path = "error.html.jinja")]
pub struct ErrorTemplate {
    pub message: String,
}
