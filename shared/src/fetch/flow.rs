use scraper::{Html, Selector};

use crate::error::{Error, Result};

/// The first table of the flow page, as scraped: header text and cell
/// text untouched, one `Vec<String>` per body row. Header text still
/// carries accents, mixed case and punctuation at this stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFlowTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct FlowPageClient {
    pub url: String,
}

impl FlowPageClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Fetches the page and parses its first `<table>`. The page layout
    /// is an external contract: if the relevant table stops being the
    /// first one, this returns the wrong data and schema validation
    /// downstream is the only guard.
    pub async fn first_table(&self) -> Result<RawFlowTable> {
        let client = reqwest::Client::new();
        let body = client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let table = parse_first_table(&body)?;
        tracing::debug!(url = %self.url, rows = table.rows.len(), "scraped flow table");
        Ok(table)
    }
}

pub fn parse_first_table(html: &str) -> Result<RawFlowTable> {
    let table_sel = Selector::parse("table").expect("invalid CSS selector for table");
    let row_sel = Selector::parse("tr").expect("invalid CSS selector for rows");
    let cell_sel = Selector::parse("th, td").expect("invalid CSS selector for cells");

    let doc = Html::parse_document(html);
    let table = doc.select(&table_sel).next().ok_or(Error::MissingTable)?;

    let mut rows_iter = table.select(&row_sel);
    let headers = match rows_iter.next() {
        Some(header_row) => header_row.select(&cell_sel).map(cell_text).collect(),
        None => return Err(Error::MissingTable),
    };

    let rows = rows_iter
        .map(|row| row.select(&cell_sel).map(cell_text).collect::<Vec<_>>())
        .filter(|cells: &Vec<String>| !cells.is_empty())
        .collect();

    Ok(RawFlowTable { headers, rows })
}

fn cell_text(cell: scraper::ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table>
          <tr><th>Data</th><th>Estrangeiro</th><th>Pessoa Física</th></tr>
          <tr><td>02/01/2025</td><td>R$ 1,2 bi</td><td>R$ -300 mi</td></tr>
          <tr><td>03/01/2025</td><td>R$ 800 mi</td><td>-</td></tr>
        </table>
        <table><tr><th>Outra</th></tr><tr><td>x</td></tr></table>
        </body></html>"#;

    #[test]
    fn test_first_table_only() {
        let table = parse_first_table(PAGE).unwrap();
        assert_eq!(table.headers, vec!["Data", "Estrangeiro", "Pessoa Física"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "R$ 1,2 bi");
        assert_eq!(table.rows[1][2], "-");
    }

    #[test]
    fn test_no_table_is_an_error() {
        let err = parse_first_table("<html><body><p>nada</p></body></html>").unwrap_err();
        assert!(matches!(err, Error::MissingTable));
    }
}
