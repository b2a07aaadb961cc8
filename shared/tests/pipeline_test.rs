use chrono::NaiveDate;
use shared::fetch::flow::parse_first_table;
use shared::fetch::IndexPoint;
use shared::pipeline::build_merged_series;
use shared::DatePolicy;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// Scrape -> normalize -> window -> parse -> cumsum -> join -> ffill,
// over a page shaped like the real flow page.
#[test]
fn test_scrape_to_merged_series() {
    let page = r#"
        <html><body>
        <h1>Fluxo de investidores</h1>
        <table>
          <tr>
            <th>Data</th><th>Estrangeiro</th><th>Institucional</th>
            <th>Pessoa Física</th><th>Inst. Financeira</th><th>Outros</th>
          </tr>
          <tr>
            <td>02/01/2025</td><td>R$ 1 bi</td><td>R$ -250 mi</td>
            <td>R$ 150 mi</td><td>-</td><td>R$ 0,05 bi</td>
          </tr>
          <tr>
            <td>03/01/2025</td><td>R$ -0,5 bi</td><td>R$ 500 mi</td>
            <td>-</td><td>R$ 100 mi</td><td>-</td>
          </tr>
          <tr>
            <td>06/01/2025</td><td>R$ 2 bi</td><td>-</td>
            <td>R$ -50 mi</td><td>-</td><td>-</td>
          </tr>
        </table>
        </body></html>"#;

    let table = parse_first_table(page).unwrap();
    let index = vec![
        IndexPoint { date: date(2025, 1, 2), close: 120_000.0 },
        IndexPoint { date: date(2025, 1, 6), close: 121_500.0 },
    ];

    let merged = build_merged_series(
        &table,
        &index,
        date(2025, 1, 1),
        date(2025, 12, 31),
        DatePolicy::Warn,
    )
    .unwrap();

    assert_eq!(merged.categories.len(), 5);
    assert_eq!(merged.rows.len(), 3);

    // estrangeiro is the first matched category
    let estrangeiro: Vec<f64> = merged.rows.iter().map(|r| r.cumulative[0]).collect();
    assert_eq!(estrangeiro, vec![1.0, 0.5, 2.5]);

    // the 03/01 gap inherits the 02/01 close
    let closes: Vec<Option<f64>> = merged.rows.iter().map(|r| r.index_close).collect();
    assert_eq!(
        closes,
        vec![Some(120_000.0), Some(120_000.0), Some(121_500.0)]
    );

    let summary = merged.summary();
    assert_eq!(summary[0], ("Estrangeiro", 2.5));
    assert_eq!(summary[1], ("Institucional", 0.25));
    assert_eq!(summary[4], ("Outros", 0.05));
}

#[test]
fn test_window_excludes_last_year() {
    let page = r#"
        <table>
          <tr><th>Data</th><th>Estrangeiro</th></tr>
          <tr><td>31/12/2024</td><td>R$ 9 bi</td></tr>
          <tr><td>02/01/2025</td><td>R$ 1 bi</td></tr>
        </table>"#;

    let table = parse_first_table(page).unwrap();
    let merged = build_merged_series(
        &table,
        &vec![],
        date(2025, 1, 1),
        date(2025, 3, 31),
        DatePolicy::Warn,
    )
    .unwrap();

    assert_eq!(merged.rows.len(), 1);
    assert_eq!(merged.rows[0].date, date(2025, 1, 2));
    assert_eq!(merged.summary()[0], ("Estrangeiro", 1.0));
}
