//! Extraction scenarios over complete documents.
use avurna_scout::analysis::sufficiency::{HeuristicJudge, IntentSignal, SufficiencyJudge};
use avurna_scout::extractor::{
    HtmlExtractor, MAX_FAQ_CHARS, MAX_HEADINGS, MAX_NAV_LINKS, MAX_NEWS_CHARS, MAX_PRODUCT_CARDS,
    MAX_SUMMARY_CHARS, MAX_TABLES, MAX_TABLE_ROWS,
};
use avurna_scout::orchestrator::AttemptOutcome;
use avurna_scout::types::SiteType;

fn shop_page() -> String {
    let cards: String = [
        ("Alpine Tent", "$249.00", "Sleeps 2"),
        ("Trail Stove", "$59.99", "Folds flat"),
        ("Dry Bag", "$19.50", "20 litres"),
    ]
    .iter()
    .map(|(name, price, feature)| {
        format!(
            r#"<div class="product-card"><h3>{}</h3><span class="price">{}</span><ul><li>{}</li></ul></div>"#,
            name, price, feature
        )
    })
    .collect();
    format!(
        r#"<html><head><title>Outdoor Gear</title>
<meta property="og:title" content="Outdoor Gear Shop"></head>
<body><h1>Camping equipment</h1>{}</body></html>"#,
        cards
    )
}

#[test]
fn shop_page_is_ecommerce_and_sufficient() {
    let extract = HtmlExtractor::new().extract(&shop_page(), "https://gear.example.com/camping");

    assert_eq!(extract.site_type, SiteType::ECommerce);
    assert_eq!(extract.product_cards.len(), 3);
    assert_eq!(extract.product_cards[0].name, "Alpine Tent");
    assert_eq!(extract.product_cards[0].price, "$249.00");
    assert_eq!(extract.product_cards[0].features, vec!["Sleeps 2"]);
    assert_eq!(extract.title, "Outdoor Gear Shop");
    assert!(extract.summary.starts_with("Outdoor Gear Shop | "));
    assert!(extract.summary.contains("Alpine Tent $249.00 | Trail Stove $59.99"));

    let outcome = AttemptOutcome::Page(extract);
    assert!(HeuristicJudge.is_sufficient(&outcome, &IntentSignal::default()));
}

#[test]
fn extraction_is_deterministic() {
    let html = shop_page();
    let ex = HtmlExtractor::new();
    let a = serde_json::to_string(&ex.extract(&html, "https://gear.example.com/")).unwrap();
    let b = serde_json::to_string(&ex.extract(&html, "https://gear.example.com/")).unwrap();
    assert_eq!(a, b);
}

#[test]
fn caps_hold_on_oversized_documents() {
    let mut html = String::from("<html><body>");
    for i in 0..40 {
        html.push_str(&format!("<h2>Section {}</h2>\n", i));
        html.push_str(&format!("<a href=\"/page/{}\">Page {}</a>\n", i, i));
        html.push_str(&format!(
            "<div class=\"item\"><h4>Thing {}</h4><span>${}.00</span></div>\n",
            i, i
        ));
        html.push_str(&format!("<details><summary>Q{}</summary>{}</details>\n", i, "answer ".repeat(80)));
        html.push_str(&format!("<section class=\"update\">{}</section>\n", "update text ".repeat(80)));
    }
    for t in 0..8 {
        html.push_str("<table><tr><th>n</th></tr>");
        for r in 0..70 {
            html.push_str(&format!("<tr><td>{}-{}</td></tr>", t, r));
        }
        html.push_str("</table>");
    }
    html.push_str(&"lorem ipsum ".repeat(500));
    html.push_str("</body></html>");

    let extract = HtmlExtractor::new().extract(&html, "https://big.example.com/");
    assert_eq!(extract.headings.len(), MAX_HEADINGS);
    assert_eq!(extract.nav_links.len(), MAX_NAV_LINKS);
    assert_eq!(extract.product_cards.len(), MAX_PRODUCT_CARDS);
    assert_eq!(extract.tables.len(), MAX_TABLES);
    assert!(extract.tables.iter().all(|t| t.rows.len() == MAX_TABLE_ROWS));
    assert!(extract.faqs.iter().all(|f| f.chars().count() <= MAX_FAQ_CHARS));
    assert!(extract.news_sections.iter().all(|n| n.chars().count() <= MAX_NEWS_CHARS));
    assert!(extract.summary.chars().count() <= MAX_SUMMARY_CHARS);
}

#[test]
fn empty_body_is_general_and_insufficient() {
    let extract = HtmlExtractor::new().extract("<html><body></body></html>", "https://blank.example.com/");
    assert_eq!(extract.site_type, SiteType::General);
    assert!(extract.summary.is_empty());
    assert!(!HeuristicJudge.is_sufficient(&AttemptOutcome::Page(extract), &IntentSignal::default()));
}

#[test]
fn nested_table_markup_is_partially_parsed() {
    // The outer table match stops at the inner </table>; the outer table's
    // trailing rows are lost. Accepted behaviour of the regex parser.
    let html = r#"<table>
<tr><th>Team</th><th>Score</th></tr>
<tr><td>Red</td><td><table><tr><td>12</td></tr></table></td></tr>
<tr><td>Blue</td><td>9</td></tr>
</table>"#;
    let extract = HtmlExtractor::new().extract(html, "https://scores.example.com/");
    assert_eq!(extract.tables.len(), 1);
    assert_eq!(extract.tables[0].rows.len(), 1);
    assert_eq!(extract.tables[0].rows[0]["Team"], "Red");
    assert_eq!(extract.tables[0].rows[0]["Score"], "12");
    assert_eq!(extract.site_type, SiteType::DataTable);
}

#[test]
fn news_mention_anywhere_marks_news_site() {
    let html = r#"<html><body><p>Read our latest article on climbing.</p><details>Q</details></body></html>"#;
    let extract = HtmlExtractor::new().extract(html, "https://climb.example.com/");
    assert!(extract.mentions_news);
    assert_eq!(extract.site_type, SiteType::NewsBlog);
}
