mod common;

use scraper::{Html, Selector};
use tfmkt_transfers::CellValue;
use tfmkt_transfers::classify::{CellShape, Outcome, classify_cell, expand};

use common::*;

fn outer_cell(document: &Html) -> scraper::ElementRef<'_> {
    let selector = Selector::parse("td").unwrap();
    document.select(&selector).next().unwrap()
}

fn classify(cell_html: &str, column: usize) -> Vec<Outcome> {
    let document = Html::parse_fragment(&format!("<table><tr>{cell_html}</tr></table>"));
    classify_cell(outer_cell(&document), column)
}

fn values(cell_html: &str, column: usize) -> Vec<Option<CellValue>> {
    classify(cell_html, column)
        .into_iter()
        .map(|outcome| outcome.value)
        .collect()
}

#[test]
fn test_flag_title_is_ascii_folded() {
    let cell = r#"<td><img src="/flagge/38.png" title=" Côte d'Ivoire " class="flaggenrahmen"></td>"#;

    let outcomes = classify(cell, 2);

    assert_eq!(outcomes[0].rule, "nation_flag");
    assert_eq!(outcomes[0].value, Some(CellValue::text("Cte d'Ivoire")));
}

#[test]
fn test_flag_with_empty_title_falls_through() {
    let cell = r#"<td><img src="/flagge/0.png" title="" class="flaggenrahmen"> Unknown</td>"#;

    let outcomes = classify(cell, 2);

    assert_eq!(outcomes[0].rule, "text");
    assert_eq!(outcomes[0].value, Some(CellValue::text("Unknown")));
}

#[test]
fn test_shielded_club_link() {
    assert_eq!(
        values(SHIELDED_CLUB_CELL, 4),
        [Some(CellValue::club("/manchester-city/spielplan/verein/281"))]
    );
}

#[test]
fn test_unshielded_club_link_is_dropped() {
    let outcomes = classify(UNSHIELDED_CLUB_CELL, 4);

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].rule, "unshielded_club");
    assert_eq!(outcomes[0].value, None);
}

#[test]
fn test_nested_club_link_is_not_a_club() {
    let cell = r#"<td><span><a href="/c/spielplan/verein/1"><img src="/w.png"></a></span></td>"#;

    assert_eq!(classify(cell, 4)[0].rule, "text");
}

#[test]
fn test_classification_annotation_is_dropped() {
    let outcomes = classify(ANNOTATED_CLUB_CELL, 3);

    assert_eq!(outcomes[0].rule, "classification_annotation");
    assert_eq!(outcomes[0].value, None);
}

#[test]
fn test_result_link_is_a_game() {
    assert_eq!(
        values(RESULT_CELL, 7),
        [Some(CellValue::game("/spielbericht/index/spielbericht/3838"))]
    );
}

#[test]
fn test_text_is_trimmed_and_unquoted() {
    let cell = r#"<td class="rechts">
        <b>"Loan"</b> fee: €2.50m
    </td>"#;

    assert_eq!(values(cell, 6), [Some(CellValue::text("Loan fee: 2.50m"))]);
}

#[test]
fn test_merged_first_column_keeps_cells_without_rowspan() {
    assert_eq!(
        values(&player_cell("Erling Haaland"), 0),
        [
            Some(CellValue::text("Erling Haaland")),
            Some(CellValue::text("Centre-Forward")),
        ]
    );
}

#[test]
fn test_merged_later_column_keeps_rowspan_cells() {
    let outcomes = classify(&crest_cell("Borussia Dortmund", "Bundesliga"), 3);

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].rule, "club_crest");
    assert_eq!(outcomes[0].value, Some(CellValue::text("Borussia Dortmund")));
}

#[test]
fn test_single_nested_row_is_not_merged() {
    let cell = r#"<td><table><tr><td rowspan="2">A</td><td>B</td></tr></table></td>"#;
    let document = Html::parse_fragment(&format!("<table><tr>{cell}</tr></table>"));

    assert!(matches!(expand(outer_cell(&document), 0), CellShape::Single(_)));
}

#[test]
fn test_merged_cell_shape() {
    let document = Html::parse_fragment(&format!(
        "<table><tr>{}</tr></table>",
        player_cell("Erling Haaland")
    ));

    match expand(outer_cell(&document), 0) {
        CellShape::Merged(sub_cells) => assert_eq!(sub_cells.len(), 2),
        CellShape::Single(_) => panic!("expected a merged cell"),
    }
}
