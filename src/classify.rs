//! Cell classification heuristics
//!
//! Transfer tables mix plain text, flag and crest images, club links and match
//! links in arbitrary columns. A cell is first expanded into its logical
//! sub-cells ([`expand`]), then each (sub-)cell runs through an ordered rule
//! table. The first rule whose predicate holds decides what the cell means and
//! how its value is built. Rules that build nothing drop the cell.

use crate::backend::ElementRef;
use crate::normalize::decode_value;
use crate::record::CellValue;
use crate::selectors::{
    ANCHOR, CLASSIFICATION_MARKER, CLUB_CREST, CLUB_LINK_PATTERN, DATA_CELL, NATION_FLAG,
    RESULT_LINK, ROW, SHIELD_IMAGE,
};

/// What the element-level rules look at, gathered once per cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellFacts {
    /// A `.tabellenplatz` descendant, e.g. the `(10.)` of `Leeds (10.)`
    pub classification_marker: bool,
    /// Any image with a `src`
    pub shield: bool,
    /// Href of a direct child anchor pointing at a club fixtures page
    pub club_href: Option<String>,
    /// Href of an `a.ergebnis-link` descendant
    pub result_href: Option<String>,
    /// Flattened text, quotes removed and ASCII-folded
    pub text: String,
}

impl CellFacts {
    pub fn gather<E: ElementRef>(cell: &E) -> Self {
        let club_href = cell
            .child_elements()
            .into_iter()
            .filter(|child| child.tag_name() == ANCHOR)
            .find_map(|anchor| {
                anchor
                    .attr("href")
                    .filter(|href| href.contains(CLUB_LINK_PATTERN))
                    .map(str::to_owned)
            });
        let result_href = cell
            .select_all(RESULT_LINK)
            .into_iter()
            .find_map(|anchor| anchor.attr("href").map(str::to_owned));

        Self {
            classification_marker: cell.select_one(CLASSIFICATION_MARKER).is_some(),
            shield: cell.select_one(SHIELD_IMAGE).is_some(),
            club_href,
            result_href,
            text: decode_value(&cell.text().trim().replace('"', "")),
        }
    }
}

/// One row of the decision table
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&CellFacts) -> bool,
    pub build: fn(CellFacts) -> Option<CellValue>,
}

/// Element-level rules in priority order
pub static ELEMENT_RULES: [Rule; 4] = [
    Rule {
        name: "classification_annotation",
        applies: is_classification_annotation,
        build: drop_cell,
    },
    Rule {
        name: "unshielded_club",
        applies: is_unshielded_club,
        build: drop_cell,
    },
    Rule {
        name: "club",
        applies: has_club_href,
        build: club_reference,
    },
    Rule {
        name: "game",
        applies: has_result_href,
        build: game_reference,
    },
];

/// Applies when no element rule does
pub static TEXT_RULE: Rule = Rule {
    name: "text",
    applies: always,
    build: flattened_text,
};

fn is_classification_annotation(facts: &CellFacts) -> bool {
    facts.classification_marker && facts.club_href.is_none()
}

fn is_unshielded_club(facts: &CellFacts) -> bool {
    facts.club_href.is_some() && !facts.shield
}

fn has_club_href(facts: &CellFacts) -> bool {
    facts.club_href.is_some()
}

fn has_result_href(facts: &CellFacts) -> bool {
    facts.result_href.is_some()
}

fn always(_: &CellFacts) -> bool {
    true
}

fn drop_cell(_: CellFacts) -> Option<CellValue> {
    None
}

fn club_reference(facts: CellFacts) -> Option<CellValue> {
    facts.club_href.map(CellValue::club)
}

fn game_reference(facts: CellFacts) -> Option<CellValue> {
    facts.result_href.map(CellValue::game)
}

fn flattened_text(facts: CellFacts) -> Option<CellValue> {
    Some(CellValue::Text(facts.text))
}

/// Result of classifying one cell or sub-cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Name of the rule that decided
    pub rule: &'static str,
    /// `None` when the cell contributes nothing to the row
    pub value: Option<CellValue>,
}

/// Run the element-level decision table on a cell
pub fn classify_element<E: ElementRef>(cell: &E) -> Outcome {
    let facts = CellFacts::gather(cell);
    let rule = ELEMENT_RULES
        .iter()
        .find(|rule| (rule.applies)(&facts))
        .unwrap_or(&TEXT_RULE);

    Outcome {
        rule: rule.name,
        value: (rule.build)(facts),
    }
}

/// Logical layout of a top-level cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellShape<E> {
    /// A cell holding a nested multi-row table, flattened to its sub-cells
    Merged(Vec<E>),
    Single(E),
}

/// Flatten a cell that spans several logical rows
///
/// A cell with more than one nested `tr` is merged. In the first column the
/// value sub-cells are those *without* a `rowspan`; in every other column
/// they are the ones *with* it.
pub fn expand<E: ElementRef>(cell: E, column: usize) -> CellShape<E> {
    let inner_rows = cell.select_all(ROW);
    if inner_rows.len() <= 1 {
        return CellShape::Single(cell);
    }

    let wants_rowspan = column > 0;
    let sub_cells = inner_rows
        .iter()
        .flat_map(|row| row.child_elements())
        .filter(|sub| {
            sub.tag_name() == DATA_CELL && sub.attr("rowspan").is_some() == wants_rowspan
        })
        .collect();
    CellShape::Merged(sub_cells)
}

/// Classify a top-level cell into zero or more outcomes, in column order
///
/// Sub-cells of a merged cell prefer a club crest title; single cells prefer
/// a nation flag title. Everything else falls through to
/// [`classify_element`].
pub fn classify_cell<E: ElementRef>(cell: E, column: usize) -> Vec<Outcome> {
    match expand(cell, column) {
        CellShape::Merged(sub_cells) => sub_cells
            .iter()
            .map(|sub| titled_image(sub, CLUB_CREST, "club_crest"))
            .collect(),
        CellShape::Single(cell) => vec![titled_image(&cell, NATION_FLAG, "nation_flag")],
    }
}

fn titled_image<E: ElementRef>(cell: &E, selector: &str, rule: &'static str) -> Outcome {
    let title = cell
        .select_all(selector)
        .into_iter()
        .find_map(|img| img.attr("title").filter(|title| !title.is_empty()).map(decode_value));

    match title {
        Some(title) => Outcome {
            rule,
            value: Some(CellValue::Text(title)),
        },
        None => classify_element(cell),
    }
}
