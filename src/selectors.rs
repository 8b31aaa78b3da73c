//! Fixed selectors and layout constants for the transfer page family

/// Competition display name on a detail page
pub const COMPETITION_NAME: &str = "header.data-header > div > h1";

/// Visible text of the anchor leading from a listing page to the full table
pub const COMPLETE_LIST_TEXT: &str = "View complete list";

/// Path segment selecting the first page of the detailed table
pub const DETAIL_SUFFIX: &str = "/plus/1";

pub const ANCHOR: &str = "a";
pub const TRANSFER_TABLE: &str = ".items";
pub const HEADER_CELL: &str = "th";
pub const DATA_CELL: &str = "td";
pub const ROW: &str = "tr";

/// Nation indicator inside a single cell
pub const NATION_FLAG: &str = "img.flaggenrahmen[title]";

/// Club crest inside a merged cell
pub const CLUB_CREST: &str = "img.tiny_wappen[title]";

/// Any image with a source counts as a club shield
pub const SHIELD_IMAGE: &str = "img[src]";

/// Substring identifying a club fixtures link
pub const CLUB_LINK_PATTERN: &str = "spielplan/verein";

pub const RESULT_LINK: &str = "a.ergebnis-link[href]";

/// League position annotation, e.g. the `(10.)` in `Leeds (10.)`
pub const CLASSIFICATION_MARKER: &str = ".tabellenplatz";

/// Header-less second column inserted into every header
pub const POSITION_COLUMN: &str = "position";

/// Only the leading body rows of each table hold the transfer event
pub const ROWS_PER_TABLE: usize = 2;

/// Rows need strictly more `td` descendants than this to be parsed
pub const MAX_SKIPPED_ROW_CELLS: usize = 6;
