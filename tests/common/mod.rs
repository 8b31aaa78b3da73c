#![allow(dead_code)]

pub const LISTING_URL: &str =
    "https://www.transfermarkt.co.uk/premier-league/startseite/wettbewerb/GB1";
pub const DETAIL_URL: &str =
    "https://www.transfermarkt.co.uk/premier-league/transfers/wettbewerb/GB1/plus/1";
pub const DETAIL_PATH: &str = "/premier-league/transfers/wettbewerb/GB1/plus/1";

pub const HEADER: [&str; 9] = [
    "player", "position", "age", "nat", "left", "joined", "date", "fee", "result",
];

pub fn listing_page(link: &str) -> String {
    format!(
        r#"<html><body>
        <header class="data-header"><div><h1>Premier League</h1></div></header>
        <div class="box">
            <a href="/premier-league/startseite/wettbewerb/GB1/saison_id/2022">Season</a>
            {link}
        </div>
        </body></html>"#
    )
}

pub fn complete_list_link() -> &'static str {
    r#"<a class="content-link" href="/premier-league/transfers/wettbewerb/GB1">View complete list</a>"#
}

pub fn player_cell(name: &str) -> String {
    format!(
        r#"<td><table class="inline-table"><tr>
            <td rowspan="2"><img src="/portrait/small/1.jpg" title="{name}" class="bilderrahmen-fixed"></td>
            <td class="hauptlink"><a href="/spieler/profil/spieler/418560">{name}</a></td>
        </tr><tr>
            <td>Centre-Forward</td>
        </tr></table></td>"#
    )
}

pub fn crest_cell(club: &str, league: &str) -> String {
    format!(
        r#"<td><table class="inline-table"><tr>
            <td rowspan="2"><a href="/club/spielplan/verein/16"><img src="/wappen/tiny/16.png" title="{club}" class="tiny_wappen"></a></td>
            <td class="hauptlink"><a href="/club/startseite/verein/16">{club}</a></td>
        </tr><tr>
            <td>{league}</td>
        </tr></table></td>"#
    )
}

pub const FLAG_CELL: &str =
    r#"<td class="zentriert"><img src="/flagge/tiny/125.png" title="Norway" alt="Norway" class="flaggenrahmen"></td>"#;

pub const SHIELDED_CLUB_CELL: &str =
    r#"<td><a href="/manchester-city/spielplan/verein/281"><img src="/wappen/tiny/281.png" alt="Manchester City"></a></td>"#;

pub const UNSHIELDED_CLUB_CELL: &str =
    r#"<td><a href="/manchester-city/spielplan/verein/281">Manchester City</a></td>"#;

pub const ANNOTATED_CLUB_CELL: &str =
    r#"<td><a href="/leeds-united/startseite/verein/399">Leeds</a> <span class="tabellenplatz">(10.)</span></td>"#;

pub const RESULT_CELL: &str =
    r#"<td class="zentriert"><a class="ergebnis-link" href="/spielbericht/index/spielbericht/3838">2:1</a></td>"#;

/// A full transfer row: nine values once merged cells are flattened
pub fn transfer_row(name: &str, age: &str) -> String {
    transfer_row_with_joined(name, age, SHIELDED_CLUB_CELL)
}

pub fn transfer_row_with_joined(name: &str, age: &str, joined: &str) -> String {
    format!(
        r#"<tr class="odd">{player}<td class="zentriert">{age}</td>{FLAG_CELL}{left}{joined}<td>Jul 1, 2022</td><td class="rechts">€60.00m</td>{RESULT_CELL}</tr>"#,
        player = player_cell(name),
        left = crest_cell("Borussia Dortmund", "Bundesliga"),
    )
}

pub fn transfer_table(rows: &[String]) -> String {
    format!(
        r#"<div class="responsive-table"><table class="items">
        <thead><tr>
            <th>Player</th>
            <th><a href="?sort=age">Age</a></th>
            <th>Nat.</th>
            <th>Left</th>
            <th>Joined</th>
            <th>Date</th>
            <th>Fee</th>
            <th>Result</th>
        </tr></thead>
        <tbody>{}</tbody>
        </table></div>"#,
        rows.join("\n")
    )
}

pub fn detail_page(tables: &[String]) -> String {
    format!(
        r#"<html><head><title>Transfers</title></head><body>
        <header class="data-header"><div class="data-header__headline-container"><h1>
            Premier League
        </h1></div></header>
        {}
        </body></html>"#,
        tables.join("\n")
    )
}
