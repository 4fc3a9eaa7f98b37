use crate::database::models::{Building, BuildingPage};
use crate::filter::Pagination;

const HEADERS: [&str; 8] = ["Id", "Name", "Floors", "Height", "Area", "BuildDate", "Remark", "Modified"];

fn cells(b: &Building) -> [String; 8] {
    [
        b.id.to_string(),
        b.name.clone(),
        b.floors.to_string(),
        b.height.to_string(),
        b.area.to_string(),
        b.build_date.format("%Y-%m-%d").to_string(),
        b.remark.clone().unwrap_or_default(),
        b.modified.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]
}

/// Render a page of buildings as a standalone HTML document for browser requests.
pub fn buildings_to_html(page: &BuildingPage, pagination: &Pagination) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Buildings</title></head>\n<body>\n",
    );
    html.push_str(&format!(
        "<h1>Buildings</h1>\n<p class=\"summary\">{} total, page {}</p>\n",
        page.total, pagination.page
    ));

    html.push_str("<table id=\"buildings\">\n<thead><tr>");
    for label in HEADERS {
        html.push_str(&format!("<th>{}</th>", label));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    if page.rows.is_empty() {
        html.push_str(&format!(
            "<tr><td colspan=\"{}\">No buildings found</td></tr>\n",
            HEADERS.len()
        ));
    }
    for building in &page.rows {
        html.push_str("<tr>");
        for cell in cells(building) {
            html.push_str(&format!("<td>{}</td>", escape_html(&cell)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn building(name: &str) -> Building {
        Building {
            id: 7,
            created: Utc::now(),
            modified: Utc::now(),
            name: name.to_string(),
            floors: 10,
            height: 30,
            area: 500,
            build_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            remark: Some("<b>east</b> wing".to_string()),
        }
    }

    #[test]
    fn renders_rows_with_escaped_text() {
        let page = BuildingPage { total: 1, rows: vec![building("Tower & Co")] };
        let html = buildings_to_html(&page, &Pagination::new(1, 10));
        assert!(html.contains("<td>Tower &amp; Co</td>"));
        assert!(html.contains("&lt;b&gt;east&lt;/b&gt; wing"));
        assert!(html.contains("<td>2020-01-01</td>"));
        assert!(html.contains("1 total, page 1"));
    }

    #[test]
    fn renders_placeholder_for_empty_page() {
        let page = BuildingPage { total: 0, rows: vec![] };
        let html = buildings_to_html(&page, &Pagination::new(1, 10));
        assert!(html.contains("No buildings found"));
    }
}
