// Copyright 2024 The ActiveMQ Manager Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTML table extraction
//!
//! Console pages are decoded in two steps: a [`PageDecoder`] turns a page into the tables
//! with a given element id, then the record types pick cells out of each row by position.

use activemq_error::DecodeError;
use scraper::ElementRef;
use scraper::Html;
use scraper::Selector;

/// A link inside a table cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    /// Text content with runs of whitespace collapsed to one space
    pub text: String,
    pub anchors: Vec<Anchor>,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            anchors: Vec::new(),
        }
    }

    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            anchors: vec![Anchor {
                text: text.clone(),
                href: href.into(),
            }],
            text,
        }
    }

    /// First link of the cell.
    pub fn href(&self) -> Option<&str> {
        self.anchors.first().map(|anchor| anchor.href.as_str())
    }

    /// Link whose text is `text`, e.g. `Purge` in a queue's operations cell.
    pub fn anchor(&self, text: &str) -> Option<&Anchor> {
        self.anchors.iter().find(|anchor| anchor.text == text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTable {
    pub id: String,
    /// `thead` column titles; empty when the table has no header
    pub headers: Vec<String>,
    /// `tbody` rows, one entry per `td`
    pub rows: Vec<Vec<Cell>>,
}

/// Turns a console page into its tables.
#[cfg_attr(test, mockall::automock)]
pub trait PageDecoder: Send + Sync {
    /// Every table of `html` whose element id is `id`, in document order.
    fn tables(&self, html: &str, id: &str) -> Result<Vec<HtmlTable>, DecodeError>;
}

/// [`PageDecoder`] backed by an HTML5 parser; tolerant of the console's unclosed tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTableDecoder;

impl PageDecoder for HtmlTableDecoder {
    fn tables(&self, html: &str, id: &str) -> Result<Vec<HtmlTable>, DecodeError> {
        let document = Html::parse_document(html);
        let selectors = Selectors::new()?;
        Ok(document
            .select(&selectors.table)
            .filter(|table| table.value().id() == Some(id))
            .map(|table| read_table(id, table, &selectors))
            .collect())
    }
}

struct Selectors {
    table: Selector,
    header: Selector,
    row: Selector,
    data: Selector,
    anchor: Selector,
}

impl Selectors {
    fn new() -> Result<Self, DecodeError> {
        Ok(Self {
            table: selector("table")?,
            header: selector("thead th")?,
            row: selector("tbody > tr")?,
            data: selector("td")?,
            anchor: selector("a[href]")?,
        })
    }
}

fn selector(css: &'static str) -> Result<Selector, DecodeError> {
    Selector::parse(css).map_err(|e| DecodeError::invalid_payload(format!("selector '{css}'"), e.to_string()))
}

fn read_table(id: &str, table: ElementRef<'_>, selectors: &Selectors) -> HtmlTable {
    let headers = table.select(&selectors.header).map(collapsed_text).collect();
    let rows = table
        .select(&selectors.row)
        .map(|row| {
            row.select(&selectors.data)
                .map(|cell| Cell {
                    text: collapsed_text(cell),
                    anchors: cell
                        .select(&selectors.anchor)
                        .filter_map(|a| {
                            a.value().attr("href").map(|href| Anchor {
                                text: collapsed_text(a),
                                href: href.to_string(),
                            })
                        })
                        .collect(),
                })
                .collect()
        })
        .collect();

    HtmlTable {
        id: id.to_string(),
        headers,
        rows,
    }
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
<table id="queues">
  <thead><tr><th>Name</th><th>Number Of Pending Messages</th></tr></thead>
  <tbody>
    <tr>
      <td><a href="browse.jsp?JMSDestination=orders">orders
          </a></td>
      <td>12</td>
    </tr>
    <tr><td>audit</td><td>0</td></tr>
  </tbody>
</table>
<table id="other"><tbody><tr><td>x</td></tr></tbody></table>
</body></html>"#;

    #[test]
    fn decode_table_by_id() {
        let tables = HtmlTableDecoder.tables(PAGE, "queues").unwrap();
        assert_eq!(tables.len(), 1);

        let table = &tables[0];
        assert_eq!(table.headers, vec!["Name", "Number Of Pending Messages"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0].text, "orders");
        assert_eq!(table.rows[0][0].href(), Some("browse.jsp?JMSDestination=orders"));
        assert_eq!(table.rows[0][1].text, "12");
        assert!(table.rows[1][0].anchors.is_empty());
    }

    #[test]
    fn unknown_id_yields_no_tables() {
        assert!(HtmlTableDecoder.tables(PAGE, "messages").unwrap().is_empty());
    }

    #[test]
    fn whitespace_is_collapsed() {
        let html = "<table id='t'><tbody><tr><td>\n  2019-03-15\n 10:43:06  </td></tr></tbody></table>";
        let tables = HtmlTableDecoder.tables(html, "t").unwrap();
        assert_eq!(tables[0].rows[0][0].text, "2019-03-15 10:43:06");
    }

    #[test]
    fn cell_anchor_lookup() {
        let cell = Cell {
            text: "Purge Delete".to_string(),
            anchors: vec![
                Anchor {
                    text: "Purge".to_string(),
                    href: "purgeDestination.action?x".to_string(),
                },
                Anchor {
                    text: "Delete".to_string(),
                    href: "deleteDestination.action?x".to_string(),
                },
            ],
        };
        assert_eq!(cell.anchor("Delete").map(|a| a.href.as_str()), Some("deleteDestination.action?x"));
        assert!(cell.anchor("Pause").is_none());
    }
}
