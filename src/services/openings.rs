// src/services/openings.rs

//! ECO table parser.
//!
//! Extracts [`Opening`] records from the reference page. Extraction is
//! positional: every data row is expected to look like
//!
//! ```text
//! <tr>
//!   <td>…A00…</td>
//!   <td><font><b>Polish opening</b><br><font>1 b4</font></font></td>
//! </tr>
//! ```
//!
//! The code is the text of the first cell. The second cell holds a single
//! wrapper element whose first child element carries the author and whose
//! last child element carries the move text.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::Opening;

/// Parser for the ECO reference table.
pub struct OpeningParser {
    row_limit: Option<usize>,
    row_sel: Selector,
}

impl OpeningParser {
    /// Create a parser, optionally capping the number of extracted rows.
    pub fn new(row_limit: Option<usize>) -> Result<Self> {
        Ok(Self {
            row_limit,
            row_sel: Self::parse_selector("tr")?,
        })
    }

    /// Parse a raw document into openings in document order.
    pub fn parse(&self, body: &[u8]) -> Result<Vec<Opening>> {
        let text = String::from_utf8_lossy(body);
        let document = Html::parse_document(&text);

        let mut openings = Vec::new();
        for (index, row) in document.select(&self.row_sel).enumerate() {
            if self.row_limit.is_some_and(|limit| openings.len() >= limit) {
                break;
            }
            if let Some(opening) = Self::parse_row(index, row)? {
                openings.push(opening);
            }
        }

        if openings.is_empty() {
            return Err(AppError::parse("document contains no opening rows"));
        }
        log::debug!("Parsed {} opening rows", openings.len());
        Ok(openings)
    }

    /// Parse one `<tr>`. Rows without any `<td>` (header rows) yield `None`.
    fn parse_row(index: usize, row: ElementRef<'_>) -> Result<Option<Opening>> {
        let cells: Vec<ElementRef<'_>> = child_elements(row)
            .filter(|cell| cell.value().name() == "td")
            .collect();
        let Some(code_cell) = cells.first() else {
            return Ok(None);
        };

        let code = element_text(*code_cell);
        if code.is_empty() {
            return Err(AppError::parse(format!("row {index}: empty code cell")));
        }

        let detail_cell = cells
            .get(1)
            .ok_or_else(|| AppError::parse(format!("row {index} ({code}): missing second cell")))?;
        let wrapper = child_elements(*detail_cell).next().ok_or_else(|| {
            AppError::parse(format!("row {index} ({code}): second cell has no content"))
        })?;
        let parts: Vec<ElementRef<'_>> = child_elements(wrapper).collect();
        let (Some(author), Some(moves)) = (parts.first(), parts.last()) else {
            return Err(AppError::parse(format!(
                "row {index} ({code}): second cell has no author or move text"
            )));
        };

        Ok(Some(Opening::new(
            code,
            element_text(*author),
            element_text(*moves),
        )))
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Descendant text with whitespace runs collapsed to single spaces.
fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
