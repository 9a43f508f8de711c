use chrono::{Local, TimeZone};

use crate::types::Item;

/// Display-ready fields for one posting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    pub title: String,
    /// Set when the title should be rendered as a hyperlink
    pub link: Option<String>,
    pub attribution: String,
    pub posted: String,
}

impl DisplayRecord {
    /// `By <author> · <time>`, without the attribution when there is no author.
    pub fn metadata(&self) -> String {
        match (self.attribution.is_empty(), self.posted.is_empty()) {
            (true, _) => self.posted.clone(),
            (false, true) => format!("By {}", self.attribution),
            (false, false) => format!("By {} · {}", self.attribution, self.posted),
        }
    }
}

pub fn render(item: &Item) -> DisplayRecord {
    render_in(item, &Local)
}

pub fn render_in<Tz: TimeZone>(item: &Item, tz: &Tz) -> DisplayRecord
where
    Tz::Offset: std::fmt::Display,
{
    let posted = item
        .posted_at()
        .map(|dt| {
            dt.with_timezone(tz)
                .format("%-m/%-d/%Y, %-I:%M:%S %p")
                .to_string()
        })
        .unwrap_or_default();

    DisplayRecord {
        title: item.title.clone(),
        link: item.link().map(str::to_string),
        attribution: item.author.clone(),
        posted,
    }
}
