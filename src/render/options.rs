//! Rendering options configuration.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};

/// Footer printed at the bottom of every page.
pub const DEFAULT_PAGE_FOOTER: &str = "Confidential";

/// Zone used to display timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LocalZone {
    /// The zone of the machine doing the rendering
    #[default]
    System,
    /// A fixed UTC offset; footer timestamps show the offset
    Fixed(FixedOffset),
}

impl LocalZone {
    /// Create a fixed zone from a whole number of hours east of UTC.
    pub fn from_hours(hours: i32) -> Option<Self> {
        FixedOffset::east_opt(hours * 3600).map(LocalZone::Fixed)
    }

    /// Convert a zoned timestamp to wall-clock time in this zone.
    pub fn localize(&self, dt: &DateTime<FixedOffset>) -> NaiveDateTime {
        match self {
            LocalZone::System => dt.with_timezone(&Local).naive_local(),
            LocalZone::Fixed(offset) => dt.with_timezone(offset).naive_local(),
        }
    }

    /// Human-readable stamp such as `05 Mar 2024 02:30 PM`.
    pub fn stamp(&self, dt: &DateTime<FixedOffset>) -> String {
        match self {
            LocalZone::System => dt
                .with_timezone(&Local)
                .format("%d %b %Y %I:%M %p")
                .to_string(),
            LocalZone::Fixed(offset) => dt
                .with_timezone(offset)
                .format("%d %b %Y %I:%M %p %:z")
                .to_string(),
        }
    }
}

/// Options for rendering workbooks.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Width applied to every column before any widening
    pub default_column_width: f64,

    /// Extra width added when a text cell is wider than the default
    pub width_padding: f64,

    /// Centered page footer text
    pub page_footer: String,

    /// Zone for date cells and the "Prepared" stamp
    pub local_zone: LocalZone,

    /// Built-in Excel chart style (1-48)
    pub chart_style: u8,

    /// Workbook "comments" document property
    pub comments: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            default_column_width: 20.0,
            width_padding: 5.0,
            page_footer: DEFAULT_PAGE_FOOTER.to_string(),
            local_zone: LocalZone::System,
            chart_style: 14,
            comments: "Created with Rust and rust_xlsxwriter".to_string(),
        }
    }
}

impl RenderOptions {
    /// Create new render options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default column width.
    pub fn with_column_width(mut self, width: f64) -> Self {
        self.default_column_width = width;
        self
    }

    /// Set the padding added to widened columns.
    pub fn with_width_padding(mut self, padding: f64) -> Self {
        self.width_padding = padding;
        self
    }

    /// Set the page footer text.
    pub fn with_page_footer(mut self, footer: impl Into<String>) -> Self {
        self.page_footer = footer.into();
        self
    }

    /// Set the display zone.
    pub fn with_local_zone(mut self, zone: LocalZone) -> Self {
        self.local_zone = zone;
        self
    }

    /// Set the chart style.
    pub fn with_chart_style(mut self, style: u8) -> Self {
        self.chart_style = style.clamp(1, 48);
        self
    }

    /// Set the workbook comments property.
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }
}
