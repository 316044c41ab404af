// PDF report rendering with printpdf
use crate::application::report::{ChartFigure, ReportContent};
use crate::domain::kpi::KpiTable;
use anyhow::anyhow;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};

// A4 landscape, in points
const PAGE_WIDTH: f32 = 841.89;
const PAGE_HEIGHT: f32 = 595.28;
const MARGIN: f32 = 40.0;
const CHART_HEIGHT: f32 = 180.0;
const CHART_BLOCK: f32 = CHART_HEIGHT + 40.0;
const ROW_HEIGHT: f32 = 20.0;
const FIRST_COLUMN_WIDTH: f32 = 200.0;
const LAYER_NAME: &str = "Relatório";

type Rgb3 = (f32, f32, f32);

const BLACK: Rgb3 = (0.0, 0.0, 0.0);
const FRAME: Rgb3 = (0.75, 0.75, 0.75);

/// Something to draw, positioned in points from the top-left corner of the page.
#[derive(Debug, Clone, PartialEq)]
enum Mark {
    Text {
        text: String,
        size: f32,
        x: f32,
        y: f32,
        color: Rgb3,
    },
    Stroke {
        points: Vec<(f32, f32)>,
        color: Rgb3,
        closed: bool,
    },
}

struct Layout {
    pages: Vec<Vec<Mark>>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: 0.0,
        }
    }

    fn push(&mut self, mark: Mark) {
        if let Some(page) = self.pages.last_mut() {
            page.push(mark);
        }
    }

    fn text(&mut self, text: impl Into<String>, size: f32, x: f32, y: f32, gray: f32) {
        self.push(Mark::Text {
            text: text.into(),
            size,
            x,
            y,
            color: (gray, gray, gray),
        });
    }

    fn stroke(&mut self, points: Vec<(f32, f32)>, color: Rgb3, closed: bool) {
        self.push(Mark::Stroke {
            points,
            color,
            closed,
        });
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = MARGIN;
    }
}

fn gray(level: u8) -> f32 {
    f32::from(level) / 255.0
}

/// `#rrggbb` to normalised RGB; anything else draws black.
fn parse_hex(color: &str) -> Rgb3 {
    let hex = color.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .map(|c| f32::from(c) / 255.0)
    };
    match (hex.len(), channel(0..2), channel(2..4), channel(4..6)) {
        (6, Some(r), Some(g), Some(b)) => (r, g, b),
        _ => BLACK,
    }
}

fn layout(content: &ReportContent) -> Vec<Vec<Mark>> {
    let mut layout = Layout::new();

    layout.text(content.title(), 22.0, MARGIN, 50.0, 0.0);
    layout.text(content.generated_line(), 12.0, MARGIN, 70.0, gray(100));
    layout.y = 100.0;

    layout_table(&mut layout, &content.kpi_table);
    for chart in &content.charts {
        layout_chart(&mut layout, chart);
    }

    layout.pages
}

fn layout_table(layout: &mut Layout, table: &KpiTable) {
    layout.text("Resumo dos Indicadores", 16.0, MARGIN, layout.y, gray(40));
    layout.y += ROW_HEIGHT;

    let columns = table.columns.len().max(1) as f32;
    let column_width = (PAGE_WIDTH - 2.0 * MARGIN - FIRST_COLUMN_WIDTH) / columns;
    let column_x = |index: usize| MARGIN + FIRST_COLUMN_WIDTH + index as f32 * column_width;
    let right = PAGE_WIDTH - MARGIN;

    let header_y = layout.y + ROW_HEIGHT * 0.7;
    layout.text("Indicador", 10.0, MARGIN + 4.0, header_y, 0.0);
    for (index, column) in table.columns.iter().enumerate() {
        layout.text(column.clone(), 10.0, column_x(index) + 4.0, header_y, 0.0);
    }
    layout.y += ROW_HEIGHT;
    layout.stroke(vec![(MARGIN, layout.y), (right, layout.y)], BLACK, false);

    for row in &table.rows {
        let text_y = layout.y + ROW_HEIGHT * 0.7;
        layout.text(row.indicator.clone(), 10.0, MARGIN + 4.0, text_y, 0.0);
        for (index, value) in row.values.iter().enumerate() {
            layout.text(value.clone(), 10.0, column_x(index) + 4.0, text_y, 0.0);
        }
        layout.y += ROW_HEIGHT;
        layout.stroke(vec![(MARGIN, layout.y), (right, layout.y)], FRAME, false);
    }
    layout.y += ROW_HEIGHT;
}

fn layout_chart(layout: &mut Layout, chart: &ChartFigure) {
    if layout.y + CHART_BLOCK > PAGE_HEIGHT {
        layout.new_page();
    }
    layout.text(chart.title, 16.0, MARGIN, layout.y, gray(40));

    let left = MARGIN;
    let right = PAGE_WIDTH - MARGIN;
    let top = layout.y + 15.0;
    let bottom = top + CHART_HEIGHT;
    layout.stroke(
        vec![(left, top), (right, top), (right, bottom), (left, bottom)],
        FRAME,
        true,
    );

    if let Some((min, max)) = chart.y_range() {
        layout.text(format!("{:.2}", max), 8.0, left + 4.0, top + 10.0, gray(100));
        layout.text(format!("{:.2}", min), 8.0, left + 4.0, bottom - 4.0, gray(100));

        let span = (max - min) as f32;
        let width = right - left;
        let x_at = |index: usize| match chart.sample_count {
            0 | 1 => left + width / 2.0,
            n => left + width * index as f32 / (n - 1) as f32,
        };
        let y_at = |value: f64| bottom - ((value - min) as f32 / span) * CHART_HEIGHT;

        for dataset in &chart.datasets {
            let color = parse_hex(&dataset.color);
            // Gaps in the data split the line
            let mut segment = Vec::new();
            for (index, value) in dataset.data.iter().enumerate() {
                if value.is_finite() {
                    segment.push((x_at(index), y_at(*value)));
                } else if segment.len() > 1 {
                    layout.stroke(std::mem::take(&mut segment), color, false);
                } else {
                    segment.clear();
                }
            }
            if segment.len() > 1 {
                layout.stroke(segment, color, false);
            }
        }
    }

    layout.y += CHART_BLOCK;
}

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn draw(layer: &PdfLayerReference, font: &IndirectFontRef, mark: &Mark) {
    match mark {
        Mark::Text {
            text,
            size,
            x,
            y,
            color,
        } => {
            layer.set_fill_color(Color::Rgb(Rgb::new(color.0, color.1, color.2, None)));
            layer.use_text(text.clone(), *size, mm(*x), mm(PAGE_HEIGHT - *y), font);
        }
        Mark::Stroke {
            points,
            color,
            closed,
        } => {
            layer.set_outline_color(Color::Rgb(Rgb::new(color.0, color.1, color.2, None)));
            layer.set_outline_thickness(1.0);
            layer.add_line(Line {
                points: points
                    .iter()
                    .map(|(x, y)| (Point::new(mm(*x), mm(PAGE_HEIGHT - *y)), false))
                    .collect(),
                is_closed: *closed,
            });
        }
    }
}

pub fn render_pdf(content: &ReportContent) -> anyhow::Result<Vec<u8>> {
    let pages = layout(content);

    let (doc, page, layer) = PdfDocument::new(
        content.title(),
        mm(PAGE_WIDTH),
        mm(PAGE_HEIGHT),
        LAYER_NAME.to_string(),
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("failed to load PDF font: {:?}", e))?;

    let mut current = doc.get_page(page).get_layer(layer);
    for (index, marks) in pages.iter().enumerate() {
        if index > 0 {
            let (page, layer) = doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), LAYER_NAME);
            current = doc.get_page(page).get_layer(layer);
        }
        for mark in marks {
            draw(&current, &font, mark);
        }
    }

    tracing::debug!("Rendered report {} with {} page(s)", content.file_name(), pages.len());
    doc.save_to_bytes()
        .map_err(|e| anyhow!("failed to write PDF: {:?}", e))
}
