use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::MovieRecord;
use crate::ui::panels::{format_money, no_data};

const ROW_HEIGHT: f32 = 18.0;

/// A column of a movie table: header plus cell renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieColumn {
    Title,
    Year,
    Rating,
    Votes,
    Popularity,
    Genres,
    Runtime,
    Budget,
    Revenue,
    Profit,
    Loss,
    ProfitMargin,
}

impl MovieColumn {
    fn header(self) -> &'static str {
        match self {
            MovieColumn::Title => "Title",
            MovieColumn::Year => "Year",
            MovieColumn::Rating => "Rating",
            MovieColumn::Votes => "Votes",
            MovieColumn::Popularity => "Popularity",
            MovieColumn::Genres => "Genres",
            MovieColumn::Runtime => "Runtime",
            MovieColumn::Budget => "Budget",
            MovieColumn::Revenue => "Revenue",
            MovieColumn::Profit => "Profit",
            MovieColumn::Loss => "Loss",
            MovieColumn::ProfitMargin => "Margin",
        }
    }

    pub fn cell(self, record: &MovieRecord) -> String {
        let money = &record.financials;
        match self {
            MovieColumn::Title => record.title.clone(),
            MovieColumn::Year => record.release_year.map(|y| y.to_string()).unwrap_or_default(),
            MovieColumn::Rating => record.vote_average.map(|v| format!("{v:.1}")).unwrap_or_default(),
            MovieColumn::Votes => record.vote_count.map(|v| v.to_string()).unwrap_or_default(),
            MovieColumn::Popularity => record.popularity.map(|v| format!("{v:.1}")).unwrap_or_default(),
            MovieColumn::Genres => record.genre_names.clone().unwrap_or_default(),
            MovieColumn::Runtime => record.runtime.map(|v| format!("{v:.0}")).unwrap_or_default(),
            MovieColumn::Budget => format_money(money.budget),
            MovieColumn::Revenue => format_money(money.revenue),
            MovieColumn::Profit => format_money(money.profit),
            MovieColumn::Loss => format_money(money.loss),
            MovieColumn::ProfitMargin => money
                .profit_margin
                .map(|v| format!("{v:.1}%"))
                .unwrap_or_default(),
        }
    }
}

pub const POPULAR_COLUMNS: &[MovieColumn] = &[
    MovieColumn::Title,
    MovieColumn::Year,
    MovieColumn::Rating,
    MovieColumn::Popularity,
    MovieColumn::Genres,
    MovieColumn::Runtime,
];

pub const RATED_COLUMNS: &[MovieColumn] = &[
    MovieColumn::Title,
    MovieColumn::Year,
    MovieColumn::Rating,
    MovieColumn::Votes,
    MovieColumn::Genres,
];

pub const PROFIT_COLUMNS: &[MovieColumn] = &[
    MovieColumn::Title,
    MovieColumn::Budget,
    MovieColumn::Revenue,
    MovieColumn::Profit,
    MovieColumn::ProfitMargin,
];

pub const LOSS_COLUMNS: &[MovieColumn] = &[
    MovieColumn::Title,
    MovieColumn::Budget,
    MovieColumn::Revenue,
    MovieColumn::Loss,
];

/// Render `records` with the given columns; the title column stretches.
pub fn movie_table(ui: &mut Ui, id: &str, records: &[&MovieRecord], columns: &[MovieColumn]) {
    if records.is_empty() {
        no_data(ui);
        return;
    }
    ui.push_id(id, |ui: &mut Ui| {
        let mut table = TableBuilder::new(ui).striped(true).resizable(true);
        for column in columns {
            table = match column {
                MovieColumn::Title | MovieColumn::Genres => {
                    table.column(Column::initial(180.0).at_least(80.0).clip(true))
                }
                _ => table.column(Column::auto().at_least(50.0)),
            };
        }
        table
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for column in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(column.header());
                    });
                }
            })
            .body(|mut body| {
                for record in records {
                    body.row(ROW_HEIGHT, |mut row| {
                        for column in columns {
                            row.col(|ui: &mut Ui| {
                                ui.label(column.cell(record));
                            });
                        }
                    });
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Financials;

    #[test]
    fn cells_render_blank_for_nulls() {
        let record = MovieRecord {
            title: "Hereditary".into(),
            release_date: None,
            release_year: Some(2018),
            vote_average: Some(7.26),
            vote_count: None,
            popularity: None,
            runtime: Some(127.0),
            genre_names: Some("Horror, Mystery".into()),
            financials: Financials {
                budget: Some(10_000_000.0),
                profit_margin: Some(87.5),
                ..Default::default()
            },
        };
        assert_eq!(MovieColumn::Year.cell(&record), "2018");
        assert_eq!(MovieColumn::Rating.cell(&record), "7.3");
        assert_eq!(MovieColumn::Votes.cell(&record), "");
        assert_eq!(MovieColumn::Budget.cell(&record), "$10,000,000");
        assert_eq!(MovieColumn::Loss.cell(&record), "");
        assert_eq!(MovieColumn::ProfitMargin.cell(&record), "87.5%");
    }
}
