use eframe::egui::{self, ScrollArea, Ui};

use crate::color::ColorScale;
use crate::data::filter::FilteredView;
use crate::data::model::NumericField;
use crate::data::stats::{self, YearAggregate};
use crate::state::{AppState, Tab};
use crate::ui::tables::{self, LOSS_COLUMNS, POPULAR_COLUMNS, PROFIT_COLUMNS, RATED_COLUMNS};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HorrorLensApp {
    pub state: AppState,
}

impl HorrorLensApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for HorrorLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics + tabs ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &mut self.state);
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.heading("💀 Horror Movie Analysis");

    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.label());
        }
    });
    ui.separator();

    // Borrow fields separately so the temporal tab can edit `year_aggregate`.
    let view = FilteredView::from_indices(&state.dataset, state.visible_indices.clone());
    let summary = stats::summary_metrics(&view);
    panels::metrics_row(ui, &view, &summary);
    ui.separator();

    let charts = &state.config.charts;
    let year_aggregate = &mut state.year_aggregate;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.tab {
            Tab::Overview => overview_tab(ui, &view, charts.histogram_bins, charts.top_limit),
            Tab::Movies => movies_tab(ui, &view, charts.top_limit),
            Tab::Financial => financial_tab(ui, &view, charts.financial_limit),
            Tab::Temporal => temporal_tab(ui, &view, year_aggregate),
        });
}

fn overview_tab(ui: &mut Ui, view: &FilteredView<'_>, bins: usize, top: usize) {
    ui.heading("Rating distribution");
    let buckets = stats::rating_histogram(view, bins);
    plot::histogram_chart(ui, "rating_histogram", &buckets, "Average rating");

    ui.columns(2, |cols| {
        cols[0].heading("Top genres");
        plot::genre_chart(&mut cols[0], &stats::top_genres(view, top));

        cols[1].heading("Runtime vs rating");
        let points = stats::scatter(view, NumericField::Runtime, NumericField::VoteAverage, None);
        plot::scatter_chart(
            &mut cols[1],
            "runtime_vs_rating",
            &points,
            (NumericField::Runtime.label(), NumericField::VoteAverage.label()),
        );
    });
}

fn movies_tab(ui: &mut Ui, view: &FilteredView<'_>, top: usize) {
    ui.heading("Most popular");
    let popular = stats::top_by_field(view, NumericField::Popularity, top, false);
    tables::movie_table(ui, "most_popular", &popular, POPULAR_COLUMNS);

    ui.add_space(12.0);
    ui.heading("Best rated");
    let rated = stats::top_by_field(view, NumericField::VoteAverage, top, false);
    tables::movie_table(ui, "best_rated", &rated, RATED_COLUMNS);
}

fn financial_tab(ui: &mut Ui, view: &FilteredView<'_>, top: usize) {
    if !view.has_financial_data() {
        ui.colored_label(
            egui::Color32::YELLOW,
            "Financial data is not available for the selected filters",
        );
        return;
    }

    ui.heading("Financial performance");
    ui.columns(2, |cols| {
        cols[0].label(format!("Top {top} most profitable"));
        tables::movie_table(
            &mut cols[0],
            "most_profitable",
            &stats::profitable_top(view, top),
            PROFIT_COLUMNS,
        );

        cols[1].label(format!("Top {top} biggest losses"));
        tables::movie_table(&mut cols[1], "biggest_losses", &stats::loss_top(view, top), LOSS_COLUMNS);
    });

    ui.add_space(12.0);
    ui.heading("Budget vs revenue");
    let points = stats::scatter(
        view,
        NumericField::Budget,
        NumericField::Revenue,
        Some(NumericField::VoteAverage),
    );
    plot::colored_scatter_chart(
        ui,
        "budget_vs_revenue",
        &points,
        (NumericField::Budget.label(), NumericField::Revenue.label()),
        &ColorScale::fitted(points.iter().filter_map(|p| p.color)),
    );

    ui.heading("Profit margin by year");
    let margins = stats::group_by_year(view, NumericField::ProfitMargin, YearAggregate::Mean);
    plot::year_line_chart(ui, "profit_margin_by_year", &margins, NumericField::ProfitMargin.label());
}

fn temporal_tab(ui: &mut Ui, view: &FilteredView<'_>, agg: &mut YearAggregate) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Per-year statistic");
        egui::ComboBox::from_id_salt("year_aggregate")
            .selected_text(agg.label())
            .show_ui(ui, |ui: &mut Ui| {
                for option in YearAggregate::ALL {
                    ui.selectable_value(agg, option, option.label());
                }
            });
    });

    ui.heading("Releases per year");
    let counts: Vec<(i32, f64)> = stats::counts_per_year(view)
        .into_iter()
        .map(|(year, n)| (year, n as f64))
        .collect();
    plot::year_line_chart(ui, "releases_per_year", &counts, "Movies");

    ui.heading(format!("{} rating per year", agg.label()));
    let ratings = stats::group_by_year(view, NumericField::VoteAverage, *agg);
    plot::year_line_chart(ui, "rating_per_year", &ratings, NumericField::VoteAverage.label());

    ui.heading(format!("{} runtime per year", agg.label()));
    let runtimes = stats::group_by_year(view, NumericField::Runtime, *agg);
    plot::year_line_chart(ui, "runtime_per_year", &runtimes, NumericField::Runtime.label());
}
