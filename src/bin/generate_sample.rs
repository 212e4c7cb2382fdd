//! Writes a synthetic horror movie table as `sample_movies.csv` and
//! `sample_movies.parquet` for trying the dashboard without real data.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const MOVIES: usize = 600;

const SUBGENRES: [&str; 9] = [
    "Thriller",
    "Mystery",
    "Comedy",
    "Science Fiction",
    "Fantasy",
    "Drama",
    "Action",
    "War",
    "Crime",
];

const WORDS: [&str; 12] = [
    "House", "Night", "Curse", "Hollow", "Shadow", "Ritual", "Cellar", "Harvest", "Static",
    "Lake", "Mask", "Whisper",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// One synthetic row; money columns are null for most small releases.
struct Movie {
    title: String,
    release_date: String,
    vote_average: f64,
    vote_count: i64,
    popularity: f64,
    runtime: f64,
    genre_names: String,
    budget: Option<f64>,
    revenue: Option<f64>,
    profit: Option<f64>,
    loss: Option<f64>,
}

fn generate(rng: &mut SimpleRng, n: usize) -> Vec<Movie> {
    (0..n)
        .map(|i| {
            let year = 1960 + (rng.next_u64() % 63) as i32;
            let month = 1 + rng.next_u64() % 12;
            let day = 1 + rng.next_u64() % 28;

            let mut genres = vec!["Horror"];
            for _ in 0..(rng.next_u64() % 3) {
                let g = rng.pick(&SUBGENRES);
                if !genres.contains(&g) {
                    genres.push(g);
                }
            }

            let (budget, revenue) = if rng.chance(0.3) {
                let budget = (rng.range(0.2, 60.0) * 1e6).round();
                let revenue = (budget * rng.range(0.0, 6.0)).round();
                (Some(budget), Some(revenue))
            } else {
                (None, None)
            };
            let profit = budget.zip(revenue).map(|(b, r)| r - b);
            let loss = profit.filter(|p| *p < 0.0).map(f64::abs);

            Movie {
                title: format!("The {} {} #{i}", rng.pick(&WORDS), rng.pick(&WORDS)),
                release_date: format!("{year}-{month:02}-{day:02}"),
                vote_average: (rng.range(2.0, 9.0) * 10.0).round() / 10.0,
                vote_count: (rng.range(0.0, 8000.0)) as i64,
                popularity: (rng.range(0.6, 120.0) * 1000.0).round() / 1000.0,
                runtime: if rng.chance(0.05) { 0.0 } else { rng.range(70.0, 140.0).round() },
                genre_names: genres.join(", "),
                budget,
                revenue,
                profit,
                loss,
            }
        })
        .collect()
}

fn fmt_money(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.0}")).unwrap_or_default()
}

fn write_csv(movies: &[Movie], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "title",
        "release_date",
        "vote_average",
        "vote_count",
        "popularity",
        "runtime",
        "genre_names",
        "budget",
        "revenue",
        "profit",
        "loss",
    ])?;
    for m in movies {
        writer.write_record([
            m.title.clone(),
            m.release_date.clone(),
            m.vote_average.to_string(),
            m.vote_count.to_string(),
            m.popularity.to_string(),
            m.runtime.to_string(),
            m.genre_names.clone(),
            fmt_money(m.budget),
            fmt_money(m.revenue),
            fmt_money(m.profit),
            fmt_money(m.loss),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(movies: &[Movie], path: &str) -> Result<()> {
    let text = |f: fn(&Movie) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(movies.iter().map(f).collect::<Vec<_>>()))
    };
    let num = |f: fn(&Movie) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(movies.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("title", DataType::Utf8, false),
        Field::new("release_date", DataType::Utf8, false),
        Field::new("vote_average", DataType::Float64, true),
        Field::new("vote_count", DataType::Int64, false),
        Field::new("popularity", DataType::Float64, true),
        Field::new("runtime", DataType::Float64, true),
        Field::new("genre_names", DataType::Utf8, false),
        Field::new("budget", DataType::Float64, true),
        Field::new("revenue", DataType::Float64, true),
        Field::new("profit", DataType::Float64, true),
        Field::new("loss", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|m| m.title.as_str()),
            text(|m| m.release_date.as_str()),
            num(|m| Some(m.vote_average)),
            Arc::new(Int64Array::from(
                movies.iter().map(|m| m.vote_count).collect::<Vec<_>>(),
            )) as ArrayRef,
            num(|m| Some(m.popularity)),
            num(|m| Some(m.runtime)),
            text(|m| m.genre_names.as_str()),
            num(|m| m.budget),
            num(|m| m.revenue),
            num(|m| m.profit),
            num(|m| m.loss),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(1978);
    let movies = generate(&mut rng, MOVIES);

    write_csv(&movies, "sample_movies.csv")?;
    write_parquet(&movies, "sample_movies.parquet")?;

    println!(
        "Wrote {} movies to sample_movies.csv and sample_movies.parquet",
        movies.len()
    );
    Ok(())
}
