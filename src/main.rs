use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;
use demandbias::config::ConfigManager;
use demandbias::data::CsvConnector;
use demandbias::engines::metrics::{ItemScore, MetricsEngine, YoyKpis};
use demandbias::engines::validation::{
    report_split_sparsity, DataSplitter, DateSplitter, FoldSparsity, RollingOriginSplitter,
    SplitPlan,
};
use demandbias::features::FeatureEngineer;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "demandbias", about = "Build time-aware validation splits for daily item sales")]
struct Args {
    /// Processed daily sales CSV (overrides `data.sales_path`)
    #[arg(long)]
    data: Option<PathBuf>,

    /// TOML config file; `DEMANDBIAS_<SECTION>__<FIELD>` environment variables override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only split this item
    #[arg(long)]
    item: Option<String>,

    /// Score predictions up to this date (default: day after the last prediction)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Print the configuration manifest and exit
    #[arg(long)]
    describe_config: bool,
}

#[derive(Debug, Serialize)]
struct ItemSplits {
    item: String,
    first_date: NaiveDate,
    last_date: NaiveDate,
    num_features: usize,
    plan: SplitPlan,
    sparsity: Vec<FoldSparsity>,
    holdout: Option<SplitPlan>,
}

#[derive(Debug, Serialize)]
struct ForecastScores {
    as_of: NaiveDate,
    window_days: i64,
    items: Vec<ItemScore>,
    year_over_year: Option<YoyKpis>,
}

#[derive(Debug, Serialize)]
struct Report {
    splits: Vec<ItemSplits>,
    scores: Option<ForecastScores>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let manager = ConfigManager::new();
    manager
        .load_layered(args.config.as_deref())
        .context("loading configuration")?;
    let config = manager.get()?;

    if args.describe_config {
        println!("{}", serde_json::to_string_pretty(&config.manifests())?);
        return Ok(());
    }

    let data_path = match args.data.or_else(|| config.data.sales_path.as_ref().map(PathBuf::from)) {
        Some(path) => path,
        None => bail!("no sales data given: pass --data or set data.sales_path"),
    };

    let df = CsvConnector::load_and_validate(&data_path, config.data.min_rows)
        .with_context(|| format!("loading {}", data_path.display()))?;
    let metadata = CsvConnector::create_metadata(&data_path, &df)?;
    log::info!(
        "Loaded {} rows for {} items, dates {:?}",
        metadata.num_rows,
        metadata.num_items,
        metadata.date_range
    );

    let mut by_item = CsvConnector::to_item_observations(&df)?;
    if let Some(item) = &args.item {
        by_item.retain(|name, _| name == item);
        if by_item.is_empty() {
            bail!("item '{}' not found in {}", item, data_path.display());
        }
    }

    let engineer = FeatureEngineer::new(config.calendar.clone())?;
    let enriched = engineer.engineer(&by_item)?;

    let splitter = RollingOriginSplitter::from_config(&config.validation)?;
    let holdout = config.validation.test_split_date.map(DateSplitter::new);

    let mut output = Vec::with_capacity(enriched.len());
    for item in &enriched {
        let series = item.series();
        let plan = splitter
            .split(series)
            .with_context(|| format!("splitting '{}'", series.item()))?;
        let sparsity = report_split_sparsity(&plan, &series.sales_qty())?;
        let holdout = match &holdout {
            Some(date_splitter) => Some(
                date_splitter
                    .split(series)
                    .with_context(|| format!("hold-out split of '{}'", series.item()))?,
            ),
            None => None,
        };

        output.push(ItemSplits {
            item: series.item().to_string(),
            first_date: series.first_date(),
            last_date: series.last_date(),
            num_features: item.feature_names().len(),
            plan,
            sparsity,
            holdout,
        });
    }

    let scores = if CsvConnector::has_predictions(&df) {
        let mut records = CsvConnector::to_prediction_records(&df)?;
        records.retain(|name, _| by_item.contains_key(name));

        let as_of = match args.as_of {
            Some(date) => Some(date),
            None => records
                .values()
                .flat_map(|r| r.iter().map(|p| p.date))
                .max()
                .and_then(|d| d.succ_opt()),
        };

        match as_of {
            Some(as_of) => {
                let window_days = config.evaluation.window_days;
                let items = MetricsEngine::scores_per_item(&records, as_of, window_days)?;

                let all: Vec<_> = records.values().flatten().copied().collect();
                let year_over_year = match MetricsEngine::year_over_year(&all, as_of) {
                    Ok(kpis) => Some(kpis),
                    Err(e) => {
                        log::warn!("Year-over-year KPIs unavailable: {}", e);
                        None
                    }
                };

                Some(ForecastScores {
                    as_of,
                    window_days,
                    items,
                    year_over_year,
                })
            }
            None => {
                log::warn!("Prediction column present but empty; skipping scores");
                None
            }
        }
    } else {
        None
    };

    let report = Report {
        splits: output,
        scores,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
