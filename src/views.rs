use std::collections::{BTreeMap, HashSet};

use enum_map::EnumMap;

use chrono::NaiveDate;

use log::trace;

use super::context::Metric;
use super::analysis::{AnalysisRow, AnalysisTable};


/// How many countries the ranked views keep.
pub const PLOT_THRESHOLD: usize = 35;

pub const ALL_COUNTRIES: &str = "All Countries";


/// Sums of the numeric columns over a group of rows. Missing per-capita
/// values do not contribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
	counts: EnumMap<Metric, i64>,
	per_capita: EnumMap<Metric, i64>,
	rows: usize,
}

impl Totals {
	pub fn add(&mut self, row: &AnalysisRow) {
		for &metric in Metric::ALL.iter() {
			self.counts[metric] += row.count(metric);
			if let Some(v) = row.per_capita(metric) {
				self.per_capita[metric] += v;
			}
		}
		self.rows += 1;
	}

	pub fn count(&self, metric: Metric) -> i64 {
		self.counts[metric]
	}

	pub fn per_capita(&self, metric: Metric) -> i64 {
		self.per_capita[metric]
	}

	pub fn value(&self, metric: Metric, per_capita: bool) -> i64 {
		if per_capita {
			self.per_capita(metric)
		} else {
			self.count(metric)
		}
	}

	/// Number of source rows summed into this group.
	pub fn rows(&self) -> usize {
		self.rows
	}
}


#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker<'t> {
	pub lat: f64,
	pub lon: f64,
	pub size: f64,
	pub text: &'t str,
}

/// One animation frame of the bubble map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFrame<'t> {
	pub date: NaiveDate,
	pub markers: Vec<MapMarker<'t>>,
}


#[derive(Debug, Clone, PartialEq)]
pub struct Bar<'t> {
	pub country: &'t str,
	/// Plotted length; log10 of `count` for absolute confirmed cases.
	pub value: f64,
	/// The summed series value, per-capita in per-capita mode.
	pub count: i64,
	pub hover: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart<'t> {
	pub metric: Metric,
	pub per_capita: bool,
	pub x_label: String,
	pub color: Option<&'static str>,
	/// Ascending by `count`.
	pub bars: Vec<Bar<'t>>,
}


#[derive(Debug, Clone, PartialEq)]
pub struct CountryPoint<'t> {
	pub date: NaiveDate,
	pub country: &'t str,
	pub value: i64,
	pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryTimeline<'t> {
	pub metric: Metric,
	pub per_capita: bool,
	pub points: Vec<CountryPoint<'t>>,
}


#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePoint {
	pub date: NaiveDate,
	pub series: &'static str,
	pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TotalTimeline {
	pub title: String,
	pub per_capita: bool,
	pub points: Vec<TimelinePoint>,
}


fn is_log_scaled(metric: Metric, per_capita: bool) -> bool {
	metric == Metric::Confirmed && !per_capita
}

fn plotted_bar_value(metric: Metric, per_capita: bool, count: i64) -> f64 {
	if !is_log_scaled(metric, per_capita) {
		return count as f64
	}
	if count > 0 {
		(count as f64).log10()
	} else {
		0.0
	}
}


/// Read-only projections of an analysis table into chart-ready series.
/// Holds no state beyond the table reference, so any number of projectors
/// may run over the same table at once.
#[derive(Debug, Clone, Copy)]
pub struct Projector<'t> {
	table: &'t AnalysisTable,
	top_n: usize,
}

impl<'t> Projector<'t> {
	pub fn new(table: &'t AnalysisTable) -> Self {
		Self::with_top_n(table, PLOT_THRESHOLD)
	}

	pub fn with_top_n(table: &'t AnalysisTable, top_n: usize) -> Self {
		Self{
			table,
			top_n,
		}
	}

	pub fn top_n(&self) -> usize {
		self.top_n
	}

	/// Countries at the latest date, summed over their sub-regions and
	/// ranked by the selected series in descending order. Ties keep
	/// alphabetical order.
	pub fn top_countries(&self, metric: Metric, per_capita: bool) -> Vec<(&'t str, Totals)> {
		let mut groups: BTreeMap<&'t str, Totals> = BTreeMap::new();
		for row in self.table.latest_rows() {
			groups.entry(row.country.as_str()).or_default().add(row);
		}
		let mut ranked: Vec<(&'t str, Totals)> = groups.into_iter().collect();
		ranked.sort_by(|a, b| b.1.value(metric, per_capita).cmp(&a.1.value(metric, per_capita)));
		ranked.truncate(self.top_n);
		ranked
	}

	/// Bubble map frames, one per date, of all rows with a positive value
	/// of the selected series. A missing per-capita value is not positive.
	pub fn map(&self, metric: Metric, per_capita: bool) -> Vec<MapFrame<'t>> {
		let mut frames: BTreeMap<NaiveDate, Vec<MapMarker<'t>>> = BTreeMap::new();
		for row in self.table.rows().iter() {
			let value = match row.value(metric, per_capita) {
				Some(v) if v > 0 => v,
				_ => continue,
			};
			let size = if is_log_scaled(metric, per_capita) {
				row.log_cum_conf
			} else {
				value as f64
			};
			frames.entry(row.date()).or_default().push(MapMarker{
				lat: row.observation.latitude,
				lon: row.observation.longitude,
				size,
				text: row.description.as_str(),
			});
		}
		trace!("map({}): {} frames", metric.series_name(per_capita), frames.len());
		frames.into_iter().map(|(date, markers)| MapFrame{date, markers}).collect()
	}

	/// Latest-date totals of the top countries, ascending by the selected
	/// series.
	pub fn ranked_bars(&self, metric: Metric, per_capita: bool) -> BarChart<'t> {
		let series = metric.series_name(per_capita);
		let mut ranked = self.top_countries(metric, per_capita);
		ranked.sort_by_key(|(_, totals)| totals.value(metric, per_capita));
		let bars: Vec<Bar<'t>> = ranked.into_iter().map(|(country, totals)| {
			let count = totals.value(metric, per_capita);
			Bar{
				country,
				value: plotted_bar_value(metric, per_capita, count),
				count,
				hover: format!("{}: {}", series, count),
			}
		}).collect();
		trace!("ranked_bars({}): {} bars", series, bars.len());
		let x_label = if is_log_scaled(metric, per_capita) {
			format!("{} (log10)", series)
		} else {
			series.to_string()
		};
		BarChart{
			metric,
			per_capita,
			x_label,
			color: metric.default_color(),
			bars,
		}
	}

	/// Full history of the top countries, one point per (date, country),
	/// sorted by date and then country.
	pub fn country_timeline(&self, metric: Metric, per_capita: bool) -> CountryTimeline<'t> {
		let top: HashSet<&'t str> = self.top_countries(metric, per_capita).into_iter().map(|(country, _)| country).collect();
		let mut groups: BTreeMap<(NaiveDate, &'t str), Totals> = BTreeMap::new();
		for row in self.table.rows().iter() {
			let country = row.country.as_str();
			if !top.contains(country) {
				continue
			}
			groups.entry((row.date(), country)).or_default().add(row);
		}
		trace!("country_timeline({}): {} countries, {} points", metric.series_name(per_capita), top.len(), groups.len());
		CountryTimeline{
			metric,
			per_capita,
			points: groups.into_iter().map(|((date, country), totals)| CountryPoint{
				date,
				country,
				value: totals.value(metric, per_capita),
				totals,
			}).collect(),
		}
	}

	/// Daily sums of every metric over all rows with confirmed cases,
	/// optionally restricted to one country (exact name match). An empty
	/// country name means no filter.
	pub fn total_timeline(&self, country: Option<&str>, per_capita: bool) -> TotalTimeline {
		let country = country.filter(|c| !c.is_empty());
		let mut groups: BTreeMap<NaiveDate, Totals> = BTreeMap::new();
		for row in self.table.rows().iter() {
			if let Some(name) = country {
				if row.country.as_str() != name {
					continue
				}
			}
			if row.observation.confirmed <= 0 {
				continue
			}
			groups.entry(row.date()).or_default().add(row);
		}
		let mut points = Vec::with_capacity(groups.len() * Metric::TIMELINE.len());
		for (date, totals) in groups.iter() {
			for &metric in Metric::TIMELINE.iter() {
				points.push(TimelinePoint{
					date: *date,
					series: metric.series_name(per_capita),
					value: totals.value(metric, per_capita),
				});
			}
		}
		trace!("total_timeline({:?}, {}): {} points", country, per_capita, points.len());
		TotalTimeline{
			title: country.unwrap_or(ALL_COUNTRIES).to_string(),
			per_capita,
			points,
		}
	}
}
