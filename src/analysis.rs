use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

use smartstring::alias::{String as SmartString};

use chrono::NaiveDate;

use log::{debug, warn};

use super::context::{Metric, PopulationRecord, RawObservation};
use super::names::{continent_label, normalize_country};


pub const PER_CAPITA_SCALE: f64 = 100000.0;

/// Counts above this use the flatter logarithm base for map marker sizes.
pub const MARKER_BASE_SWITCH: i64 = 700;

const STATE_COUNTRY_SEPARATOR: &str = " ";


/// Map marker size for a cumulative confirmed count.
pub fn log_cum_conf(confirmed: i64) -> f64 {
	if confirmed <= 0 {
		return 0.0
	}
	let base: f64 = if confirmed > MARKER_BASE_SWITCH {
		1.01
	} else {
		1.05
	};
	(confirmed as f64).ln() / base.ln()
}

/// `value` per 100k inhabitants. Missing when the population is unknown
/// or zero.
pub fn per_capita(value: i64, population: Option<u64>) -> Option<i64> {
	let population = match population {
		Some(p) if p > 0 => p as f64,
		_ => return None,
	};
	Some((value as f64 / population * PER_CAPITA_SCALE).round_ties_even() as i64)
}

/// Order of magnitude of `confirmed`, `ceil(log10(confirmed))`, or 0.
pub fn log10_bucket(confirmed: i64) -> i32 {
	if confirmed <= 0 {
		return 0
	}
	(confirmed as f64).log10().ceil() as i32
}

/// Label of the bucket `k` as `"{10^(k-1)}-{10^k}"`, each bound truncated
/// to an integer (so bucket 0 reads `"0-1"`).
pub fn log_group(k: i32) -> String {
	let low = 10f64.powi(k - 1) as i64;
	let high = 10f64.powi(k) as i64;
	format!("{}-{}", low, high)
}


#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRow {
	pub observation: RawObservation,
	pub population: Option<u64>,
	pub country: SmartString,
	pub continent: SmartString,
	pub state: SmartString,
	pub state_country: String,
	pub active: i64,
	pub log_cum_conf: f64,
	pub confirmed_per_capita: Option<i64>,
	pub active_per_capita: Option<i64>,
	pub recovered_per_capita: Option<i64>,
	pub deaths_per_capita: Option<i64>,
	pub log10_bucket: i32,
	pub log_group: String,
	pub description: String,
}

impl AnalysisRow {
	/// Derives every analysis column from one observation and the
	/// population joined to it. Depends on nothing but its arguments.
	pub fn derive(observation: RawObservation, population: Option<u64>) -> Self {
		let country: SmartString = normalize_country(&observation.region).into();
		let continent = continent_label(&country);
		let state = match &observation.province {
			Some(province) => province.clone(),
			None => country.clone(),
		};
		let state_country = format!("{}{}{}", state, STATE_COUNTRY_SEPARATOR, country);
		let active = observation.confirmed - observation.recovered;
		let log10_bucket = log10_bucket(observation.confirmed);

		let mut row = Self{
			population,
			log_cum_conf: log_cum_conf(observation.confirmed),
			confirmed_per_capita: per_capita(observation.confirmed, population),
			active_per_capita: per_capita(active, population),
			recovered_per_capita: per_capita(observation.recovered, population),
			deaths_per_capita: per_capita(observation.deaths, population),
			log_group: log_group(log10_bucket),
			log10_bucket,
			active,
			observation,
			country,
			continent,
			state,
			state_country,
			description: String::new(),
		};
		row.description = row.describe();
		row
	}

	fn describe(&self) -> String {
		let mut s = String::new();
		// writing into a String cannot fail
		let _ = write!(s, "{}, {}, {}<br>", self.state, self.country, self.continent);
		let _ = write!(s, "Confirmed: {}<br>", self.observation.confirmed);
		match self.confirmed_per_capita {
			Some(v) => { let _ = write!(s, "Confirmed Per Capita: {}<br>", v); },
			None => s.push_str("Confirmed Per Capita: n/a<br>"),
		}
		let _ = write!(s, "Recovered: {}<br>", self.observation.recovered);
		let _ = write!(s, "Active: {}<br>", self.active);
		let _ = write!(s, "Deaths: {}<br>", self.observation.deaths);
		let _ = write!(s, "Confirmed Range: {}<br>", self.log_group);
		s
	}

	#[inline(always)]
	pub fn date(&self) -> NaiveDate {
		self.observation.date
	}

	pub fn count(&self, metric: Metric) -> i64 {
		match metric {
			Metric::Confirmed => self.observation.confirmed,
			Metric::Active => self.active,
			Metric::Recovered => self.observation.recovered,
			Metric::Deaths => self.observation.deaths,
		}
	}

	pub fn per_capita(&self, metric: Metric) -> Option<i64> {
		match metric {
			Metric::Confirmed => self.confirmed_per_capita,
			Metric::Active => self.active_per_capita,
			Metric::Recovered => self.recovered_per_capita,
			Metric::Deaths => self.deaths_per_capita,
		}
	}

	/// The absolute count or its per-capita rate. Only the latter can be
	/// missing.
	pub fn value(&self, metric: Metric, per_capita: bool) -> Option<i64> {
		if per_capita {
			self.per_capita(metric)
		} else {
			Some(self.count(metric))
		}
	}
}


/// The joined and derived table. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct AnalysisTable {
	rows: Vec<AnalysisRow>,
	latest: Option<NaiveDate>,
}

impl AnalysisTable {
	pub fn rows(&self) -> &[AnalysisRow] {
		&self.rows[..]
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn latest_date(&self) -> Option<NaiveDate> {
		self.latest
	}

	pub fn latest_rows(&self) -> impl Iterator<Item = &AnalysisRow> {
		let latest = self.latest;
		self.rows.iter().filter(move |row| Some(row.date()) == latest)
	}

	/// Sorted, de-duplicated normalized country names.
	pub fn countries(&self) -> Vec<&str> {
		let set: BTreeSet<&str> = self.rows.iter().map(|row| row.country.as_str()).collect();
		set.into_iter().collect()
	}

	pub fn observations(&self) -> impl Iterator<Item = &RawObservation> {
		self.rows.iter().map(|row| &row.observation)
	}
}


fn population_index(population: &[PopulationRecord]) -> HashMap<&str, Option<u64>> {
	let mut index = HashMap::with_capacity(population.len());
	for rec in population.iter() {
		if index.contains_key(rec.country.as_str()) {
			warn!("ignoring duplicate population row for {:?}", rec.country);
			continue
		}
		index.insert(rec.country.as_str(), rec.population);
	}
	index
}

/// Left-joins the observations against the population table on the
/// normalized country name and derives all analysis columns. Yields exactly
/// one row per observation, in input order.
pub fn wrangle(observations: Vec<RawObservation>, population: &[PopulationRecord]) -> AnalysisTable {
	let index = population_index(population);
	let mut misses: BTreeSet<SmartString> = BTreeSet::new();
	let mut latest: Option<NaiveDate> = None;
	let mut rows = Vec::with_capacity(observations.len());
	for obs in observations.into_iter() {
		let country = normalize_country(&obs.region);
		let population = match index.get(country) {
			Some(p) => *p,
			None => {
				if !misses.contains(country) {
					misses.insert(country.into());
				}
				None
			},
		};
		latest = latest.max(Some(obs.date));
		rows.push(AnalysisRow::derive(obs, population));
	}
	if !misses.is_empty() {
		debug!("no population known for {} countries: {:?}", misses.len(), misses);
	}
	debug!("derived {} analysis rows, latest date {:?}", rows.len(), latest);
	AnalysisTable{
		rows,
		latest,
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	fn obs(province: Option<&str>, region: &str, date: NaiveDate, confirmed: i64, recovered: i64, deaths: i64) -> RawObservation {
		RawObservation{
			province: province.map(|s| s.into()),
			region: region.into(),
			latitude: 1.5,
			longitude: -2.5,
			date,
			confirmed,
			recovered,
			deaths,
		}
	}

	fn pop(country: &str, population: Option<u64>) -> PopulationRecord {
		PopulationRecord{
			country: country.into(),
			population,
		}
	}

	fn day(d: u32) -> NaiveDate {
		NaiveDate::from_ymd(2020, 3, d)
	}

	#[test]
	fn marker_size_switches_base_above_700() {
		assert_eq!(log_cum_conf(0), 0.0);
		assert_eq!(log_cum_conf(-3), 0.0);
		assert_eq!(log_cum_conf(1), 0.0);
		assert_eq!(log_cum_conf(700), 700f64.ln() / 1.05f64.ln());
		assert_eq!(log_cum_conf(701), 701f64.ln() / 1.01f64.ln());
		assert!(log_cum_conf(701) > log_cum_conf(700));
	}

	#[test]
	fn per_capita_is_missing_without_population() {
		assert_eq!(per_capita(100, Some(50000)), Some(200));
		assert_eq!(per_capita(100, None), None);
		assert_eq!(per_capita(100, Some(0)), None);
		assert_eq!(per_capita(-30, Some(100000)), Some(-30));
		assert_eq!(per_capita(0, Some(7)), Some(0));
	}

	#[test]
	fn buckets_by_order_of_magnitude() {
		assert_eq!(log10_bucket(0), 0);
		assert_eq!(log10_bucket(1), 0);
		assert_eq!(log10_bucket(2), 1);
		assert_eq!(log10_bucket(10), 1);
		assert_eq!(log10_bucket(11), 2);
		assert_eq!(log10_bucket(100), 2);
		assert_eq!(log10_bucket(101), 3);
		assert_eq!(log10_bucket(1000), 3);
		assert_eq!(log_group(0), "0-1");
		assert_eq!(log_group(1), "1-10");
		assert_eq!(log_group(3), "100-1000");
	}

	#[test]
	fn derives_the_reference_row() {
		let row = AnalysisRow::derive(obs(None, "Italy", day(1), 100, 30, 4), Some(50000));
		assert_eq!(row.country.as_str(), "Italy");
		assert_eq!(row.state.as_str(), "Italy");
		assert_eq!(row.state_country, "Italy Italy");
		assert_eq!(row.continent.as_str(), "EU");
		assert_eq!(row.active, 70);
		assert_eq!(row.confirmed_per_capita, Some(200));
		assert_eq!(row.active_per_capita, Some(140));
		assert_eq!(row.recovered_per_capita, Some(60));
		assert_eq!(row.deaths_per_capita, Some(8));
		assert_eq!(row.log_cum_conf, 100f64.ln() / 1.05f64.ln());
		assert_eq!(row.log10_bucket, 2);
		assert_eq!(row.log_group, "10-100");
		assert_eq!(
			row.description,
			"Italy, Italy, EU<br>Confirmed: 100<br>Confirmed Per Capita: 200<br>Recovered: 30<br>Active: 70<br>Deaths: 4<br>Confirmed Range: 10-100<br>",
		);
	}

	#[test]
	fn keeps_negative_active_counts() {
		let row = AnalysisRow::derive(obs(Some("Hubei"), "China", day(2), 10, 12, 0), None);
		assert_eq!(row.active, -2);
		assert_eq!(row.state.as_str(), "Hubei");
		assert_eq!(row.state_country, "Hubei China");
		assert_eq!(row.confirmed_per_capita, None);
		assert!(row.description.contains("Confirmed Per Capita: n/a<br>"));
		assert!(row.description.contains("Active: -2<br>"));
	}

	#[test]
	fn wrangle_left_joins_on_normalized_names() {
		let table = wrangle(
			vec![
				obs(None, "US", day(1), 1000, 10, 5),
				obs(None, "Diamond Princess", day(1), 700, 0, 1),
				obs(None, "Korea, South", day(2), 50, 0, 0),
			],
			&[
				pop("United States", Some(331002651)),
				pop("South Korea", Some(51269185)),
				pop("Atlantis", Some(10)),
			],
		);
		assert_eq!(table.len(), 3);
		let rows = table.rows();
		assert_eq!(rows[0].country.as_str(), "United States");
		assert_eq!(rows[0].continent.as_str(), "NA");
		assert_eq!(rows[0].population, Some(331002651));
		assert_eq!(rows[1].population, None);
		assert_eq!(rows[1].continent.as_str(), "Diamond Princess");
		assert_eq!(rows[1].confirmed_per_capita, None);
		assert_eq!(rows[2].country.as_str(), "South Korea");
		assert_eq!(rows[2].population, Some(51269185));
		assert_eq!(table.latest_date(), Some(day(2)));
		assert_eq!(table.countries(), vec!["Diamond Princess", "South Korea", "United States"]);
	}

	#[test]
	fn duplicate_population_rows_do_not_duplicate_observations() {
		let table = wrangle(
			vec![obs(None, "Italy", day(1), 10, 0, 0)],
			&[pop("Italy", Some(1000)), pop("Italy", Some(2000))],
		);
		assert_eq!(table.len(), 1);
		assert_eq!(table.rows()[0].population, Some(1000));
	}

	#[test]
	fn rewrangling_is_stable() {
		let population = [pop("Italy", Some(60461826)), pop("China", None)];
		let first = wrangle(
			vec![
				obs(None, "Italy", day(1), 1694, 83, 34),
				obs(Some("Hubei"), "China", day(1), 67103, 2909, 3139),
				obs(None, "Spain", day(2), 0, 0, 0),
			],
			&population,
		);
		let second = wrangle(first.observations().cloned().collect(), &population);
		assert_eq!(first.rows(), second.rows());
	}

	#[test]
	fn empty_input_has_no_latest_date() {
		let table = wrangle(Vec::new(), &[]);
		assert!(table.is_empty());
		assert_eq!(table.latest_date(), None);
		assert_eq!(table.latest_rows().count(), 0);
	}
}
