use std::env;
use std::path::PathBuf;

use super::analysis::AnalysisTable;
use super::error::Error;
use super::load::load;
use super::views::{Projector, PLOT_THRESHOLD};


pub const DEFAULT_OBSERVATIONS: &str = "./data/covid_19_clean_complete.csv";
pub const DEFAULT_POPULATION: &str = "./data/macro_corona_data.csv";


#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
	pub observations: PathBuf,
	pub population: PathBuf,
	pub top_n: usize,
}

impl Default for Settings {
	fn default() -> Self {
		Self{
			observations: DEFAULT_OBSERVATIONS.into(),
			population: DEFAULT_POPULATION.into(),
			top_n: PLOT_THRESHOLD,
		}
	}
}

fn parse_top_n(v: &str) -> Result<usize, Error> {
	match v.trim().parse::<usize>() {
		Ok(0) => Err(Error::Config{key: "COVID_TOP_N", reason: "must be at least 1".into()}),
		Ok(n) => Ok(n),
		Err(e) => Err(Error::Config{key: "COVID_TOP_N", reason: e.to_string()}),
	}
}

impl Settings {
	/// Reads `COVID_OBSERVATIONS`, `COVID_POPULATION` and `COVID_TOP_N`,
	/// falling back to the defaults for unset variables.
	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, Error> {
		let mut result = Self::default();
		if let Some(path) = lookup("COVID_OBSERVATIONS") {
			result.observations = path.into();
		}
		if let Some(path) = lookup("COVID_POPULATION") {
			result.population = path.into();
		}
		if let Some(v) = lookup("COVID_TOP_N") {
			result.top_n = parse_top_n(&v)?;
		}
		Ok(result)
	}

	pub fn load(&self) -> Result<AnalysisTable, Error> {
		load(&self.observations, &self.population)
	}

	pub fn projector<'t>(&self, table: &'t AnalysisTable) -> Projector<'t> {
		Projector::with_top_n(table, self.top_n)
	}
}
