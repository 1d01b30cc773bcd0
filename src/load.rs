use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;

use log::debug;

use super::context::{PopulationRecord, RawObservation};
use super::analysis::{wrangle, AnalysisTable};
use super::error::Error;
use super::ioutil::open_table;
use super::progress::{default_output, ProgressSink};


fn check_columns<R: io::Read>(
		r: &mut csv::Reader<R>,
		table: &'static str,
		required: &[&'static str],
) -> Result<(), Error> {
	let headers = r.headers()?;
	for &column in required.iter() {
		if !headers.iter().any(|h| h.trim() == column) {
			return Err(Error::MissingColumn{table, column})
		}
	}
	Ok(())
}

fn read_records<T: DeserializeOwned, R: io::Read, S: ProgressSink + ?Sized>(
		r: R,
		table: &'static str,
		required: &[&'static str],
		progress: &mut S,
) -> Result<Vec<T>, Error> {
	let mut r = csv::ReaderBuilder::new()
		.trim(csv::Trim::Headers)
		.from_reader(r);
	check_columns(&mut r, table, required)?;
	let mut result: Vec<T> = Vec::new();
	for (i, row) in r.deserialize::<T>().enumerate() {
		result.push(row?);
		if i % 10000 == 9999 {
			progress.update(i+1);
		}
	}
	progress.finish(result.len());
	debug!("read {} {} rows", result.len(), table);
	Ok(result)
}

pub fn read_observations<R: io::Read, S: ProgressSink + ?Sized>(r: R, progress: &mut S) -> Result<Vec<RawObservation>, Error> {
	read_records(r, "observations", &RawObservation::COLUMNS, progress)
}

pub fn read_population<R: io::Read, S: ProgressSink + ?Sized>(r: R, progress: &mut S) -> Result<Vec<PopulationRecord>, Error> {
	read_records(r, "population", &PopulationRecord::COLUMNS, progress)
}

/// Reads both source tables from disk and builds the analysis table. Any
/// structural problem in either file aborts the whole load.
pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(observations: P, population: Q) -> Result<AnalysisTable, Error> {
	debug!("loading observations from {}", observations.as_ref().display());
	let observations = read_observations(
		open_table(observations)?,
		&mut *default_output("observations"),
	)?;
	debug!("loading population from {}", population.as_ref().display());
	let population = read_population(
		open_table(population)?,
		&mut *default_output("population"),
	)?;
	Ok(wrangle(observations, &population[..]))
}


#[cfg(test)]
mod tests {
	use super::*;

	use crate::progress::NullProgress;

	#[test]
	fn missing_observation_column_is_structural() {
		let data = "Province/State,Country/Region,Lat,Long,Date,Confirmed,Deaths\n,Italy,43,12,2020-03-01,10,0\n";
		match read_observations(data.as_bytes(), &mut NullProgress) {
			Err(Error::MissingColumn{table, column}) => {
				assert_eq!(table, "observations");
				assert_eq!(column, "Recovered");
			},
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn missing_population_column_is_structural() {
		let data = "Country,Inhabitants\nItaly,60461826\n";
		match read_population(data.as_bytes(), &mut NullProgress) {
			Err(Error::MissingColumn{column, ..}) => assert_eq!(column, "Population"),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn extra_columns_are_ignored() {
		let data = "\
Province/State,Country/Region,Lat,Long,Date,Confirmed,Deaths,Recovered,Active,WHO Region
,Italy,43.0,12.0,2020-03-01,1694,34,83,1577,Europe
";
		let rows = read_observations(data.as_bytes(), &mut NullProgress).unwrap();
		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].recovered, 83);
		assert_eq!(rows[0].deaths, 34);
	}

	#[test]
	fn malformed_rows_propagate() {
		let data = "\
Province/State,Country/Region,Lat,Long,Date,Confirmed,Recovered,Deaths
,Italy,43.0,12.0,yesterday,1694,83,34
";
		match read_observations(data.as_bytes(), &mut NullProgress) {
			Err(Error::Csv(_)) => (),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn multibyte_timestamps_propagate() {
		let data = "\
Province/State,Country/Region,Lat,Long,Date,Confirmed,Recovered,Deaths
,Italy,43.0,12.0,2020-03-0\u{e9}00:00:00,1694,83,34
";
		match read_observations(data.as_bytes(), &mut NullProgress) {
			Err(Error::Csv(_)) => (),
			other => panic!("unexpected result: {:?}", other),
		}
	}
}
